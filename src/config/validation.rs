use crate::config::types::{Config, Driver, FetchConfig, SelectorRole};
use crate::select::compile;
use crate::url::host_matches;
use crate::ConfigError;
use url::Url;

/// Validates the entire configuration
///
/// Only problems that make the driver unusable are errors. Selector text is
/// never rejected here: a broken selector shows up as zero matches in the
/// validation probe, and [`lint_driver`] reports it for humans.
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_fetch_config(&config.fetch)?;
    validate_driver(&config.driver)?;

    for warning in lint_driver(&config.driver) {
        tracing::warn!("Driver {}: {}", config.driver.id, warning);
    }

    Ok(())
}

/// Validates fetch configuration
fn validate_fetch_config(config: &FetchConfig) -> Result<(), ConfigError> {
    if config.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user-agent cannot be empty".to_string(),
        ));
    }

    if config.timeout_secs == 0 {
        return Err(ConfigError::Validation(
            "timeout-secs must be >= 1".to_string(),
        ));
    }

    if config.connect_timeout_secs == 0 || config.connect_timeout_secs > config.timeout_secs {
        return Err(ConfigError::Validation(format!(
            "connect-timeout-secs must be between 1 and timeout-secs ({}), got {}",
            config.timeout_secs, config.connect_timeout_secs
        )));
    }

    Ok(())
}

/// Validates a driver's identity and base URL
pub fn validate_driver(driver: &Driver) -> Result<(), ConfigError> {
    if driver.id.trim().is_empty() {
        return Err(ConfigError::Validation("driver id cannot be empty".to_string()));
    }

    validate_domain(&driver.domain)?;
    validate_version(&driver.version)?;

    let base = Url::parse(driver.config.base_url.trim()).map_err(|e| {
        ConfigError::InvalidUrl(format!("baseUrl '{}': {}", driver.config.base_url, e))
    })?;

    if base.scheme() != "http" && base.scheme() != "https" {
        return Err(ConfigError::InvalidUrl(format!(
            "baseUrl '{}' must use HTTP or HTTPS",
            driver.config.base_url
        )));
    }

    Ok(())
}

/// Reports non-fatal driver problems
///
/// - selectors that do not compile
/// - missing selectors the sub-entry stage cannot work without
/// - a base URL outside the driver's domain
pub fn lint_driver(driver: &Driver) -> Vec<String> {
    let selectors = &driver.config.selectors;
    let mut warnings = Vec::new();

    for role in SelectorRole::ALL {
        if let Some(selector) = selectors.get(role) {
            if let Err(e) = compile(selector) {
                warnings.push(format!("{role} selector does not compile: {e}"));
            }
        } else if role.is_required() {
            warnings.push(format!(
                "{role} is not configured; sub-entries cannot be extracted"
            ));
        }
    }

    if let Ok(base) = Url::parse(driver.config.base_url.trim()) {
        if !host_matches(&driver.domain, &base) {
            warnings.push(format!(
                "baseUrl host {} is outside driver domain {}",
                base.host_str().unwrap_or("?"),
                driver.domain
            ));
        }
    }

    warnings
}

/// Validates a driver domain: a host name, optionally with a port
fn validate_domain(domain: &str) -> Result<(), ConfigError> {
    let host = domain.split(':').next().unwrap_or_default();

    if host.is_empty() {
        return Err(ConfigError::Validation(
            "driver domain cannot be empty".to_string(),
        ));
    }

    if !host
        .chars()
        .all(|c| c.is_alphanumeric() || c == '.' || c == '-')
    {
        return Err(ConfigError::Validation(format!(
            "driver domain '{}' contains invalid characters",
            domain
        )));
    }

    if host.starts_with('.') || host.ends_with('.') || host.contains("..") {
        return Err(ConfigError::Validation(format!(
            "driver domain '{}' is malformed",
            domain
        )));
    }

    Ok(())
}

/// Validates a `MAJOR.MINOR.PATCH` version, allowing a `-pre` or `+build` tail
fn validate_version(version: &str) -> Result<(), ConfigError> {
    let core = version
        .split(['-', '+'])
        .next()
        .unwrap_or_default();

    let parts: Vec<&str> = core.split('.').collect();
    let well_formed = parts.len() == 3
        && parts
            .iter()
            .all(|p| !p.is_empty() && p.chars().all(|c| c.is_ascii_digit()));

    if !well_formed {
        return Err(ConfigError::Validation(format!(
            "driver version '{}' is not a semantic version (MAJOR.MINOR.PATCH)",
            version
        )));
    }

    Ok(())
}
