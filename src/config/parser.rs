use crate::config::types::{Config, Driver, FetchConfig};
use crate::config::validation::validate;
use crate::ConfigError;
use serde::Deserialize;
use sha2::{Digest, Sha256};
use std::path::Path;

/// Accepts both a wrapped `{ fetch, driver }` file and a bare driver
#[derive(Deserialize)]
#[serde(untagged)]
enum DriverFile {
    Wrapped(Config),
    Bare(Driver),
}

impl From<DriverFile> for Config {
    fn from(file: DriverFile) -> Self {
        match file {
            DriverFile::Wrapped(config) => config,
            DriverFile::Bare(driver) => Config {
                fetch: FetchConfig::default(),
                driver,
            },
        }
    }
}

/// Loads, parses and validates a driver file
///
/// The format is chosen by extension: `.toml` or `.json`. Either format may
/// hold a bare driver or a `{ fetch, driver }` wrapper.
///
/// # Arguments
///
/// * `path` - Path to the driver file
///
/// # Returns
///
/// * `Ok(Config)` - Successfully loaded and validated configuration
/// * `Err(ConfigError)` - Failed to read, parse, or validate the file
///
/// # Example
///
/// ```no_run
/// use std::path::Path;
/// use sumi_catalog::config::load_config;
///
/// let config = load_config(Path::new("drivers/site.toml")).unwrap();
/// println!("Base URL: {}", config.driver.config.base_url);
/// ```
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    let content = std::fs::read_to_string(path)?;

    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();

    let config = match extension.as_str() {
        "toml" => parse_toml(&content)?,
        "json" => parse_json(&content)?,
        other => return Err(ConfigError::UnsupportedFormat(other.to_string())),
    };

    validate(&config)?;

    Ok(config)
}

/// Parses driver file content in TOML form without validating it
pub fn parse_toml(content: &str) -> Result<Config, ConfigError> {
    let file: DriverFile = toml::from_str(content)?;
    Ok(file.into())
}

/// Parses driver file content in JSON form without validating it
pub fn parse_json(content: &str) -> Result<Config, ConfigError> {
    let file: DriverFile = serde_json::from_str(content)?;
    Ok(file.into())
}

/// Computes a SHA-256 hash of the driver file content
///
/// Lets a caller tell whether a driver was hand-edited since its last crawl.
pub fn compute_config_hash(path: &Path) -> Result<String, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    Ok(hex::encode(hasher.finalize()))
}

/// Loads a driver file and returns both the config and its hash
pub fn load_config_with_hash(path: &Path) -> Result<(Config, String), ConfigError> {
    let config = load_config(path)?;
    let hash = compute_config_hash(path)?;
    Ok((config, hash))
}
