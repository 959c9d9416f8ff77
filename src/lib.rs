//! Sumi-Catalog: driver-driven catalog extraction
//!
//! This crate turns a small set of CSS-selector rules (a *driver*) plus raw
//! HTML into a structured catalog of entries and sub-entries with absolute
//! URLs, and probes a driver against live pages before it is trusted.

pub mod config;
pub mod crawler;
pub mod extract;
pub mod fetch;
pub mod model;
pub mod output;
pub mod probe;
pub mod select;
pub mod url;

use thiserror::Error;

/// Main error type for Sumi-Catalog operations
///
/// Extraction and validation never return this for expected conditions
/// (missing selectors, empty pages, unreachable pages); those are recorded
/// in the returned result instead.
#[derive(Debug, Error)]
pub enum SumiError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Fetch error: {0}")]
    Fetch(#[from] fetch::FetchError),

    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("URL error: {0}")]
    UrlError(#[from] UrlError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read driver file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Failed to parse JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Unsupported driver file extension: {0}")]
    UnsupportedFormat(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in driver: {0}")]
    InvalidUrl(String),
}

/// URL-specific errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UrlError {
    #[error("empty href")]
    Empty,

    #[error("invalid base URL '{base}': {reason}")]
    InvalidBase { base: String, reason: String },

    #[error("unsupported URL scheme in '{0}'")]
    InvalidScheme(String),

    #[error("failed to resolve '{href}': {reason}")]
    Parse { href: String, reason: String },
}

/// Result type alias for Sumi-Catalog operations
pub type Result<T> = std::result::Result<T, SumiError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for URL operations
pub type UrlResult<T> = std::result::Result<T, UrlError>;

// Re-export commonly used types
pub use config::{Config, Driver, DriverConfig, SelectorRole, Selectors, Stage};
pub use crawler::Coordinator;
pub use extract::{extract_catalog, extract_sub_entries, extract_sub_entries_from_document};
pub use fetch::{FetchError, HtmlFetcher, HttpFetcher};
pub use model::{
    CatalogEntry, CrawlResult, ExtractError, Stamper, SubEntry, SubEntryResult, SystemStamper,
    ValidationResult,
};
pub use probe::validate;
pub use url::resolve_url;
