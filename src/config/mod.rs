//! Driver configuration for Sumi-Catalog
//!
//! This module holds the driver data model (selectors per role, base URL,
//! pagination hints) and loads, validates and fingerprints driver files.
//!
//! # Example
//!
//! ```no_run
//! use sumi_catalog::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("drivers/site.toml")).unwrap();
//! println!("Driver {} v{}", config.driver.id, config.driver.version);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    Config, Driver, DriverConfig, FetchConfig, Pagination, SelectorRole, Selectors, Stage,
    DEFAULT_USER_AGENT,
};

// Re-export parser and validation functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash, parse_json, parse_toml};
pub use validation::{lint_driver, validate, validate_driver};
