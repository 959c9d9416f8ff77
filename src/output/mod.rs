//! Output module for crawl results and reports
//!
//! This module handles:
//! - JSON snapshots of a crawled catalog
//! - Statistics over extracted entries and recorded errors
//! - Markdown reports for crawls and validation probes

mod markdown;
mod snapshot;
pub mod stats;

pub use markdown::{format_crawl_summary, format_validation_report};
pub use snapshot::{read_snapshot, write_json, CatalogSnapshot};
pub use stats::{print_statistics, CrawlStatistics};
