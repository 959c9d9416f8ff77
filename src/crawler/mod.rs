//! Crawl orchestration for one driver
//!
//! This module ties a driver, an [`HtmlFetcher`](crate::fetch::HtmlFetcher)
//! and a [`Stamper`](crate::model::Stamper) together:
//! - catalog crawls with progress reporting
//! - sub-entry population for many entries with bounded concurrency
//! - carrying sub-entries over from a previous snapshot
//! - player link lookup and driver validation

mod coordinator;
mod progress;
mod refresh;

pub use coordinator::Coordinator;
pub use progress::Progress;
pub use refresh::carry_over_sub_entries;
