//! Catalog data model
//!
//! Entries, sub-entries and the result values the extractors and the
//! validation probe hand back. All of these are plain values: the crate
//! keeps no state between calls.

mod entry;
mod result;
mod stamp;
mod validation;

pub use entry::{CatalogEntry, EntryMetadata, SubEntry};
pub use result::{CrawlResult, ExtractError, ItemKind, SubEntryResult};
pub use stamp::{SequentialStamper, Stamper, SystemStamper};
pub use validation::{ProbeError, ValidationResult, VisitedPages};
