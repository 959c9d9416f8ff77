use crate::fetch::FetchError;
use crate::model::entry::{CatalogEntry, SubEntry};
use serde::{Serialize, Serializer};
use std::fmt;
use thiserror::Error;

/// Which kind of record an item error belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemKind {
    Entry,
    SubEntry,
}

impl fmt::Display for ItemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Entry => f.write_str("Entry"),
            Self::SubEntry => f.write_str("Episode"),
        }
    }
}

/// A recorded, non-panicking extraction failure
///
/// - `Item`: one record could not be built; the rest of the page was used
/// - `Page`: the page yielded nothing for a configured list selector
/// - `Fetch`: the page could not be retrieved at all
/// - `InEntry`: any of the above, raised while working on a named entry
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ExtractError {
    #[error("{kind} at index {index}: {message}")]
    Item {
        kind: ItemKind,
        index: usize,
        message: String,
    },

    #[error("{0}")]
    Page(String),

    #[error("Failed to fetch {url}: {source}")]
    Fetch { url: String, source: FetchError },

    #[error("{entry}: {source}")]
    InEntry {
        entry: String,
        source: Box<ExtractError>,
    },
}

impl ExtractError {
    pub fn entry(index: usize, message: impl Into<String>) -> Self {
        Self::Item {
            kind: ItemKind::Entry,
            index,
            message: message.into(),
        }
    }

    pub fn sub_entry(index: usize, message: impl Into<String>) -> Self {
        Self::Item {
            kind: ItemKind::SubEntry,
            index,
            message: message.into(),
        }
    }

    pub fn fetch(url: impl Into<String>, source: FetchError) -> Self {
        Self::Fetch {
            url: url.into(),
            source,
        }
    }

    /// Tags the error with the title of the entry it belongs to
    pub fn in_entry(self, entry: impl Into<String>) -> Self {
        Self::InEntry {
            entry: entry.into(),
            source: Box::new(self),
        }
    }

    pub fn is_fetch(&self) -> bool {
        match self {
            Self::Fetch { .. } => true,
            Self::InEntry { source, .. } => source.is_fetch(),
            _ => false,
        }
    }
}

impl Serialize for ExtractError {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Entries extracted from one catalog page plus everything that went wrong
///
/// Partial success is the normal case; an empty `errors` list means every
/// container produced an entry.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CrawlResult {
    pub entries: Vec<CatalogEntry>,
    pub errors: Vec<ExtractError>,
}

impl CrawlResult {
    pub fn failed(error: ExtractError) -> Self {
        Self {
            entries: Vec::new(),
            errors: vec![error],
        }
    }

    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }

    /// True when the catalog page itself could not be fetched
    pub fn fetch_failed(&self) -> bool {
        self.errors.iter().any(ExtractError::is_fetch)
    }

    pub fn error_messages(&self) -> Vec<String> {
        self.errors.iter().map(ToString::to_string).collect()
    }
}

/// Sub-entries extracted from one entry page
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubEntryResult {
    pub sub_entries: Vec<SubEntry>,
    pub errors: Vec<ExtractError>,
}

impl SubEntryResult {
    pub fn failed(error: ExtractError) -> Self {
        Self {
            sub_entries: Vec::new(),
            errors: vec![error],
        }
    }

    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn fetch_failed(&self) -> bool {
        self.errors.iter().any(ExtractError::is_fetch)
    }

    pub fn error_messages(&self) -> Vec<String> {
        self.errors.iter().map(ToString::to_string).collect()
    }
}
