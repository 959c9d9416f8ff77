use crate::config::{SelectorRole, Stage};
use crate::fetch::FetchError;
use serde::{Serialize, Serializer};
use std::collections::BTreeMap;
use thiserror::Error;

/// Why the validation probe stopped early
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ProbeError {
    #[error("Failed to fetch catalog page: {0}")]
    CatalogFetch(FetchError),

    #[error("Could not find anime URL on catalog page")]
    NoEntryUrl,

    #[error("Failed to fetch anime page: {0}")]
    EntryFetch(FetchError),

    #[error("Could not find episode URL on anime page")]
    NoSubEntryUrl,

    #[error("Failed to fetch episode page: {0}")]
    SubEntryFetch(FetchError),
}

impl ProbeError {
    /// The stage the chain broke at
    pub fn stage(&self) -> Stage {
        match self {
            Self::CatalogFetch(_) | Self::NoEntryUrl => Stage::Catalog,
            Self::EntryFetch(_) | Self::NoSubEntryUrl => Stage::Entry,
            Self::SubEntryFetch(_) => Stage::SubEntry,
        }
    }
}

impl Serialize for ProbeError {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// The pages the probe reached
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VisitedPages {
    pub catalog: Option<String>,
    pub entry: Option<String>,
    pub sub_entry: Option<String>,
}

/// Outcome of probing a driver against live pages
///
/// `counts` only has keys for configured roles. A count of 0 means the
/// selector ran and matched nothing, which is different from a missing key.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ValidationResult {
    pub counts: BTreeMap<SelectorRole, usize>,
    pub pages: VisitedPages,
    pub errors: Vec<ProbeError>,
}

impl ValidationResult {
    /// True when the whole chain was walked
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Configured roles that were evaluated and matched nothing
    pub fn unmatched_roles(&self) -> Vec<SelectorRole> {
        self.counts
            .iter()
            .filter(|(_, count)| **count == 0)
            .map(|(role, _)| *role)
            .collect()
    }

    /// Counts recorded for one stage
    pub fn stage_counts(&self, stage: Stage) -> BTreeMap<SelectorRole, usize> {
        self.counts
            .iter()
            .filter(|(role, _)| role.stage() == stage)
            .map(|(role, count)| (*role, *count))
            .collect()
    }

    pub fn error_messages(&self) -> Vec<String> {
        self.errors.iter().map(ToString::to_string).collect()
    }
}
