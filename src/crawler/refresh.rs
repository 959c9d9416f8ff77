use std::collections::HashMap;

use crate::model::CatalogEntry;

/// Carries identity and sub-entries over from a previous snapshot
///
/// A freshly crawled entry whose `source_url` matches an entry of
/// `previous` takes over that entry's id, creation time and sub-entries
/// (watched flags included). Sub-entry extraction then skips it, so a
/// catalog refresh only fetches pages for entries that are new.
///
/// Returns how many entries were matched.
pub fn carry_over_sub_entries(fresh: &mut [CatalogEntry], previous: Vec<CatalogEntry>) -> usize {
    let mut by_url: HashMap<String, CatalogEntry> = previous
        .into_iter()
        .map(|entry| (entry.source_url.clone(), entry))
        .collect();

    let mut matched = 0;
    for entry in fresh.iter_mut() {
        if let Some(old) = by_url.remove(&entry.source_url) {
            entry.id = old.id;
            entry.created_at = old.created_at;
            if entry.sub_entries.is_empty() {
                entry.sub_entries = old.sub_entries;
            }
            matched += 1;
        }
    }

    tracing::debug!("Carried over {} of {} entries", matched, fresh.len());
    matched
}
