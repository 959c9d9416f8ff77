//! Statistics over a crawl snapshot
//!
//! Counts how complete the extracted catalog is and classifies recorded
//! errors, for the CLI summary and the markdown report.

use crate::model::{CatalogEntry, ExtractError};
use serde::Serialize;

/// Crawl statistics summary
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CrawlStatistics {
    /// Number of catalog entries
    pub entries: usize,

    /// Sub-entries across all entries
    pub sub_entries: usize,

    /// Entries with at least one sub-entry
    pub entries_with_sub_entries: usize,

    pub entries_with_cover: usize,

    pub entries_with_synopsis: usize,

    /// Records that could not be built
    pub item_errors: usize,

    /// Pages where a list selector matched nothing
    pub page_errors: usize,

    /// Pages that could not be fetched
    pub fetch_errors: usize,
}

impl CrawlStatistics {
    /// Calculates statistics for a set of entries and their errors
    pub fn collect(entries: &[CatalogEntry], errors: &[ExtractError]) -> Self {
        let mut stats = Self {
            entries: entries.len(),
            ..Default::default()
        };

        for entry in entries {
            stats.sub_entries += entry.sub_entries.len();
            if !entry.sub_entries.is_empty() {
                stats.entries_with_sub_entries += 1;
            }
            if entry.cover_url.is_some() {
                stats.entries_with_cover += 1;
            }
            if entry.synopsis.is_some() {
                stats.entries_with_synopsis += 1;
            }
        }

        for error in errors {
            match root_cause(error) {
                ExtractError::Item { .. } => stats.item_errors += 1,
                ExtractError::Page(_) => stats.page_errors += 1,
                ExtractError::Fetch { .. } => stats.fetch_errors += 1,
                ExtractError::InEntry { .. } => {}
            }
        }

        stats
    }

    pub fn total_errors(&self) -> usize {
        self.item_errors + self.page_errors + self.fetch_errors
    }

    /// Percentage of entries that have sub-entries
    pub fn sub_entry_coverage(&self) -> f64 {
        if self.entries == 0 {
            return 0.0;
        }
        (self.entries_with_sub_entries as f64 / self.entries as f64) * 100.0
    }
}

fn root_cause(error: &ExtractError) -> &ExtractError {
    match error {
        ExtractError::InEntry { source, .. } => root_cause(source),
        other => other,
    }
}

/// Prints statistics to stdout in a formatted manner
pub fn print_statistics(stats: &CrawlStatistics) {
    println!("=== Catalog Statistics ===");
    println!();
    println!("Entries:            {}", stats.entries);
    println!("  with cover:       {}", stats.entries_with_cover);
    println!("  with synopsis:    {}", stats.entries_with_synopsis);
    println!(
        "  with sub-entries: {} ({:.1}%)",
        stats.entries_with_sub_entries,
        stats.sub_entry_coverage()
    );
    println!("Sub-entries:        {}", stats.sub_entries);
    println!();

    if stats.total_errors() > 0 {
        println!("Errors:");
        println!("  item:  {}", stats.item_errors);
        println!("  page:  {}", stats.page_errors);
        println!("  fetch: {}", stats.fetch_errors);
    } else {
        println!("No errors");
    }
}
