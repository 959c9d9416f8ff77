use scraper::Html;

use crate::select::count_matches;

/// Class patterns catalog listings commonly use
pub const CATALOG_FALLBACKS: &[&str] = &[
    ".anime-card",
    ".anime",
    ".card",
    ".item",
    "article",
    ".post",
];

/// Class patterns episode lists commonly use
pub const SUB_ENTRY_FALLBACKS: &[&str] = &[
    ".episode",
    ".episodes li",
    ".episode-item",
    ".ep-item",
    ".eps a",
    ".episodios li",
    "ul.list-episodes li",
    "[class*='episode'] a",
];

/// Looks for a common selector that does match when the configured one
/// matched nothing
///
/// Only ever used to word an error message; matches found here are never
/// turned into entries.
pub fn diagnose(document: &Html, configured: &str, candidates: &[&str]) -> Option<String> {
    candidates
        .iter()
        .filter(|candidate| candidate.trim() != configured.trim())
        .find_map(|candidate| {
            let count = count_matches(document, candidate);
            (count > 0).then(|| {
                format!(
                    "'{candidate}' matches {count} element(s) on this page, the configured selector is probably wrong"
                )
            })
        })
}
