use scraper::{ElementRef, Html};
use std::collections::HashSet;

use crate::config::{Driver, SelectorRole};
use crate::extract::fallback::{diagnose, SUB_ENTRY_FALLBACKS};
use crate::fetch::HtmlFetcher;
use crate::model::{ExtractError, Stamper, SubEntry, SubEntryResult};
use crate::select::{
    element_text, first_href, image_source, query_all, query_all_or_self, query_first,
};
use crate::url::resolve_url;

/// Extracts the sub-entries of one catalog entry
///
/// Non-empty `existing` sub-entries are returned as they are, without a
/// fetch: an entry that already has its episodes is not re-crawled.
///
/// Otherwise the entry page is fetched once. A failed fetch yields a single
/// fetch error and no sub-entries. URLs resolve against `entry_url`, not the
/// driver's `baseUrl`, since episode pages may live under another path root.
pub async fn extract_sub_entries<F>(
    entry_url: &str,
    driver: &Driver,
    existing: Vec<SubEntry>,
    fetcher: &F,
    stamper: &dyn Stamper,
) -> SubEntryResult
where
    F: HtmlFetcher + ?Sized,
{
    if !existing.is_empty() {
        tracing::debug!(
            "{} already has {} sub-entries; skipping fetch",
            entry_url,
            existing.len()
        );
        return SubEntryResult {
            sub_entries: existing,
            errors: Vec::new(),
        };
    }

    if driver.config.selectors.get(SelectorRole::SubEntryList).is_none() {
        return SubEntryResult::failed(unconfigured_list());
    }

    let html = match fetcher.fetch_html(entry_url).await {
        Ok(html) => html,
        Err(e) => {
            tracing::warn!("Failed to fetch entry page {}: {}", entry_url, e);
            return SubEntryResult::failed(ExtractError::fetch(entry_url, e));
        }
    };

    extract_sub_entries_html(&html, entry_url, driver, stamper)
}

/// Parses raw HTML and runs [`extract_sub_entries_from_document`]
pub fn extract_sub_entries_html(
    html: &str,
    entry_url: &str,
    driver: &Driver,
    stamper: &dyn Stamper,
) -> SubEntryResult {
    let document = Html::parse_document(html);
    extract_sub_entries_from_document(&document, entry_url, driver, stamper)
}

/// Extracts sub-entries from an already fetched entry page
///
/// Items come back in document order; `number` is metadata, not a sort key.
/// An item whose number was already taken by an earlier item is skipped and
/// recorded, keeping numbers unique within the entry.
pub fn extract_sub_entries_from_document(
    document: &Html,
    entry_url: &str,
    driver: &Driver,
    stamper: &dyn Stamper,
) -> SubEntryResult {
    let Some(list_selector) = driver.config.selectors.get(SelectorRole::SubEntryList) else {
        return SubEntryResult::failed(unconfigured_list());
    };

    let items = query_all(document, Some(list_selector));

    if items.is_empty() {
        return match diagnose(document, list_selector, SUB_ENTRY_FALLBACKS) {
            Some(hint) => {
                let message = format!("No episodes found with selector '{list_selector}'; {hint}");
                tracing::warn!("{}: {}", entry_url, message);
                SubEntryResult::failed(ExtractError::Page(message))
            }
            None => {
                tracing::debug!("{}: no sub-entries for '{}'", entry_url, list_selector);
                SubEntryResult::default()
            }
        };
    }

    let mut result = SubEntryResult::default();
    let mut seen_numbers = HashSet::new();

    for (index, item) in items.into_iter().enumerate() {
        let built = build_sub_entry(item, index, entry_url, driver, stamper).and_then(|sub| {
            if seen_numbers.insert(sub.number) {
                Ok(sub)
            } else {
                Err(format!("duplicate episode number {}", sub.number))
            }
        });

        match built {
            Ok(sub) => result.sub_entries.push(sub),
            Err(message) => {
                tracing::warn!("{}: episode {} skipped: {}", entry_url, index, message);
                result.errors.push(ExtractError::sub_entry(index, message));
            }
        }
    }

    result
}

fn build_sub_entry(
    item: ElementRef<'_>,
    index: usize,
    entry_url: &str,
    driver: &Driver,
    stamper: &dyn Stamper,
) -> Result<SubEntry, String> {
    let selectors = &driver.config.selectors;

    let url_selector = selectors
        .get(SelectorRole::SubEntryUrl)
        .ok_or_else(|| "subEntryUrl selector is not configured".to_string())?;

    let href = first_href(query_all_or_self(item, Some(url_selector)))
        .ok_or_else(|| format!("no URL found for selector '{url_selector}'"))?;

    let source_url =
        resolve_url(href, entry_url).map_err(|e| format!("unusable URL '{href}': {e}"))?;

    let position = u32::try_from(index + 1).unwrap_or(u32::MAX);
    let number = query_all_or_self(item, selectors.get(SelectorRole::SubEntryNumber))
        .into_iter()
        .next()
        .and_then(|el| parse_first_number(&element_text(el)))
        .unwrap_or(position);

    let title = query_first(item, selectors.get(SelectorRole::SubEntryTitle))
        .map(element_text)
        .filter(|text| !text.is_empty());

    let thumbnail_url = query_first(item, Some("img"))
        .and_then(image_source)
        .and_then(|src| resolve_url(src, entry_url).ok());

    Ok(SubEntry {
        id: stamper.next_id(),
        number,
        title,
        source_url,
        thumbnail_url,
        watched: false,
        watched_at: None,
    })
}

fn unconfigured_list() -> ExtractError {
    ExtractError::Page("subEntryList selector is not configured".to_string())
}

/// Parses the first run of ASCII digits in `text`
///
/// ```
/// use sumi_catalog::extract::parse_first_number;
///
/// assert_eq!(parse_first_number("Episode 12 - The End"), Some(12));
/// assert_eq!(parse_first_number("Special"), None);
/// ```
pub fn parse_first_number(text: &str) -> Option<u32> {
    let start = text.find(|c: char| c.is_ascii_digit())?;
    let digits: &str = text[start..]
        .split(|c: char| !c.is_ascii_digit())
        .next()
        .unwrap_or_default();
    digits.parse().ok()
}
