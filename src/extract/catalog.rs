use chrono::{DateTime, Utc};
use scraper::{ElementRef, Html};

use crate::config::{Driver, SelectorRole};
use crate::extract::fallback::{diagnose, CATALOG_FALLBACKS};
use crate::model::{CatalogEntry, CrawlResult, EntryMetadata, ExtractError, Stamper};
use crate::select::{
    element_text, first_href, href_of, image_source, is_anchor, query_all_or_self, query_first,
    Containers,
};
use crate::url::{last_path_segment, resolve_url};

/// Extracts catalog entries from a parsed catalog page
///
/// # Algorithm
///
/// 1. Containers come from `entryList`; without one the page body is a
///    single implicit container
/// 2. A configured `entryList` that matches nothing yields one page error
///    and no entries
/// 3. Each container is built independently; a container without a usable
///    URL is skipped and recorded with its index
/// 4. Entries are returned in document order, duplicates included
///
/// URLs and cover images are resolved against the driver's `baseUrl`.
pub fn extract_catalog(document: &Html, driver: &Driver, stamper: &dyn Stamper) -> CrawlResult {
    let list_selector = driver.config.selectors.get(SelectorRole::EntryList);
    let containers = Containers::from_document(document, list_selector);

    if containers.is_empty() {
        let selector = list_selector.unwrap_or_default();
        let mut message = format!("No anime found with selector '{selector}'");
        if let Some(hint) = diagnose(document, selector, CATALOG_FALLBACKS) {
            message.push_str("; ");
            message.push_str(&hint);
        }
        tracing::warn!("Driver {}: {}", driver.id, message);
        return CrawlResult::failed(ExtractError::Page(message));
    }

    if containers.is_implicit() {
        tracing::debug!(
            "Driver {} has no entryList; treating the page as one entry",
            driver.id
        );
    }

    let extracted_at = stamper.now();
    let mut result = CrawlResult::default();

    for (index, container) in containers.into_iter().enumerate() {
        match build_entry(container, index, driver, stamper, extracted_at) {
            Ok(entry) => result.entries.push(entry),
            Err(message) => {
                tracing::warn!("Driver {}: entry {} skipped: {}", driver.id, index, message);
                result.errors.push(ExtractError::entry(index, message));
            }
        }
    }

    tracing::debug!(
        "Driver {}: {} entries, {} errors",
        driver.id,
        result.entries.len(),
        result.errors.len()
    );

    result
}

/// Parses raw HTML and runs [`extract_catalog`]
pub fn extract_catalog_html(html: &str, driver: &Driver, stamper: &dyn Stamper) -> CrawlResult {
    let document = Html::parse_document(html);
    extract_catalog(&document, driver, stamper)
}

fn build_entry(
    container: ElementRef<'_>,
    index: usize,
    driver: &Driver,
    stamper: &dyn Stamper,
    extracted_at: DateTime<Utc>,
) -> Result<CatalogEntry, String> {
    let selectors = &driver.config.selectors;
    let base_url = driver.config.base_url.as_str();

    let href = match selectors.get(SelectorRole::EntryUrl) {
        None if is_anchor(container) => href_of(container)
            .ok_or_else(|| "entry link has no href".to_string())?,
        None => {
            return Err(
                "container is not a link and no entryUrl selector is configured".to_string(),
            )
        }
        Some(selector) => first_href(query_all_or_self(container, Some(selector)))
            .ok_or_else(|| format!("no URL found for selector '{selector}'"))?,
    };

    let source_url =
        resolve_url(href, base_url).map_err(|e| format!("unusable URL '{href}': {e}"))?;

    let title = resolve_title(container, driver, &source_url, index);

    let cover_url = query_first(container, selectors.get(SelectorRole::EntryImage))
        .and_then(image_source)
        .and_then(|src| match resolve_url(src, base_url) {
            Ok(url) => Some(url),
            Err(e) => {
                tracing::debug!("Entry {}: cover '{}' dropped: {}", index, src, e);
                None
            }
        });

    let synopsis = query_first(container, selectors.get(SelectorRole::EntrySynopsis))
        .map(element_text)
        .filter(|text| !text.is_empty());

    Ok(CatalogEntry {
        id: stamper.next_id(),
        driver_id: driver.id.clone(),
        title,
        synopsis,
        cover_url,
        source_url,
        metadata: EntryMetadata::new(extracted_at, driver.version.clone()),
        sub_entries: Vec::new(),
        created_at: extracted_at,
        updated_at: extracted_at,
    })
}

/// entryTitle → the container's own link text → URL slug → "Entry {n}"
fn resolve_title(
    container: ElementRef<'_>,
    driver: &Driver,
    source_url: &str,
    index: usize,
) -> String {
    let configured = query_first(
        container,
        driver.config.selectors.get(SelectorRole::EntryTitle),
    )
    .map(element_text)
    .filter(|text| !text.is_empty());

    configured
        .or_else(|| {
            is_anchor(container)
                .then(|| element_text(container))
                .filter(|text| !text.is_empty())
        })
        .or_else(|| last_path_segment(source_url))
        .unwrap_or_else(|| format!("Entry {}", index + 1))
}
