use scraper::{ElementRef, Html};
use std::collections::BTreeMap;

use crate::config::{SelectorRole, Selectors, Stage};
use crate::fetch::HtmlFetcher;
use crate::model::{ProbeError, ValidationResult};
use crate::select::{
    count_matches, first_href, href_of, is_anchor, query_all, query_all_or_self, Containers,
};
use crate::url::resolve_url;

/// Probes `selectors` against live pages, starting at `catalog_url`
///
/// The stages run strictly in order because each one needs a URL found by
/// the previous one. Whatever was gathered before a break is kept: counts
/// and visited pages of earlier stages survive a later failure, and the
/// single recorded error names the step that broke.
///
/// Only configured roles get a count, and only on the page of their own
/// stage. A count of 0 is a real answer.
pub async fn validate<F>(catalog_url: &str, selectors: &Selectors, fetcher: &F) -> ValidationResult
where
    F: HtmlFetcher + ?Sized,
{
    let mut result = ValidationResult::default();

    tracing::info!("Probing catalog page {}", catalog_url);
    let catalog_html = match fetcher.fetch_html(catalog_url).await {
        Ok(html) => html,
        Err(e) => {
            result.errors.push(ProbeError::CatalogFetch(e));
            return result;
        }
    };
    result.pages.catalog = Some(catalog_url.to_string());

    let entry_url = inspect_page(
        &catalog_html,
        catalog_url,
        Stage::Catalog,
        selectors,
        &mut result.counts,
    );
    let Some(entry_url) = entry_url else {
        result.errors.push(ProbeError::NoEntryUrl);
        return result;
    };

    tracing::info!("Probing entry page {}", entry_url);
    let entry_html = match fetcher.fetch_html(&entry_url).await {
        Ok(html) => html,
        Err(e) => {
            result.errors.push(ProbeError::EntryFetch(e));
            return result;
        }
    };
    result.pages.entry = Some(entry_url.clone());

    let sub_entry_url = inspect_page(
        &entry_html,
        &entry_url,
        Stage::Entry,
        selectors,
        &mut result.counts,
    );
    let Some(sub_entry_url) = sub_entry_url else {
        result.errors.push(ProbeError::NoSubEntryUrl);
        return result;
    };

    tracing::info!("Probing sub-entry page {}", sub_entry_url);
    let sub_entry_html = match fetcher.fetch_html(&sub_entry_url).await {
        Ok(html) => html,
        Err(e) => {
            result.errors.push(ProbeError::SubEntryFetch(e));
            return result;
        }
    };
    result.pages.sub_entry = Some(sub_entry_url.clone());

    inspect_page(
        &sub_entry_html,
        &sub_entry_url,
        Stage::SubEntry,
        selectors,
        &mut result.counts,
    );

    result
}

/// Counts the stage's roles on one page and finds the link to the next stage
fn inspect_page(
    html: &str,
    page_url: &str,
    stage: Stage,
    selectors: &Selectors,
    counts: &mut BTreeMap<SelectorRole, usize>,
) -> Option<String> {
    let document = Html::parse_document(html);

    for role in stage.roles() {
        if let Some(selector) = selectors.get(*role) {
            let count = count_matches(&document, selector);
            tracing::debug!("{} '{}' matched {} element(s)", role, selector, count);
            counts.insert(*role, count);
        }
    }

    // catalog items are split the same way the extractor splits them
    let (items, url_role) = match stage {
        Stage::Catalog => (
            Containers::from_document(&document, selectors.get(SelectorRole::EntryList)).into_vec(),
            SelectorRole::EntryUrl,
        ),
        Stage::Entry => (
            query_all(&document, selectors.get(SelectorRole::SubEntryList)),
            SelectorRole::SubEntryUrl,
        ),
        Stage::SubEntry => return None,
    };

    first_link(items, page_url, selectors.get(url_role))
}

/// First usable link among `items`, resolved against `page_url`
///
/// Items are tried in order. Without a URL selector the item itself has to
/// be a link; with one, the item counts as a match when it satisfies the
/// URL selector.
pub fn first_link<'a, I>(items: I, page_url: &str, url_selector: Option<&str>) -> Option<String>
where
    I: IntoIterator<Item = ElementRef<'a>>,
{
    items
        .into_iter()
        .filter_map(|item| match url_selector {
            Some(selector) => first_href(query_all_or_self(item, Some(selector))),
            None if is_anchor(item) => href_of(item),
            None => None,
        })
        .find_map(|href| resolve_url(href, page_url).ok())
}
