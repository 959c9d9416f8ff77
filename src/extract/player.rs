use scraper::{ElementRef, Html};
use serde::Serialize;
use std::collections::HashSet;

use crate::config::{Driver, SelectorRole};
use crate::select::{href_of, non_empty_attr, query_all};
use crate::url::resolve_url;

/// Video and external links found on a sub-entry page
///
/// Only URLs are collected; nothing is downloaded.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerLinks {
    pub players: Vec<String>,
    pub external: Vec<String>,
}

impl PlayerLinks {
    pub fn is_empty(&self) -> bool {
        self.players.is_empty() && self.external.is_empty()
    }
}

/// Attributes that carry a player source, in order of preference
const SOURCE_ATTRS: [&str; 3] = ["src", "data-src", "data-lazy-src"];

/// Applies the `videoPlayer` and `externalLinkSelector` roles to a page
///
/// A player element contributes its own source, or the source of the first
/// nested `source`, `iframe` or `video` that has one. Links resolve against `page_url`. Both lists
/// keep document order and drop repeats; unusable URLs are skipped.
pub fn extract_player_links(document: &Html, page_url: &str, driver: &Driver) -> PlayerLinks {
    let selectors = &driver.config.selectors;

    let players = query_all(document, selectors.get(SelectorRole::VideoPlayer))
        .into_iter()
        .filter_map(player_source);

    let external = query_all(document, selectors.get(SelectorRole::ExternalLinkSelector))
        .into_iter()
        .filter_map(href_of);

    PlayerLinks {
        players: resolve_unique(players, page_url),
        external: resolve_unique(external, page_url),
    }
}

/// Parses raw HTML and runs [`extract_player_links`]
pub fn extract_player_links_html(html: &str, page_url: &str, driver: &Driver) -> PlayerLinks {
    let document = Html::parse_document(html);
    extract_player_links(&document, page_url, driver)
}

fn player_source(element: ElementRef<'_>) -> Option<&str> {
    own_source(element).or_else(|| {
        query_all(element, Some("source, iframe, video"))
            .into_iter()
            .find_map(own_source)
    })
}

fn own_source(element: ElementRef<'_>) -> Option<&str> {
    SOURCE_ATTRS
        .iter()
        .filter_map(|attr| non_empty_attr(element, attr))
        .find(|src| !is_placeholder(src))
}

fn is_placeholder(src: &str) -> bool {
    src.starts_with("data:") || src.eq_ignore_ascii_case("about:blank")
}

fn resolve_unique<'a>(hrefs: impl Iterator<Item = &'a str>, page_url: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut urls = Vec::new();

    for href in hrefs {
        match resolve_url(href, page_url) {
            Ok(url) => {
                if seen.insert(url.clone()) {
                    urls.push(url);
                }
            }
            Err(e) => tracing::debug!("{}: skipping link: {}", page_url, e),
        }
    }

    urls
}
