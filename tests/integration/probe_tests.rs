//! Integration tests for the driver validation probe
//!
//! A wiremock server plays the catalog, entry and sub-entry pages; the
//! probe walks them through the real HTTP fetcher.

use sumi_catalog::config::{FetchConfig, SelectorRole, Selectors, Stage};
use sumi_catalog::fetch::HttpFetcher;
use sumi_catalog::model::ProbeError;
use sumi_catalog::probe::validate;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn mount_html(server: &MockServer, page: &str, body: &str) {
    Mock::given(method("GET"))
        .and(path(page))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(body.to_string())
                .insert_header("content-type", "text/html"),
        )
        .mount(server)
        .await;
}

fn fetcher() -> HttpFetcher {
    HttpFetcher::new(&FetchConfig::default()).expect("Failed to build client")
}

const CATALOG: &str = r#"<html><body>
    <div class="card">
      <a class="link" href="/anime/one"><span class="title">One</span></a>
      <img class="cover" src="/img/one.jpg">
    </div>
    <div class="card">
      <a class="link" href="/anime/two"><span class="title">Two</span></a>
      <img class="cover" src="/img/two.jpg">
    </div>
</body></html>"#;

const ENTRY: &str = r#"<html><body>
    <ul class="eps">
      <li><span class="n">1</span><a href="/watch/one/1">Episode 1</a></li>
      <li><span class="n">2</span><a href="/watch/one/2">Episode 2</a></li>
      <li><span class="n">3</span><a href="/watch/one/3">Episode 3</a></li>
    </ul>
</body></html>"#;

const EPISODE: &str = r#"<html><body>
    <iframe class="player" src="https://cdn.test/embed/1"></iframe>
    <a class="dl" href="https://files.test/1">download</a>
</body></html>"#;

fn full_selectors() -> Selectors {
    Selectors {
        entry_list: Some(".card".to_string()),
        entry_url: Some("a.link".to_string()),
        entry_title: Some(".title".to_string()),
        entry_image: Some("img.cover".to_string()),
        sub_entry_list: Some("ul.eps li".to_string()),
        sub_entry_number: Some(".n".to_string()),
        sub_entry_url: Some("a".to_string()),
        video_player: Some("iframe.player".to_string()),
        external_link_selector: Some("a.dl".to_string()),
        ..Default::default()
    }
}

#[tokio::test]
async fn test_probe_walks_all_three_pages() {
    let server = MockServer::start().await;
    let base = server.uri();
    mount_html(&server, "/catalog", CATALOG).await;
    mount_html(&server, "/anime/one", ENTRY).await;
    mount_html(&server, "/watch/one/1", EPISODE).await;

    let catalog_url = format!("{}/catalog", base);
    let result = validate(&catalog_url, &full_selectors(), &fetcher()).await;

    assert!(result.is_valid(), "{:?}", result.errors);
    assert_eq!(result.pages.catalog, Some(catalog_url));
    assert_eq!(result.pages.entry, Some(format!("{}/anime/one", base)));
    assert_eq!(result.pages.sub_entry, Some(format!("{}/watch/one/1", base)));

    assert_eq!(result.counts[&SelectorRole::EntryList], 2);
    assert_eq!(result.counts[&SelectorRole::EntryImage], 2);
    assert_eq!(result.counts[&SelectorRole::SubEntryList], 3);
    assert_eq!(result.counts[&SelectorRole::VideoPlayer], 1);
    assert_eq!(result.counts[&SelectorRole::ExternalLinkSelector], 1);
    assert!(!result.counts.contains_key(&SelectorRole::EntrySynopsis));
    assert!(result.unmatched_roles().is_empty());
}

#[tokio::test]
async fn test_no_entry_url_stops_on_catalog() {
    let server = MockServer::start().await;
    mount_html(
        &server,
        "/catalog",
        r#"<div class="card"><span class="title">One</span></div>
           <div class="card"><span class="title">Two</span></div>"#,
    )
    .await;
    // nothing past the catalog page may be requested
    Mock::given(method("GET"))
        .and(path("/anime/one"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let selectors = Selectors {
        entry_list: Some(".card".to_string()),
        entry_title: Some(".title".to_string()),
        sub_entry_list: Some("li".to_string()),
        sub_entry_url: Some("a".to_string()),
        ..Default::default()
    };

    let result = validate(&format!("{}/catalog", server.uri()), &selectors, &fetcher()).await;

    assert_eq!(
        result.error_messages(),
        vec!["Could not find anime URL on catalog page"]
    );
    assert!(result.pages.catalog.is_some());
    assert_eq!(result.pages.entry, None);
    assert_eq!(result.pages.sub_entry, None);
    assert_eq!(result.counts[&SelectorRole::EntryList], 2);
    assert_eq!(result.counts[&SelectorRole::EntryTitle], 2);
    assert!(result.counts.keys().all(|role| role.stage() == Stage::Catalog));
}

#[tokio::test]
async fn test_entry_fetch_failure_keeps_catalog_counts() {
    let server = MockServer::start().await;
    mount_html(&server, "/catalog", CATALOG).await;
    Mock::given(method("GET"))
        .and(path("/anime/one"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let catalog_url = format!("{}/catalog", server.uri());
    let result = validate(&catalog_url, &full_selectors(), &fetcher()).await;

    assert!(result.pages.catalog.is_some());
    assert!(!result.stage_counts(Stage::Catalog).is_empty());
    assert!(result.stage_counts(Stage::Entry).is_empty());
    assert_eq!(result.errors.len(), 1);
    assert_eq!(
        result.errors[0].to_string(),
        "Failed to fetch anime page: HTTP status 500"
    );
}

#[tokio::test]
async fn test_sub_entry_fetch_failure_keeps_earlier_stages() {
    let server = MockServer::start().await;
    mount_html(&server, "/catalog", CATALOG).await;
    mount_html(&server, "/anime/one", ENTRY).await;

    let catalog_url = format!("{}/catalog", server.uri());
    let result = validate(&catalog_url, &full_selectors(), &fetcher()).await;

    assert!(matches!(result.errors[..], [ProbeError::SubEntryFetch(_)]));
    assert!(result.pages.entry.is_some());
    assert_eq!(result.pages.sub_entry, None);
    assert_eq!(result.counts[&SelectorRole::SubEntryNumber], 3);
    assert!(result.stage_counts(Stage::SubEntry).is_empty());
}

#[tokio::test]
async fn test_catalog_unreachable() {
    let server = MockServer::start().await;

    let catalog_url = format!("{}/catalog", server.uri());
    let result = validate(&catalog_url, &full_selectors(), &fetcher()).await;

    assert!(result.counts.is_empty());
    assert_eq!(result.pages.catalog, None);
    assert!(matches!(result.errors[..], [ProbeError::CatalogFetch(_)]));
}

#[tokio::test]
async fn test_result_serializes_for_ui() {
    let server = MockServer::start().await;
    mount_html(&server, "/catalog", CATALOG).await;

    let catalog_url = format!("{}/catalog", server.uri());
    let result = validate(&catalog_url, &full_selectors(), &fetcher()).await;
    let value = serde_json::to_value(&result).unwrap();

    assert_eq!(value["counts"]["entryList"], 2);
    assert!(value["pages"]["entry"].is_null());
    assert!(value["pages"]["subEntry"].is_null());
    assert!(value["errors"][0]
        .as_str()
        .unwrap()
        .starts_with("Failed to fetch anime page"));
}
