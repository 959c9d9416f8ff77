//! Integration tests for catalog crawls
//!
//! These tests use wiremock to serve catalog and entry pages and run the
//! real HTTP fetcher and coordinator against them end-to-end.

use std::io::Write;
use std::sync::{Arc, Mutex};

use sumi_catalog::config::{load_config, Driver, DriverConfig, FetchConfig, Selectors};
use sumi_catalog::crawler::carry_over_sub_entries;
use sumi_catalog::extract::extract_sub_entries;
use sumi_catalog::fetch::{FetchError, HtmlFetcher, HttpFetcher};
use sumi_catalog::model::{ExtractError, SubEntry, SystemStamper};
use sumi_catalog::Coordinator;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a driver rooted at the mock server
fn create_test_driver(base_url: &str, selectors: Selectors) -> Driver {
    Driver {
        id: "mock-site".to_string(),
        name: Some("Mock Site".to_string()),
        domain: "127.0.0.1".to_string(),
        version: "1.0.0".to_string(),
        author: None,
        config: DriverConfig {
            base_url: base_url.to_string(),
            selectors,
            pagination: None,
        },
    }
}

fn card_selectors() -> Selectors {
    Selectors {
        entry_list: Some(".card".to_string()),
        entry_url: Some("a.link".to_string()),
        entry_title: Some(".title".to_string()),
        entry_image: Some("img".to_string()),
        sub_entry_list: Some("ul.eps li".to_string()),
        sub_entry_number: Some(".num".to_string()),
        sub_entry_url: Some("a".to_string()),
        ..Default::default()
    }
}

fn coordinator(driver: Driver) -> Coordinator {
    let fetcher = HttpFetcher::new(&FetchConfig::default()).expect("Failed to build client");
    Coordinator::new(driver, Arc::new(fetcher))
}

async fn mount_html(server: &MockServer, page: &str, body: &str) {
    Mock::given(method("GET"))
        .and(path(page))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(body.to_string())
                .insert_header("content-type", "text/html; charset=utf-8"),
        )
        .mount(server)
        .await;
}

const THREE_CARDS: &str = r#"<html><body>
    <div class="card"><a class="link" href="/a"><span class="title">Show A</span></a></div>
    <div class="card"><a class="link" href="/b"><span class="title">Show B</span></a></div>
    <div class="card"><a class="link" href="/c"><span class="title">Show C</span></a></div>
</body></html>"#;

#[tokio::test]
async fn test_three_cards_end_to_end() {
    let server = MockServer::start().await;
    let base_url = server.uri();
    mount_html(&server, "/", THREE_CARDS).await;

    let coord = coordinator(create_test_driver(&base_url, card_selectors()));
    let result = coord.crawl(None, |_, _| {}).await;

    assert!(result.is_clean(), "{:?}", result.errors);
    let urls: Vec<_> = result.entries.iter().map(|e| e.source_url.clone()).collect();
    assert_eq!(
        urls,
        vec![
            format!("{}/a", base_url),
            format!("{}/b", base_url),
            format!("{}/c", base_url),
        ]
    );
    let titles: Vec<_> = result.entries.iter().map(|e| e.title.as_str()).collect();
    assert_eq!(titles, vec!["Show A", "Show B", "Show C"]);

    for entry in &result.entries {
        assert!(entry.source_url.starts_with("http://"));
        assert_eq!(entry.driver_id, "mock-site");
        assert_eq!(entry.metadata.driver_version, "1.0.0");
        assert!(entry.sub_entries.is_empty());
    }
}

#[tokio::test]
async fn test_card_without_link_is_reported_by_index() {
    let server = MockServer::start().await;
    mount_html(
        &server,
        "/",
        r#"<div class="card"><a class="link" href="/a"><span class="title">Show A</span></a></div>
           <div class="card"><span class="title">Show B</span></div>
           <div class="card"><a class="link" href="/c"><span class="title">Show C</span></a></div>"#,
    )
    .await;

    let result = coordinator(create_test_driver(&server.uri(), card_selectors()))
        .crawl(None, |_, _| {})
        .await;

    assert_eq!(result.entries.len(), 2);
    assert_eq!(result.errors.len(), 1);
    assert!(result.errors[0].to_string().contains("index 1"));
    assert!(!result.fetch_failed());
}

#[tokio::test]
async fn test_list_selector_matching_nothing() {
    let server = MockServer::start().await;
    mount_html(&server, "/", "<html><body><p>maintenance</p></body></html>").await;

    let result = coordinator(create_test_driver(&server.uri(), card_selectors()))
        .crawl(None, |_, _| {})
        .await;

    assert!(result.entries.is_empty());
    assert_eq!(
        result.error_messages(),
        vec!["No anime found with selector '.card'"]
    );
}

#[tokio::test]
async fn test_lazy_cover_made_absolute() {
    let server = MockServer::start().await;
    let base_url = server.uri();
    mount_html(
        &server,
        "/",
        r#"<div class="card"><a class="link" href="/x">X</a><img data-src="/img/x.jpg"></div>"#,
    )
    .await;

    let result = coordinator(create_test_driver(&base_url, card_selectors()))
        .crawl(None, |_, _| {})
        .await;

    assert_eq!(
        result.entries[0].cover_url.as_deref(),
        Some(format!("{}/img/x.jpg", base_url).as_str())
    );
}

#[tokio::test]
async fn test_catalog_fetch_failure() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let progress = Mutex::new(Vec::new());
    let result = coordinator(create_test_driver(&server.uri(), card_selectors()))
        .crawl(None, |msg, f| progress.lock().unwrap().push((msg.to_string(), f)))
        .await;

    assert!(result.entries.is_empty());
    assert!(result.fetch_failed());
    assert!(matches!(
        &result.errors[0],
        ExtractError::Fetch {
            source: FetchError::Status { status: 503 },
            ..
        }
    ));

    let progress = progress.into_inner().unwrap();
    assert_eq!(progress.first().map(|p| p.1), Some(0.0));
    assert_eq!(progress.last().map(|p| p.1), Some(1.0));
}

#[tokio::test]
async fn test_crawl_with_sub_entries() {
    let server = MockServer::start().await;
    let base_url = server.uri();
    mount_html(&server, "/", THREE_CARDS).await;
    mount_html(
        &server,
        "/a",
        r#"<ul class="eps">
             <li><span class="num">Episode 1</span><a href="/a/ep-1">watch</a></li>
             <li><span class="num">Episode 2</span><a href="ep-2">watch</a></li>
           </ul>"#,
    )
    .await;
    mount_html(&server, "/b", "<p>No episodes yet</p>").await;

    let coord = coordinator(create_test_driver(&base_url, card_selectors()));
    let crawl = coord.crawl(None, |_, _| {}).await;
    let (entries, errors) = coord.populate_sub_entries(crawl.entries, 2).await;

    assert_eq!(entries.len(), 3);
    let a = &entries[0];
    assert_eq!(a.sub_entries.len(), 2);
    assert_eq!(a.sub_entries[0].number, 1);
    assert_eq!(a.sub_entries[1].source_url, format!("{}/ep-2", base_url));
    assert!(entries[1].sub_entries.is_empty());

    // /c is not mounted
    assert_eq!(errors.len(), 1);
    assert!(errors[0].is_fetch());
    assert!(errors[0].to_string().starts_with("Show C: "));

    for sub in entries.iter().flat_map(|e| e.sub_entries.iter()) {
        assert!(sub.source_url.starts_with("http://"));
    }
}

#[tokio::test]
async fn test_existing_sub_entries_never_fetch() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<ul class=\"eps\"></ul>"))
        .expect(0)
        .mount(&server)
        .await;

    let driver = create_test_driver(&server.uri(), card_selectors());
    let fetcher = HttpFetcher::new(&FetchConfig::default()).unwrap();
    let existing = vec![SubEntry {
        id: "kept".to_string(),
        number: 7,
        title: Some("Seven".to_string()),
        source_url: format!("{}/a/7", server.uri()),
        thumbnail_url: None,
        watched: true,
        watched_at: None,
    }];

    let result = extract_sub_entries(
        &format!("{}/a", server.uri()),
        &driver,
        existing.clone(),
        &fetcher,
        &SystemStamper,
    )
    .await;

    assert_eq!(result.sub_entries, existing);
    assert!(result.errors.is_empty());
    // wiremock verifies expect(0) when the server drops
}

#[tokio::test]
async fn test_refresh_only_fetches_new_entries() {
    let server = MockServer::start().await;
    mount_html(&server, "/", THREE_CARDS).await;
    for page in ["/a", "/b", "/c"] {
        Mock::given(method("GET"))
            .and(path(page))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string(format!(
                        r#"<ul class="eps"><li><span class="num">1</span><a href="{page}/1">1</a></li></ul>"#
                    ))
                    .insert_header("content-type", "text/html"),
            )
            .expect(1)
            .mount(&server)
            .await;
    }

    let coord = coordinator(create_test_driver(&server.uri(), card_selectors()));

    let first = coord.crawl(None, |_, _| {}).await;
    let (known, _) = coord.populate_sub_entries(first.entries, 3).await;

    let second = coord.crawl(None, |_, _| {}).await;
    let mut refreshed = second.entries;
    let matched = carry_over_sub_entries(&mut refreshed, known.clone());
    let (refreshed, errors) = coord.populate_sub_entries(refreshed, 3).await;

    assert_eq!(matched, 3);
    assert!(errors.is_empty());
    for (old, new) in known.iter().zip(&refreshed) {
        assert_eq!(old.id, new.id);
        assert_eq!(old.sub_entries, new.sub_entries);
    }
    // each entry page was requested exactly once across both runs
}

#[tokio::test]
async fn test_player_links_over_http() {
    let server = MockServer::start().await;
    let base_url = server.uri();
    mount_html(
        &server,
        "/a/1",
        r#"<div class="player"><iframe src="/embed/1"></iframe></div>
           <a class="mirror" href="https://mirror.test/1">mirror</a>"#,
    )
    .await;

    let mut selectors = card_selectors();
    selectors.video_player = Some(".player".to_string());
    selectors.external_link_selector = Some("a.mirror".to_string());

    let links = coordinator(create_test_driver(&base_url, selectors))
        .player_links(&format!("{}/a/1", base_url))
        .await
        .unwrap();

    assert_eq!(links.players, vec![format!("{}/embed/1", base_url)]);
    assert_eq!(links.external, vec!["https://mirror.test/1".to_string()]);
}

#[tokio::test]
async fn test_http_fetcher_error_mapping() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/missing"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/cover.png"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_bytes(vec![0x89, 0x50, 0x4e, 0x47])
                .insert_header("content-type", "image/png"),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/blank"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string("   \n")
                .insert_header("content-type", "text/html"),
        )
        .mount(&server)
        .await;
    mount_html(&server, "/ok", "<p>hello</p>").await;

    let fetcher = HttpFetcher::new(&FetchConfig::default()).unwrap();
    let url = |p: &str| format!("{}{}", server.uri(), p);

    assert_eq!(
        fetcher.fetch_html(&url("/missing")).await,
        Err(FetchError::Status { status: 404 })
    );
    assert!(matches!(
        fetcher.fetch_html(&url("/cover.png")).await,
        Err(FetchError::ContentMismatch(_))
    ));
    assert_eq!(fetcher.fetch_html(&url("/blank")).await, Err(FetchError::EmptyBody));
    assert_eq!(fetcher.fetch_html(&url("/ok")).await.unwrap(), "<p>hello</p>");
}

#[tokio::test]
async fn test_driver_file_to_crawl() {
    let server = MockServer::start().await;
    mount_html(&server, "/", THREE_CARDS).await;

    let toml = format!(
        r#"
[fetch]
timeout-secs = 5
connect-timeout-secs = 2

[driver]
id = "mock-site"
domain = "127.0.0.1"
version = "0.3.0"

[driver.config]
baseUrl = "{}/"

[driver.config.selectors]
entryList = ".card"
entryUrl = "a.link"
subEntryList = "ul.eps li"
subEntryUrl = "a"
"#,
        server.uri()
    );
    let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
    file.write_all(toml.as_bytes()).unwrap();

    let config = load_config(file.path()).unwrap();
    let coord = Coordinator::from_config(config).unwrap();
    let result = coord.crawl(None, |_, _| {}).await;

    assert_eq!(result.entries.len(), 3);
    // without entryTitle the URL slug is the title
    assert_eq!(result.entries[0].title, "a");
    assert_eq!(result.entries[0].metadata.driver_version, "0.3.0");
}
