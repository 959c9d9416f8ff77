//! reqwest-backed HTML fetcher
//!
//! Catalog sites routinely block default client signatures, so requests go
//! out with a browser user agent and browser-like accept headers.

use crate::config::FetchConfig;
use crate::fetch::{FetchError, HtmlFetcher};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE};
use reqwest::Client;
use std::time::Duration;

/// Content types that can never be a catalog page
const NON_HTML_PREFIXES: &[&str] = &[
    "image/",
    "video/",
    "audio/",
    "font/",
    "application/octet-stream",
    "application/pdf",
];

/// Builds an HTTP client with a browser-like identity
///
/// # Arguments
///
/// * `config` - Fetch settings (user agent, timeouts)
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client
///
/// # Example
///
/// ```no_run
/// use sumi_catalog::config::FetchConfig;
/// use sumi_catalog::fetch::build_http_client;
///
/// let client = build_http_client(&FetchConfig::default()).unwrap();
/// ```
pub fn build_http_client(config: &FetchConfig) -> Result<Client, reqwest::Error> {
    let mut headers = HeaderMap::new();
    headers.insert(
        ACCEPT,
        HeaderValue::from_static(
            "text/html,application/xhtml+xml,application/xml;q=0.9,image/avif,image/webp,*/*;q=0.8",
        ),
    );
    headers.insert(
        ACCEPT_LANGUAGE,
        HeaderValue::from_static("en-US,en;q=0.9,pt-BR;q=0.8"),
    );

    Client::builder()
        .user_agent(config.user_agent.clone())
        .default_headers(headers)
        .timeout(Duration::from_secs(config.timeout_secs))
        .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Production [`HtmlFetcher`]
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(config: &FetchConfig) -> Result<Self, reqwest::Error> {
        Ok(Self {
            client: build_http_client(config)?,
        })
    }
}

#[async_trait]
impl HtmlFetcher for HttpFetcher {
    /// Fetches a page body
    ///
    /// | Condition | Result |
    /// |-----------|--------|
    /// | 2xx with HTML-ish body | `Ok(body)` |
    /// | non-2xx | `Status` |
    /// | timeout | `Timeout` |
    /// | connection refused / DNS / TLS | `Connect` |
    /// | binary Content-Type | `ContentMismatch` |
    /// | blank body | `EmptyBody` |
    async fn fetch_html(&self, url: &str) -> Result<String, FetchError> {
        tracing::debug!("GET {}", url);

        let response = self.client.get(url).send().await.map_err(classify)?;
        let status = response.status();

        if !status.is_success() {
            tracing::debug!("{} returned {}", url, status);
            return Err(FetchError::Status {
                status: status.as_u16(),
            });
        }

        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("")
            .to_ascii_lowercase();

        if NON_HTML_PREFIXES.iter().any(|p| content_type.starts_with(p)) {
            return Err(FetchError::ContentMismatch(content_type));
        }

        let body = response.text().await.map_err(classify)?;
        if body.trim().is_empty() {
            return Err(FetchError::EmptyBody);
        }

        Ok(body)
    }
}

fn classify(error: reqwest::Error) -> FetchError {
    if error.is_timeout() {
        FetchError::Timeout
    } else if error.is_connect() {
        FetchError::Connect(error.to_string())
    } else {
        FetchError::Network(error.to_string())
    }
}
