//! HTML retrieval
//!
//! The extractors only depend on the [`HtmlFetcher`] capability; the
//! reqwest-backed [`HttpFetcher`] is the production implementation and tests
//! substitute in-memory fetchers.

mod http;

pub use http::{build_http_client, HttpFetcher};

use async_trait::async_trait;
use thiserror::Error;

/// Why a page could not be retrieved
///
/// Timeouts and cancellation surface here as ordinary failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    #[error("HTTP status {status}")]
    Status { status: u16 },

    #[error("request timed out")]
    Timeout,

    #[error("connection failed: {0}")]
    Connect(String),

    #[error("network error: {0}")]
    Network(String),

    #[error("expected HTML, got {0}")]
    ContentMismatch(String),

    #[error("empty response body")]
    EmptyBody,
}

/// Fetches the HTML of a page by URL
#[async_trait]
pub trait HtmlFetcher: Send + Sync {
    async fn fetch_html(&self, url: &str) -> Result<String, FetchError>;
}

#[async_trait]
impl<T: HtmlFetcher + ?Sized> HtmlFetcher for std::sync::Arc<T> {
    async fn fetch_html(&self, url: &str) -> Result<String, FetchError> {
        (**self).fetch_html(url).await
    }
}
