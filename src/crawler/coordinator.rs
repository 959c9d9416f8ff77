//! Crawl coordinator - orchestration for one driver
//!
//! The coordinator owns nothing but shared handles: the driver, a fetcher
//! and a stamper. Every operation is a single async sequence whose only
//! await points are page fetches, so calls can run side by side.

use futures::stream::{self, StreamExt};
use scraper::Html;
use std::sync::Arc;

use crate::config::{Config, Driver};
use crate::crawler::progress::Progress;
use crate::extract::{extract_catalog, extract_player_links_html, extract_sub_entries, PlayerLinks};
use crate::fetch::{HtmlFetcher, HttpFetcher};
use crate::model::{
    CatalogEntry, CrawlResult, ExtractError, Stamper, SubEntry, SubEntryResult, SystemStamper,
    ValidationResult,
};
use crate::probe;
use crate::SumiError;

/// Main crawl coordinator
pub struct Coordinator {
    driver: Arc<Driver>,
    fetcher: Arc<dyn HtmlFetcher>,
    stamper: Arc<dyn Stamper>,
}

impl Coordinator {
    /// Creates a coordinator stamping records with UUIDs and the wall clock
    pub fn new(driver: Driver, fetcher: Arc<dyn HtmlFetcher>) -> Self {
        Self {
            driver: Arc::new(driver),
            fetcher,
            stamper: Arc::new(SystemStamper),
        }
    }

    /// Creates a coordinator that fetches over HTTP with the config's settings
    ///
    /// # Returns
    ///
    /// * `Ok(Coordinator)` - Ready to crawl
    /// * `Err(SumiError)` - The HTTP client could not be built
    pub fn from_config(config: Config) -> Result<Self, SumiError> {
        let fetcher = HttpFetcher::new(&config.fetch)?;
        Ok(Self::new(config.driver, Arc::new(fetcher)))
    }

    /// Replaces the id and clock source
    pub fn with_stamper(mut self, stamper: Arc<dyn Stamper>) -> Self {
        self.stamper = stamper;
        self
    }

    pub fn driver(&self) -> &Driver {
        &self.driver
    }

    /// Crawls one catalog page
    ///
    /// `catalog_url` defaults to the driver's `baseUrl`. Progress is reported
    /// at fixed milestones:
    ///
    /// | Fraction | Message |
    /// |----------|---------|
    /// | 0.0 | `Fetching catalog page` |
    /// | 0.1 | `Parsing catalog` |
    /// | 0.3 | `Extracting entries` |
    /// | 1.0 | `Done: N entries` |
    ///
    /// A failed fetch ends the crawl early with a single fetch error; the
    /// `1.0` milestone is still reported.
    pub async fn crawl<P>(&self, catalog_url: Option<&str>, progress: P) -> CrawlResult
    where
        P: Fn(&str, f64),
    {
        let progress = Progress::new(progress);
        let url = catalog_url.unwrap_or(&self.driver.config.base_url);

        tracing::info!("Crawling {} with driver {}", url, self.driver.id);
        progress.report("Fetching catalog page", 0.0);

        let html = match self.fetcher.fetch_html(url).await {
            Ok(html) => html,
            Err(e) => {
                tracing::error!("Failed to fetch catalog page {}: {}", url, e);
                progress.report("Done: 0 entries", 1.0);
                return CrawlResult::failed(ExtractError::fetch(url, e));
            }
        };

        progress.report("Parsing catalog", 0.1);
        let document = Html::parse_document(&html);

        progress.report("Extracting entries", 0.3);
        let result = extract_catalog(&document, &self.driver, self.stamper.as_ref());

        tracing::info!(
            "Crawl of {} finished: {} entries, {} errors",
            url,
            result.entries.len(),
            result.errors.len()
        );
        progress.report(&format!("Done: {} entries", result.entries.len()), 1.0);

        result
    }

    /// Extracts the sub-entries of the entry page at `entry_url`
    ///
    /// Non-empty `existing` sub-entries are returned without a fetch.
    pub async fn sub_entries(&self, entry_url: &str, existing: Vec<SubEntry>) -> SubEntryResult {
        extract_sub_entries(
            entry_url,
            &self.driver,
            existing,
            self.fetcher.as_ref(),
            self.stamper.as_ref(),
        )
        .await
    }

    /// Fills in sub-entries for many entries
    ///
    /// At most `max_concurrent` entry pages are in flight at once (a value of
    /// 0 is treated as 1). Entries come back in input order. Errors are
    /// tagged with the title of the entry they belong to.
    pub async fn populate_sub_entries(
        &self,
        entries: Vec<CatalogEntry>,
        max_concurrent: usize,
    ) -> (Vec<CatalogEntry>, Vec<ExtractError>) {
        let total = entries.len();
        tracing::info!(
            "Populating sub-entries for {} entries ({} at a time)",
            total,
            max_concurrent.max(1)
        );

        let outcomes: Vec<(CatalogEntry, Vec<ExtractError>)> = stream::iter(entries)
            .map(|entry| self.populate_one(entry))
            .buffered(max_concurrent.max(1))
            .collect()
            .await;

        let mut populated = Vec::with_capacity(total);
        let mut errors = Vec::new();
        for (entry, entry_errors) in outcomes {
            populated.push(entry);
            errors.extend(entry_errors);
        }

        (populated, errors)
    }

    async fn populate_one(&self, mut entry: CatalogEntry) -> (CatalogEntry, Vec<ExtractError>) {
        let cached = !entry.sub_entries.is_empty();
        let result = extract_sub_entries(
            &entry.source_url,
            &self.driver,
            std::mem::take(&mut entry.sub_entries),
            self.fetcher.as_ref(),
            self.stamper.as_ref(),
        )
        .await;

        if !cached && !result.sub_entries.is_empty() {
            entry.updated_at = self.stamper.now();
        }
        entry.sub_entries = result.sub_entries;

        let errors = result
            .errors
            .into_iter()
            .map(|e| e.in_entry(entry.title.clone()))
            .collect();

        (entry, errors)
    }

    /// Fetches a sub-entry page and collects its video and external links
    pub async fn player_links(&self, sub_entry_url: &str) -> Result<PlayerLinks, ExtractError> {
        let html = self
            .fetcher
            .fetch_html(sub_entry_url)
            .await
            .map_err(|e| ExtractError::fetch(sub_entry_url, e))?;

        Ok(extract_player_links_html(&html, sub_entry_url, &self.driver))
    }

    /// Probes the driver's selectors, starting at `catalog_url` or `baseUrl`
    pub async fn validate(&self, catalog_url: Option<&str>) -> ValidationResult {
        let url = catalog_url.unwrap_or(&self.driver.config.base_url);
        probe::validate(url, &self.driver.config.selectors, self.fetcher.as_ref()).await
    }
}
