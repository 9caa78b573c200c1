//! Crawler module for web page fetching and indexing
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching with bounded bodies and redirect following
//! - HTML content and link extraction
//! - Building index documents from fetched pages
//! - Overall crawl coordination

mod coordinator;
mod extractor;
mod fetcher;
mod indexer;

pub use coordinator::{CrawlSettings, Coordinator};
pub use extractor::{extract, ExtractedContent, Extraction};
pub use fetcher::{build_http_client, is_html, FetchedPage, Fetcher, HttpFetcher, MAX_REDIRECTS};
pub use indexer::build_document;

use crate::config::Config;
use crate::normalize::{LinguisticResources, Normalizer};
use crate::sink::{DocumentSink, SinkError};
use crate::state::CrawlState;
use crate::url::{extract_domain, normalize_url, DomainScope};
use crate::{FetchError, FetchErrorKind, SearchError};
use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinError;
use tokio_util::sync::CancellationToken;
use url::Url;

/// A validated crawl job
///
/// Immutable once a run starts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlJob {
    /// Canonical seed URLs, deduplicated, in the order given
    pub seeds: Vec<Url>,
    pub max_pages: usize,
    pub same_domain_only: bool,
    /// Seed hosts; only consulted when `same_domain_only` is set
    pub allowed_domains: BTreeSet<String>,
}

impl CrawlJob {
    /// Validates seeds and builds a job
    ///
    /// # Arguments
    ///
    /// * `seeds` - Seed URLs as given by the caller
    /// * `max_pages` - Page budget, must be at least 1
    /// * `same_domain_only` - Restrict the crawl to the seed hosts
    ///
    /// # Returns
    ///
    /// * `Ok(CrawlJob)` - Every seed is an absolute http(s) URL
    /// * `Err(SearchError::InvalidSeeds)` - No seeds, a bad seed, or a zero budget
    pub fn new(seeds: &[String], max_pages: usize, same_domain_only: bool) -> Result<Self, SearchError> {
        if max_pages == 0 {
            return Err(SearchError::InvalidSeeds(
                "max_pages must be at least 1".to_string(),
            ));
        }

        let mut canonical: Vec<Url> = Vec::with_capacity(seeds.len());
        for seed in seeds.iter().map(|s| s.trim()).filter(|s| !s.is_empty()) {
            let url = normalize_url(seed)
                .map_err(|e| SearchError::InvalidSeeds(format!("'{}': {}", seed, e)))?;
            if !canonical.contains(&url) {
                canonical.push(url);
            }
        }

        if canonical.is_empty() {
            return Err(SearchError::InvalidSeeds("no seed URLs given".to_string()));
        }

        let allowed_domains = canonical.iter().filter_map(extract_domain).collect();

        Ok(Self {
            seeds: canonical,
            max_pages,
            same_domain_only,
            allowed_domains,
        })
    }

    /// The host scope links are checked against
    pub fn scope(&self) -> DomainScope {
        if self.same_domain_only {
            DomainScope::Hosts(self.allowed_domains.clone())
        } else {
            DomainScope::Unrestricted
        }
    }
}

/// A crawl as issued by a caller
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlRequest {
    pub seeds: Vec<String>,
    pub max_pages: usize,
    pub same_domain_only: bool,
}

impl CrawlRequest {
    /// Takes seeds and limits from the configuration
    pub fn from_config(config: &Config) -> Self {
        Self {
            seeds: config.seeds.clone(),
            max_pages: config.crawler.max_pages,
            same_domain_only: config.crawler.same_domain_only,
        }
    }

    pub fn into_job(self) -> Result<CrawlJob, SearchError> {
        CrawlJob::new(&self.seeds, self.max_pages, self.same_domain_only)
    }
}

/// A URL that did not make it into the index
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlFailure {
    pub url: String,
    /// Fetch error class, `None` when the sink rejected the document or the
    /// worker handling the URL failed
    pub kind: Option<FetchErrorKind>,
    pub reason: String,
}

impl CrawlFailure {
    pub fn from_fetch_error(url: &str, error: &FetchError) -> Self {
        Self {
            url: url.to_string(),
            kind: Some(error.kind()),
            reason: error.to_string(),
        }
    }

    pub fn sink(url: &str, error: &SinkError) -> Self {
        Self {
            url: url.to_string(),
            kind: None,
            reason: error.to_string(),
        }
    }

    /// A worker that panicked or was cancelled before reporting back
    pub fn worker(url: &str, error: &JoinError) -> Self {
        Self {
            url: url.to_string(),
            kind: None,
            reason: format!("worker failed: {}", error),
        }
    }
}

/// Outcome of one crawl run
#[derive(Debug, Clone)]
pub struct CrawlReport {
    /// `Completed` or `Aborted`
    pub state: CrawlState,
    /// Documents written to the sink
    pub pages_indexed: usize,
    /// Pages fetched successfully, indexed or not
    pub pages_fetched: usize,
    /// Distinct URLs admitted to the frontier
    pub urls_discovered: usize,
    pub errors: Vec<CrawlFailure>,
    pub abort_reason: Option<String>,
    pub elapsed: Duration,
}

impl CrawlReport {
    pub fn is_aborted(&self) -> bool {
        self.state == CrawlState::Aborted
    }

    /// Maps an aborted run to `SearchError::Aborted`
    pub fn into_result(self) -> Result<Self, SearchError> {
        if self.is_aborted() {
            return Err(SearchError::Aborted {
                pages_indexed: self.pages_indexed,
                reason: self
                    .abort_reason
                    .unwrap_or_else(|| "unknown".to_string()),
            });
        }
        Ok(self)
    }
}

/// Runs a complete crawl operation
///
/// This is the main entry point for starting a crawl. It will:
/// 1. Validate the seeds into a [`CrawlJob`]
/// 2. Load the linguistic resources
/// 3. Build the HTTP client
/// 4. Fetch, index and follow links until the frontier drains or the budget
///    is spent
///
/// Setup failures are returned as errors before anything is fetched. Once
/// the run starts, the outcome (including an abort) is carried by the
/// returned [`CrawlReport`].
///
/// # Arguments
///
/// * `request` - Seeds and limits for this run
/// * `config` - The loaded configuration
/// * `sink` - Destination for indexed documents
/// * `cancel` - Cancelling this token stops the run
pub async fn crawl<S>(
    request: CrawlRequest,
    config: &Config,
    sink: &mut S,
    cancel: CancellationToken,
) -> Result<CrawlReport, SearchError>
where
    S: DocumentSink + ?Sized,
{
    let job = request.into_job()?;
    let resources = LinguisticResources::load(&config.normalizer)?;
    tracing::info!(
        "Loaded {} stopwords for normalization",
        resources.stopword_count()
    );
    let normalizer = Normalizer::new(Arc::new(resources));
    let fetcher = Arc::new(HttpFetcher::from_config(config)?);

    Coordinator::new(
        job,
        CrawlSettings::from_config(config),
        fetcher,
        normalizer,
        sink,
        cancel,
    )
    .run()
    .await
}
