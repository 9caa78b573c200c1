//! Crawler coordinator - main crawl orchestration logic
//!
//! This module contains the crawl loop that coordinates:
//! - Seeding and draining the frontier under the page budget
//! - A bounded pool of fetch workers
//! - Writing documents to the sink, with one retry on failure
//! - Cancellation and the optional run deadline

use crate::config::Config;
use crate::crawler::extractor::{extract, Extraction};
use crate::crawler::fetcher::Fetcher;
use crate::crawler::indexer::build_document;
use crate::crawler::{CrawlFailure, CrawlJob, CrawlReport};
use crate::frontier::{FrontierEntry, SharedFrontier};
use crate::normalize::Normalizer;
use crate::sink::{DocumentSink, IndexedDocument, SinkError};
use crate::state::CrawlState;
use crate::url::DomainScope;
use crate::{FetchError, SearchError};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::task::{Id, JoinSet};
use tokio_util::sync::CancellationToken;
use url::Url;

/// Runtime knobs for one crawl run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CrawlSettings {
    /// Maximum concurrent fetches
    pub workers: usize,
    /// Pause taken by a worker after each fetch
    pub crawl_delay: Duration,
    /// Wall-clock limit for the run, `None` for unlimited
    pub run_deadline: Option<Duration>,
    /// Wait before the single sink retry
    pub sink_retry_backoff: Duration,
    pub excerpt_max_chars: usize,
}

impl CrawlSettings {
    pub fn from_config(config: &Config) -> Self {
        let crawler = &config.crawler;
        Self {
            workers: crawler.workers.max(1),
            crawl_delay: Duration::from_millis(crawler.crawl_delay_ms),
            run_deadline: (crawler.run_deadline_secs > 0)
                .then(|| Duration::from_secs(crawler.run_deadline_secs)),
            sink_retry_backoff: Duration::from_millis(crawler.sink_retry_backoff_ms),
            excerpt_max_chars: config.index.excerpt_max_chars,
        }
    }
}

impl Default for CrawlSettings {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

/// A page a worker fetched and prepared for the sink
struct ProcessedPage {
    document: IndexedDocument,
    links: Vec<Url>,
}

/// What a worker hands back to the coordinator
struct PageOutcome {
    entry: FrontierEntry,
    result: Result<ProcessedPage, FetchError>,
}

/// Main crawler coordinator structure
///
/// The coordinator owns the sink and is the only task that writes to it or
/// enqueues links; workers fetch, extract and normalize.
pub struct Coordinator<'a, S: DocumentSink + ?Sized> {
    job: CrawlJob,
    settings: CrawlSettings,
    fetcher: Arc<dyn Fetcher>,
    normalizer: Normalizer,
    sink: &'a mut S,
    cancel: CancellationToken,
    state: CrawlState,
}

impl<'a, S: DocumentSink + ?Sized> Coordinator<'a, S> {
    /// Creates a coordinator in the `Idle` state
    ///
    /// # Arguments
    ///
    /// * `job` - The validated crawl job
    /// * `settings` - Worker count, delays and deadline
    /// * `fetcher` - Source of page bodies
    /// * `normalizer` - Text normalizer for index text
    /// * `sink` - Destination for indexed documents
    /// * `cancel` - Token that stops the run when cancelled
    pub fn new(
        job: CrawlJob,
        settings: CrawlSettings,
        fetcher: Arc<dyn Fetcher>,
        normalizer: Normalizer,
        sink: &'a mut S,
        cancel: CancellationToken,
    ) -> Self {
        Self {
            job,
            settings,
            fetcher,
            normalizer,
            sink,
            cancel,
            state: CrawlState::Idle,
        }
    }

    pub fn state(&self) -> CrawlState {
        self.state
    }

    fn transition(&mut self, next: CrawlState) -> Result<(), SearchError> {
        if !self.state.can_transition_to(next) {
            return Err(SearchError::InvalidTransition {
                from: self.state,
                to: next,
            });
        }
        tracing::debug!("Crawl state {} -> {}", self.state, next);
        self.state = next;
        Ok(())
    }

    /// Runs the crawl to a terminal state
    ///
    /// This is the core crawling logic that:
    /// 1. Enqueues the seeds at depth 0
    /// 2. Keeps up to `workers` fetches in flight
    /// 3. Upserts each processed page and enqueues its links at depth + 1
    /// 4. Stops when the frontier drains, the budget is spent, the sink fails
    ///    twice in a row, or the token is cancelled
    ///
    /// Documents written before an abort stay in the sink.
    pub async fn run(mut self) -> Result<CrawlReport, SearchError> {
        let start_time = Instant::now();
        let scope = Arc::new(self.job.scope());
        let frontier = SharedFrontier::new(self.job.scope(), self.job.max_pages);

        if self.cancel.is_cancelled() {
            self.transition(CrawlState::Aborted)?;
            return Ok(CrawlReport {
                state: self.state,
                pages_indexed: 0,
                pages_fetched: 0,
                urls_discovered: 0,
                errors: Vec::new(),
                abort_reason: Some("cancelled before start".to_string()),
                elapsed: start_time.elapsed(),
            });
        }

        let seeded = frontier.claim_and_enqueue_all(self.job.seeds.iter().cloned(), 0);
        self.transition(CrawlState::Running)?;
        tracing::info!(
            "Starting crawl: {} seeds, max {} pages, {} workers",
            seeded.enqueued,
            self.job.max_pages,
            self.settings.workers
        );

        let deadline_hit = Arc::new(AtomicBool::new(false));
        let deadline_task = self.settings.run_deadline.map(|limit| {
            let token = self.cancel.clone();
            let hit = Arc::clone(&deadline_hit);
            tokio::spawn(async move {
                tokio::select! {
                    _ = tokio::time::sleep(limit) => {
                        hit.store(true, Ordering::SeqCst);
                        token.cancel();
                    }
                    _ = token.cancelled() => {}
                }
            })
        });

        let mut in_flight: JoinSet<PageOutcome> = JoinSet::new();
        // URL of every worker still running, so a failed worker is attributable
        let mut dispatched: HashMap<Id, Url> = HashMap::new();
        let mut pages_indexed = 0;
        let mut pages_fetched = 0;
        let mut errors = Vec::new();
        let mut abort_reason: Option<String> = None;

        loop {
            if abort_reason.is_none() && self.cancel.is_cancelled() {
                let reason = if deadline_hit.load(Ordering::SeqCst) {
                    format!(
                        "run deadline of {:?} exceeded",
                        self.settings.run_deadline.unwrap_or_default()
                    )
                } else {
                    "cancelled".to_string()
                };
                tracing::warn!("Stopping crawl: {}", reason);
                abort_reason = Some(reason);
            }

            // Top up in-flight fetches
            if abort_reason.is_none() {
                while in_flight.len() < self.settings.workers {
                    let Some(entry) = frontier.dequeue() else {
                        break;
                    };
                    tracing::debug!("Dispatching {} (depth {})", entry.url, entry.depth);
                    let url = entry.url.clone();
                    let handle = in_flight.spawn(process_entry(
                        Arc::clone(&self.fetcher),
                        self.normalizer.clone(),
                        Arc::clone(&scope),
                        entry,
                        self.settings,
                        self.cancel.clone(),
                    ));
                    dispatched.insert(handle.id(), url);
                }
            }

            if in_flight.is_empty() {
                break;
            }

            // Reap one finished fetch, or wake up on cancellation
            let joined = tokio::select! {
                joined = in_flight.join_next_with_id() => joined,
                _ = self.cancel.cancelled(), if abort_reason.is_none() => continue,
            };

            let outcome = match joined {
                Some(Ok((id, outcome))) => {
                    dispatched.remove(&id);
                    outcome
                }
                Some(Err(e)) => {
                    let url = dispatched
                        .remove(&e.id())
                        .map(String::from)
                        .unwrap_or_default();
                    tracing::error!("Crawl worker for {} failed: {}", url, e);
                    errors.push(CrawlFailure::worker(&url, &e));
                    continue;
                }
                None => break,
            };

            let FrontierEntry { url, depth } = outcome.entry;
            match outcome.result {
                Err(e) => {
                    tracing::warn!("Failed to fetch {}: {}", url, e);
                    errors.push(CrawlFailure::from_fetch_error(url.as_str(), &e));
                }
                Ok(page) => {
                    pages_fetched += 1;

                    // After a sink failure nothing more is written.
                    if abort_reason.as_deref().is_some_and(is_sink_abort) {
                        continue;
                    }

                    match self.upsert_with_retry(&page.document).await {
                        Ok(()) => {
                            pages_indexed += 1;
                            if abort_reason.is_none() {
                                let summary = frontier.claim_and_enqueue_all(page.links, depth + 1);
                                tracing::debug!(
                                    "{}: {} new links, {} duplicates, {} out of scope",
                                    url,
                                    summary.enqueued,
                                    summary.duplicates,
                                    summary.out_of_scope
                                );
                            }
                        }
                        Err(e) => {
                            tracing::error!("Sink failed for {} after retry: {}", url, e);
                            errors.push(CrawlFailure::sink(url.as_str(), &e));
                            abort_reason = Some(format!("{}{}", SINK_ABORT_PREFIX, e));
                        }
                    }
                }
            }

            if pages_fetched > 0 && pages_fetched % 10 == 0 {
                let elapsed = start_time.elapsed();
                tracing::info!(
                    "Progress: {} pages indexed, {} in frontier, {:.2} pages/sec",
                    pages_indexed,
                    frontier.len(),
                    pages_fetched as f64 / elapsed.as_secs_f64().max(f64::EPSILON)
                );
            }
        }

        if let Some(task) = deadline_task {
            task.abort();
        }

        let discarded = frontier.discard_remaining();
        if discarded > 0 {
            tracing::info!("Discarded {} queued URLs beyond the page budget", discarded);
        }

        let terminal = if abort_reason.is_some() {
            CrawlState::Aborted
        } else {
            CrawlState::Completed
        };
        self.transition(terminal)?;

        let report = CrawlReport {
            state: self.state,
            pages_indexed,
            pages_fetched,
            urls_discovered: frontier.visited_count(),
            errors,
            abort_reason,
            elapsed: start_time.elapsed(),
        };

        tracing::info!(
            "Crawl {}: {} pages indexed, {} errors in {:?}",
            report.state,
            report.pages_indexed,
            report.errors.len(),
            report.elapsed
        );

        Ok(report)
    }

    async fn upsert_with_retry(&mut self, document: &IndexedDocument) -> Result<(), SinkError> {
        match self.sink.upsert(document) {
            Ok(()) => Ok(()),
            Err(e) => {
                tracing::warn!(
                    "Sink write for {} failed, retrying in {:?}: {}",
                    document.url,
                    self.settings.sink_retry_backoff,
                    e
                );
                tokio::time::sleep(self.settings.sink_retry_backoff).await;
                self.sink.upsert(document)
            }
        }
    }
}

const SINK_ABORT_PREFIX: &str = "sink failure: ";

fn is_sink_abort(reason: &str) -> bool {
    reason.starts_with(SINK_ABORT_PREFIX)
}

/// Fetches, extracts and normalizes one frontier entry
///
/// A page whose redirects ended outside `scope` is reported as
/// [`FetchError::OutOfScope`] and never reaches the sink.
async fn process_entry(
    fetcher: Arc<dyn Fetcher>,
    normalizer: Normalizer,
    scope: Arc<DomainScope>,
    entry: FrontierEntry,
    settings: CrawlSettings,
    cancel: CancellationToken,
) -> PageOutcome {
    let fetched = fetcher.fetch(&entry.url).await.and_then(|page| {
        if scope.allows(&page.final_url) {
            Ok(page)
        } else {
            Err(FetchError::OutOfScope {
                url: page.url.to_string(),
                final_url: page.final_url.to_string(),
            })
        }
    });

    if !settings.crawl_delay.is_zero() {
        tokio::select! {
            _ = tokio::time::sleep(settings.crawl_delay) => {}
            _ = cancel.cancelled() => {}
        }
    }

    let result = fetched.map(|page| {
        let extraction = extract(&page.raw_body, &page.final_url);
        if let Extraction::Failed(reason) = &extraction {
            tracing::debug!("Extraction failed for {}: {}", page.url, reason);
        }
        let content = extraction.into_content();

        ProcessedPage {
            document: build_document(&page, &content, &normalizer, settings.excerpt_max_chars),
            links: content.outbound_links,
        }
    });

    PageOutcome { entry, result }
}
