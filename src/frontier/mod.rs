//! Crawl frontier and URL deduplication
//!
//! This module owns the only mutable state shared between crawl workers:
//! - `VisitedSet`: every URL claimed during the run
//! - `Frontier`: FIFO queue with domain scoping and the page budget
//! - `SharedFrontier`: synchronized handle that claims and enqueues in one step

mod queue;
mod visited;

pub use queue::{EnqueueOutcome, Frontier, FrontierEntry};
pub use visited::VisitedSet;

use crate::url::DomainScope;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use url::Url;

/// Counts from one batch of link offers
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EnqueueSummary {
    pub enqueued: usize,
    pub duplicates: usize,
    pub out_of_scope: usize,
}

impl EnqueueSummary {
    fn record(&mut self, outcome: EnqueueOutcome) {
        match outcome {
            EnqueueOutcome::Enqueued => self.enqueued += 1,
            EnqueueOutcome::Duplicate => self.duplicates += 1,
            EnqueueOutcome::OutOfScope => self.out_of_scope += 1,
        }
    }
}

/// Thread-safe handle to a [`Frontier`]
///
/// Every operation takes the lock for its whole duration, so the visited-set
/// claim and the queue insertion of a URL are one atomic step. The lock is
/// never held across an await point.
#[derive(Debug, Clone)]
pub struct SharedFrontier {
    inner: Arc<Mutex<Frontier>>,
}

impl SharedFrontier {
    pub fn new(scope: DomainScope, max_pages: usize) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Frontier::new(scope, max_pages))),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Frontier> {
        // Frontier operations never panic midway, so a poisoned lock still
        // guards consistent data.
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Claims and enqueues a single URL
    pub fn claim_and_enqueue(&self, url: Url, depth: u32) -> EnqueueOutcome {
        self.lock().enqueue(url, depth)
    }

    /// Claims and enqueues a batch of URLs at the same depth, in order
    pub fn claim_and_enqueue_all<I>(&self, urls: I, depth: u32) -> EnqueueSummary
    where
        I: IntoIterator<Item = Url>,
    {
        let mut frontier = self.lock();
        let mut summary = EnqueueSummary::default();
        for url in urls {
            summary.record(frontier.enqueue(url, depth));
        }
        summary
    }

    pub fn dequeue(&self) -> Option<FrontierEntry> {
        self.lock().dequeue()
    }

    pub fn remaining_budget(&self) -> usize {
        self.lock().remaining_budget()
    }

    pub fn is_exhausted(&self) -> bool {
        self.lock().is_exhausted()
    }

    pub fn discard_remaining(&self) -> usize {
        self.lock().discard_remaining()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    pub fn visited_count(&self) -> usize {
        self.lock().visited_count()
    }
}
