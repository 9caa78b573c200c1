//! FIFO crawl frontier with domain scoping and a dequeue budget

use crate::frontier::visited::VisitedSet;
use crate::url::DomainScope;
use std::collections::VecDeque;
use url::Url;

/// A URL waiting to be fetched
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrontierEntry {
    /// Canonical URL
    pub url: Url,

    /// Link distance from the nearest seed
    pub depth: u32,
}

/// Result of offering a URL to the frontier
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnqueueOutcome {
    /// Claimed and appended to the queue
    Enqueued,
    /// Already claimed earlier in this run
    Duplicate,
    /// Host not in the crawl's domain scope
    OutOfScope,
}

/// Breadth-first frontier
///
/// Entries are appended in discovery order and popped in insertion order. All
/// links of a page are enqueued together, so with a single consumer every
/// depth-d entry is popped before any depth-(d+1) entry.
///
/// Every successful [`Frontier::dequeue`] consumes one unit of the page budget;
/// once the budget is spent the frontier reports itself exhausted and the
/// entries still queued are never handed out.
#[derive(Debug)]
pub struct Frontier {
    queue: VecDeque<FrontierEntry>,
    visited: VisitedSet,
    scope: DomainScope,
    max_pages: usize,
    dequeued: usize,
}

impl Frontier {
    /// Creates an empty frontier
    ///
    /// # Arguments
    ///
    /// * `scope` - Hosts that may be enqueued
    /// * `max_pages` - Maximum number of dequeues over the frontier's lifetime
    pub fn new(scope: DomainScope, max_pages: usize) -> Self {
        Self {
            queue: VecDeque::new(),
            visited: VisitedSet::new(),
            scope,
            max_pages,
            dequeued: 0,
        }
    }

    /// Offers a URL to the frontier
    ///
    /// The scope check runs first, then the URL is claimed in the visited set;
    /// only a newly claimed URL is appended.
    pub fn enqueue(&mut self, url: Url, depth: u32) -> EnqueueOutcome {
        if !self.scope.allows(&url) {
            return EnqueueOutcome::OutOfScope;
        }

        if !self.visited.mark_if_new(&url) {
            return EnqueueOutcome::Duplicate;
        }

        self.queue.push_back(FrontierEntry { url, depth });
        EnqueueOutcome::Enqueued
    }

    /// Pops the next entry in FIFO order
    ///
    /// Returns `None` when the queue is empty or the budget is exhausted.
    pub fn dequeue(&mut self) -> Option<FrontierEntry> {
        if self.remaining_budget() == 0 {
            return None;
        }

        let entry = self.queue.pop_front()?;
        self.dequeued += 1;
        Some(entry)
    }

    /// Number of dequeues still allowed
    pub fn remaining_budget(&self) -> usize {
        self.max_pages.saturating_sub(self.dequeued)
    }

    /// True once no further entry will ever be handed out
    pub fn is_exhausted(&self) -> bool {
        self.remaining_budget() == 0 || self.queue.is_empty()
    }

    /// Drops every queued entry, returning how many were discarded
    pub fn discard_remaining(&mut self) -> usize {
        let discarded = self.queue.len();
        self.queue.clear();
        discarded
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn dequeued_count(&self) -> usize {
        self.dequeued
    }

    pub fn visited_count(&self) -> usize {
        self.visited.len()
    }

    pub fn scope(&self) -> &DomainScope {
        &self.scope
    }
}
