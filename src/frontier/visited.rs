//! Visited set giving at-most-once claiming of URLs

use std::collections::HashSet;
use url::Url;

/// Tracks every URL the crawl has claimed, keyed by canonical form
///
/// A URL is claimed when it is enqueued, not when it is fetched, so two links
/// to the same page found concurrently can never both be scheduled.
#[derive(Debug, Default)]
pub struct VisitedSet {
    seen: HashSet<String>,
}

impl VisitedSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the URL and returns true iff it had never been seen
    pub fn mark_if_new(&mut self, url: &Url) -> bool {
        self.seen.insert(url.as_str().to_string())
    }

    pub fn contains(&self, url: &Url) -> bool {
        self.seen.contains(url.as_str())
    }

    pub fn len(&self) -> usize {
        self.seen.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }
}
