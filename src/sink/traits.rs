//! Document sink trait and error types
//!
//! This module defines the interface between the crawler and the search
//! index, along with the record types that cross it.

use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;

/// Errors that can occur during sink operations
#[derive(Debug, Error)]
pub enum SinkError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Invalid search query: {0}")]
    InvalidQuery(String),

    #[error("Corrupt record for {url}: {message}")]
    Corrupt { url: String, message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for sink operations
pub type SinkResult<T> = Result<T, SinkError>;

/// A page prepared for the index
///
/// `url` is the canonical URL the crawl claimed and is the upsert key.
#[derive(Debug, Clone, PartialEq)]
pub struct IndexedDocument {
    pub url: String,
    /// URL after redirects
    pub final_url: String,
    pub title: String,
    /// Normalized tokens joined by spaces
    pub index_text: String,
    /// Visible body text before normalization
    pub raw_text: String,
    pub excerpt: String,
    /// Size of the fetched body in bytes
    pub content_length: u64,
    pub crawled_at: DateTime<Utc>,
}

/// An indexed document with its bookkeeping timestamps
#[derive(Debug, Clone, PartialEq)]
pub struct StoredDocument {
    pub document: IndexedDocument,
    /// Set on first insert and never changed by later upserts
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A search as the sink executes it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    /// FTS5 match expression
    pub expression: String,
    pub limit: usize,
    pub offset: usize,
}

/// One ranked search result
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchHit {
    pub url: String,
    pub final_url: String,
    pub title: String,
    pub excerpt: String,
    /// Higher is more relevant
    pub score: f64,
}

/// Aggregate figures about the index
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct IndexStats {
    pub documents: usize,
    pub total_content_length: u64,
    pub first_crawled_at: Option<String>,
    pub last_crawled_at: Option<String>,
}

/// Trait for search index backends
///
/// Writes take `&mut self`; the crawler performs them from a single task.
pub trait DocumentSink {
    /// Inserts a document or replaces the one stored under the same URL
    ///
    /// On replacement every field is overwritten except the creation time.
    fn upsert(&mut self, document: &IndexedDocument) -> SinkResult<()>;

    /// Runs a ranked search
    ///
    /// Results are ordered by descending score. Title matches weigh five times
    /// as much as body matches.
    fn search(&self, query: &SearchQuery) -> SinkResult<Vec<SearchHit>>;

    /// Fetches the document stored under a canonical URL
    fn get(&self, url: &str) -> SinkResult<Option<StoredDocument>>;

    /// Number of indexed documents
    fn count(&self) -> SinkResult<usize>;

    /// `(url, raw_text)` for every document, ordered by URL
    fn all_raw_text(&self) -> SinkResult<Vec<(String, String)>>;

    /// Replaces the normalized text of one document
    ///
    /// Returns false if no document is stored under the URL.
    fn update_index_text(&mut self, url: &str, index_text: &str) -> SinkResult<bool>;

    /// Aggregate statistics
    fn stats(&self) -> SinkResult<IndexStats>;
}
