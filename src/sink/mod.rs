//! Document sink: the searchable index the crawler feeds
//!
//! This module handles persistence and retrieval of indexed documents:
//! - `DocumentSink`: backend interface (upsert, ranked search, lookups)
//! - `SqliteSink`: SQLite FTS5 implementation with title-weighted bm25 ranking
//! - `search` / `reindex`: request-level operations on any sink

mod schema;
mod sqlite;
mod traits;

pub use sqlite::SqliteSink;
pub use traits::{
    DocumentSink, IndexStats, IndexedDocument, SearchHit, SearchQuery, SinkError, SinkResult,
    StoredDocument,
};

use crate::config::SearchConfig;
use crate::normalize::Normalizer;

/// A search as issued by a caller
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
    /// Query text; FTS5 boolean and phrase syntax is honoured
    pub query: String,

    /// Maximum results; `None` uses the configured default
    pub limit: Option<usize>,

    /// Results to skip, for paging
    pub skip: usize,
}

impl SearchRequest {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            limit: None,
            skip: 0,
        }
    }

    /// Resolves the request against search limits
    ///
    /// The limit is clamped to `[1, max_limit]`.
    pub fn to_query(&self, config: &SearchConfig) -> SearchQuery {
        let limit = self
            .limit
            .unwrap_or(config.default_limit)
            .clamp(1, config.max_limit.max(1));

        SearchQuery {
            expression: self.query.trim().to_string(),
            limit,
            offset: self.skip,
        }
    }
}

/// Runs a search request against a sink
///
/// A query that is not a valid match expression (stray operators, unbalanced
/// quotes) is retried once with each of its words quoted, so free text such
/// as `what's new?` still finds documents.
///
/// # Example
///
/// ```
/// use chrono::Utc;
/// use sumi_search::config::SearchConfig;
/// use sumi_search::sink::{self, DocumentSink, IndexedDocument, SearchRequest, SqliteSink};
///
/// let mut index = SqliteSink::new_in_memory().unwrap();
/// index.upsert(&IndexedDocument {
///     url: "https://example.com/".to_string(),
///     final_url: "https://example.com/".to_string(),
///     title: "Example".to_string(),
///     index_text: "crawler".to_string(),
///     raw_text: "crawler".to_string(),
///     excerpt: "crawler".to_string(),
///     content_length: 7,
///     crawled_at: Utc::now(),
/// }).unwrap();
///
/// let hits = sink::search(&index, &SearchRequest::new("crawler"), &SearchConfig::default()).unwrap();
/// assert_eq!(hits.len(), 1);
/// ```
pub fn search<S>(sink: &S, request: &SearchRequest, config: &SearchConfig) -> SinkResult<Vec<SearchHit>>
where
    S: DocumentSink + ?Sized,
{
    let query = request.to_query(config);

    match sink.search(&query) {
        Err(SinkError::InvalidQuery(message)) => {
            let expression = quote_terms(&request.query);
            tracing::debug!(
                "Query {:?} rejected ({}), retrying as {:?}",
                request.query,
                message,
                expression
            );
            if expression.is_empty() {
                return Ok(Vec::new());
            }
            sink.search(&SearchQuery { expression, ..query })
        }
        result => result,
    }
}

/// Quotes every alphanumeric run of `text` as an FTS5 string
fn quote_terms(text: &str) -> String {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|term| !term.is_empty())
        .map(|term| format!("\"{}\"", term))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Recomputes every document's normalized text from its stored raw text
///
/// Used after the normalizer changes. Returns the number of documents
/// updated.
pub fn reindex<S>(sink: &mut S, normalizer: &Normalizer) -> SinkResult<usize>
where
    S: DocumentSink + ?Sized,
{
    let documents = sink.all_raw_text()?;
    tracing::info!("Reindexing {} documents", documents.len());

    let mut updated = 0;
    for (url, raw_text) in documents {
        let normalized = normalizer.normalize_document(&raw_text);
        if sink.update_index_text(&url, &normalized.joined)? {
            updated += 1;
        }
    }

    tracing::info!("Reindexed {} documents", updated);
    Ok(updated)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn config() -> SearchConfig {
        SearchConfig {
            default_limit: 10,
            max_limit: 50,
        }
    }

    fn document(url: &str, title: &str, raw_text: &str, index_text: &str) -> IndexedDocument {
        IndexedDocument {
            url: url.to_string(),
            final_url: url.to_string(),
            title: title.to_string(),
            index_text: index_text.to_string(),
            raw_text: raw_text.to_string(),
            excerpt: String::new(),
            content_length: raw_text.len() as u64,
            crawled_at: Utc::now(),
        }
    }

    #[test]
    fn test_limit_defaults_and_clamps() {
        let config = config();

        assert_eq!(SearchRequest::new("q").to_query(&config).limit, 10);

        let mut request = SearchRequest::new("q");
        request.limit = Some(0);
        assert_eq!(request.to_query(&config).limit, 1);

        request.limit = Some(500);
        assert_eq!(request.to_query(&config).limit, 50);

        request.skip = 20;
        assert_eq!(request.to_query(&config).offset, 20);
    }

    #[test]
    fn test_quote_terms() {
        assert_eq!(quote_terms("what's new?"), "\"what\" \"s\" \"new\"");
        assert_eq!(quote_terms("?!"), "");
    }

    #[test]
    fn test_search_falls_back_on_malformed_query() {
        let mut sink = SqliteSink::new_in_memory().unwrap();
        sink.upsert(&document("https://a.test/", "Rust", "rust", "rust"))
            .unwrap();

        let hits = search(&sink, &SearchRequest::new("rust\""), &config()).unwrap();
        assert_eq!(hits.len(), 1);

        let hits = search(&sink, &SearchRequest::new("AND"), &config()).unwrap();
        assert!(hits.is_empty());
    }

    #[test]
    fn test_reindex_recomputes_index_text() {
        let mut sink = SqliteSink::new_in_memory().unwrap();
        sink.upsert(&document(
            "https://a.test/",
            "Pets",
            "The Cats are RUNNING",
            "stale",
        ))
        .unwrap();

        let normalizer = Normalizer::shared().unwrap();
        assert_eq!(reindex(&mut sink, &normalizer).unwrap(), 1);

        let stored = sink.get("https://a.test/").unwrap().unwrap();
        assert_eq!(stored.document.index_text, "cat run");
        assert!(search(&sink, &SearchRequest::new("stale"), &config())
            .unwrap()
            .is_empty());
    }
}
