//! Sumi-Search: a breadth-first crawler feeding a weighted full-text index
//!
//! This crate discovers pages from a set of seed URLs, normalizes their text into
//! index tokens, and stores the resulting documents in a SQLite FTS5 index that
//! answers ranked keyword queries.

pub mod config;
pub mod crawler;
pub mod frontier;
pub mod normalize;
pub mod output;
pub mod sink;
pub mod state;
pub mod url;

use std::fmt;
use thiserror::Error;

/// Main error type for Sumi-Search operations
#[derive(Debug, Error)]
pub enum SearchError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("URL error: {0}")]
    UrlError(#[from] UrlError),

    #[error("Normalizer error: {0}")]
    Normalize(#[from] NormalizeError),

    #[error("Document sink error: {0}")]
    Sink(#[from] sink::SinkError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("Invalid seeds: {0}")]
    InvalidSeeds(String),

    #[error("Crawl aborted after {pages_indexed} pages: {reason}")]
    Aborted { pages_indexed: usize, reason: String },

    #[error("Invalid state transition: {from:?} -> {to:?}")]
    InvalidTransition {
        from: state::CrawlState,
        to: state::CrawlState,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// URL-specific errors
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("Failed to parse URL: {0}")]
    Parse(String),

    #[error("Invalid URL scheme: {0}")]
    InvalidScheme(String),

    #[error("Missing domain in URL")]
    MissingDomain,
}

/// Errors raised while preparing linguistic resources
#[derive(Debug, Error)]
pub enum NormalizeError {
    #[error("Failed to read stopword list {path}: {source}")]
    StopwordsIo {
        path: String,
        source: std::io::Error,
    },

    #[error("Stopword list {0} is empty")]
    EmptyStopwords(String),

    #[error("Malformed lemma dictionary entry on line {line}: {entry}")]
    LemmaDictionary { line: usize, entry: String },
}

/// Coarse classification of a fetch failure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FetchErrorKind {
    Timeout,
    Connection,
    HttpStatus,
    TooLarge,
    Body,
    ContentType,
    OutOfScope,
}

impl FetchErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Timeout => "timeout",
            Self::Connection => "connection",
            Self::HttpStatus => "http_status",
            Self::TooLarge => "too_large",
            Self::Body => "body",
            Self::ContentType => "content_type",
            Self::OutOfScope => "out_of_scope",
        }
    }
}

impl fmt::Display for FetchErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-URL fetch failure. Never fatal to a crawl run.
#[derive(Debug, Clone, Error)]
pub enum FetchError {
    #[error("Request timeout for {url}")]
    Timeout { url: String },

    #[error("Connection failed for {url}: {message}")]
    Connection { url: String, message: String },

    #[error("HTTP {status} for {url}")]
    HttpStatus { url: String, status: u16 },

    #[error("Body of {url} exceeds {limit} bytes")]
    TooLarge { url: String, limit: u64 },

    #[error("Failed to read body of {url}: {message}")]
    Body { url: String, message: String },

    #[error("Unsupported content type for {url}: {content_type}")]
    ContentType { url: String, content_type: String },

    #[error("Redirect from {url} left the crawl scope at {final_url}")]
    OutOfScope { url: String, final_url: String },
}

impl FetchError {
    pub fn kind(&self) -> FetchErrorKind {
        match self {
            Self::Timeout { .. } => FetchErrorKind::Timeout,
            Self::Connection { .. } => FetchErrorKind::Connection,
            Self::HttpStatus { .. } => FetchErrorKind::HttpStatus,
            Self::TooLarge { .. } => FetchErrorKind::TooLarge,
            Self::Body { .. } => FetchErrorKind::Body,
            Self::ContentType { .. } => FetchErrorKind::ContentType,
            Self::OutOfScope { .. } => FetchErrorKind::OutOfScope,
        }
    }
}

/// Result type alias for Sumi-Search operations
pub type Result<T> = std::result::Result<T, SearchError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for URL operations
pub type UrlResult<T> = std::result::Result<T, UrlError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{crawl, CrawlJob, CrawlReport, CrawlRequest};
pub use normalize::{LinguisticResources, Normalizer};
pub use sink::{DocumentSink, SearchHit, SearchRequest, SqliteSink};
pub use state::CrawlState;
pub use url::{extract_domain, normalize_url};
