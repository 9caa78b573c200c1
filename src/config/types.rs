use serde::Deserialize;

/// Main configuration structure for Sumi-Search
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub crawler: CrawlerConfig,
    #[serde(rename = "user-agent", default)]
    pub user_agent: UserAgentConfig,
    #[serde(default)]
    pub index: IndexConfig,
    #[serde(default)]
    pub search: SearchConfig,
    #[serde(default)]
    pub normalizer: NormalizerConfig,
    /// Seed URLs; may be extended or replaced on the command line
    #[serde(default)]
    pub seeds: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            crawler: CrawlerConfig::default(),
            user_agent: UserAgentConfig::default(),
            index: IndexConfig::default(),
            search: SearchConfig::default(),
            normalizer: NormalizerConfig::default(),
            seeds: Vec::new(),
        }
    }
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlerConfig {
    /// Maximum number of pages fetched in one run
    #[serde(rename = "max-pages")]
    pub max_pages: usize,

    /// Restrict the crawl to the exact hosts of the seed URLs
    #[serde(rename = "same-domain-only", default = "default_same_domain_only")]
    pub same_domain_only: bool,

    /// Number of concurrent fetch workers
    #[serde(default = "default_workers")]
    pub workers: usize,

    /// Per-request timeout (seconds)
    #[serde(rename = "http-timeout-secs", default = "default_http_timeout_secs")]
    pub http_timeout_secs: u64,

    /// Response body ceiling (megabytes)
    #[serde(rename = "max-content-mb", default = "default_max_content_mb")]
    pub max_content_mb: u64,

    /// Delay a worker observes after each fetch (milliseconds)
    #[serde(rename = "crawl-delay-ms", default)]
    pub crawl_delay_ms: u64,

    /// Global run deadline (seconds, 0 disables it)
    #[serde(rename = "run-deadline-secs", default)]
    pub run_deadline_secs: u64,

    /// Backoff before the single sink retry (milliseconds)
    #[serde(
        rename = "sink-retry-backoff-ms",
        default = "default_sink_retry_backoff_ms"
    )]
    pub sink_retry_backoff_ms: u64,
}

impl CrawlerConfig {
    /// Body size ceiling in bytes
    pub fn max_content_bytes(&self) -> u64 {
        self.max_content_mb * 1024 * 1024
    }
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            max_pages: 100,
            same_domain_only: default_same_domain_only(),
            workers: default_workers(),
            http_timeout_secs: default_http_timeout_secs(),
            max_content_mb: default_max_content_mb(),
            crawl_delay_ms: 0,
            run_deadline_secs: 0,
            sink_retry_backoff_ms: default_sink_retry_backoff_ms(),
        }
    }
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
pub struct UserAgentConfig {
    #[serde(rename = "crawler-name")]
    pub crawler_name: String,

    #[serde(rename = "crawler-version")]
    pub crawler_version: String,

    /// URL with information about the crawler
    #[serde(rename = "contact-url", default)]
    pub contact_url: Option<String>,
}

impl UserAgentConfig {
    /// Formats the header value: `Name/Version (+ContactURL)`
    pub fn header_value(&self) -> String {
        match &self.contact_url {
            Some(contact) => format!(
                "{}/{} (+{})",
                self.crawler_name, self.crawler_version, contact
            ),
            None => format!("{}/{}", self.crawler_name, self.crawler_version),
        }
    }
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            crawler_name: "SumiSearch".to_string(),
            crawler_version: env!("CARGO_PKG_VERSION").to_string(),
            contact_url: None,
        }
    }
}

/// Document index configuration
#[derive(Debug, Clone, Deserialize)]
pub struct IndexConfig {
    /// Path to the SQLite database file
    #[serde(rename = "database-path", default = "default_database_path")]
    pub database_path: String,

    /// Length of the stored plain-text excerpt
    #[serde(rename = "excerpt-max-chars", default = "default_excerpt_max_chars")]
    pub excerpt_max_chars: usize,
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
            excerpt_max_chars: default_excerpt_max_chars(),
        }
    }
}

/// Search defaults
#[derive(Debug, Clone, Deserialize)]
pub struct SearchConfig {
    #[serde(rename = "default-limit", default = "default_search_limit")]
    pub default_limit: usize,

    #[serde(rename = "max-limit", default = "default_max_search_limit")]
    pub max_limit: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            default_limit: default_search_limit(),
            max_limit: default_max_search_limit(),
        }
    }
}

/// Normalizer resources
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NormalizerConfig {
    /// Replaces the built-in English stopword list (one word per line)
    #[serde(rename = "stopwords-path", default)]
    pub stopwords_path: Option<String>,
}

fn default_same_domain_only() -> bool {
    true
}

fn default_workers() -> usize {
    8
}

fn default_http_timeout_secs() -> u64 {
    15
}

fn default_max_content_mb() -> u64 {
    5
}

fn default_sink_retry_backoff_ms() -> u64 {
    500
}

fn default_database_path() -> String {
    "./sumi-search.db".to_string()
}

fn default_excerpt_max_chars() -> usize {
    400
}

fn default_search_limit() -> usize {
    10
}

fn default_max_search_limit() -> usize {
    50
}
