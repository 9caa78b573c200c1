//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the crawler, including:
//! - Building HTTP clients with the configured user agent and timeout
//! - GET requests with a bounded body size
//! - Redirect following (up to 10 hops)
//! - Error classification

use crate::config::{Config, CrawlerConfig, UserAgentConfig};
use crate::FetchError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::{header, redirect::Policy, Client, Response};
use std::time::Duration;
use url::Url;

/// Maximum redirect hops followed for a single fetch
pub const MAX_REDIRECTS: usize = 10;

/// A successfully fetched HTML page
#[derive(Debug, Clone)]
pub struct FetchedPage {
    /// URL that was requested
    pub url: Url,
    /// URL after redirects
    pub final_url: Url,
    pub status_code: u16,
    /// Body decoded as UTF-8, invalid sequences replaced
    pub raw_body: String,
    /// Content-Type header value, empty if absent
    pub content_type: String,
    /// Size of the body in bytes as received
    pub content_length: u64,
    pub fetched_at: DateTime<Utc>,
}

/// Source of page bodies for the crawler
///
/// Implementations must be safe to call from several workers at once.
#[async_trait]
pub trait Fetcher: Send + Sync {
    /// Performs one GET of `url`
    ///
    /// Any failure is reported as a [`FetchError`]; none is fatal to a crawl.
    async fn fetch(&self, url: &Url) -> Result<FetchedPage, FetchError>;
}

/// Builds an HTTP client with proper configuration
///
/// # Arguments
///
/// * `user_agent` - The user agent configuration
/// * `timeout` - Whole-request timeout, body included
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client
///
/// # Example
///
/// ```no_run
/// use std::time::Duration;
/// use sumi_search::config::UserAgentConfig;
/// use sumi_search::crawler::build_http_client;
///
/// let config = UserAgentConfig {
///     crawler_name: "SumiSearch".to_string(),
///     crawler_version: "1.0".to_string(),
///     contact_url: Some("https://example.com/about".to_string()),
/// };
///
/// let client = build_http_client(&config, Duration::from_secs(15)).unwrap();
/// ```
pub fn build_http_client(
    user_agent: &UserAgentConfig,
    timeout: Duration,
) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(user_agent.header_value())
        .timeout(timeout)
        .connect_timeout(timeout.min(Duration::from_secs(10)))
        .redirect(Policy::limited(MAX_REDIRECTS))
        .gzip(true)
        .brotli(true)
        .build()
}

/// reqwest-backed [`Fetcher`]
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
    max_content_bytes: u64,
}

impl HttpFetcher {
    pub fn new(crawler: &CrawlerConfig, user_agent: &UserAgentConfig) -> Result<Self, reqwest::Error> {
        let client = build_http_client(
            user_agent,
            Duration::from_secs(crawler.http_timeout_secs),
        )?;

        Ok(Self {
            client,
            max_content_bytes: crawler.max_content_bytes(),
        })
    }

    pub fn from_config(config: &Config) -> Result<Self, reqwest::Error> {
        Self::new(&config.crawler, &config.user_agent)
    }

    /// Wraps an existing client
    pub fn with_client(client: Client, max_content_bytes: u64) -> Self {
        Self {
            client,
            max_content_bytes,
        }
    }

    async fn read_body(&self, url: &Url, mut response: Response) -> Result<Vec<u8>, FetchError> {
        if let Some(declared) = response.content_length() {
            if declared > self.max_content_bytes {
                return Err(self.too_large(url));
            }
        }

        let mut body = Vec::new();
        while let Some(chunk) = response
            .chunk()
            .await
            .map_err(|e| classify_body_error(url, e))?
        {
            if (body.len() + chunk.len()) as u64 > self.max_content_bytes {
                return Err(self.too_large(url));
            }
            body.extend_from_slice(&chunk);
        }

        Ok(body)
    }

    fn too_large(&self, url: &Url) -> FetchError {
        FetchError::TooLarge {
            url: url.to_string(),
            limit: self.max_content_bytes,
        }
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, url: &Url) -> Result<FetchedPage, FetchError> {
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| classify_send_error(url, e))?;

        let status = response.status();
        let final_url = response.url().clone();

        if !status.is_success() {
            return Err(FetchError::HttpStatus {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("")
            .to_string();

        if !is_html(&content_type) {
            return Err(FetchError::ContentType {
                url: url.to_string(),
                content_type,
            });
        }

        let body = self.read_body(url, response).await?;
        if final_url != *url {
            tracing::debug!("{} redirected to {}", url, final_url);
        }

        Ok(FetchedPage {
            url: url.clone(),
            final_url,
            status_code: status.as_u16(),
            content_length: body.len() as u64,
            raw_body: String::from_utf8_lossy(&body).into_owned(),
            content_type,
            fetched_at: Utc::now(),
        })
    }
}

/// Returns true for HTML media types
///
/// A missing Content-Type is treated as HTML.
pub fn is_html(content_type: &str) -> bool {
    let media_type = content_type
        .split(';')
        .next()
        .unwrap_or("")
        .trim()
        .to_ascii_lowercase();

    media_type.is_empty() || media_type == "text/html" || media_type == "application/xhtml+xml"
}

fn classify_send_error(url: &Url, error: reqwest::Error) -> FetchError {
    if error.is_timeout() {
        FetchError::Timeout {
            url: url.to_string(),
        }
    } else if error.is_redirect() {
        FetchError::Connection {
            url: url.to_string(),
            message: format!("more than {} redirects", MAX_REDIRECTS),
        }
    } else {
        FetchError::Connection {
            url: url.to_string(),
            message: error.to_string(),
        }
    }
}

fn classify_body_error(url: &Url, error: reqwest::Error) -> FetchError {
    if error.is_timeout() {
        FetchError::Timeout {
            url: url.to_string(),
        }
    } else {
        FetchError::Body {
            url: url.to_string(),
            message: error.to_string(),
        }
    }
}
