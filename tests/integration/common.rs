//! Shared fixtures for the integration tests

use sumi_search::config::Config;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a test configuration writing to the given database
pub fn create_test_config(db_path: &str, max_pages: usize) -> Config {
    let mut config = Config::default();
    config.crawler.max_pages = max_pages;
    config.crawler.workers = 2;
    config.crawler.http_timeout_secs = 5;
    config.crawler.crawl_delay_ms = 0;
    config.crawler.sink_retry_backoff_ms = 10;
    config.user_agent.crawler_name = "TestBot".to_string();
    config.index.database_path = db_path.to_string();
    config
}

/// Builds a minimal HTML page
pub fn html_page(title: &str, body: &str, links: &[&str]) -> String {
    let anchors: String = links
        .iter()
        .map(|href| format!(r#"<a href="{}">link</a> "#, href))
        .collect();

    format!(
        "<html><head><title>{}</title></head><body><p>{}</p>{}</body></html>",
        title, body, anchors
    )
}

/// Serves an HTML page at `route`, expecting exactly `times` requests
pub async fn mount_page(server: &MockServer, route: &str, html: String, times: u64) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(200).set_body_raw(html, "text/html"))
        .expect(times)
        .mount(server)
        .await;
}
