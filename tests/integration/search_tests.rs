//! Integration tests for searching a crawled index

use crate::common::{create_test_config, html_page, mount_page};
use sumi_search::crawler::{crawl, CrawlRequest};
use sumi_search::output::render_search_json;
use sumi_search::sink::{self, DocumentSink, SearchRequest, SqliteSink};
use sumi_search::Normalizer;
use tempfile::TempDir;
use tokio_util::sync::CancellationToken;
use wiremock::MockServer;

/// Serves a small site: a home page linking to a title match and a body match
async fn start_garden_site() -> MockServer {
    let server = MockServer::start().await;

    mount_page(
        &server,
        "/",
        html_page("Index", "Start here", &["/title-match", "/body-match"]),
        1,
    )
    .await;
    mount_page(
        &server,
        "/title-match",
        html_page("Gardening", "Plants need water and light", &[]),
        1,
    )
    .await;
    mount_page(
        &server,
        "/body-match",
        html_page("Notes", "Some notes on gardening and other hobbies", &[]),
        1,
    )
    .await;

    server
}

async fn crawl_site(server: &MockServer, sink: &mut SqliteSink, db_path: &str) {
    let config = create_test_config(db_path, 10);
    let request = CrawlRequest {
        seeds: vec![format!("{}/", server.uri())],
        max_pages: 10,
        same_domain_only: true,
    };

    let report = crawl(request, &config, sink, CancellationToken::new())
        .await
        .expect("Crawl failed");
    assert_eq!(report.pages_indexed, 3);
}

#[tokio::test]
async fn test_title_match_outranks_body_match() {
    let server = start_garden_site().await;
    let mut index = SqliteSink::new_in_memory().unwrap();
    crawl_site(&server, &mut index, ":memory:").await;

    let config = create_test_config(":memory:", 10);
    let hits = sink::search(&index, &SearchRequest::new("gardening"), &config.search).unwrap();

    assert_eq!(hits.len(), 2);
    assert_eq!(hits[0].url, format!("{}/title-match", server.uri()));
    assert_eq!(hits[1].url, format!("{}/body-match", server.uri()));
    assert!(hits[0].score > hits[1].score);
    assert_eq!(hits[0].title, "Gardening");
}

#[tokio::test]
async fn test_inflected_query_matches_normalized_text() {
    let server = start_garden_site().await;
    let mut index = SqliteSink::new_in_memory().unwrap();
    crawl_site(&server, &mut index, ":memory:").await;

    let config = create_test_config(":memory:", 10);
    let hits = sink::search(&index, &SearchRequest::new("plant"), &config.search).unwrap();

    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].url, format!("{}/title-match", server.uri()));
}

#[tokio::test]
async fn test_limit_skip_and_json_output() {
    let server = start_garden_site().await;
    let mut index = SqliteSink::new_in_memory().unwrap();
    crawl_site(&server, &mut index, ":memory:").await;

    let config = create_test_config(":memory:", 10);
    let request = SearchRequest {
        query: "gardening".to_string(),
        limit: Some(1),
        skip: 1,
    };
    let hits = sink::search(&index, &request, &config.search).unwrap();
    assert_eq!(hits.len(), 1);

    let json = render_search_json(&hits).unwrap();
    assert_eq!(
        json,
        format!(
            r#"{{"urls":["{}/body-match"],"count":1}}"#,
            server.uri()
        )
    );
}

#[tokio::test]
async fn test_index_persists_and_reindexes() {
    let server = start_garden_site().await;
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let db_path = temp_dir.path().join("data").join("index.db");

    {
        let mut index = SqliteSink::new(&db_path).expect("Failed to open index");
        crawl_site(&server, &mut index, db_path.to_str().unwrap()).await;
    }

    let mut reopened = SqliteSink::new(&db_path).expect("Failed to reopen index");
    let stats = reopened.stats().unwrap();
    assert_eq!(stats.documents, 3);
    assert!(stats.total_content_length > 0);

    let normalizer = Normalizer::shared().unwrap();
    assert_eq!(sink::reindex(&mut reopened, &normalizer).unwrap(), 3);

    let config = create_test_config(db_path.to_str().unwrap(), 10);
    let hits = sink::search(&reopened, &SearchRequest::new("water"), &config.search).unwrap();
    assert_eq!(hits.len(), 1);
}
