//! Integration tests for the crawler
//!
//! These tests use wiremock to create mock HTTP servers and test
//! the full crawl cycle end-to-end.

use crate::common::{create_test_config, html_page, mount_page};
use sumi_search::crawler::{crawl, CrawlRequest};
use sumi_search::sink::{DocumentSink, SqliteSink};
use sumi_search::{CrawlState, FetchErrorKind, SearchError};
use tempfile::TempDir;
use tokio_util::sync::CancellationToken;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn request(seed: String, max_pages: usize) -> CrawlRequest {
    CrawlRequest {
        seeds: vec![seed],
        max_pages,
        same_domain_only: true,
    }
}

#[tokio::test]
async fn test_full_crawl_single_domain() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_page(
        &mock_server,
        "/",
        html_page("Home", "Welcome home", &["/page1", "/page2"]),
        1,
    )
    .await;
    mount_page(&mock_server, "/page1", html_page("Page 1", "Content one", &[]), 1).await;
    mount_page(&mock_server, "/page2", html_page("Page 2", "Content two", &[]), 1).await;

    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let db_path = temp_dir.path().join("index.db");
    let config = create_test_config(db_path.to_str().unwrap(), 100);

    let mut sink = SqliteSink::new(&db_path).expect("Failed to open index");
    let report = crawl(
        request(format!("{}/", base_url), 100),
        &config,
        &mut sink,
        CancellationToken::new(),
    )
    .await
    .expect("Crawl failed");

    assert_eq!(report.state, CrawlState::Completed);
    assert_eq!(report.pages_indexed, 3);
    assert!(report.errors.is_empty());
    assert_eq!(sink.count().unwrap(), 3);

    let home = sink
        .get(&format!("{}/", base_url))
        .unwrap()
        .expect("Home page should be indexed");
    assert_eq!(home.document.title, "Home");
    assert!(home.document.raw_text.contains("Welcome home"));
    assert!(home.document.index_text.split(' ').any(|token| token == "home"));
}

#[tokio::test]
async fn test_max_pages_one_indexes_only_the_seed() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_page(
        &mock_server,
        "/",
        html_page("Home", "Welcome", &["/a", "/b"]),
        1,
    )
    .await;
    mount_page(&mock_server, "/a", html_page("A", "a", &[]), 0).await;
    mount_page(&mock_server, "/b", html_page("B", "b", &[]), 0).await;

    let mut sink = SqliteSink::new_in_memory().unwrap();
    let config = create_test_config(":memory:", 1);

    let report = crawl(
        request(format!("{}/", base_url), 1),
        &config,
        &mut sink,
        CancellationToken::new(),
    )
    .await
    .unwrap();

    assert_eq!(report.state, CrawlState::Completed);
    assert_eq!(report.pages_indexed, 1);
    assert_eq!(sink.count().unwrap(), 1);
}

#[tokio::test]
async fn test_dead_link_is_recorded_and_crawl_continues() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_page(
        &mock_server,
        "/",
        html_page("Home", "Welcome", &["/missing", "/ok"]),
        1,
    )
    .await;
    mount_page(&mock_server, "/ok", html_page("Ok", "Fine", &[]), 1).await;
    Mock::given(method("GET"))
        .and(path("/missing"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&mock_server)
        .await;

    let mut sink = SqliteSink::new_in_memory().unwrap();
    let config = create_test_config(":memory:", 10);

    let report = crawl(
        request(format!("{}/", base_url), 10),
        &config,
        &mut sink,
        CancellationToken::new(),
    )
    .await
    .unwrap();

    assert_eq!(report.state, CrawlState::Completed);
    assert_eq!(report.pages_indexed, 2);
    assert_eq!(report.errors.len(), 1);
    assert_eq!(report.errors[0].url, format!("{}/missing", base_url));
    assert_eq!(report.errors[0].kind, Some(FetchErrorKind::HttpStatus));
}

#[tokio::test]
async fn test_self_link_terminates() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_page(
        &mock_server,
        "/",
        html_page("Loop", "Round and round", &["/", "/#top", "/?utm_source=self"]),
        1,
    )
    .await;

    let mut sink = SqliteSink::new_in_memory().unwrap();
    let config = create_test_config(":memory:", 50);

    let report = crawl(
        request(format!("{}/", base_url), 50),
        &config,
        &mut sink,
        CancellationToken::new(),
    )
    .await
    .unwrap();

    assert_eq!(report.state, CrawlState::Completed);
    assert_eq!(report.pages_indexed, 1);
}

#[tokio::test]
async fn test_link_cycle_fetches_each_url_once() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_page(&mock_server, "/", html_page("Root", "r", &["/a", "/b"]), 1).await;
    mount_page(&mock_server, "/a", html_page("A", "a", &["/b", "/"]), 1).await;
    mount_page(&mock_server, "/b", html_page("B", "b", &["/a", "/a/"]), 1).await;

    let mut sink = SqliteSink::new_in_memory().unwrap();
    let config = create_test_config(":memory:", 100);

    let report = crawl(
        request(format!("{}/", base_url), 100),
        &config,
        &mut sink,
        CancellationToken::new(),
    )
    .await
    .unwrap();

    assert_eq!(report.pages_indexed, 3);
    assert_eq!(report.urls_discovered, 3);
    assert_eq!(sink.count().unwrap(), 3);
}

#[tokio::test]
async fn test_same_domain_only_skips_other_hosts() {
    let mock_server = MockServer::start().await;
    let other_server = MockServer::start().await;
    let base_url = mock_server.uri();

    // Same address, different host name
    let other_url = other_server.uri().replace("127.0.0.1", "localhost");

    mount_page(
        &mock_server,
        "/",
        html_page("Home", "Welcome", &[&format!("{}/elsewhere", other_url)]),
        1,
    )
    .await;
    mount_page(&other_server, "/elsewhere", html_page("Away", "away", &[]), 0).await;

    let mut sink = SqliteSink::new_in_memory().unwrap();
    let config = create_test_config(":memory:", 10);

    let report = crawl(
        request(format!("{}/", base_url), 10),
        &config,
        &mut sink,
        CancellationToken::new(),
    )
    .await
    .unwrap();

    assert_eq!(report.pages_indexed, 1);
    assert!(report.errors.is_empty());
}

#[tokio::test]
async fn test_redirect_records_final_url() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    let location = format!("{}/new", base_url);
    Mock::given(method("GET"))
        .and(path("/old"))
        .respond_with(ResponseTemplate::new(301).insert_header("location", location.as_str()))
        .expect(1)
        .mount(&mock_server)
        .await;
    mount_page(&mock_server, "/new", html_page("New", "Moved here", &[]), 1).await;

    let mut sink = SqliteSink::new_in_memory().unwrap();
    let config = create_test_config(":memory:", 10);

    let report = crawl(
        request(format!("{}/old", base_url), 10),
        &config,
        &mut sink,
        CancellationToken::new(),
    )
    .await
    .unwrap();

    assert_eq!(report.pages_indexed, 1);
    let stored = sink
        .get(&format!("{}/old", base_url))
        .unwrap()
        .expect("Document should be stored under the requested URL");
    assert_eq!(stored.document.final_url, format!("{}/new", base_url));
    assert_eq!(stored.document.title, "New");
}

#[tokio::test]
async fn test_redirect_to_other_host_is_not_indexed() {
    let mock_server = MockServer::start().await;
    let other_server = MockServer::start().await;
    let base_url = mock_server.uri();

    // Same address, different host name
    let offsite = format!(
        "{}/offsite",
        other_server.uri().replace("127.0.0.1", "localhost")
    );

    mount_page(
        &mock_server,
        "/",
        html_page("Home", "Welcome", &["/moved"]),
        1,
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/moved"))
        .respond_with(ResponseTemplate::new(301).insert_header("location", offsite.as_str()))
        .expect(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/offsite"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw(html_page("Away", "Elsewhere", &["/deeper"]), "text/html"),
        )
        .mount(&other_server)
        .await;
    mount_page(&other_server, "/deeper", html_page("Deeper", "further", &[]), 0).await;

    let mut sink = SqliteSink::new_in_memory().unwrap();
    let config = create_test_config(":memory:", 10);

    let report = crawl(
        request(format!("{}/", base_url), 10),
        &config,
        &mut sink,
        CancellationToken::new(),
    )
    .await
    .unwrap();

    assert_eq!(report.state, CrawlState::Completed);
    assert_eq!(report.pages_indexed, 1);
    assert_eq!(report.errors.len(), 1);
    assert_eq!(report.errors[0].url, format!("{}/moved", base_url));
    assert_eq!(report.errors[0].kind, Some(FetchErrorKind::OutOfScope));
    assert_eq!(sink.count().unwrap(), 1);
    assert!(sink.get(&format!("{}/moved", base_url)).unwrap().is_none());
}

#[tokio::test]
async fn test_non_html_content_is_skipped() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_page(
        &mock_server,
        "/",
        html_page("Home", "Docs", &["/manual.pdf"]),
        1,
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/manual.pdf"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(b"%PDF-1.4".to_vec(), "application/pdf"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let mut sink = SqliteSink::new_in_memory().unwrap();
    let config = create_test_config(":memory:", 10);

    let report = crawl(
        request(format!("{}/", base_url), 10),
        &config,
        &mut sink,
        CancellationToken::new(),
    )
    .await
    .unwrap();

    assert_eq!(report.pages_indexed, 1);
    assert_eq!(report.errors.len(), 1);
    assert_eq!(report.errors[0].kind, Some(FetchErrorKind::ContentType));
}

#[tokio::test]
async fn test_cancelled_crawl_is_aborted() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_page(&mock_server, "/", html_page("Home", "Welcome", &[]), 0).await;

    let mut sink = SqliteSink::new_in_memory().unwrap();
    let config = create_test_config(":memory:", 10);
    let cancel = CancellationToken::new();
    cancel.cancel();

    let report = crawl(request(format!("{}/", base_url), 10), &config, &mut sink, cancel)
        .await
        .unwrap();

    assert_eq!(report.state, CrawlState::Aborted);
    assert_eq!(report.pages_indexed, 0);
    assert!(matches!(
        report.into_result(),
        Err(SearchError::Aborted { pages_indexed: 0, .. })
    ));
}
