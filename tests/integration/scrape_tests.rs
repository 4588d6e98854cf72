//! Integration tests for the scraper
//!
//! These tests use wiremock to serve a search endpoint and its result pages,
//! then run full scrapes end-to-end and inspect the CSV that comes out.

use jobscrape::config::{Config, FailureMode};
use jobscrape::output::{OutputResult, ResultWriter};
use jobscrape::{ErrorKind, JobRecord, ScrapeError, Scraper};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use tempfile::TempDir;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Match, Mock, MockServer, Request, ResponseTemplate};

const DETAIL_URL: &str = "https://jobs.example.com/view/";

/// Matches the first search request, which carries no page number
struct NoPageParam;

impl Match for NoPageParam {
    fn matches(&self, request: &Request) -> bool {
        !request.url.query_pairs().any(|(key, _)| key == "Page_No")
    }
}

/// Creates a test configuration pointing at the mock server
fn create_test_config(server: &MockServer, csv_path: &Path, mode: FailureMode) -> Config {
    let mut config = Config::default();
    config.site.search_url = format!("{}/Search/", server.uri());
    config.site.detail_url = DETAIL_URL.to_string();
    config.output.csv_path = csv_path.display().to_string();
    config.scrape.failure_mode = mode;
    config
}

fn html(body: String) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_raw(body, "text/html; charset=utf-8")
}

fn search_page(page_links: usize) -> String {
    let links: String = (1..=page_links)
        .map(|n| format!(r#"<a href="/Search/?stext=rust&Page_No={n}">{n}</a>"#))
        .collect();
    format!(
        r#"<html><body>
            <div class="tplPagination newVer wide">{}</div>
        </body></html>"#,
        links
    )
}

fn results_page(cards: &[(&str, &str, &str, &str)]) -> String {
    let items: String = cards
        .iter()
        .map(|(id, title, location, hashtag)| {
            format!(
                r#"<li class="list-post" data-gno="{id}">
                    <div class="post-list-corp"><a class="name dev_view">
                        {location}
                    </a></div>
                    <div class="post-list-info">
                        <a class="title">  {title}  </a>
                        <p class="etc">{hashtag}</p>
                    </div>
                </li>"#
            )
        })
        .collect();
    format!(
        r#"<html><body><div class="list-default"><ul>{}</ul></div></body></html>"#,
        items
    )
}

async fn mount_search(server: &MockServer, page_links: usize) {
    Mock::given(method("GET"))
        .and(path("/Search/"))
        .and(query_param("stext", "rust"))
        .and(NoPageParam)
        .respond_with(html(search_page(page_links)))
        .mount(server)
        .await;
}

async fn mount_page(server: &MockServer, page: u32, response: ResponseTemplate) {
    Mock::given(method("GET"))
        .and(path("/Search/"))
        .and(query_param("stext", "rust"))
        .and(query_param("Page_No", page.to_string()))
        .respond_with(response)
        .expect(1)
        .mount(server)
        .await;
}

async fn mount_two_pages(server: &MockServer, page_two: ResponseTemplate) {
    mount_search(server, 2).await;
    mount_page(
        server,
        1,
        html(results_page(&[
            ("101", "Rust Engineer", "Seoul Acme", "#rust #backend"),
            ("102", "Platform Engineer", "Pangyo Widgets", "#k8s"),
        ])),
    )
    .await;
    mount_page(server, 2, page_two).await;
}

fn page_two_cards() -> ResponseTemplate {
    html(results_page(&[
        ("201", "Data Engineer", "Busan Fishery", "#spark"),
        ("202", "Embedded Developer", "Daejeon Robotics", "#c #rtos"),
    ]))
}

fn read_lines(path: &Path) -> Vec<String> {
    std::fs::read_to_string(path)
        .expect("Failed to read CSV output")
        .lines()
        .map(str::to_string)
        .collect()
}

fn ids(records: &[JobRecord]) -> BTreeSet<String> {
    records.iter().map(|r| r.id.clone()).collect()
}

fn id_set(expected: &[&str]) -> BTreeSet<String> {
    expected.iter().map(|id| id.to_string()).collect()
}

#[tokio::test]
async fn test_end_to_end_two_pages() {
    let server = MockServer::start().await;
    mount_two_pages(&server, page_two_cards()).await;

    let dir = TempDir::new().unwrap();
    let csv_path = dir.path().join("jobs.csv");
    let config = create_test_config(&server, &csv_path, FailureMode::Partial);

    let scraper = Scraper::new(config).expect("Failed to create scraper");
    let report = scraper.scrape("rust").await.expect("Scrape failed");

    assert_eq!(report.total_pages, 2);
    assert!(report.is_complete());
    assert_eq!(report.records.len(), 4);
    assert_eq!(ids(&report.records), id_set(&["101", "102", "201", "202"]));

    let expected: BTreeSet<JobRecord> = [
        ("101", "Rust Engineer", "Seoul Acme", "#rust #backend"),
        ("102", "Platform Engineer", "Pangyo Widgets", "#k8s"),
        ("201", "Data Engineer", "Busan Fishery", "#spark"),
        ("202", "Embedded Developer", "Daejeon Robotics", "#c #rtos"),
    ]
    .into_iter()
    .map(|(id, title, location, hashtag)| JobRecord {
        id: id.to_string(),
        title: title.to_string(),
        location: location.to_string(),
        hashtag: hashtag.to_string(),
    })
    .collect();
    let actual: BTreeSet<JobRecord> = report.records.iter().cloned().collect();
    assert_eq!(actual, expected);

    let lines = read_lines(&csv_path);
    assert_eq!(lines.len(), 5);
    assert_eq!(lines[0], "LINK,TITLE,LOCATION,HASHTAG");

    let rows: BTreeSet<&str> = lines[1..].iter().map(String::as_str).collect();
    assert!(rows.contains("https://jobs.example.com/view/101,Rust Engineer,Seoul Acme,#rust #backend"));
    assert!(rows.contains("https://jobs.example.com/view/202,Embedded Developer,Daejeon Robotics,#c #rtos"));
    assert_eq!(report.output.as_deref(), Some(csv_path.as_path()));
}

#[tokio::test]
async fn test_zero_pages_writes_header_only() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/Search/"))
        .respond_with(html(
            "<html><body><p>No results</p></body></html>".to_string(),
        ))
        .expect(1)
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let csv_path = dir.path().join("jobs.csv");
    let config = create_test_config(&server, &csv_path, FailureMode::Strict);

    let report = Scraper::new(config)
        .unwrap()
        .scrape("rust")
        .await
        .expect("Empty scrape should succeed");

    assert_eq!(report.total_pages, 0);
    assert!(report.records.is_empty());
    assert_eq!(read_lines(&csv_path), vec!["LINK,TITLE,LOCATION,HASHTAG"]);
}

#[tokio::test]
async fn test_strict_mode_page_failure_halts_scrape() {
    let server = MockServer::start().await;
    mount_search(&server, 2).await;
    Mock::given(method("GET"))
        .and(path("/Search/"))
        .and(query_param("Page_No", "1"))
        .respond_with(html(results_page(&[("101", "Rust", "Seoul", "#rust")])))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/Search/"))
        .and(query_param("Page_No", "2"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let csv_path = dir.path().join("jobs.csv");
    let config = create_test_config(&server, &csv_path, FailureMode::Strict);

    let result = Scraper::new(config).unwrap().scrape("rust").await;

    match result {
        Err(error) => {
            assert_eq!(error.kind(), ErrorKind::Fetch);
            assert!(matches!(error, ScrapeError::Status { status: 500, .. }));
        }
        Ok(report) => panic!("Expected strict failure, got {} records", report.records.len()),
    }
    assert!(!csv_path.exists(), "Strict failure must not write output");
}

#[tokio::test]
async fn test_strict_failure_cancels_in_flight_page() {
    let server = MockServer::start().await;
    mount_search(&server, 2).await;
    Mock::given(method("GET"))
        .and(path("/Search/"))
        .and(query_param("Page_No", "1"))
        .respond_with(
            html(results_page(&[("101", "Rust", "Seoul", "#rust")]))
                .set_delay(Duration::from_secs(20)),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/Search/"))
        .and(query_param("Page_No", "2"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let csv_path = dir.path().join("jobs.csv");
    let config = create_test_config(&server, &csv_path, FailureMode::Strict);
    let scraper = Scraper::new(config).unwrap();

    let started = Instant::now();
    let result = tokio::time::timeout(Duration::from_secs(10), scraper.scrape("rust"))
        .await
        .expect("Scrape waited on the delayed page instead of cancelling it");

    assert!(
        started.elapsed() < Duration::from_secs(5),
        "Strict failure took {:?}",
        started.elapsed()
    );
    assert!(matches!(result, Err(ScrapeError::Status { status: 500, .. })));
    assert!(!csv_path.exists());
}

#[tokio::test]
async fn test_partial_mode_reports_failed_page() {
    let server = MockServer::start().await;
    mount_two_pages(&server, ResponseTemplate::new(503)).await;

    let dir = TempDir::new().unwrap();
    let csv_path = dir.path().join("jobs.csv");
    let config = create_test_config(&server, &csv_path, FailureMode::Partial);

    let report = Scraper::new(config)
        .unwrap()
        .scrape("rust")
        .await
        .expect("Partial scrape should complete");

    assert_eq!(report.total_pages, 2);
    assert_eq!(report.pages_succeeded(), 1);
    assert_eq!(report.failed_pages.len(), 1);
    assert_eq!(report.failed_pages[0].page, Some(2));
    assert!(report.failed_pages[0].error.contains("503"));
    assert_eq!(ids(&report.records), id_set(&["101", "102"]));

    let lines = read_lines(&csv_path);
    assert_eq!(lines.len(), 3);
    assert_eq!(lines[0], "LINK,TITLE,LOCATION,HASHTAG");
}

#[tokio::test]
async fn test_strict_mode_parse_error() {
    let server = MockServer::start().await;
    mount_search(&server, 1).await;
    Mock::given(method("GET"))
        .and(path("/Search/"))
        .and(query_param("Page_No", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_raw("{\"jobs\":[]}", "application/json"))
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let csv_path = dir.path().join("jobs.csv");
    let config = create_test_config(&server, &csv_path, FailureMode::Strict);

    let error = Scraper::new(config)
        .unwrap()
        .scrape("rust")
        .await
        .expect_err("JSON page must fail in strict mode");
    assert_eq!(error.kind(), ErrorKind::Parse);
}

#[tokio::test]
async fn test_discovery_failure_is_fatal_in_partial_mode() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(502))
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let csv_path = dir.path().join("jobs.csv");
    let config = create_test_config(&server, &csv_path, FailureMode::Partial);

    let error = Scraper::new(config)
        .unwrap()
        .scrape("rust")
        .await
        .expect_err("Discovery failure must be fatal");
    assert_eq!(error.kind(), ErrorKind::Fetch);
    assert!(!csv_path.exists());
}

#[tokio::test]
async fn test_every_page_failing_is_fatal_in_partial_mode() {
    let server = MockServer::start().await;
    mount_search(&server, 2).await;
    Mock::given(method("GET"))
        .and(path("/Search/"))
        .and(query_param("Page_No", "1"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/Search/"))
        .and(query_param("Page_No", "2"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let csv_path = dir.path().join("jobs.csv");
    let config = create_test_config(&server, &csv_path, FailureMode::Partial);

    let error = Scraper::new(config)
        .unwrap()
        .scrape("rust")
        .await
        .expect_err("No page succeeded");
    assert!(matches!(error, ScrapeError::AllPagesFailed { pages: 2 }));
}

/// Keeps written records in memory
#[derive(Clone, Default)]
struct MemoryWriter {
    written: Arc<Mutex<Vec<JobRecord>>>,
}

impl ResultWriter for MemoryWriter {
    fn write_records(&self, records: &[JobRecord]) -> OutputResult<()> {
        self.written.lock().unwrap().extend_from_slice(records);
        Ok(())
    }
}

#[tokio::test]
async fn test_custom_writer_receives_merged_records() {
    let server = MockServer::start().await;
    mount_two_pages(&server, page_two_cards()).await;

    let writer = MemoryWriter::default();
    let config = create_test_config(
        &server,
        &PathBuf::from("unused.csv"),
        FailureMode::Strict,
    );

    let report = Scraper::new(config)
        .unwrap()
        .with_writer(writer.clone())
        .scrape("rust")
        .await
        .expect("Scrape failed");

    let written = writer.written.lock().unwrap().clone();
    assert_eq!(written.len(), 4);
    assert_eq!(ids(&written), ids(&report.records));
    assert_eq!(report.output, None);
}

#[tokio::test]
async fn test_unwritable_output_is_write_error() {
    let server = MockServer::start().await;
    mount_two_pages(&server, page_two_cards()).await;

    let dir = TempDir::new().unwrap();
    let csv_path = dir.path().join("missing-dir").join("jobs.csv");
    let config = create_test_config(&server, &csv_path, FailureMode::Partial);

    let error = Scraper::new(config)
        .unwrap()
        .scrape("rust")
        .await
        .expect_err("Write into a missing directory must fail");
    assert_eq!(error.kind(), ErrorKind::Write);
}
