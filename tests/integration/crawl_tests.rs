//! Integration tests for the crawler
//!
//! These tests use wiremock to stand in for the lesson-search API and
//! exercise the probe, fan-out and gather cycle end-to-end.

use course_crawler::config::ApiConfig;
use course_crawler::crawler::{build_http_client, crawl, ApiClient, Endpoint, Paginator};
use course_crawler::output::{write_courses, NoProgress, ProgressReporter};
use course_crawler::state::FetchPhase;
use course_crawler::transform::transform_all;
use course_crawler::CrawlerError;
use serde_json::{json, Value};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const SEMESTER: u32 = 504;
const LESSON_PATH: &str = "/semester/504/search/504";

/// Creates an API config pointing at the mock server
fn create_test_config(server: &MockServer, page_size: u32) -> ApiConfig {
    ApiConfig {
        url_template: format!("{}/semester/{{sid}}/search/504", server.uri()),
        page_size,
        timeout_secs: 5,
        accept_invalid_certs: false,
        ..ApiConfig::default()
    }
}

/// Builds a page envelope body
fn envelope(total_rows: u64, data: Vec<Value>) -> Value {
    json!({
        "_page_": {"totalRows": total_rows},
        "data": data,
    })
}

/// Records for page `page`, tagged so their origin is visible in the output
fn page_records(page: u32, count: usize) -> Vec<Value> {
    (0..count)
        .map(|i| {
            json!({
                "code": format!("P{}-{:04}", page, i),
                "course": {"nameZh": format!("Course {}-{}", page, i), "credits": 2},
                "teacherAssignmentList": [{"person": {"nameZh": "Zhang"}}],
                "openDepartment": {"nameZh": "Dept"}
            })
        })
        .collect()
}

async fn mount_probe(server: &MockServer, total_rows: u64) {
    Mock::given(method("GET"))
        .and(path(LESSON_PATH))
        .and(query_param("queryPage__", "1,1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(
            total_rows,
            page_records(99, usize::from(total_rows > 0)),
        )))
        .expect(1)
        .mount(server)
        .await;
}

async fn mount_page(
    server: &MockServer,
    page: u32,
    page_size: u32,
    total_rows: u64,
    count: usize,
    delay: Duration,
) {
    Mock::given(method("GET"))
        .and(path(LESSON_PATH))
        .and(query_param("queryPage__", format!("{},{}", page, page_size)))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(envelope(total_rows, page_records(page, count)))
                .set_delay(delay),
        )
        .mount(server)
        .await;
}

/// Progress reporter that counts the events it receives
#[derive(Default)]
struct RecordingProgress {
    total: AtomicU64,
    advanced: AtomicU64,
    finished: AtomicU64,
}

impl ProgressReporter for RecordingProgress {
    fn start(&self, total: u64) {
        self.total.store(total, Ordering::SeqCst);
    }

    fn advance(&self, n: u64) {
        self.advanced.fetch_add(n, Ordering::SeqCst);
    }

    fn finish(&self) {
        self.finished.fetch_add(1, Ordering::SeqCst);
    }
}

#[tokio::test]
async fn test_three_pages_gathered_in_page_order() {
    let server = MockServer::start().await;

    mount_probe(&server, 2500).await;
    // Page 1 answers last; its records must still come first
    mount_page(&server, 1, 1000, 2500, 1000, Duration::from_millis(300)).await;
    mount_page(&server, 2, 1000, 2500, 1000, Duration::from_millis(100)).await;
    mount_page(&server, 3, 1000, 2500, 500, Duration::ZERO).await;

    let config = create_test_config(&server, 1000);
    let progress = RecordingProgress::default();
    let started = Instant::now();
    let outcome = crawl(&config, SEMESTER, &progress)
        .await
        .expect("Crawl failed");
    let elapsed = started.elapsed();

    // Pages run concurrently, so the delays overlap instead of adding up
    assert!(
        elapsed < Duration::from_millis(400),
        "Pages were not fetched concurrently: {:?}",
        elapsed
    );

    assert_eq!(outcome.total_rows, 2500);
    assert_eq!(outcome.page_count, 3);
    assert_eq!(outcome.records.len(), 2500);

    let codes: Vec<&str> = outcome
        .records
        .iter()
        .map(|r| r["code"].as_str().unwrap())
        .collect();
    assert_eq!(codes[0], "P1-0000");
    assert_eq!(codes[999], "P1-0999");
    assert_eq!(codes[1000], "P2-0000");
    assert_eq!(codes[2000], "P3-0000");
    assert_eq!(codes[2499], "P3-0499");
    // The probe's own record is never part of the result
    assert!(codes.iter().all(|c| !c.starts_with("P99")));

    assert_eq!(progress.total.load(Ordering::SeqCst), 3);
    assert_eq!(progress.advanced.load(Ordering::SeqCst), 3);
    assert_eq!(progress.finished.load(Ordering::SeqCst), 1);

    // One probe plus one request per page
    let requests = server.received_requests().await.expect("Recording disabled");
    assert_eq!(requests.len(), 4);
}

#[tokio::test]
async fn test_zero_rows_issues_no_page_requests() {
    let server = MockServer::start().await;

    mount_probe(&server, 0).await;
    Mock::given(method("GET"))
        .and(query_param("queryPage__", "1,1000"))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(0, vec![])))
        .expect(0)
        .mount(&server)
        .await;

    let config = create_test_config(&server, 1000);
    let progress = RecordingProgress::default();
    let outcome = crawl(&config, SEMESTER, &progress)
        .await
        .expect("Crawl failed");

    assert_eq!(outcome.total_rows, 0);
    assert_eq!(outcome.page_count, 0);
    assert!(outcome.records.is_empty());
    assert_eq!(progress.total.load(Ordering::SeqCst), 0);
    assert_eq!(progress.finished.load(Ordering::SeqCst), 0);

    let requests = server.received_requests().await.expect("Recording disabled");
    assert_eq!(requests.len(), 1);
}

#[tokio::test]
async fn test_page_error_status_fails_whole_crawl() {
    let server = MockServer::start().await;

    mount_probe(&server, 25).await;
    mount_page(&server, 1, 10, 25, 10, Duration::ZERO).await;
    Mock::given(method("GET"))
        .and(path(LESSON_PATH))
        .and(query_param("queryPage__", "2,10"))
        .respond_with(ResponseTemplate::new(502))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(LESSON_PATH))
        .and(query_param("queryPage__", "3,10"))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(25, page_records(3, 5))))
        .mount(&server)
        .await;

    let config = create_test_config(&server, 10);
    let result = crawl(&config, SEMESTER, &NoProgress).await;

    match result {
        Err(CrawlerError::Status { status, .. }) => assert_eq!(status, 502),
        other => panic!("Expected status error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_malformed_page_is_protocol_error() {
    let server = MockServer::start().await;

    mount_probe(&server, 15).await;
    mount_page(&server, 1, 10, 15, 10, Duration::ZERO).await;
    Mock::given(method("GET"))
        .and(path(LESSON_PATH))
        .and(query_param("queryPage__", "2,10"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
        .mount(&server)
        .await;

    let config = create_test_config(&server, 10);
    let result = crawl(&config, SEMESTER, &NoProgress).await;

    assert!(
        matches!(result, Err(CrawlerError::Protocol { .. })),
        "Expected protocol error, got {:?}",
        result
    );
}

#[tokio::test]
async fn test_probe_without_row_count_fails() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(LESSON_PATH))
        .and(query_param("queryPage__", "1,1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": []})))
        .mount(&server)
        .await;

    let config = create_test_config(&server, 10);
    let endpoint = Endpoint::resolve(&config.url_template, SEMESTER).unwrap();
    let client = ApiClient::new(build_http_client(&config).unwrap(), endpoint);
    let mut paginator = Paginator::new(client, config.page_size);

    let result = paginator.fetch_all(&NoProgress).await;

    match result {
        Err(CrawlerError::Protocol { message, .. }) => {
            assert!(message.starts_with("row count:"), "Unexpected message: {}", message)
        }
        other => panic!("Expected protocol error, got {:?}", other),
    }
    assert_eq!(paginator.phase(), FetchPhase::Failed);
}

#[tokio::test]
async fn test_row_count_with_null_data_still_crawls() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(LESSON_PATH))
        .and(query_param("queryPage__", "1,1"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"_page_": {"totalRows": 2}, "data": null})),
        )
        .expect(1)
        .mount(&server)
        .await;
    mount_page(&server, 1, 10, 2, 2, Duration::ZERO).await;

    let config = create_test_config(&server, 10);
    let outcome = crawl(&config, SEMESTER, &NoProgress)
        .await
        .expect("Crawl failed");

    assert_eq!(outcome.total_rows, 2);
    assert_eq!(outcome.page_count, 1);
    assert_eq!(outcome.records.len(), 2);
    assert_eq!(outcome.records[0]["code"], "P1-0000");
}

#[tokio::test]
async fn test_malformed_page_message_names_the_page() {
    let server = MockServer::start().await;

    mount_probe(&server, 5).await;
    Mock::given(method("GET"))
        .and(path(LESSON_PATH))
        .and(query_param("queryPage__", "1,10"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"_page_": {"totalRows": 5}})))
        .mount(&server)
        .await;

    let config = create_test_config(&server, 10);
    let result = crawl(&config, SEMESTER, &NoProgress).await;

    match result {
        Err(CrawlerError::Protocol { message, .. }) => {
            assert!(message.starts_with("page 1:"), "Unexpected message: {}", message)
        }
        other => panic!("Expected protocol error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_paginator_ends_in_done_phase() {
    let server = MockServer::start().await;

    mount_probe(&server, 3).await;
    mount_page(&server, 1, 2, 3, 2, Duration::ZERO).await;
    mount_page(&server, 2, 2, 3, 1, Duration::ZERO).await;

    let config = create_test_config(&server, 2);
    let endpoint = Endpoint::resolve(&config.url_template, SEMESTER).unwrap();
    let client = ApiClient::new(build_http_client(&config).unwrap(), endpoint);
    let mut paginator = Paginator::new(client, config.page_size);

    assert_eq!(paginator.phase(), FetchPhase::Init);
    let outcome = paginator.fetch_all(&NoProgress).await.expect("Crawl failed");

    assert_eq!(outcome.records.len(), 3);
    assert_eq!(paginator.phase(), FetchPhase::Done);
}

#[tokio::test]
async fn test_connection_refused_is_transport_error() {
    // Nothing listens on port 1
    let config = ApiConfig {
        url_template: "http://127.0.0.1:1/semester/{sid}/search/504".to_string(),
        timeout_secs: 5,
        accept_invalid_certs: false,
        ..ApiConfig::default()
    };

    let result = crawl(&config, SEMESTER, &NoProgress).await;

    assert!(
        matches!(
            result,
            Err(CrawlerError::Transport { .. }) | Err(CrawlerError::Timeout { .. })
        ),
        "Expected transport error, got {:?}",
        result
    );
}

#[tokio::test]
async fn test_repeated_crawls_produce_identical_output() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(LESSON_PATH))
        .and(query_param("queryPage__", "1,1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(7, page_records(99, 1))))
        .mount(&server)
        .await;
    for page in 1..=3u32 {
        let count = if page == 3 { 1 } else { 3 };
        Mock::given(method("GET"))
            .and(path(LESSON_PATH))
            .and(query_param("queryPage__", format!("{},3", page)))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(envelope(7, page_records(page, count))),
            )
            .mount(&server)
            .await;
    }

    let dir = tempfile::TempDir::new().unwrap();
    let config = create_test_config(&server, 3);
    let mut outputs = Vec::new();

    for run in 0..2 {
        let outcome = crawl(&config, SEMESTER, &NoProgress)
            .await
            .expect("Crawl failed");
        let courses = transform_all(&outcome.records);
        assert_eq!(courses.len(), 7);

        let path = dir.path().join(format!("courses-{}.json", run));
        write_courses(&path, &courses, 2).unwrap();
        outputs.push(std::fs::read(&path).unwrap());
    }

    assert_eq!(outputs[0], outputs[1]);
}

#[tokio::test]
async fn test_failed_crawl_writes_no_output() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(LESSON_PATH))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let dir = tempfile::TempDir::new().unwrap();
    let output = dir.path().join("courses.json");
    let config = create_test_config(&server, 1000);

    let written = match crawl(&config, SEMESTER, &NoProgress).await {
        Ok(outcome) => {
            write_courses(&output, &transform_all(&outcome.records), 2).unwrap();
            true
        }
        Err(_) => false,
    };

    assert!(!written);
    assert!(!output.exists());
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
}
