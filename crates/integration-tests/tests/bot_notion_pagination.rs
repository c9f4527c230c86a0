//! Integration tests for cursor-following pagination.
//!
//! The query endpoint caps pages at 100 records; `query_all` must follow
//! the continuation cursor until the server signals no further pages and
//! concatenate everything, or fail outright - never return a truncated
//! set.

use std::collections::HashSet;

use secrecy::SecretString;
use serde_json::{Value, json};
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use hibiki_bot::notion::{NotionClient, NotionError};
use hibiki_integration_tests::{StartCursor, TEST_DATABASE, entry_page, query_response};

const QUERY_PATH: &str = "/databases/db1/query";

fn client(server: &MockServer) -> NotionClient {
    NotionClient::with_base_url(
        &SecretString::from("secret_test"),
        TEST_DATABASE,
        server.uri(),
    )
    .expect("client builds")
}

fn page_of(range: std::ops::Range<usize>) -> Vec<Value> {
    range
        .map(|i| {
            entry_page(
                &format!("page-{i:03}"),
                &format!("Entry {i}"),
                None,
                "2024-06-05T14:30:00Z",
            )
        })
        .collect()
}

#[tokio::test]
async fn query_all_concatenates_all_pages() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(QUERY_PATH))
        .and(body_partial_json(json!({"page_size": 100})))
        .and(StartCursor(None))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(query_response(page_of(0..100), Some("c1"))),
        )
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path(QUERY_PATH))
        .and(StartCursor(Some("c1")))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(query_response(page_of(100..200), Some("c2"))),
        )
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path(QUERY_PATH))
        .and(StartCursor(Some("c2")))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(query_response(page_of(200..237), None)),
        )
        .expect(1)
        .mount(&server)
        .await;

    let pages = client(&server)
        .query_all(None, Vec::new())
        .await
        .expect("all pages fetched");

    assert_eq!(pages.len(), 237);

    let unique: HashSet<&str> = pages.iter().map(|p| p.id.as_str()).collect();
    assert_eq!(unique.len(), 237, "no duplicates and no omissions");
}

#[tokio::test]
async fn mid_pagination_failure_propagates() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(QUERY_PATH))
        .and(StartCursor(None))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(query_response(page_of(0..100), Some("c1"))),
        )
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path(QUERY_PATH))
        .and(StartCursor(Some("c1")))
        .respond_with(ResponseTemplate::new(500).set_body_string("internal error"))
        .mount(&server)
        .await;

    let result = client(&server).query_all(None, Vec::new()).await;

    // No partial set: the blip surfaces as an error and the cycle retries
    // later against a complete snapshot.
    match result {
        Err(NotionError::Api { status, .. }) => assert_eq!(status, 500),
        other => panic!("expected Api error, got {other:?}"),
    }
}

#[tokio::test]
async fn rate_limit_is_reported_with_retry_after() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(QUERY_PATH))
        .respond_with(
            ResponseTemplate::new(429)
                .insert_header("Retry-After", "17")
                .set_body_json(json!({"message": "rate limited"})),
        )
        .mount(&server)
        .await;

    let result = client(&server).query_all(None, Vec::new()).await;

    match result {
        Err(NotionError::RateLimited(secs)) => assert_eq!(secs, 17),
        other => panic!("expected RateLimited, got {other:?}"),
    }
}

#[tokio::test]
async fn query_one_never_follows_cursors() {
    let server = MockServer::start().await;

    // The response advertises more pages; a point query must not chase
    // them.
    Mock::given(method("POST"))
        .and(path(QUERY_PATH))
        .and(StartCursor(None))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(query_response(page_of(0..2), Some("c1"))),
        )
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path(QUERY_PATH))
        .and(StartCursor(Some("c1")))
        .respond_with(ResponseTemplate::new(200).set_body_json(query_response(vec![], None)))
        .expect(0)
        .mount(&server)
        .await;

    let pages = client(&server)
        .query_one(None, Vec::new())
        .await
        .expect("single page fetched");

    assert_eq!(pages.len(), 2);
}
