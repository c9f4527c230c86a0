//! Integration tests for Hibiki.
//!
//! The suites in `tests/` wire real clients and the real sync engine to a
//! `wiremock` server standing in for the Notion and Discord APIs. This
//! crate holds the shared harness: JSON fixture builders, a request
//! matcher for pagination cursors, and a fully wired engine backed by a
//! temp-dir cache.
//!
//! # Test Categories
//!
//! - `bot_notion_pagination` - cursor-following fetch behavior
//! - `bot_sync_engine` - bootstrap, classification, dispatch, persistence
//! - `bot_discord_messages` - message wire shapes and client error mapping

use secrecy::SecretString;
use serde_json::{Value, json};
use wiremock::{Match, Request};

use hibiki_bot::cache::CacheStore;
use hibiki_bot::discord::DiscordClient;
use hibiki_bot::notion::NotionClient;
use hibiki_bot::sync::SyncEngine;

/// Channel the test engine notifies into.
pub const TEST_CHANNEL: &str = "chan-1";

/// Database ID the test clients query.
pub const TEST_DATABASE: &str = "db1";

/// Base URL of the fake public site.
pub const TEST_WEB_BASE: &str = "https://catalog.test";

/// Build the JSON envelope of one catalog page.
///
/// Always visible (`Public = true`); `marker` fills the `Updated` column
/// when given.
#[must_use]
pub fn entry_page(id: &str, title: &str, marker: Option<&str>, last_edited: &str) -> Value {
    let mut properties = json!({
        "Name": {"type": "title", "title": [{"plain_text": title}]},
        "Public": {"type": "checkbox", "checkbox": true}
    });
    if let Some(marker) = marker {
        properties["Updated"] = json!({
            "type": "rich_text",
            "rich_text": [{"plain_text": marker}]
        });
    }

    json!({
        "object": "page",
        "id": id,
        "last_edited_time": last_edited,
        "properties": properties
    })
}

/// Add a `Series` column to a page envelope.
#[must_use]
pub fn with_series(mut page: Value, series: &str) -> Value {
    page["properties"]["Series"] = json!({
        "type": "rich_text",
        "rich_text": [{"plain_text": series}]
    });
    page
}

/// Build a query response page.
#[must_use]
pub fn query_response(results: Vec<Value>, next_cursor: Option<&str>) -> Value {
    json!({
        "object": "list",
        "results": results,
        "has_more": next_cursor.is_some(),
        "next_cursor": next_cursor
    })
}

/// Matches query bodies by their `start_cursor` field, so each mocked
/// page responds only to the request that should reach it.
pub struct StartCursor(pub Option<&'static str>);

impl Match for StartCursor {
    fn matches(&self, request: &Request) -> bool {
        let body: Value = match serde_json::from_slice(&request.body) {
            Ok(value) => value,
            Err(_) => return false,
        };
        body.get("start_cursor").and_then(Value::as_str) == self.0
    }
}

/// A fully wired engine pointing at a mock server, with its cache in a
/// temp dir.
pub struct TestHarness {
    pub engine: SyncEngine,
    pub cache: CacheStore,
    // Held so the cache dir outlives the test body.
    _dir: tempfile::TempDir,
}

/// Wire a real engine (and real clients) to a mock server URI.
///
/// Both APIs share one server; their paths never collide.
#[must_use]
pub fn harness(server_uri: &str) -> TestHarness {
    harness_with_channel(server_uri, Some(TEST_CHANNEL.to_string()))
}

/// Same as [`harness`], with control over the configured channel.
#[must_use]
pub fn harness_with_channel(server_uri: &str, channel_id: Option<String>) -> TestHarness {
    let dir = tempfile::tempdir().expect("tempdir");
    let cache = CacheStore::new(dir.path().join("cache.json"));

    let notion = NotionClient::with_base_url(
        &SecretString::from("secret_test"),
        TEST_DATABASE,
        server_uri,
    )
    .expect("notion client builds");
    let discord = DiscordClient::with_base_url(SecretString::from("bot-test"), "app-1", server_uri);

    let engine = SyncEngine::new(notion, discord, cache.clone(), channel_id, TEST_WEB_BASE);

    TestHarness {
        engine,
        cache,
        _dir: dir,
    }
}
