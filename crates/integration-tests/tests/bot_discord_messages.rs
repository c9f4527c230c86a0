//! Integration tests for Discord message building and the REST client.
//!
//! The builder tests assert on the serialized wire shape (what Discord
//! actually receives); the client tests run against a mock server.

use chrono::{TimeZone, Utc};
use secrecy::SecretString;
use serde_json::json;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use hibiki_bot::discord::{
    ApplicationCommand, CreateMessage, DiscordClient, DiscordError, build_entry_message,
};
use hibiki_bot::notion::Entry;
use hibiki_bot::sync::Classification;
use hibiki_core::PageId;

fn entry() -> Entry {
    Entry {
        id: PageId::new("a1b2c3d4-e5f6-7890-abcd-ef0123456789"),
        title: Some("Vinland Saga".to_string()),
        episodes: Some(24.0),
        subbed: Some(8.0),
        year: Some(2019.0),
        series: Some("Vinland Saga".to_string()),
        public: true,
        cover: Some("https://cdn.example/vs.jpg".to_string()),
        marker: Some("June 5, 2024 21:30".to_string()),
        last_edited: Utc
            .with_ymd_and_hms(2024, 6, 5, 14, 30, 0)
            .single()
            .expect("valid timestamp"),
    }
}

// =============================================================================
// Wire shape
// =============================================================================

#[test]
fn test_new_entry_wire_shape() {
    let message = build_entry_message(
        &entry(),
        Classification::New,
        "https://catalog.test/anime/vinland-saga-6789",
        &["Vinland Saga S2".to_string()],
    );

    let wire = serde_json::to_value(&message).expect("serialize");

    assert_eq!(wire["embeds"][0]["title"], "🎬 Vinland Saga");
    assert_eq!(
        wire["embeds"][0]["url"],
        "https://catalog.test/anime/vinland-saga-6789"
    );
    assert_eq!(wire["embeds"][0]["color"], 0x00b0_f4);
    assert_eq!(wire["embeds"][0]["author"]["name"], "🔥 New entry!");
    assert_eq!(wire["embeds"][0]["fields"][0]["value"], "8/24");
    assert_eq!(wire["embeds"][0]["fields"][1]["value"], "2019");
    assert_eq!(
        wire["embeds"][0]["thumbnail"]["url"],
        "https://cdn.example/vs.jpg"
    );

    // One action row holding one string select with the sibling entry.
    assert_eq!(wire["components"][0]["type"], 1);
    assert_eq!(wire["components"][0]["components"][0]["type"], 3);
    assert_eq!(
        wire["components"][0]["components"][0]["custom_id"],
        "series_select"
    );
    assert_eq!(
        wire["components"][0]["components"][0]["options"][0]["label"],
        "Vinland Saga S2"
    );
}

#[test]
fn test_update_wire_shape_has_no_components_without_series() {
    let message = build_entry_message(&entry(), Classification::GenuineUpdate, "https://x", &[]);
    let wire = serde_json::to_value(&message).expect("serialize");

    assert_eq!(wire["embeds"][0]["author"]["name"], "🔄 Updated!");
    assert!(wire.get("components").is_none());
}

#[test]
fn test_cover_omitted_when_absent() {
    let mut bare = entry();
    bare.cover = None;
    let message = build_entry_message(&bare, Classification::New, "https://x", &[]);
    let wire = serde_json::to_value(&message).expect("serialize");

    assert!(wire["embeds"][0].get("thumbnail").is_none());
}

// =============================================================================
// Client
// =============================================================================

#[tokio::test]
async fn create_message_posts_the_wire_shape() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/channels/chan-1/messages"))
        .and(body_partial_json(
            json!({"embeds": [{"title": "🎬 Vinland Saga"}]}),
        ))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"id": "m9", "channel_id": "chan-1"})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client =
        DiscordClient::with_base_url(SecretString::from("bot-test"), "app-1", server.uri());
    let message = build_entry_message(&entry(), Classification::New, "https://x", &[]);

    let created = client
        .create_message("chan-1", &message)
        .await
        .expect("message created");

    assert_eq!(created.id, "m9");
    assert_eq!(created.channel_id, "chan-1");
}

#[tokio::test]
async fn api_errors_surface_status_and_body() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/channels/chan-1/messages"))
        .respond_with(
            ResponseTemplate::new(403).set_body_json(json!({"message": "Missing Access"})),
        )
        .mount(&server)
        .await;

    let client =
        DiscordClient::with_base_url(SecretString::from("bot-test"), "app-1", server.uri());

    let result = client
        .create_message("chan-1", &CreateMessage::default())
        .await;

    match result {
        Err(DiscordError::Api { status, message }) => {
            assert_eq!(status, 403);
            assert!(message.contains("Missing Access"));
        }
        other => panic!("expected Api error, got {other:?}"),
    }
}

#[tokio::test]
async fn register_commands_overwrites_the_global_set() {
    let server = MockServer::start().await;

    Mock::given(method("PUT"))
        .and(path("/applications/app-1/commands"))
        .and(body_partial_json(json!([{"name": "search"}])))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let client =
        DiscordClient::with_base_url(SecretString::from("bot-test"), "app-1", server.uri());
    let commands: Vec<ApplicationCommand> = hibiki_bot::discord::application_commands();

    client
        .register_commands(&commands)
        .await
        .expect("commands registered");
}

#[tokio::test]
async fn get_channel_resolves_the_destination() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/channels/chan-1"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"id": "chan-1", "name": "updates"})),
        )
        .mount(&server)
        .await;

    let client =
        DiscordClient::with_base_url(SecretString::from("bot-test"), "app-1", server.uri());

    let channel = client.get_channel("chan-1").await.expect("channel found");
    assert_eq!(channel.id, "chan-1");
    assert_eq!(channel.name.as_deref(), Some("updates"));
}
