//! Interaction webhook endpoint.
//!
//! Discord delivers slash commands and component interactions as signed
//! HTTP POSTs. Every request carries an ed25519 signature over
//! `timestamp || body` which must be verified before the payload is
//! trusted; Discord probes the endpoint with deliberately invalid
//! signatures and expects a 401.
//!
//! Interactive lookups read the remote store directly on demand and never
//! touch the marker cache, so they can run concurrently with a sync cycle
//! without coordination.

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Json, Response};
use ed25519_dalek::{Signature, Verifier, VerifyingKey};
use tracing::{debug, error, instrument, warn};

use crate::notion::{Entry, Filter, PROP_PUBLIC, PROP_TITLE, Sort};
use crate::state::AppState;
use crate::sync::series_group;

use super::error::DiscordError;
use super::messages::{
    SERIES_SELECT_ID, build_entry_reply, build_lookup_failed_reply, build_no_results_reply,
};
use super::types::{
    ApplicationCommand, CommandOption, Interaction, InteractionCallbackData, InteractionData,
    InteractionResponse, interaction_type,
};

/// Name of the catalog search command.
pub const SEARCH_COMMAND: &str = "search";

/// Name of the search command's title option.
const SEARCH_OPTION: &str = "name";

/// Signature header.
const SIGNATURE_HEADER: &str = "X-Signature-Ed25519";

/// Timestamp header.
const TIMESTAMP_HEADER: &str = "X-Signature-Timestamp";

/// The application's global slash commands.
#[must_use]
pub fn application_commands() -> Vec<ApplicationCommand> {
    vec![ApplicationCommand {
        name: SEARCH_COMMAND.to_string(),
        description: "Find a catalog entry by name".to_string(),
        options: vec![CommandOption::string(
            SEARCH_OPTION,
            "Title to search for",
            true,
        )],
    }]
}

/// Verify an interaction request signature.
///
/// The signed message is the timestamp header concatenated with the raw
/// request body.
///
/// # Errors
///
/// Returns `DiscordError::Config` if the configured public key is
/// malformed and `DiscordError::InvalidSignature` if the signature does
/// not verify.
pub fn verify_signature(
    public_key_hex: &str,
    timestamp: &str,
    body: &[u8],
    signature_hex: &str,
) -> Result<(), DiscordError> {
    let key_bytes: [u8; 32] = hex::decode(public_key_hex)
        .map_err(|e| DiscordError::Config(format!("invalid public key hex: {e}")))?
        .try_into()
        .map_err(|_| DiscordError::Config("public key must be 32 bytes".to_string()))?;
    let key = VerifyingKey::from_bytes(&key_bytes)
        .map_err(|e| DiscordError::Config(format!("invalid public key: {e}")))?;

    let sig_bytes: [u8; 64] = hex::decode(signature_hex)
        .map_err(|e| DiscordError::InvalidSignature(format!("invalid signature hex: {e}")))?
        .try_into()
        .map_err(|_| DiscordError::InvalidSignature("signature must be 64 bytes".to_string()))?;
    let signature = Signature::from_bytes(&sig_bytes);

    let mut message = Vec::with_capacity(timestamp.len() + body.len());
    message.extend_from_slice(timestamp.as_bytes());
    message.extend_from_slice(body);

    key.verify(&message, &signature)
        .map_err(|_| DiscordError::InvalidSignature("signature mismatch".to_string()))
}

/// Axum handler for `POST /interactions`.
#[instrument(skip_all)]
pub async fn handle_interaction(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let Some(signature) = header_str(&headers, SIGNATURE_HEADER) else {
        return unauthorized();
    };
    let Some(timestamp) = header_str(&headers, TIMESTAMP_HEADER) else {
        return unauthorized();
    };

    if let Err(e) = verify_signature(
        &state.config().discord.public_key,
        timestamp,
        &body,
        signature,
    ) {
        warn!(error = %e, "rejected interaction with bad signature");
        return unauthorized();
    }

    let interaction: Interaction = match serde_json::from_slice(&body) {
        Ok(interaction) => interaction,
        Err(e) => {
            warn!(error = %e, "malformed interaction payload");
            return (StatusCode::BAD_REQUEST, "malformed interaction").into_response();
        }
    };

    match interaction.kind {
        interaction_type::PING => Json(InteractionResponse::pong()).into_response(),
        interaction_type::APPLICATION_COMMAND => {
            let data = interaction.data.unwrap_or_default();
            reply(handle_command(&state, &data).await)
        }
        interaction_type::MESSAGE_COMPONENT => {
            let data = interaction.data.unwrap_or_default();
            reply(handle_component(&state, &data).await)
        }
        other => {
            debug!(kind = other, "unsupported interaction type");
            (StatusCode::BAD_REQUEST, "unsupported interaction type").into_response()
        }
    }
}

/// Handle the `/search` slash command.
async fn handle_command(state: &AppState, data: &InteractionData) -> InteractionCallbackData {
    if data.name.as_deref() != Some(SEARCH_COMMAND) {
        warn!(command = ?data.name, "unknown command");
        return build_lookup_failed_reply();
    }

    let Some(query) = data.string_option(SEARCH_OPTION) else {
        return build_no_results_reply("");
    };

    let filter = Filter::and(vec![
        Filter::title_contains(PROP_TITLE, query),
        Filter::checkbox_equals(PROP_PUBLIC, true),
    ]);

    lookup_entry(state, filter, query).await
}

/// Handle a selection from the "same series" menu.
async fn handle_component(state: &AppState, data: &InteractionData) -> InteractionCallbackData {
    if data.custom_id.as_deref() != Some(SERIES_SELECT_ID) {
        warn!(custom_id = ?data.custom_id, "unknown component");
        return build_lookup_failed_reply();
    }

    let Some(selected) = data.values.first() else {
        return build_no_results_reply("");
    };

    let filter = Filter::and(vec![
        Filter::title_equals(PROP_TITLE, selected),
        Filter::checkbox_equals(PROP_PUBLIC, true),
    ]);

    lookup_entry(state, filter, selected).await
}

/// Run a point query and render the first matching entry.
async fn lookup_entry(state: &AppState, filter: Filter, query: &str) -> InteractionCallbackData {
    let pages = match state
        .notion()
        .query_one(Some(filter), vec![Sort::ascending(PROP_TITLE)])
        .await
    {
        Ok(pages) => pages,
        Err(e) => {
            error!(error = %e, "interactive lookup failed");
            return build_lookup_failed_reply();
        }
    };

    let Some(page) = pages.first() else {
        return build_no_results_reply(query);
    };

    let entry = Entry::from_page(page);
    let web_link = entry.web_link(&state.config().web_base_url);
    let series = series_group(state.notion(), &entry).await;

    build_entry_reply(&entry, &web_link, &series)
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|v| v.to_str().ok())
}

fn unauthorized() -> Response {
    (StatusCode::UNAUTHORIZED, "invalid request signature").into_response()
}

fn reply(data: InteractionCallbackData) -> Response {
    Json(InteractionResponse::message(data)).into_response()
}
