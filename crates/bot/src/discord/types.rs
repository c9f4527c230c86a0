//! Discord REST API wire types.
//!
//! These types represent the subset of the Discord API (v10) needed for
//! posting rich embed messages with a select-menu component, registering
//! slash commands, and answering interaction webhooks.
//!
//! Discord encodes kinds as numeric `type` fields; the constructors set
//! the constants so callers never deal with raw numbers.

use serde::{Deserialize, Serialize};

/// Component type constants.
pub mod component_type {
    /// Container row for interactive components.
    pub const ACTION_ROW: u8 = 1;
    /// String select menu.
    pub const STRING_SELECT: u8 = 3;
}

/// Interaction request type constants.
pub mod interaction_type {
    /// Webhook liveness check.
    pub const PING: u8 = 1;
    /// Slash command invocation.
    pub const APPLICATION_COMMAND: u8 = 2;
    /// Component interaction (select menu, button).
    pub const MESSAGE_COMPONENT: u8 = 3;
}

/// Interaction response type constants.
pub mod callback_type {
    /// Answer to a ping.
    pub const PONG: u8 = 1;
    /// Respond with a visible message.
    pub const CHANNEL_MESSAGE_WITH_SOURCE: u8 = 4;
}

/// Application command option type constants.
pub mod command_option_type {
    /// Free-text string option.
    pub const STRING: u8 = 3;
}

/// Message flag: visible only to the invoking user.
pub const FLAG_EPHEMERAL: u32 = 1 << 6;

// =============================================================================
// Outgoing messages
// =============================================================================

/// Body for creating a channel message.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CreateMessage {
    /// Plain-text content.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    /// Rich embeds.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub embeds: Vec<Embed>,
    /// Interactive component rows.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub components: Vec<ActionRow>,
}

/// A rich embed.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Embed {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<EmbedAuthor>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<EmbedField>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<EmbedThumbnail>,
}

/// Author line at the top of an embed.
#[derive(Debug, Clone, Serialize)]
pub struct EmbedAuthor {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon_url: Option<String>,
}

/// One name/value field in an embed.
#[derive(Debug, Clone, Serialize)]
pub struct EmbedField {
    pub name: String,
    pub value: String,
    pub inline: bool,
}

/// Embed thumbnail image.
#[derive(Debug, Clone, Serialize)]
pub struct EmbedThumbnail {
    pub url: String,
}

/// A row of interactive components.
#[derive(Debug, Clone, Serialize)]
pub struct ActionRow {
    #[serde(rename = "type")]
    kind: u8,
    /// Components in this row.
    pub components: Vec<SelectMenu>,
}

impl ActionRow {
    /// Create a row holding the given components.
    #[must_use]
    pub fn new(components: Vec<SelectMenu>) -> Self {
        Self {
            kind: component_type::ACTION_ROW,
            components,
        }
    }
}

/// A string select menu.
#[derive(Debug, Clone, Serialize)]
pub struct SelectMenu {
    #[serde(rename = "type")]
    kind: u8,
    /// Identifier echoed back in component interactions.
    pub custom_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    pub options: Vec<SelectOption>,
}

impl SelectMenu {
    /// Create a string select menu.
    #[must_use]
    pub fn new(
        custom_id: impl Into<String>,
        placeholder: impl Into<String>,
        options: Vec<SelectOption>,
    ) -> Self {
        Self {
            kind: component_type::STRING_SELECT,
            custom_id: custom_id.into(),
            placeholder: Some(placeholder.into()),
            options,
        }
    }
}

/// One option in a select menu.
#[derive(Debug, Clone, Serialize)]
pub struct SelectOption {
    pub label: String,
    pub value: String,
}

// =============================================================================
// Application commands
// =============================================================================

/// A slash command definition.
#[derive(Debug, Clone, Serialize)]
pub struct ApplicationCommand {
    pub name: String,
    pub description: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<CommandOption>,
}

/// One option of a slash command.
#[derive(Debug, Clone, Serialize)]
pub struct CommandOption {
    #[serde(rename = "type")]
    kind: u8,
    pub name: String,
    pub description: String,
    pub required: bool,
}

impl CommandOption {
    /// A required or optional string option.
    #[must_use]
    pub fn string(name: impl Into<String>, description: impl Into<String>, required: bool) -> Self {
        Self {
            kind: command_option_type::STRING,
            name: name.into(),
            description: description.into(),
            required,
        }
    }
}

// =============================================================================
// Responses
// =============================================================================

/// A channel, as returned by the channel endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct Channel {
    /// Channel ID.
    pub id: String,
    /// Channel name, if visible.
    #[serde(default)]
    pub name: Option<String>,
}

/// A created message.
#[derive(Debug, Clone, Deserialize)]
pub struct Message {
    /// Message ID.
    pub id: String,
    /// Channel the message was posted to.
    pub channel_id: String,
}

// =============================================================================
// Interactions
// =============================================================================

/// An incoming interaction webhook payload.
#[derive(Debug, Clone, Deserialize)]
pub struct Interaction {
    /// Interaction type (see [`interaction_type`]).
    #[serde(rename = "type")]
    pub kind: u8,
    /// Type-specific payload.
    #[serde(default)]
    pub data: Option<InteractionData>,
}

/// Payload of a command or component interaction.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct InteractionData {
    /// Command name (command interactions).
    #[serde(default)]
    pub name: Option<String>,
    /// Component identifier (component interactions).
    #[serde(default)]
    pub custom_id: Option<String>,
    /// Selected values (select menu interactions).
    #[serde(default)]
    pub values: Vec<String>,
    /// Command options (command interactions).
    #[serde(default)]
    pub options: Vec<CommandOptionValue>,
}

impl InteractionData {
    /// Look up a string option by name.
    #[must_use]
    pub fn string_option(&self, name: &str) -> Option<&str> {
        self.options
            .iter()
            .find(|o| o.name == name)
            .and_then(|o| o.value.as_deref())
    }
}

/// A submitted command option value.
#[derive(Debug, Clone, Deserialize)]
pub struct CommandOptionValue {
    pub name: String,
    #[serde(default)]
    pub value: Option<String>,
}

/// Response to an interaction webhook.
#[derive(Debug, Clone, Serialize)]
pub struct InteractionResponse {
    #[serde(rename = "type")]
    kind: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<InteractionCallbackData>,
}

impl InteractionResponse {
    /// Answer a ping.
    #[must_use]
    pub const fn pong() -> Self {
        Self {
            kind: callback_type::PONG,
            data: None,
        }
    }

    /// Respond with a message.
    #[must_use]
    pub const fn message(data: InteractionCallbackData) -> Self {
        Self {
            kind: callback_type::CHANNEL_MESSAGE_WITH_SOURCE,
            data: Some(data),
        }
    }
}

/// Message payload of an interaction response.
#[derive(Debug, Clone, Default, Serialize)]
pub struct InteractionCallbackData {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub embeds: Vec<Embed>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub components: Vec<ActionRow>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flags: Option<u32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_row_serializes_numeric_type() {
        let row = ActionRow::new(vec![SelectMenu::new(
            "series_select",
            "Same series",
            vec![SelectOption {
                label: "S2".to_string(),
                value: "S2".to_string(),
            }],
        )]);
        let value = serde_json::to_value(&row).expect("serialize");
        assert_eq!(value["type"], 1);
        assert_eq!(value["components"][0]["type"], 3);
    }

    #[test]
    fn test_create_message_omits_empty_collections() {
        let message = CreateMessage::default();
        let value = serde_json::to_value(&message).expect("serialize");
        assert_eq!(value, serde_json::json!({}));
    }

    #[test]
    fn test_string_option_lookup() {
        let data: InteractionData = serde_json::from_str(
            r#"{"name": "search", "options": [{"name": "name", "value": "frieren"}]}"#,
        )
        .expect("deserialize");
        assert_eq!(data.string_option("name"), Some("frieren"));
        assert_eq!(data.string_option("missing"), None);
    }

    #[test]
    fn test_pong_shape() {
        let value = serde_json::to_value(InteractionResponse::pong()).expect("serialize");
        assert_eq!(value, serde_json::json!({"type": 1}));
    }
}
