//! Discord REST API client.
//!
//! Provides the small write surface the bot needs: resolving the
//! notification channel, posting messages, and registering slash
//! commands. Interactions arrive over the webhook endpoint instead of a
//! gateway connection, so no session management is required.

use std::sync::Arc;

use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use tracing::{debug, instrument};

use super::error::DiscordError;
use super::types::{ApplicationCommand, Channel, CreateMessage, Message};

/// Discord REST API base URL.
const DISCORD_API_BASE: &str = "https://discord.com/api/v10";

/// How much of an error body to keep in error messages.
const ERROR_BODY_LIMIT: usize = 500;

/// Discord API client for channel lookups, messages, and command
/// registration.
#[derive(Clone)]
pub struct DiscordClient {
    inner: Arc<DiscordClientInner>,
}

struct DiscordClientInner {
    client: Client,
    bot_token: SecretString,
    application_id: String,
    base_url: String,
}

impl std::fmt::Debug for DiscordClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DiscordClient")
            .field("bot_token", &"[REDACTED]")
            .field("application_id", &self.inner.application_id)
            .finish_non_exhaustive()
    }
}

impl DiscordClient {
    /// Create a new Discord client.
    #[must_use]
    pub fn new(bot_token: SecretString, application_id: impl Into<String>) -> Self {
        Self::with_base_url(bot_token, application_id, DISCORD_API_BASE)
    }

    /// Create a client against a non-default base URL (tests, proxies).
    #[must_use]
    pub fn with_base_url(
        bot_token: SecretString,
        application_id: impl Into<String>,
        base_url: impl Into<String>,
    ) -> Self {
        Self {
            inner: Arc::new(DiscordClientInner {
                client: Client::new(),
                bot_token,
                application_id: application_id.into(),
                base_url: base_url.into().trim_end_matches('/').to_string(),
            }),
        }
    }

    /// Resolve a channel by ID.
    ///
    /// Used once per sync cycle to confirm the notification destination
    /// exists and is visible to the bot before anything is dispatched.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or the channel is not visible.
    #[instrument(skip(self), fields(channel = %channel_id))]
    pub async fn get_channel(&self, channel_id: &str) -> Result<Channel, DiscordError> {
        let url = format!("{}/channels/{channel_id}", self.inner.base_url);

        let response = self
            .inner
            .client
            .get(&url)
            .header("Authorization", self.auth_header())
            .send()
            .await
            .map_err(|e| DiscordError::Request(e.to_string()))?;

        let response = check_status(response).await?;

        response
            .json::<Channel>()
            .await
            .map_err(|e| DiscordError::Response(e.to_string()))
    }

    /// Post a message to a channel.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or Discord rejects the message.
    #[instrument(skip(self, message), fields(channel = %channel_id))]
    pub async fn create_message(
        &self,
        channel_id: &str,
        message: &CreateMessage,
    ) -> Result<Message, DiscordError> {
        let url = format!("{}/channels/{channel_id}/messages", self.inner.base_url);

        let response = self
            .inner
            .client
            .post(&url)
            .header("Authorization", self.auth_header())
            .json(message)
            .send()
            .await
            .map_err(|e| DiscordError::Request(e.to_string()))?;

        let response = check_status(response).await?;

        let created: Message = response
            .json()
            .await
            .map_err(|e| DiscordError::Response(e.to_string()))?;

        debug!(message_id = %created.id, "message posted to Discord");

        Ok(created)
    }

    /// Register the application's global slash commands.
    ///
    /// Overwrites the full command set (Discord's bulk-overwrite
    /// endpoint). Safe to call on every startup.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails.
    #[instrument(skip(self, commands))]
    pub async fn register_commands(
        &self,
        commands: &[ApplicationCommand],
    ) -> Result<(), DiscordError> {
        let url = format!(
            "{}/applications/{}/commands",
            self.inner.base_url, self.inner.application_id
        );

        let response = self
            .inner
            .client
            .put(&url)
            .header("Authorization", self.auth_header())
            .json(commands)
            .send()
            .await
            .map_err(|e| DiscordError::Request(e.to_string()))?;

        check_status(response).await?;

        debug!(count = commands.len(), "registered application commands");

        Ok(())
    }

    fn auth_header(&self) -> String {
        format!("Bot {}", self.inner.bot_token.expose_secret())
    }
}

/// Map a non-success status to `DiscordError::Api` with a truncated body.
async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, DiscordError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body: String = response
        .text()
        .await
        .unwrap_or_default()
        .chars()
        .take(ERROR_BODY_LIMIT)
        .collect();

    Err(DiscordError::Api {
        status: status.as_u16(),
        message: body,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_redacts_token() {
        let client = DiscordClient::new(SecretString::from("bot-token-xyz"), "app-1");
        let debug = format!("{client:?}");
        assert!(!debug.contains("bot-token-xyz"));
        assert!(debug.contains("app-1"));
    }
}
