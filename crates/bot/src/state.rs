//! Application state shared across axum handlers.

use std::sync::Arc;

use crate::config::BotConfig;
use crate::discord::DiscordClient;
use crate::notion::NotionClient;

/// Application state shared across all handlers.
///
/// Cheap to clone; all clones share the same inner state.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: BotConfig,
    notion: NotionClient,
    discord: DiscordClient,
}

impl AppState {
    /// Build the shared state.
    #[must_use]
    pub fn new(config: BotConfig, notion: NotionClient, discord: DiscordClient) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                config,
                notion,
                discord,
            }),
        }
    }

    /// The loaded configuration.
    #[must_use]
    pub fn config(&self) -> &BotConfig {
        &self.inner.config
    }

    /// The Notion client.
    #[must_use]
    pub fn notion(&self) -> &NotionClient {
        &self.inner.notion
    }

    /// The Discord client.
    #[must_use]
    pub fn discord(&self) -> &DiscordClient {
        &self.inner.discord
    }
}
