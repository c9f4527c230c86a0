//! Bot configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `NOTION_TOKEN` - Notion integration token
//! - `NOTION_DATABASE_ID` - ID of the catalog database
//! - `DISCORD_TOKEN` - Discord bot token
//! - `DISCORD_APPLICATION_ID` - Discord application ID (command registration)
//! - `DISCORD_PUBLIC_KEY` - Application public key (interaction signatures)
//! - `WEB_BASE_URL` - Public site base URL for entry links
//!
//! ## Optional
//! - `DISCORD_CHANNEL_ID` - Notification channel; when unset, sync cycles
//!   are skipped (the process keeps serving `/interactions` and `/health`)
//! - `HOST` - Bind address (default: 0.0.0.0)
//! - `PORT` - Listen port (default: 8080; PaaS platforms inject this)
//! - `CACHE_FILE` - Marker cache path (default: cache.json)
//! - `SYNC_INTERVAL_SECS` - Sync period in seconds (default: 600)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;

use secrecy::SecretString;
use thiserror::Error;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Bot application configuration.
#[derive(Debug, Clone)]
pub struct BotConfig {
    /// IP address to bind the keep-alive server to.
    pub host: IpAddr,
    /// Port to listen on.
    pub port: u16,
    /// Public site base URL for entry links.
    pub web_base_url: String,
    /// Path of the persisted marker cache.
    pub cache_file: PathBuf,
    /// Period between sync cycles.
    pub sync_interval: Duration,
    /// Notion API configuration.
    pub notion: NotionConfig,
    /// Discord configuration.
    pub discord: DiscordConfig,
    /// Sentry DSN for error tracking.
    pub sentry_dsn: Option<String>,
    /// Sentry environment (e.g. "production").
    pub sentry_environment: Option<String>,
}

/// Notion API configuration.
///
/// Implements `Debug` manually to redact the token.
#[derive(Clone)]
pub struct NotionConfig {
    /// Integration token.
    pub token: SecretString,
    /// Catalog database ID.
    pub database_id: String,
}

impl std::fmt::Debug for NotionConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NotionConfig")
            .field("token", &"[REDACTED]")
            .field("database_id", &self.database_id)
            .finish()
    }
}

/// Discord configuration.
///
/// Implements `Debug` manually to redact the bot token.
#[derive(Clone)]
pub struct DiscordConfig {
    /// Bot token.
    pub bot_token: SecretString,
    /// Application ID, used for command registration.
    pub application_id: String,
    /// Hex-encoded application public key for interaction signatures.
    pub public_key: String,
    /// Notification channel ID. `None` disables sync cycles without
    /// taking the process down.
    pub channel_id: Option<String>,
}

impl std::fmt::Debug for DiscordConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DiscordConfig")
            .field("bot_token", &"[REDACTED]")
            .field("application_id", &self.application_id)
            .field("channel_id", &self.channel_id)
            .finish_non_exhaustive()
    }
}

impl BotConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let host = get_env_or_default("HOST", "0.0.0.0")
            .parse::<IpAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar("HOST".to_string(), e.to_string()))?;
        let port = get_env_or_default("PORT", "8080")
            .parse::<u16>()
            .map_err(|e| ConfigError::InvalidEnvVar("PORT".to_string(), e.to_string()))?;

        let sync_interval_secs = get_env_or_default("SYNC_INTERVAL_SECS", "600")
            .parse::<u64>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("SYNC_INTERVAL_SECS".to_string(), e.to_string())
            })?;

        Ok(Self {
            host,
            port,
            web_base_url: get_required_env("WEB_BASE_URL")?,
            cache_file: PathBuf::from(get_env_or_default("CACHE_FILE", "cache.json")),
            sync_interval: Duration::from_secs(sync_interval_secs),
            notion: NotionConfig::from_env()?,
            discord: DiscordConfig::from_env()?,
            sentry_dsn: get_optional_env("SENTRY_DSN"),
            sentry_environment: get_optional_env("SENTRY_ENVIRONMENT"),
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

impl NotionConfig {
    fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            token: get_required_secret("NOTION_TOKEN")?,
            database_id: get_required_env("NOTION_DATABASE_ID")?,
        })
    }
}

impl DiscordConfig {
    fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            bot_token: get_required_secret("DISCORD_TOKEN")?,
            application_id: get_required_env("DISCORD_APPLICATION_ID")?,
            public_key: get_required_env("DISCORD_PUBLIC_KEY")?,
            channel_id: get_optional_env("DISCORD_CHANNEL_ID"),
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get a required environment variable as a secret.
fn get_required_secret(key: &str) -> Result<SecretString, ConfigError> {
    let value = get_required_env(key)?;
    Ok(SecretString::from(value))
}

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}
