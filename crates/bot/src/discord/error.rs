//! Discord-related errors.

use thiserror::Error;

/// Errors that can occur when interacting with Discord.
#[derive(Debug, Error)]
pub enum DiscordError {
    /// HTTP request failed.
    #[error("Discord request failed: {0}")]
    Request(String),

    /// Failed to parse a response.
    #[error("Discord response error: {0}")]
    Response(String),

    /// Discord API returned an error status.
    #[error("Discord API error: {status} - {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Response body (truncated).
        message: String,
    },

    /// Invalid interaction signature.
    #[error("Invalid Discord signature: {0}")]
    InvalidSignature(String),

    /// Configuration error.
    #[error("Discord configuration error: {0}")]
    Config(String),
}
