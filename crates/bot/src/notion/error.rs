//! Notion-related errors.

use thiserror::Error;

/// Errors that can occur when querying the Notion API.
#[derive(Debug, Error)]
pub enum NotionError {
    /// HTTP request failed.
    #[error("Notion HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// API returned a non-success response.
    #[error("Notion API error: {status} - {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Response body (truncated).
        message: String,
    },

    /// Rate limited by Notion.
    #[error("Notion rate limited, retry after {0} seconds")]
    RateLimited(u64),

    /// Failed to parse a response body.
    #[error("Notion response parse error: {0}")]
    Parse(String),

    /// Configuration error (e.g. malformed token).
    #[error("Notion configuration error: {0}")]
    Config(String),
}
