//! Unified error handling for the bot.

use thiserror::Error;

use crate::cache::CacheError;
use crate::discord::DiscordError;
use crate::notion::NotionError;

/// Application-level error type for the sync cycle.
///
/// There is no user-visible error surface for the background cycle; these
/// bubble up to the scheduler, which logs them and retries on the next
/// tick.
#[derive(Debug, Error)]
pub enum AppError {
    /// Notion API operation failed.
    #[error("Notion error: {0}")]
    Notion(#[from] NotionError),

    /// Discord API operation failed.
    #[error("Discord error: {0}")]
    Discord(#[from] DiscordError),

    /// Cache persistence failed.
    #[error("Cache error: {0}")]
    Cache(#[from] CacheError),
}
