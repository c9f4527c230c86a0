//! Discord integration: notifications and interactive lookups.
//!
//! This module provides:
//! - [`DiscordClient`] for channel lookups, message posting, and slash
//!   command registration (REST only, no gateway)
//! - Wire types for embeds, components, and interactions
//! - Message builders for catalog notifications
//! - The signed interaction webhook handler
//!
//! # Flow
//!
//! 1. The sync engine detects a genuine catalog change
//! 2. A message is built (entry embed + "same series" select menu) and
//!    posted to the configured channel
//! 3. Users run `/search` or pick a series entry; Discord POSTs the
//!    interaction to `/interactions`, signature-verified, answered inline

mod client;
mod error;
mod interactions;
mod messages;
mod types;

pub use client::DiscordClient;
pub use error::DiscordError;
pub use interactions::{
    SEARCH_COMMAND, application_commands, handle_interaction, verify_signature,
};
pub use messages::{
    SERIES_SELECT_ID, build_entry_embed, build_entry_message, build_entry_reply,
    build_lookup_failed_reply, build_no_results_reply,
};
pub use types::{
    ActionRow, ApplicationCommand, Channel, CommandOption, CreateMessage, Embed, EmbedAuthor,
    EmbedField, EmbedThumbnail, FLAG_EPHEMERAL, Interaction, InteractionCallbackData,
    InteractionData, InteractionResponse, Message, SelectMenu, SelectOption, callback_type,
    command_option_type, component_type, interaction_type,
};
