//! Message builders for catalog notifications and lookups.
//!
//! Factory functions producing the embed + component payloads the bot
//! sends, kept separate from the client so they can be asserted on
//! without any HTTP.

use crate::notion::Entry;
use crate::sync::Classification;

use super::types::{
    ActionRow, CreateMessage, Embed, EmbedAuthor, EmbedField, EmbedThumbnail,
    InteractionCallbackData, SelectMenu, SelectOption,
};

/// Accent color of catalog embeds.
const EMBED_COLOR: u32 = 0x00b0_f4;

/// Author line for entries never seen before.
const NEW_AUTHOR: &str = "🔥 New entry!";
const NEW_ICON_URL: &str = "https://cdn-icons-png.flaticon.com/512/2965/2965358.png";

/// Author line for genuine updates.
const UPDATED_AUTHOR: &str = "🔄 Updated!";
const UPDATED_ICON_URL: &str = "https://cdn-icons-png.flaticon.com/512/1680/1680899.png";

/// Component identifier of the series select menu.
pub const SERIES_SELECT_ID: &str = "series_select";

/// Discord caps select menus at 25 options.
const MAX_SELECT_OPTIONS: usize = 25;

/// Discord caps option labels at 100 characters.
const MAX_OPTION_LABEL: usize = 100;

/// Build the notification message for one change event.
///
/// One embed (title linking to the public site, progress/year fields,
/// cover thumbnail) plus a "same series" select menu when the entry
/// belongs to a series with other visible entries.
#[must_use]
pub fn build_entry_message(
    entry: &Entry,
    classification: Classification,
    web_link: &str,
    series: &[String],
) -> CreateMessage {
    let (author, icon) = match classification {
        Classification::New => (NEW_AUTHOR, NEW_ICON_URL),
        Classification::GenuineUpdate | Classification::IncidentalTouch => {
            (UPDATED_AUTHOR, UPDATED_ICON_URL)
        }
    };

    let mut embed = build_entry_embed(entry, web_link);
    embed.author = Some(EmbedAuthor {
        name: author.to_string(),
        icon_url: Some(icon.to_string()),
    });

    CreateMessage {
        content: None,
        embeds: vec![embed],
        components: series_menu(series).into_iter().collect(),
    }
}

/// Build the plain embed for one entry (no author line).
#[must_use]
pub fn build_entry_embed(entry: &Entry, web_link: &str) -> Embed {
    let progress = format!(
        "{}/{}",
        format_count(entry.subbed),
        format_count(entry.episodes)
    );

    let mut embed = Embed {
        title: Some(format!("🎬 {}", entry.display_title())),
        url: Some(web_link.to_string()),
        color: Some(EMBED_COLOR),
        fields: vec![
            EmbedField {
                name: "Progress".to_string(),
                value: progress,
                inline: true,
            },
            EmbedField {
                name: "Year".to_string(),
                value: format_count(entry.year),
                inline: true,
            },
        ],
        ..Embed::default()
    };

    if let Some(cover) = &entry.cover {
        embed.thumbnail = Some(EmbedThumbnail { url: cover.clone() });
    }

    embed
}

/// Build an interaction reply carrying an entry embed and its series menu.
#[must_use]
pub fn build_entry_reply(entry: &Entry, web_link: &str, series: &[String]) -> InteractionCallbackData {
    InteractionCallbackData {
        embeds: vec![build_entry_embed(entry, web_link)],
        components: series_menu(series).into_iter().collect(),
        ..InteractionCallbackData::default()
    }
}

/// Build an ephemeral "nothing found" interaction reply.
#[must_use]
pub fn build_no_results_reply(query: &str) -> InteractionCallbackData {
    InteractionCallbackData {
        content: Some(format!("No entry found matching \"{query}\".")),
        flags: Some(super::types::FLAG_EPHEMERAL),
        ..InteractionCallbackData::default()
    }
}

/// Build an ephemeral lookup-failure interaction reply.
#[must_use]
pub fn build_lookup_failed_reply() -> InteractionCallbackData {
    InteractionCallbackData {
        content: Some("Lookup failed, please try again later.".to_string()),
        flags: Some(super::types::FLAG_EPHEMERAL),
        ..InteractionCallbackData::default()
    }
}

/// The "same series" select menu, if there is anything to offer.
fn series_menu(series: &[String]) -> Option<ActionRow> {
    if series.is_empty() {
        return None;
    }

    let options: Vec<SelectOption> = series
        .iter()
        .take(MAX_SELECT_OPTIONS)
        .map(|title| SelectOption {
            label: truncate_chars(title, MAX_OPTION_LABEL),
            value: truncate_chars(title, MAX_OPTION_LABEL),
        })
        .collect();

    Some(ActionRow::new(vec![SelectMenu::new(
        SERIES_SELECT_ID,
        "Same series",
        options,
    )]))
}

/// Format an optional count, falling back to `?`.
fn format_count(value: Option<f64>) -> String {
    value.map_or_else(|| "?".to_string(), |v| format!("{v}"))
}

/// Char-boundary-safe truncation.
fn truncate_chars(value: &str, max: usize) -> String {
    if value.chars().count() <= max {
        value.to_string()
    } else {
        value.chars().take(max).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
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
            last_edited: Utc::now(),
        }
    }

    #[test]
    fn test_new_entry_author_line() {
        let message = build_entry_message(
            &entry(),
            Classification::New,
            "https://hibiki.moe/anime/vinland-saga-6789",
            &[],
        );
        let embed = message.embeds.first().expect("one embed");
        let author = embed.author.as_ref().expect("author line");
        assert!(author.name.contains("New"));
    }

    #[test]
    fn test_update_author_line() {
        let message = build_entry_message(&entry(), Classification::GenuineUpdate, "https://x", &[]);
        let embed = message.embeds.first().expect("one embed");
        let author = embed.author.as_ref().expect("author line");
        assert!(author.name.contains("Updated"));
    }

    #[test]
    fn test_progress_field() {
        let embed = build_entry_embed(&entry(), "https://x");
        let progress = embed.fields.first().expect("progress field");
        assert_eq!(progress.value, "8/24");
    }

    #[test]
    fn test_missing_counts_fall_back() {
        let mut sparse = entry();
        sparse.subbed = None;
        sparse.episodes = None;
        sparse.year = None;
        let embed = build_entry_embed(&sparse, "https://x");
        assert_eq!(embed.fields.first().expect("progress").value, "?/?");
        assert_eq!(embed.fields.get(1).expect("year").value, "?");
    }

    #[test]
    fn test_no_series_means_no_components() {
        let message = build_entry_message(&entry(), Classification::New, "https://x", &[]);
        assert!(message.components.is_empty());
    }

    #[test]
    fn test_series_menu_caps_options() {
        let series: Vec<String> = (0..40).map(|i| format!("Entry {i}")).collect();
        let message = build_entry_message(&entry(), Classification::New, "https://x", &series);
        let row = message.components.first().expect("one row");
        let menu = row.components.first().expect("one menu");
        assert_eq!(menu.options.len(), 25);
    }

    #[test]
    fn test_series_menu_truncates_labels() {
        let series = vec!["x".repeat(150)];
        let message = build_entry_message(&entry(), Classification::New, "https://x", &series);
        let row = message.components.first().expect("one row");
        let menu = row.components.first().expect("one menu");
        let option = menu.options.first().expect("one option");
        assert_eq!(option.label.chars().count(), 100);
    }

    #[test]
    fn test_no_results_reply_is_ephemeral() {
        let reply = build_no_results_reply("frieren");
        assert_eq!(reply.flags, Some(super::super::types::FLAG_EPHEMERAL));
        assert!(reply.content.as_deref().is_some_and(|c| c.contains("frieren")));
    }
}
