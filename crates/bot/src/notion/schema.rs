//! Typed schema over the catalog database.
//!
//! The database's columns are addressed here, and only here, by name.
//! [`Entry::from_page`] converts the dynamic property envelope into a fixed
//! struct once per record, so a missing or renamed column shows up as a
//! `None` in one place instead of a silent "N/A" scattered through the
//! rendering code.

use chrono::{DateTime, Utc};

use hibiki_core::{PageId, entry_slug};

use super::properties::extract;
use super::types::Page;

/// Entry title (title column).
pub const PROP_TITLE: &str = "Name";
/// Total episode count (number column).
pub const PROP_EPISODES: &str = "Episodes";
/// Subbed episode count (number column).
pub const PROP_SUBBED: &str = "Subbed";
/// Release year (number column).
pub const PROP_YEAR: &str = "Year";
/// Free-text series/grouping key (rich-text column).
pub const PROP_SERIES: &str = "Series";
/// Visibility flag (checkbox column).
pub const PROP_PUBLIC: &str = "Public";
/// Cover image (files column).
pub const PROP_COVER: &str = "Cover";
/// Maintainer-supplied update marker (rich-text column), distinct from the
/// store's own `last_edited_time`.
pub const PROP_MARKER: &str = "Updated";

/// One catalog entry with all fields this service reads.
#[derive(Debug, Clone)]
pub struct Entry {
    /// Stable page identity.
    pub id: PageId,
    /// Entry title.
    pub title: Option<String>,
    /// Total episode count.
    pub episodes: Option<f64>,
    /// Subbed episode count.
    pub subbed: Option<f64>,
    /// Release year.
    pub year: Option<f64>,
    /// Series grouping key. `Some("")` means the column is present but
    /// explicitly empty, which is still "no real series".
    pub series: Option<String>,
    /// Visibility flag; absent column reads as hidden.
    pub public: bool,
    /// Cover image URL.
    pub cover: Option<String>,
    /// The maintainer's update marker, verbatim.
    pub marker: Option<String>,
    /// Store-generated last-edit timestamp.
    pub last_edited: DateTime<Utc>,
}

impl Entry {
    /// Build an entry from a raw page envelope.
    #[must_use]
    pub fn from_page(page: &Page) -> Self {
        Self {
            id: page.id.clone(),
            title: extract(page, PROP_TITLE).as_text().map(str::to_string),
            episodes: extract(page, PROP_EPISODES).as_number(),
            subbed: extract(page, PROP_SUBBED).as_number(),
            year: extract(page, PROP_YEAR).as_number(),
            series: extract(page, PROP_SERIES).as_text().map(str::to_string),
            public: extract(page, PROP_PUBLIC).as_flag().unwrap_or(false),
            cover: extract(page, PROP_COVER).as_link().map(str::to_string),
            marker: extract(page, PROP_MARKER).as_text().map(str::to_string),
            last_edited: page.last_edited_time,
        }
    }

    /// Title with a fallback for untitled entries.
    #[must_use]
    pub fn display_title(&self) -> &str {
        self.title.as_deref().unwrap_or("Untitled")
    }

    /// The series key, if the entry belongs to a real series.
    #[must_use]
    pub fn series_key(&self) -> Option<&str> {
        self.series.as_deref().filter(|s| !s.is_empty())
    }

    /// The update marker, if the maintainer has set one.
    #[must_use]
    pub fn marker(&self) -> Option<&str> {
        self.marker.as_deref().filter(|m| !m.is_empty())
    }

    /// Public site URL for this entry.
    #[must_use]
    pub fn web_link(&self, base_url: &str) -> String {
        format!(
            "{}/anime/{}",
            base_url.trim_end_matches('/'),
            entry_slug(self.display_title(), &self.id)
        )
    }
}
