//! Newtype ID for type-safe catalog entry references.
//!
//! Notion page IDs are opaque strings (UUID-shaped, but the format is not
//! contractual). Wrapping them prevents accidentally mixing page IDs with
//! other string-typed values such as channel IDs or markers.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Opaque stable identity of one catalog entry (a Notion page).
///
/// Ordered and hashable so it can key the persisted marker map.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PageId(String);

impl PageId {
    /// Create a new ID from a string value.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the underlying string value.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The last 4 characters of the ID.
    ///
    /// Used as a disambiguating suffix in web slugs. Never used as a
    /// lookup key.
    #[must_use]
    pub fn short_suffix(&self) -> &str {
        let split = self
            .0
            .char_indices()
            .rev()
            .nth(3)
            .map_or(0, |(idx, _)| idx);
        self.0.get(split..).unwrap_or(&self.0)
    }
}

impl fmt::Display for PageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for PageId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<&str> for PageId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}
