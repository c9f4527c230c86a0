//! Wire types for the Notion database query endpoint.
//!
//! Only the subset of the envelope this service reads is modeled. Every
//! property value arrives wrapped with a `type` discriminator; unrecognized
//! discriminators deserialize to [`PropertyValue::Unknown`] instead of
//! failing, so a schema change in the remote database can never break a
//! sync cycle.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::Deserialize;

use hibiki_core::PageId;

/// One page of results from a database query.
#[derive(Debug, Clone, Deserialize)]
pub struct QueryResponse {
    /// Record envelopes in this page.
    #[serde(default)]
    pub results: Vec<Page>,
    /// Whether more pages follow.
    #[serde(default)]
    pub has_more: bool,
    /// Continuation token, echoed back as `start_cursor`.
    #[serde(default)]
    pub next_cursor: Option<String>,
}

/// A page (one catalog entry) as returned by the query endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct Page {
    /// Opaque stable page identity.
    pub id: PageId,
    /// Store-generated timestamp of the last edit, any field.
    pub last_edited_time: DateTime<Utc>,
    /// Named typed fields.
    #[serde(default)]
    pub properties: HashMap<String, PropertyValue>,
}

impl Page {
    /// Look up a property by name.
    #[must_use]
    pub fn property(&self, name: &str) -> Option<&PropertyValue> {
        self.properties.get(name)
    }
}

/// The store's typed-field envelope.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PropertyValue {
    /// Title property (rich-text fragments).
    Title {
        #[serde(default)]
        title: Vec<RichText>,
    },
    /// Plain rich-text property.
    RichText {
        #[serde(default)]
        rich_text: Vec<RichText>,
    },
    /// Numeric property.
    Number { number: Option<f64> },
    /// Single-select property.
    Select { select: Option<SelectValue> },
    /// Multi-select property.
    MultiSelect {
        #[serde(default)]
        multi_select: Vec<SelectValue>,
    },
    /// Status property (same payload shape as select).
    Status { status: Option<SelectValue> },
    /// URL property.
    Url { url: Option<String> },
    /// Checkbox property.
    Checkbox { checkbox: bool },
    /// File attachments (hosted or external).
    Files {
        #[serde(default)]
        files: Vec<FileRef>,
    },
    /// Date property.
    Date { date: Option<DateValue> },
    /// Any discriminator this service does not recognize.
    #[serde(other)]
    Unknown,
}

/// One rich-text fragment.
#[derive(Debug, Clone, Deserialize)]
pub struct RichText {
    /// Rendered plain text of the fragment.
    #[serde(default)]
    pub plain_text: String,
}

/// A select/multi-select/status option.
#[derive(Debug, Clone, Deserialize)]
pub struct SelectValue {
    /// Option name.
    pub name: String,
}

/// A file attachment, either hosted by the store or external.
#[derive(Debug, Clone, Deserialize)]
pub struct FileRef {
    /// Store-hosted file.
    #[serde(default)]
    pub file: Option<FileUrl>,
    /// Externally hosted file.
    #[serde(default)]
    pub external: Option<FileUrl>,
}

impl FileRef {
    /// The attachment URL, wherever it is hosted.
    #[must_use]
    pub fn url(&self) -> Option<&str> {
        self.file
            .as_ref()
            .or(self.external.as_ref())
            .map(|f| f.url.as_str())
    }
}

/// URL payload of a file attachment.
#[derive(Debug, Clone, Deserialize)]
pub struct FileUrl {
    pub url: String,
}

/// A date payload.
#[derive(Debug, Clone, Deserialize)]
pub struct DateValue {
    /// Start of the date or date-time range.
    pub start: Option<String>,
}
