//! Property extraction: typed-field envelopes down to plain values.
//!
//! Downstream equality checks depend on distinguishing "no data" from an
//! explicit empty string (e.g. "is the series name real"), so extraction
//! returns a sentinel-bearing [`FieldValue`] instead of stringly defaults.

use super::types::{Page, PropertyValue};

/// A plain value extracted from a typed property envelope.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    /// Text-like value (title, rich text, select name, date string).
    Text(String),
    /// Numeric value.
    Number(f64),
    /// Boolean flag.
    Flag(bool),
    /// URL-like value (url property, file attachment).
    Link(String),
    /// Absent property, empty payload, or unrecognized discriminator.
    NotAvailable,
}

impl FieldValue {
    /// Whether the field carried any data at all.
    #[must_use]
    pub const fn is_available(&self) -> bool {
        !matches!(self, Self::NotAvailable)
    }

    /// Text payload, if this is a text value.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Numeric payload, if this is a number.
    #[must_use]
    pub const fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Boolean payload, if this is a flag.
    #[must_use]
    pub const fn as_flag(&self) -> Option<bool> {
        match self {
            Self::Flag(b) => Some(*b),
            _ => None,
        }
    }

    /// Link payload, if this is a URL-like value.
    #[must_use]
    pub fn as_link(&self) -> Option<&str> {
        match self {
            Self::Link(s) => Some(s),
            _ => None,
        }
    }
}

/// Extract a named property from a page as a plain value.
///
/// Pure and total: every recognized discriminator has a defined rule, and
/// an absent property, empty payload, or unknown discriminator maps to
/// [`FieldValue::NotAvailable`] rather than failing.
#[must_use]
pub fn extract(page: &Page, name: &str) -> FieldValue {
    page.property(name).map_or(FieldValue::NotAvailable, extract_value)
}

fn extract_value(value: &PropertyValue) -> FieldValue {
    match value {
        PropertyValue::Title { title } => first_fragment(title),
        PropertyValue::RichText { rich_text } => first_fragment(rich_text),
        PropertyValue::Number { number } => {
            number.map_or(FieldValue::NotAvailable, FieldValue::Number)
        }
        PropertyValue::Select { select } => select
            .as_ref()
            .map_or(FieldValue::NotAvailable, |s| FieldValue::Text(s.name.clone())),
        PropertyValue::Status { status } => status
            .as_ref()
            .map_or(FieldValue::NotAvailable, |s| FieldValue::Text(s.name.clone())),
        PropertyValue::MultiSelect { multi_select } => {
            if multi_select.is_empty() {
                FieldValue::NotAvailable
            } else {
                let names: Vec<&str> = multi_select.iter().map(|s| s.name.as_str()).collect();
                FieldValue::Text(names.join(", "))
            }
        }
        PropertyValue::Url { url } => url
            .clone()
            .map_or(FieldValue::NotAvailable, FieldValue::Link),
        PropertyValue::Checkbox { checkbox } => FieldValue::Flag(*checkbox),
        PropertyValue::Files { files } => files
            .first()
            .and_then(|f| f.url())
            .map_or(FieldValue::NotAvailable, |u| FieldValue::Link(u.to_string())),
        PropertyValue::Date { date } => date
            .as_ref()
            .and_then(|d| d.start.clone())
            .map_or(FieldValue::NotAvailable, FieldValue::Text),
        PropertyValue::Unknown => FieldValue::NotAvailable,
    }
}

fn first_fragment(fragments: &[super::types::RichText]) -> FieldValue {
    fragments
        .first()
        .map_or(FieldValue::NotAvailable, |f| {
            FieldValue::Text(f.plain_text.clone())
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(properties_json: &str) -> Page {
        let json = format!(
            r#"{{"id": "p1", "last_edited_time": "2024-01-01T00:00:00Z", "properties": {properties_json}}}"#
        );
        serde_json::from_str(&json).expect("valid page json")
    }

    #[test]
    fn test_absent_property_is_not_available() {
        let page = page("{}");
        assert_eq!(extract(&page, "Name"), FieldValue::NotAvailable);
    }

    #[test]
    fn test_title_first_fragment() {
        let page = page(
            r#"{"Name": {"type": "title", "title": [{"plain_text": "Frieren"}, {"plain_text": " S2"}]}}"#,
        );
        assert_eq!(
            extract(&page, "Name"),
            FieldValue::Text("Frieren".to_string())
        );
    }

    #[test]
    fn test_empty_title_is_not_available() {
        let page = page(r#"{"Name": {"type": "title", "title": []}}"#);
        assert_eq!(extract(&page, "Name"), FieldValue::NotAvailable);
    }

    #[test]
    fn test_empty_string_fragment_is_present() {
        // An explicit empty fragment is data, not absence.
        let page = page(r#"{"Series": {"type": "rich_text", "rich_text": [{"plain_text": ""}]}}"#);
        assert_eq!(extract(&page, "Series"), FieldValue::Text(String::new()));
    }

    #[test]
    fn test_number_and_null_number() {
        let page_num = page(r#"{"Episodes": {"type": "number", "number": 24}}"#);
        assert_eq!(extract(&page_num, "Episodes"), FieldValue::Number(24.0));

        let page_null = page(r#"{"Episodes": {"type": "number", "number": null}}"#);
        assert_eq!(extract(&page_null, "Episodes"), FieldValue::NotAvailable);
    }

    #[test]
    fn test_checkbox() {
        let page = page(r#"{"Public": {"type": "checkbox", "checkbox": false}}"#);
        assert_eq!(extract(&page, "Public"), FieldValue::Flag(false));
    }

    #[test]
    fn test_files_first_url() {
        let page = page(
            r#"{"Cover": {"type": "files", "files": [{"external": {"url": "https://cdn.example/c.jpg"}}]}}"#,
        );
        assert_eq!(
            extract(&page, "Cover"),
            FieldValue::Link("https://cdn.example/c.jpg".to_string())
        );
    }

    #[test]
    fn test_unknown_discriminator_is_not_available() {
        let page = page(r#"{"Calc": {"type": "formula", "formula": {"number": 1}}}"#);
        assert_eq!(extract(&page, "Calc"), FieldValue::NotAvailable);
    }

    #[test]
    fn test_select_and_multi_select() {
        let page_select = page(r#"{"Season": {"type": "select", "select": {"name": "Winter"}}}"#);
        assert_eq!(
            extract(&page_select, "Season"),
            FieldValue::Text("Winter".to_string())
        );

        let page_multi = page(
            r#"{"Tags": {"type": "multi_select", "multi_select": [{"name": "Action"}, {"name": "Drama"}]}}"#,
        );
        assert_eq!(
            extract(&page_multi, "Tags"),
            FieldValue::Text("Action, Drama".to_string())
        );
    }

    #[test]
    fn test_date_start() {
        let page = page(r#"{"Aired": {"type": "date", "date": {"start": "2024-04-01"}}}"#);
        assert_eq!(
            extract(&page, "Aired"),
            FieldValue::Text("2024-04-01".to_string())
        );
    }
}
