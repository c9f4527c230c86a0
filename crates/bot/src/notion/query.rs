//! Typed request bodies for the database query endpoint.
//!
//! Covers the filter grammar this service uses: conjunctions/disjunctions
//! over per-property predicates (text equals/contains, checkbox equals)
//! plus property sorts.

use serde::Serialize;

/// Body of a database query request.
#[derive(Debug, Clone, Default, Serialize)]
pub struct QueryRequest {
    /// Filter expression.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filter: Option<Filter>,
    /// Sort directives.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub sorts: Vec<Sort>,
    /// Page size cap (the server enforces a maximum of 100).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_size: Option<u32>,
    /// Continuation cursor from a previous response.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_cursor: Option<String>,
}

/// A filter expression.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum Filter {
    /// All sub-filters must match.
    And { and: Vec<Filter> },
    /// Any sub-filter must match.
    Or { or: Vec<Filter> },
    /// A single property predicate.
    Condition(PropertyCondition),
}

impl Filter {
    /// Conjunction of filters.
    #[must_use]
    pub fn and(filters: Vec<Self>) -> Self {
        Self::And { and: filters }
    }

    /// Disjunction of filters.
    #[must_use]
    pub fn or(filters: Vec<Self>) -> Self {
        Self::Or { or: filters }
    }

    /// Title column contains a substring.
    #[must_use]
    pub fn title_contains(property: &str, value: &str) -> Self {
        Self::Condition(PropertyCondition {
            property: property.to_string(),
            predicate: Predicate::Title(TextPredicate::contains(value)),
        })
    }

    /// Title column equals a value exactly.
    #[must_use]
    pub fn title_equals(property: &str, value: &str) -> Self {
        Self::Condition(PropertyCondition {
            property: property.to_string(),
            predicate: Predicate::Title(TextPredicate::equals(value)),
        })
    }

    /// Rich-text column equals a value exactly.
    #[must_use]
    pub fn rich_text_equals(property: &str, value: &str) -> Self {
        Self::Condition(PropertyCondition {
            property: property.to_string(),
            predicate: Predicate::RichText(TextPredicate::equals(value)),
        })
    }

    /// Rich-text column contains a substring.
    #[must_use]
    pub fn rich_text_contains(property: &str, value: &str) -> Self {
        Self::Condition(PropertyCondition {
            property: property.to_string(),
            predicate: Predicate::RichText(TextPredicate::contains(value)),
        })
    }

    /// Checkbox column equals a value.
    #[must_use]
    pub fn checkbox_equals(property: &str, value: bool) -> Self {
        Self::Condition(PropertyCondition {
            property: property.to_string(),
            predicate: Predicate::Checkbox(CheckboxPredicate { equals: value }),
        })
    }
}

/// A predicate on one named property.
#[derive(Debug, Clone, Serialize)]
pub struct PropertyCondition {
    property: String,
    #[serde(flatten)]
    predicate: Predicate,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
enum Predicate {
    Title(TextPredicate),
    RichText(TextPredicate),
    Checkbox(CheckboxPredicate),
}

#[derive(Debug, Clone, Default, Serialize)]
struct TextPredicate {
    #[serde(skip_serializing_if = "Option::is_none")]
    equals: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    contains: Option<String>,
}

impl TextPredicate {
    fn equals(value: &str) -> Self {
        Self {
            equals: Some(value.to_string()),
            ..Self::default()
        }
    }

    fn contains(value: &str) -> Self {
        Self {
            contains: Some(value.to_string()),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Serialize)]
struct CheckboxPredicate {
    equals: bool,
}

/// A sort directive on one property.
#[derive(Debug, Clone, Serialize)]
pub struct Sort {
    property: String,
    direction: SortDirection,
}

impl Sort {
    /// Sort ascending by a property.
    #[must_use]
    pub fn ascending(property: &str) -> Self {
        Self {
            property: property.to_string(),
            direction: SortDirection::Ascending,
        }
    }

    /// Sort descending by a property.
    #[must_use]
    pub fn descending(property: &str) -> Self {
        Self {
            property: property.to_string(),
            direction: SortDirection::Descending,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "snake_case")]
enum SortDirection {
    Ascending,
    Descending,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_checkbox_filter_shape() {
        let filter = Filter::checkbox_equals("Public", true);
        let value = serde_json::to_value(&filter).expect("serialize");
        assert_eq!(
            value,
            json!({"property": "Public", "checkbox": {"equals": true}})
        );
    }

    #[test]
    fn test_and_filter_shape() {
        let filter = Filter::and(vec![
            Filter::rich_text_equals("Series", "Gundam"),
            Filter::checkbox_equals("Public", true),
        ]);
        let value = serde_json::to_value(&filter).expect("serialize");
        assert_eq!(
            value,
            json!({"and": [
                {"property": "Series", "rich_text": {"equals": "Gundam"}},
                {"property": "Public", "checkbox": {"equals": true}}
            ]})
        );
    }

    #[test]
    fn test_request_omits_empty_fields() {
        let request = QueryRequest {
            page_size: Some(100),
            ..QueryRequest::default()
        };
        let value = serde_json::to_value(&request).expect("serialize");
        assert_eq!(value, json!({"page_size": 100}));
    }

    #[test]
    fn test_sort_shape() {
        let value = serde_json::to_value(Sort::ascending("Name")).expect("serialize");
        assert_eq!(
            value,
            json!({"property": "Name", "direction": "ascending"})
        );
    }
}
