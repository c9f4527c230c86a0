//! Web-slug derivation for catalog entries.
//!
//! The public site addresses an entry as `/anime/{slug}-{suffix}` where the
//! slug is derived from the entry title and the suffix is the last 4
//! characters of its page ID. The slug is a human-facing URL component
//! only; it is never used as a lookup key.

use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

use crate::types::PageId;

/// Turn a title into a URL slug.
///
/// NFKD-normalizes the input, strips combining marks and any remaining
/// non-ASCII, lowercases, drops non-word characters and collapses
/// whitespace/hyphen runs into single hyphens.
#[must_use]
pub fn slugify(title: &str) -> String {
    let ascii: String = title
        .nfkd()
        .filter(|c| !is_combining_mark(*c))
        .filter(char::is_ascii)
        .collect();

    let mut slug = String::with_capacity(ascii.len());
    let mut pending_hyphen = false;
    for c in ascii.chars() {
        if c.is_ascii_alphanumeric() || c == '_' {
            if pending_hyphen && !slug.is_empty() {
                slug.push('-');
            }
            pending_hyphen = false;
            slug.push(c.to_ascii_lowercase());
        } else if c.is_ascii_whitespace() || c == '-' {
            pending_hyphen = true;
        }
        // Anything else (punctuation, symbols) is dropped entirely.
    }

    slug
}

/// Full slug for an entry: `"{slugify(title)}-{last 4 of id}"`.
#[must_use]
pub fn entry_slug(title: &str, id: &PageId) -> String {
    format!("{}-{}", slugify(title), id.short_suffix())
}
