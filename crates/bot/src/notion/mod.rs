//! Notion integration: the remote catalog store.
//!
//! This module provides:
//! - [`NotionClient`] for querying the database (with exhaustive
//!   cursor-following pagination)
//! - Wire types for the typed-field envelope
//! - Property extraction into plain values with a "not available" sentinel
//! - The typed catalog schema ([`Entry`])
//! - A typed filter/sort request builder

mod client;
mod error;
mod properties;
mod query;
mod schema;
mod types;

pub use client::{MAX_PAGE_SIZE, NotionClient};
pub use error::NotionError;
pub use properties::{FieldValue, extract};
pub use query::{Filter, QueryRequest, Sort};
pub use schema::{
    Entry, PROP_COVER, PROP_EPISODES, PROP_MARKER, PROP_PUBLIC, PROP_SERIES, PROP_SUBBED,
    PROP_TITLE, PROP_YEAR,
};
pub use types::{Page, PropertyValue, QueryResponse, RichText};
