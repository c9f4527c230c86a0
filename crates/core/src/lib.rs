//! Hibiki Core - Shared types library.
//!
//! This crate provides common types used across Hibiki components:
//! - `bot` - The watcher service (Notion polling + Discord notifications)
//! - `integration-tests` - HTTP-level test harness
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no HTTP
//! clients. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs
//! - [`slug`] - Web-slug derivation for catalog entries

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod slug;
pub mod types;

pub use slug::{entry_slug, slugify};
pub use types::*;
