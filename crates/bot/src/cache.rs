//! Durable marker cache.
//!
//! Persists the mapping from entry identity to the update marker that was
//! last notified on (or seeded at first-run bootstrap). The file is a
//! single JSON object: keys are page IDs, values are the raw marker
//! strings. Entries are never deleted; unbounded growth is an accepted
//! limitation of the design.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::warn;

use hibiki_core::PageId;

/// In-memory form of the persisted mapping.
pub type MarkerMap = BTreeMap<PageId, String>;

/// Errors that can occur when persisting the cache.
#[derive(Debug, Error)]
pub enum CacheError {
    /// Filesystem operation failed.
    #[error("cache I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization failed.
    #[error("cache encode error: {0}")]
    Encode(#[from] serde_json::Error),
}

/// File-backed store for the marker map.
///
/// The sync engine is the only writer. `load` is deliberately tolerant:
/// a missing or corrupt file reads as an empty map, which the engine
/// treats as "no prior state".
#[derive(Debug, Clone)]
pub struct CacheStore {
    path: PathBuf,
}

impl CacheStore {
    /// Create a store backed by the given file path.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the backing file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether the backing file has ever been written.
    ///
    /// This is the first-run signal: bootstrap is keyed to the file's
    /// existence, not to the map being empty.
    #[must_use]
    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Load the persisted mapping.
    ///
    /// A missing or unreadable file returns an empty map. A corrupt file
    /// is logged and also returns an empty map rather than failing the
    /// cycle.
    #[must_use]
    pub fn load(&self) -> MarkerMap {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(_) => return MarkerMap::new(),
        };

        match serde_json::from_slice(&bytes) {
            Ok(map) => map,
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "marker cache is corrupt, starting from empty");
                MarkerMap::new()
            }
        }
    }

    /// Persist the full mapping, overwriting whatever was there.
    ///
    /// Writes to a sibling temp file first and renames it over the
    /// target, so a crash mid-write cannot leave a half-written cache.
    ///
    /// # Errors
    ///
    /// Returns error if serialization or any filesystem operation fails.
    pub fn save(&self, map: &MarkerMap) -> Result<(), CacheError> {
        let bytes = serde_json::to_vec_pretty(map)?;

        let tmp = self.path.with_extension("tmp");
        fs::write(&tmp, &bytes)?;
        fs::rename(&tmp, &self.path)?;

        Ok(())
    }
}
