// crates/roadwatch-core/src/runtime/store.rs
// ============================================================================
// Module: Roadwatch State Store
// Description: JSON persistence for the pending queue and matches store.
// Purpose: Full-file overwrite durability with honest malformed-state errors.
// Dependencies: crate::core, serde_json
// ============================================================================

//! ## Overview
//! Persistence is the sole durability mechanism: both collections are read
//! once at the start of a run and written at most once each afterwards.
//! Writes go to a temporary sibling file and are renamed into place so
//! readers never observe a partially written file under normal operation.
//! A missing file loads as the empty collection; malformed JSON is reported
//! as an error and the caller decides whether to fall back to empty state.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs;
use std::path::Path;
use std::path::PathBuf;

use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::core::MatchesStore;
use crate::core::PendingQueue;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// State persistence errors.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Reading or writing a state file failed.
    #[error("state io failure at {path}: {message}")]
    Io {
        /// Path of the affected state file.
        path: PathBuf,
        /// Underlying failure description.
        message: String,
    },
    /// A state file exists but does not parse as the expected collection.
    #[error("malformed state at {path}: {message}")]
    Malformed {
        /// Path of the affected state file.
        path: PathBuf,
        /// Underlying parse failure description.
        message: String,
    },
}

// ============================================================================
// SECTION: State Store
// ============================================================================

/// File-backed store for the pending queue and the matches store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateStore {
    /// Path of the pending queue JSON file.
    pending_path: PathBuf,
    /// Path of the matches store JSON file.
    matches_path: PathBuf,
}

impl StateStore {
    /// Creates a store over the two state file paths.
    #[must_use]
    pub fn new(pending_path: impl Into<PathBuf>, matches_path: impl Into<PathBuf>) -> Self {
        Self {
            pending_path: pending_path.into(),
            matches_path: matches_path.into(),
        }
    }

    /// Returns the pending queue file path.
    #[must_use]
    pub fn pending_path(&self) -> &Path {
        &self.pending_path
    }

    /// Returns the matches store file path.
    #[must_use]
    pub fn matches_path(&self) -> &Path {
        &self.matches_path
    }

    /// Loads the pending queue; a missing file yields the empty queue.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the file is unreadable or malformed.
    pub fn load_pending(&self) -> Result<PendingQueue, StoreError> {
        load_collection(&self.pending_path)
    }

    /// Loads the matches store; a missing file yields the empty store.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the file is unreadable or malformed.
    pub fn load_matches(&self) -> Result<MatchesStore, StoreError> {
        load_collection(&self.matches_path)
    }

    /// Persists the pending queue as human-indented JSON.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Io`] when the file cannot be written; the
    /// in-memory queue remains authoritative in that case.
    pub fn save_pending(&self, pending: &PendingQueue) -> Result<(), StoreError> {
        save_collection(&self.pending_path, pending)
    }

    /// Persists the matches store as human-indented JSON.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Io`] when the file cannot be written; the
    /// in-memory store remains authoritative in that case.
    pub fn save_matches(&self, matches: &MatchesStore) -> Result<(), StoreError> {
        save_collection(&self.matches_path, matches)
    }
}

// ============================================================================
// SECTION: File Helpers
// ============================================================================

/// Loads one JSON collection, defaulting when the file does not exist.
fn load_collection<T>(path: &Path) -> Result<T, StoreError>
where
    T: DeserializeOwned + Default,
{
    if !path.exists() {
        return Ok(T::default());
    }
    let bytes = fs::read(path).map_err(|err| StoreError::Io {
        path: path.to_path_buf(),
        message: err.to_string(),
    })?;
    serde_json::from_slice(&bytes).map_err(|err| StoreError::Malformed {
        path: path.to_path_buf(),
        message: err.to_string(),
    })
}

/// Writes one JSON collection via a temporary sibling file and rename.
fn save_collection<T>(path: &Path, value: &T) -> Result<(), StoreError>
where
    T: Serialize,
{
    let io_error = |err: std::io::Error| StoreError::Io {
        path: path.to_path_buf(),
        message: err.to_string(),
    };
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).map_err(io_error)?;
    }
    let bytes = serde_json::to_vec_pretty(value).map_err(|err| StoreError::Io {
        path: path.to_path_buf(),
        message: err.to_string(),
    })?;
    let temp_path = temp_sibling(path);
    fs::write(&temp_path, bytes).map_err(io_error)?;
    fs::rename(&temp_path, path).map_err(io_error)
}

/// Returns the temporary sibling path used for atomic overwrites.
fn temp_sibling(path: &Path) -> PathBuf {
    let mut name = path.file_name().map_or_else(
        || std::ffi::OsString::from("state"),
        std::ffi::OsStr::to_os_string,
    );
    name.push(".tmp");
    path.with_file_name(name)
}
