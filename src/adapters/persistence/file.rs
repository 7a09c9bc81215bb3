//! Flat Database File - Atomic Whole-File JSON Persistence
//!
//! All four collections live in a single `db.json`, written with
//! atomic replace (write to tmp file, then rename). The file is
//! always either the old or the new version, never a partial write.
//! There is no incremental write path: every flush serializes the
//! entire store.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::fs;
use tracing::{info, instrument};

use crate::ports::store::{StoreError, StoreResult, collections};

/// In-memory image of the persisted document.
///
/// Exactly four named collections; insertion order within each one is
/// the iteration order seen by every query.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StoreState {
    pub users: Vec<Value>,
    pub courses: Vec<Value>,
    pub quizzes: Vec<Value>,
    pub results: Vec<Value>,
}

impl StoreState {
    /// Borrow a collection by name.
    pub fn collection(&self, name: &str) -> StoreResult<&Vec<Value>> {
        match name {
            collections::USERS => Ok(&self.users),
            collections::COURSES => Ok(&self.courses),
            collections::QUIZZES => Ok(&self.quizzes),
            collections::RESULTS => Ok(&self.results),
            other => Err(StoreError::UnknownCollection {
                name: other.to_string(),
            }),
        }
    }

    /// Mutably borrow a collection by name.
    pub fn collection_mut(&mut self, name: &str) -> StoreResult<&mut Vec<Value>> {
        match name {
            collections::USERS => Ok(&mut self.users),
            collections::COURSES => Ok(&mut self.courses),
            collections::QUIZZES => Ok(&mut self.quizzes),
            collections::RESULTS => Ok(&mut self.results),
            other => Err(StoreError::UnknownCollection {
                name: other.to_string(),
            }),
        }
    }
}

/// Handle to the single persisted database file.
///
/// Owns the `db.json` path and the temporary path used for atomic
/// replacement. Creating the handle creates the data directory; the
/// file itself is created lazily on first [`DbFile::load`].
#[derive(Debug)]
pub struct DbFile {
    /// Path to db.json.
    db_path: PathBuf,
    /// Temporary path for atomic writes.
    tmp_path: PathBuf,
}

impl DbFile {
    /// Create a database file handle in the given data directory.
    ///
    /// Creates the directory if it doesn't exist.
    pub async fn new(data_dir: impl AsRef<Path>) -> StoreResult<Self> {
        let dir = data_dir.as_ref();
        fs::create_dir_all(dir).await?;

        Ok(Self {
            db_path: dir.join("db.json"),
            tmp_path: dir.join("db.json.tmp"),
        })
    }

    /// Path of the persisted file (for logs and error context).
    pub fn path(&self) -> &Path {
        &self.db_path
    }

    /// Load the full store state.
    ///
    /// On first boot (no file yet) the empty four-collection state is
    /// persisted and returned. Unparseable content is fatal:
    /// [`StoreError::Corrupt`].
    #[instrument(skip(self))]
    pub async fn load(&self) -> StoreResult<StoreState> {
        if !self.db_path.exists() {
            let state = StoreState::default();
            self.flush(&state).await?;
            info!(path = %self.db_path.display(), "Initialized empty store");
            return Ok(state);
        }

        let json = fs::read_to_string(&self.db_path).await?;

        serde_json::from_str(&json).map_err(|source| StoreError::Corrupt {
            path: self.db_path.clone(),
            source,
        })
    }

    /// Serialize the entire store and overwrite the file in one
    /// operation (tmp write + atomic rename). Single attempt; any
    /// underlying write failure propagates.
    #[instrument(skip(self, state))]
    pub async fn flush(&self, state: &StoreState) -> StoreResult<()> {
        let json = serde_json::to_string_pretty(state).map_err(std::io::Error::from)?;

        fs::write(&self.tmp_path, &json).await?;
        fs::rename(&self.tmp_path, &self.db_path).await?;

        Ok(())
    }
}
