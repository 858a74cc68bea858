//! Storage
//!
//! Persistence of cart state between client sessions. Totals are not trusted
//! on load; every line recomputes its total as it is read back.

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use rusty_money::iso::Currency;
use tempfile::NamedTempFile;
use thiserror::Error;
use tracing::{debug, info};

use crate::cart::{CartState, CartStore};

/// Errors raised while reading or writing stored cart state.
#[derive(Debug, Error)]
pub enum StorageError {
    /// IO error reading or writing the store
    #[error("Failed to access cart storage: {0}")]
    Io(#[from] io::Error),

    /// Stored state could not be (de)serialised
    #[error("Failed to encode cart state: {0}")]
    Json(#[from] serde_json::Error),
}

/// Somewhere cart state can be kept between sessions.
pub trait CartStorage {
    /// Load the stored state, if any.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] if the stored state cannot be read.
    fn load(&self) -> Result<Option<CartState>, StorageError>;

    /// Replace the stored state.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] if the state cannot be written.
    fn save(&mut self, state: &CartState) -> Result<(), StorageError>;

    /// Forget the stored state.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] if the stored state cannot be removed.
    fn clear(&mut self) -> Result<(), StorageError>;
}

/// In-process storage holding the state as JSON.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    contents: Option<String>,
}

impl MemoryStorage {
    /// Create empty storage.
    pub fn new() -> Self {
        Self::default()
    }
}

impl CartStorage for MemoryStorage {
    fn load(&self) -> Result<Option<CartState>, StorageError> {
        self.contents
            .as_deref()
            .map(serde_json::from_str)
            .transpose()
            .map_err(StorageError::from)
    }

    fn save(&mut self, state: &CartState) -> Result<(), StorageError> {
        self.contents = Some(serde_json::to_string(state)?);

        Ok(())
    }

    fn clear(&mut self) -> Result<(), StorageError> {
        self.contents = None;

        Ok(())
    }
}

/// JSON file storage.
#[derive(Debug, Clone)]
pub struct FileStorage {
    path: PathBuf,
}

impl FileStorage {
    /// Store state at the given path.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the state file
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn directory(&self) -> &Path {
        match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        }
    }
}

impl CartStorage for FileStorage {
    fn load(&self) -> Result<Option<CartState>, StorageError> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(error) if error.kind() == io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "no stored cart");
                return Ok(None);
            }
            Err(error) => return Err(error.into()),
        };

        Ok(Some(serde_json::from_str(&contents)?))
    }

    fn save(&mut self, state: &CartState) -> Result<(), StorageError> {
        // Same directory as the target: persist is a rename.
        let mut staged = NamedTempFile::new_in(self.directory())?;

        serde_json::to_writer_pretty(&mut staged, state)?;
        staged.persist(&self.path).map_err(io::Error::from)?;

        debug!(path = %self.path.display(), "stored cart");

        Ok(())
    }

    fn clear(&mut self) -> Result<(), StorageError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(error) if error.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(error) => Err(error.into()),
        }
    }
}

impl CartStore {
    /// Restore a cart from storage, starting empty if nothing is stored.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] if the stored state cannot be read.
    pub fn restore(
        storage: &impl CartStorage,
        currency: &'static Currency,
    ) -> Result<Self, StorageError> {
        let state = storage.load()?.unwrap_or_default();

        info!(lines = state.items().len(), "restored cart");

        Ok(CartStore::with_state(state, currency))
    }

    /// Write the cart's state to storage.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] if the state cannot be written.
    pub fn persist(&self, storage: &mut impl CartStorage) -> Result<(), StorageError> {
        storage.save(self.state())
    }
}
