//! Cart storage

use std::{
    fs, io,
    path::PathBuf,
    sync::{Mutex, PoisonError},
};

use rustc_hash::FxHashMap;
use thiserror::Error;

/// Errors raised by a storage backend.
///
/// The cart swallows and logs these rather than surfacing them: persistence
/// is best-effort and the in-memory cart keeps working without it.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The backing file or directory could not be read or written.
    #[error(transparent)]
    Io(#[from] io::Error),
}

/// Durable key-value storage for the persisted cart snapshot.
///
/// The payload is an opaque string owned by the cart; backends store and
/// return it byte-for-byte. A single fixed key is written per cart, and no
/// other component writes to that key.
#[mockall::automock]
pub trait CartStorage {
    /// Persist `payload` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] if the backend could not write.
    fn save(&self, key: &str, payload: &str) -> Result<(), StorageError>;

    /// Load the payload stored under `key`, or `None` if absent.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] if the backend could not read.
    fn load(&self, key: &str) -> Result<Option<String>, StorageError>;
}

impl<S: CartStorage + ?Sized> CartStorage for &S {
    fn save(&self, key: &str, payload: &str) -> Result<(), StorageError> {
        (**self).save(key, payload)
    }

    fn load(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).load(key)
    }
}

/// In-memory storage backend for tests and ephemeral sessions.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: Mutex<FxHashMap<String, String>>,
}

impl MemoryStorage {
    /// Create an empty in-memory backend.
    pub fn new() -> Self {
        Self::default()
    }
}

impl CartStorage for MemoryStorage {
    fn save(&self, key: &str, payload: &str) -> Result<(), StorageError> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.to_owned(), payload.to_owned());

        Ok(())
    }

    fn load(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self
            .entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned())
    }
}

/// File-backed storage: one JSON file per key under a base directory.
///
/// The crate's stand-in for the browser's local storage, so a cart survives a
/// restart of the host process.
#[derive(Debug, Clone)]
pub struct JsonFileStorage {
    base_dir: PathBuf,
}

impl JsonFileStorage {
    /// Create a backend rooted at `base_dir`. The directory is created on the
    /// first write, not here.
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.base_dir.join(format!("{key}.json"))
    }
}

impl CartStorage for JsonFileStorage {
    fn save(&self, key: &str, payload: &str) -> Result<(), StorageError> {
        fs::create_dir_all(&self.base_dir)?;
        fs::write(self.path_for(key), payload)?;

        Ok(())
    }

    fn load(&self, key: &str) -> Result<Option<String>, StorageError> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(payload) => Ok(Some(payload)),
            Err(error) if error.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(error) => Err(StorageError::Io(error)),
        }
    }
}
