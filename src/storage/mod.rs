//! Key-value storage collaborator.
//!
//! The browser app persists every collection as a self-contained JSON
//! snapshot under its own key (whole-collection read-modify-write, not
//! incremental). The same contract is kept here: string-valued, synchronous
//! get/set/remove, one key per independent collection.

use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use std::sync::Mutex;

use crate::errors::AppError;

/// Storage keys partitioning the independent collections.
pub mod keys {
    pub const USERS: &str = "dots_users_v1";
    pub const CURRENT_USER: &str = "dots_current_user_v1";
    pub const PINS: &str = "dots_pins_v2";
    pub const CUSTOM_CATEGORIES: &str = "dots_custom_categories";
    pub const PROFILES: &str = "dots_user_profiles";
    pub const WISHLIST: &str = "dots_wishlist";
}

/// Synchronous string-valued key-value storage.
pub trait Storage: Send {
    /// Read the value for `key`, or `None` when absent.
    fn get(&self, key: &str) -> Option<String>;
    /// Write `value` under `key`, replacing any previous value.
    fn set(&self, key: &str, value: &str) -> Result<(), AppError>;
    /// Remove `key` if present.
    fn remove(&self, key: &str) -> Result<(), AppError>;
}

/// In-memory storage backend, used by tests and the interactive shell's
/// ephemeral mode.
#[derive(Default)]
pub struct MemoryStorage {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Storage for MemoryStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.lock().unwrap().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), AppError> {
        self.entries
            .lock()
            .unwrap()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), AppError> {
        self.entries.lock().unwrap().remove(key);
        Ok(())
    }
}

/// File-backed storage: one JSON file per key under the data directory.
///
/// Mirrors localStorage's key partitioning so each collection stays a
/// self-contained snapshot on disk.
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    /// Open (creating if needed) a storage directory.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, AppError> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }
}

impl Storage for FileStorage {
    fn get(&self, key: &str) -> Option<String> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(value) => Some(value),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => None,
            Err(err) => {
                tracing::error!("Failed to read storage key {}: {}", key, err);
                None
            }
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), AppError> {
        fs::write(self.path_for(key), value)?;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), AppError> {
        match fs::remove_file(self.path_for(key)) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err.into()),
        }
    }
}
