//! # Durable Client Storage
//!
//! The browser's `localStorage`, reduced to what the client needs: a flat
//! map of string slots. Read once at startup, written on every mutation of
//! the persisted subset of state.
//!
//! `FileStorage` keeps the slots in one JSON file (`~/.folio/storage.json`
//! by default). Every write rewrites the whole file via `.tmp` + `rename()`.

use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use log::{debug, warn};

pub const TOKEN_KEY: &str = "blog-token";
pub const USER_KEY: &str = "blog-user";
pub const THEME_KEY: &str = "blog-theme";

#[derive(Debug)]
pub enum StorageError {
    Io(io::Error),
    Serialize(serde_json::Error),
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageError::Io(e) => write!(f, "storage I/O error: {e}"),
            StorageError::Serialize(e) => write!(f, "storage serialize error: {e}"),
        }
    }
}

impl std::error::Error for StorageError {}

/// A string key/value store that survives restarts.
pub trait Storage: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

// ============================================================================
// In-memory
// ============================================================================

/// Storage that lives as long as the process. Used by tests and hosts that
/// don't want anything on disk.
#[derive(Default)]
pub struct MemoryStorage {
    slots: Mutex<BTreeMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_slots<I, K, V>(slots: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            slots: Mutex::new(
                slots
                    .into_iter()
                    .map(|(k, v)| (k.into(), v.into()))
                    .collect(),
            ),
        }
    }
}

impl Storage for MemoryStorage {
    fn get(&self, key: &str) -> Option<String> {
        lock(&self.slots).get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        lock(&self.slots).insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        lock(&self.slots).remove(key);
        Ok(())
    }
}

// ============================================================================
// File-backed
// ============================================================================

/// Returns `~/.folio/storage.json`.
pub fn default_storage_path() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(".folio").join("storage.json"))
}

pub struct FileStorage {
    path: PathBuf,
    slots: Mutex<BTreeMap<String, String>>,
}

impl FileStorage {
    /// Opens (or starts) the slot file at `path`. A missing file is an empty
    /// store; a corrupt one is logged and treated as empty.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let path = path.into();
        let slots = if path.exists() {
            let json = fs::read_to_string(&path).map_err(StorageError::Io)?;
            match serde_json::from_str(&json) {
                Ok(slots) => slots,
                Err(e) => {
                    warn!("Ignoring unreadable storage file {}: {}", path.display(), e);
                    BTreeMap::new()
                }
            }
        } else {
            BTreeMap::new()
        };
        debug!("Opened storage {} ({} slots)", path.display(), slots.len());
        Ok(Self {
            path,
            slots: Mutex::new(slots),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn flush(&self, slots: &BTreeMap<String, String>) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(StorageError::Io)?;
        }
        atomic_write_json(&self.path, slots)
    }
}

/// Atomically write `data` as JSON to `path` (via `.tmp` + rename).
fn atomic_write_json(path: &Path, data: &BTreeMap<String, String>) -> Result<(), StorageError> {
    let tmp_path = path.with_extension("tmp");
    let json = serde_json::to_string_pretty(data).map_err(StorageError::Serialize)?;
    fs::write(&tmp_path, json).map_err(StorageError::Io)?;
    fs::rename(&tmp_path, path).map_err(StorageError::Io)?;
    Ok(())
}

impl Storage for FileStorage {
    fn get(&self, key: &str) -> Option<String> {
        lock(&self.slots).get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut slots = lock(&self.slots);
        slots.insert(key.to_string(), value.to_string());
        self.flush(&slots)
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        let mut slots = lock(&self.slots);
        if slots.remove(key).is_none() {
            return Ok(());
        }
        self.flush(&slots)
    }
}
