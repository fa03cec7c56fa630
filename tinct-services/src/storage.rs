// SPDX-License-Identifier: LGPL-3.0-only

//! String key/value storage backends.
//!
//! The storage layer knows nothing about themes: values are opaque strings
//! (the preference store puts JSON scalars in them). Two backends exist:
//!
//! - [MemoryStorage]: in-process, shared between clones.
//! - [FileStorage]: one JSON object file, `~/.config/tinct/preferences.json` by default.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use crate::error::StorageError;

/// Application directory under the platform configuration directory.
pub const APP_DIR: &str = "tinct";
/// File name of the default preferences file.
pub const PREFERENCES_FILE: &str = "preferences.json";

/// A synchronous string key/value store.
pub trait KeyValueStorage {
    /// Read a raw value.
    fn get(&self, key: &str) -> Option<String>;

    /// Write a raw value. Returns once the value is durable.
    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Delete a value.
    fn remove(&mut self, key: &str) -> Result<(), StorageError>;

    /// Re-read the backing store, picking up writes made by others.
    fn reload(&mut self) -> Result<(), StorageError> {
        Ok(())
    }

    /// Backing file, if any.
    fn path(&self) -> Option<&Path> {
        None
    }
}

/// In-memory storage. Clones share the same entries.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    entries: Rc<RefCell<BTreeMap<String, String>>>,
}

impl MemoryStorage {
    /// Create empty storage.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored entries.
    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    /// Whether nothing is stored.
    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }
}

impl KeyValueStorage for MemoryStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.borrow().get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        self.entries.borrow_mut().remove(key);
        Ok(())
    }
}

/// Storage backed by a JSON object file.
///
/// Every write re-reads the file, applies the change and replaces the file
/// through a temporary sibling and a rename. Concurrent writers therefore
/// resolve last-write-wins per key and never leave a torn file behind.
#[derive(Debug)]
pub struct FileStorage {
    path: PathBuf,
    cache: BTreeMap<String, String>,
}

impl FileStorage {
    /// Open storage at `path`. A missing or unreadable file starts empty.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let cache = match read_entries(&path) {
            Ok(entries) => entries,
            Err(e) => {
                log::warn!("{}; starting with empty preferences", e);
                BTreeMap::new()
            },
        };
        Self { path, cache }
    }

    /// Open the default preferences file in the user's configuration directory.
    pub fn open_default() -> Result<Self, StorageError> {
        Ok(Self::open(default_preferences_path()?))
    }

    fn write_entries(&self, entries: &BTreeMap<String, String>) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| StorageError::WriteError(parent.to_path_buf(), e))?;
        }

        let content = serde_json::to_string_pretty(entries)
            .map_err(|e| StorageError::EncodeError(self.path.clone(), e))?;

        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, content).map_err(|e| StorageError::WriteError(tmp.clone(), e))?;
        fs::rename(&tmp, &self.path).map_err(|e| StorageError::WriteError(self.path.clone(), e))?;
        Ok(())
    }

    /// Latest on-disk entries; an unreadable file is treated as empty.
    fn fresh_entries(&self) -> BTreeMap<String, String> {
        read_entries(&self.path).unwrap_or_else(|e| {
            log::warn!("{}; overwriting", e);
            BTreeMap::new()
        })
    }
}

impl KeyValueStorage for FileStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.cache.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut entries = self.fresh_entries();
        entries.insert(key.to_string(), value.to_string());
        self.write_entries(&entries)?;
        self.cache = entries;
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        let mut entries = self.fresh_entries();
        if entries.remove(key).is_some() {
            self.write_entries(&entries)?;
        }
        self.cache = entries;
        Ok(())
    }

    fn reload(&mut self) -> Result<(), StorageError> {
        self.cache = read_entries(&self.path)?;
        Ok(())
    }

    fn path(&self) -> Option<&Path> {
        Some(&self.path)
    }
}

/// `<config dir>/tinct/preferences.json`.
pub fn default_preferences_path() -> Result<PathBuf, StorageError> {
    dirs::config_dir()
        .map(|dir| dir.join(APP_DIR).join(PREFERENCES_FILE))
        .ok_or(StorageError::NoConfigDir)
}

/// Read the entry map. A missing file is empty; a corrupt file is an error.
fn read_entries(path: &Path) -> Result<BTreeMap<String, String>, StorageError> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(BTreeMap::new()),
        Err(e) => return Err(StorageError::ReadError(path.to_path_buf(), e)),
    };

    if content.trim().is_empty() {
        return Ok(BTreeMap::new());
    }

    serde_json::from_str(&content).map_err(|e| {
        StorageError::ReadError(
            path.to_path_buf(),
            std::io::Error::new(ErrorKind::InvalidData, e),
        )
    })
}
