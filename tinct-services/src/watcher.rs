// SPDX-License-Identifier: LGPL-3.0-only

//! Watches the preferences file for writes made by other processes.

use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::mpsc;

use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};

use crate::error::StorageError;

/// Watches one storage file.
///
/// Writes replace the file through a rename, so the parent directory is
/// watched and events are filtered by file name.
pub struct StorageWatcher {
    path: PathBuf,
    file_name: OsString,
    // Kept alive for the lifetime of the watcher.
    _watcher: RecommendedWatcher,
    event_rx: mpsc::Receiver<notify::Result<Event>>,
}

impl StorageWatcher {
    /// Start watching `path`. Its parent directory is created if needed.
    pub fn new(path: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let path = path.into();
        let dir = match path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir.to_path_buf(),
            _ => PathBuf::from("."),
        };
        let file_name = path.file_name().map(OsString::from).unwrap_or_default();

        fs::create_dir_all(&dir).map_err(|e| StorageError::WriteError(dir.clone(), e))?;

        let (tx, rx) = mpsc::channel();
        let mut watcher = notify::recommended_watcher(tx).map_err(|e| StorageError::WatchError(path.clone(), e))?;
        watcher
            .watch(&dir, RecursiveMode::NonRecursive)
            .map_err(|e| StorageError::WatchError(path.clone(), e))?;

        log::debug!("Watching {} for preference changes", path.display());

        Ok(Self {
            path,
            file_name,
            _watcher: watcher,
            event_rx: rx,
        })
    }

    /// The watched file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Drain pending events (non-blocking). Returns whether the file changed.
    pub fn poll_changed(&self) -> bool {
        let mut changed = false;

        while let Ok(result) = self.event_rx.try_recv() {
            match result {
                Ok(event) => changed |= self.concerns_file(&event),
                Err(e) => log::warn!("Watch error on {}: {}", self.path.display(), e),
            }
        }

        changed
    }

    fn concerns_file(&self, event: &Event) -> bool {
        let relevant_kind = matches!(
            event.kind,
            EventKind::Create(_) | EventKind::Modify(_) | EventKind::Remove(_) | EventKind::Any
        );

        relevant_kind
            && event
                .paths
                .iter()
                .any(|path| path.file_name() == Some(self.file_name.as_os_str()))
    }
}

impl std::fmt::Debug for StorageWatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StorageWatcher").field("path", &self.path).finish()
    }
}
