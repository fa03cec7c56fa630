// SPDX-License-Identifier: LGPL-3.0-only

//! Storage errors.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while persisting preferences.
#[derive(Debug, Error)]
pub enum StorageError {
    /// No configuration directory could be determined for this platform.
    #[error("No configuration directory available")]
    NoConfigDir,

    /// Failed to read the storage file.
    #[error("Failed to read storage file {0}: {1}")]
    ReadError(PathBuf, std::io::Error),

    /// Failed to write the storage file.
    #[error("Failed to write storage file {0}: {1}")]
    WriteError(PathBuf, std::io::Error),

    /// Failed to encode the storage file.
    #[error("Failed to encode storage file {0}: {1}")]
    EncodeError(PathBuf, serde_json::Error),

    /// Failed to watch the storage file.
    #[cfg(feature = "watcher")]
    #[error("Failed to watch storage file {0}: {1}")]
    WatchError(PathBuf, notify::Error),
}
