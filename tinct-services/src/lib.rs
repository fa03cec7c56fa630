// SPDX-License-Identifier: LGPL-3.0-only

//! Platform services for tinct: preference persistence and OS appearance signals.

pub mod error;
pub mod preferences;
pub mod storage;
pub mod system;
#[cfg(feature = "watcher")]
pub mod watcher;

pub use error::StorageError;
pub use preferences::{PreferenceChange, PreferenceStore};
pub use storage::{default_preferences_path, FileStorage, KeyValueStorage, MemoryStorage};
pub use system::{detect_reduced_motion, ColorSchemeSource, ManualColorScheme, SystemColorScheme};
#[cfg(feature = "watcher")]
pub use watcher::StorageWatcher;
