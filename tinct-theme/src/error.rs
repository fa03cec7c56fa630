//! # Theme Error Types
//!
//! Error types for the theming layer. Most of these never reach an end user:
//! the service logs them and falls back to a default, but builders and loaders
//! return them so configuration mistakes surface early.

use std::path::PathBuf;
use thiserror::Error;

use crate::mode::ResolvedMode;

/// Errors that can occur in the theming system.
#[derive(Error, Debug)]
pub enum ThemeError {
    /// A preset key was referenced that is not registered.
    #[error("Preset '{key}' not found")]
    UnknownPreset {
        /// The key that was not found.
        key: String,
    },

    /// A preset with this key is already registered.
    #[error("Preset '{key}' is already registered")]
    DuplicatePreset {
        /// The key that was registered twice.
        key: String,
    },

    /// A preset does not define styles for one of the modes.
    #[error("Preset '{key}' has no styles for {mode} mode")]
    IncompletePreset {
        /// The preset key.
        key: String,
        /// The mode without styles.
        mode: ResolvedMode,
    },

    /// A style role name is empty or contains unsupported characters.
    #[error("Invalid style role '{role}' in preset '{key}'")]
    InvalidRole {
        /// The preset key.
        key: String,
        /// The offending role name.
        role: String,
    },

    /// A mode string could not be parsed.
    #[error("Invalid mode '{0}', expected light, dark or system")]
    InvalidMode(String),

    /// Configuration or preset file was not found.
    #[error("Theme file not found: {path:?}")]
    FileNotFound {
        /// The path that was not found.
        path: PathBuf,
    },

    /// Error parsing a configuration or preset file.
    #[error("Failed to parse theme file {path:?}: {details}")]
    ParseError {
        /// The path of the file that failed to parse.
        path: PathBuf,
        /// Details about the parse error.
        details: String,
    },

    /// The file extension is not one of the supported formats.
    #[error("Unsupported theme file format: {path:?} (use .toml or .json)")]
    UnsupportedFormat {
        /// The path with the unsupported extension.
        path: PathBuf,
    },

    /// Generic I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for theme operations.
pub type ThemeResult<T> = Result<T, ThemeError>;

impl ThemeError {
    /// Create an unknown preset error.
    pub fn unknown_preset(key: impl Into<String>) -> Self {
        Self::UnknownPreset { key: key.into() }
    }

    /// Create a file not found error.
    pub fn file_not_found(path: impl Into<PathBuf>) -> Self {
        Self::FileNotFound { path: path.into() }
    }

    /// Create a parse error.
    pub fn parse_error(path: impl Into<PathBuf>, details: impl ToString) -> Self {
        Self::ParseError {
            path: path.into(),
            details: details.to_string(),
        }
    }
}
