// SPDX-License-Identifier: LGPL-3.0-only

//! Style application errors.

use thiserror::Error;

/// Errors a [StyleTarget](crate::applicator::StyleTarget) can report for a single property.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StyleError {
    /// The property name is not a valid custom property name.
    #[error("Invalid property name: {0}")]
    InvalidName(String),

    /// The value cannot be assigned to the property.
    #[error("Invalid value for {name}: {value:?}")]
    InvalidValue {
        /// Property name.
        name: String,
        /// Rejected value.
        value: String,
    },
}
