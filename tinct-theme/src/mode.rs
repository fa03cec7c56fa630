//! Light/dark mode preference and its resolution.

use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ThemeError;

/// The mode a user asked for.
///
/// `System` defers to the operating system's color-scheme setting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModePreference {
    /// Always light.
    Light,
    /// Always dark.
    Dark,
    /// Follow the operating system.
    #[default]
    System,
}

impl ModePreference {
    /// All preferences, in display order.
    pub const ALL: [ModePreference; 3] = [Self::Light, Self::Dark, Self::System];

    /// The concrete mode for `Light`/`Dark`, `None` for `System`.
    pub fn concrete(self) -> Option<ResolvedMode> {
        match self {
            Self::Light => Some(ResolvedMode::Light),
            Self::Dark => Some(ResolvedMode::Dark),
            Self::System => None,
        }
    }

    /// Stable identifier used for persistence and configuration.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
            Self::System => "system",
        }
    }
}

impl From<ResolvedMode> for ModePreference {
    fn from(mode: ResolvedMode) -> Self {
        match mode {
            ResolvedMode::Light => Self::Light,
            ResolvedMode::Dark => Self::Dark,
        }
    }
}

impl Display for ModePreference {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ModePreference {
    type Err = ThemeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "light" => Ok(Self::Light),
            "dark" => Ok(Self::Dark),
            "system" => Ok(Self::System),
            _ => Err(ThemeError::InvalidMode(s.to_string())),
        }
    }
}

/// The mode actually applied. Never `System`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResolvedMode {
    /// Light appearance.
    #[default]
    Light,
    /// Dark appearance.
    Dark,
}

impl ResolvedMode {
    /// Map a "prefers dark" signal to a mode.
    pub fn from_prefers_dark(prefers_dark: bool) -> Self {
        if prefers_dark {
            Self::Dark
        } else {
            Self::Light
        }
    }

    /// The opposite mode.
    pub fn toggle(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }

    /// Whether this is the dark mode.
    pub fn is_dark(self) -> bool {
        self == Self::Dark
    }

    /// Stable identifier, also used as the class name toggled on style targets.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }
}

impl Display for ResolvedMode {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ResolvedMode {
    type Err = ThemeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "light" => Ok(Self::Light),
            "dark" => Ok(Self::Dark),
            _ => Err(ThemeError::InvalidMode(s.to_string())),
        }
    }
}

/// Resolve a preference against the current system signal.
///
/// `Light` and `Dark` ignore the signal entirely.
pub fn resolve_mode(preference: ModePreference, system: ResolvedMode) -> ResolvedMode {
    preference.concrete().unwrap_or(system)
}
