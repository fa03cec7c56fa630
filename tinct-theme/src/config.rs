//! # Theme Configuration
//!
//! Developer-facing defaults for the theme service: which mode and preset a
//! first run starts with, under which storage keys preferences are persisted,
//! whether animated transitions are enabled, and any extra presets.
//!
//! Configuration can come from environment variables, TOML files, or code.
//! Later sources override earlier ones through [ThemeConfig::merge].
//!
//! ## Environment Variables
//!
//! - `TINCT_MODE`: default mode (`light`, `dark` or `system`)
//! - `TINCT_PRESET`: default preset key
//! - `TINCT_CONFIG`: path to a TOML configuration file
//!
//! ## Configuration File Format
//!
//! ```toml
//! [theme]
//! default_mode = "system"
//! default_preset = "ocean-breeze"
//!
//! [storage]
//! mode_key = "my-app-theme-mode"
//! preset_key = "my-app-theme-preset"
//!
//! [transition]
//! enabled = true
//! duration_ms = 400
//!
//! [presets.mono.styles.light]
//! primary = "#000000"
//!
//! [presets.mono.styles.dark]
//! primary = "#ffffff"
//! ```

use std::env;
use std::fs;
use std::path::Path;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::builtin::builtin_registry;
use crate::error::{ThemeError, ThemeResult};
use crate::mode::ModePreference;
use crate::preset::PresetDocument;
use crate::registry::PresetRegistry;
use crate::transition::TransitionConfig;

/// Storage key for the mode preference.
pub const DEFAULT_MODE_KEY: &str = "tinct-theme-mode";
/// Storage key for the preset key.
pub const DEFAULT_PRESET_KEY: &str = "tinct-theme-preset";

/// Keys under which the two preference slots are persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageKeys {
    /// Key of the mode preference slot.
    #[serde(default = "default_mode_key")]
    pub mode_key: String,
    /// Key of the preset slot.
    #[serde(default = "default_preset_key")]
    pub preset_key: String,
}

fn default_mode_key() -> String {
    DEFAULT_MODE_KEY.to_string()
}

fn default_preset_key() -> String {
    DEFAULT_PRESET_KEY.to_string()
}

impl Default for StorageKeys {
    fn default() -> Self {
        Self {
            mode_key: default_mode_key(),
            preset_key: default_preset_key(),
        }
    }
}

/// Theme service configuration.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ThemeConfig {
    /// Mode used when nothing is persisted.
    pub default_mode: ModePreference,
    /// Preset used when nothing valid is persisted. `None` means the registry default.
    pub default_preset: Option<String>,
    /// Storage keys for persisted preferences.
    pub storage_keys: StorageKeys,
    /// Animated transition settings.
    pub transition: TransitionConfig,
    /// Extra presets, registered on top of the built-ins.
    pub presets: IndexMap<String, PresetDocument>,
}

/// On-disk representation. Every field is optional so files can be layered.
#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    theme: ThemeSection,
    #[serde(default)]
    storage: Option<StorageKeys>,
    #[serde(default)]
    transition: Option<TransitionConfig>,
    #[serde(default)]
    presets: IndexMap<String, PresetDocument>,
}

#[derive(Debug, Default, Deserialize)]
struct ThemeSection {
    default_mode: Option<ModePreference>,
    default_preset: Option<String>,
}

impl ThemeConfig {
    /// Create a configuration with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a configuration from environment variables, or use defaults.
    ///
    /// `TINCT_CONFIG` is applied first; `TINCT_MODE` and `TINCT_PRESET`
    /// override it. Unparseable values are logged and ignored.
    pub fn from_env_or_default() -> Self {
        let mut config = Self::new();

        if let Ok(path) = env::var("TINCT_CONFIG") {
            match Self::from_file(&path) {
                Ok(file_config) => config.merge(file_config),
                Err(e) => log::warn!("Ignoring TINCT_CONFIG: {}", e),
            }
        }

        if let Ok(mode) = env::var("TINCT_MODE") {
            match mode.parse() {
                Ok(mode) => config.default_mode = mode,
                Err(e) => log::warn!("Ignoring TINCT_MODE: {}", e),
            }
        }

        if let Ok(preset) = env::var("TINCT_PRESET") {
            if !preset.trim().is_empty() {
                config.default_preset = Some(preset.trim().to_string());
            }
        }

        config
    }

    /// Load configuration from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> ThemeResult<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ThemeError::file_not_found(path));
        }

        if path.extension().and_then(|s| s.to_str()) != Some("toml") {
            return Err(ThemeError::UnsupportedFormat {
                path: path.to_path_buf(),
            });
        }

        log::info!("Loading theme config from: {:?}", path);
        let content = fs::read_to_string(path)?;
        Self::parse(&content).map_err(|e| ThemeError::parse_error(path, e))
    }

    /// Load configuration from TOML content.
    pub fn from_toml(content: &str) -> ThemeResult<Self> {
        Self::parse(content).map_err(|e| ThemeError::parse_error("<inline>", e))
    }

    fn parse(content: &str) -> Result<Self, toml::de::Error> {
        let file: ConfigFile = toml::from_str(content)?;
        let mut config = Self::new();
        config.apply(file);
        Ok(config)
    }

    /// Overlay values from a parsed file.
    fn apply(&mut self, file: ConfigFile) {
        if let Some(mode) = file.theme.default_mode {
            self.default_mode = mode;
        }
        if file.theme.default_preset.is_some() {
            self.default_preset = file.theme.default_preset;
        }
        if let Some(keys) = file.storage {
            self.storage_keys = keys;
        }
        if let Some(transition) = file.transition {
            self.transition = transition;
        }
        self.presets.extend(file.presets);
    }

    /// Merge another configuration into this one; values set in `other` win.
    ///
    /// Fields still at their default value in `other` are treated as unset.
    pub fn merge(&mut self, other: ThemeConfig) {
        if other.default_mode != ModePreference::default() {
            self.default_mode = other.default_mode;
        }
        if other.default_preset.is_some() {
            self.default_preset = other.default_preset;
        }
        if other.storage_keys != StorageKeys::default() {
            self.storage_keys = other.storage_keys;
        }
        if other.transition != TransitionConfig::default() {
            self.transition = other.transition;
        }
        self.presets.extend(other.presets);
    }

    /// Set the default mode.
    pub fn with_default_mode(mut self, mode: ModePreference) -> Self {
        self.default_mode = mode;
        self
    }

    /// Set the default preset key.
    pub fn with_default_preset(mut self, key: impl Into<String>) -> Self {
        self.default_preset = Some(key.into());
        self
    }

    /// Set the storage keys.
    pub fn with_storage_keys(mut self, keys: StorageKeys) -> Self {
        self.storage_keys = keys;
        self
    }

    /// Set the transition configuration.
    pub fn with_transition(mut self, transition: TransitionConfig) -> Self {
        self.transition = transition;
        self
    }

    /// Add a preset document.
    pub fn with_preset(mut self, key: impl Into<String>, document: PresetDocument) -> Self {
        self.presets.insert(key.into(), document);
        self
    }

    /// Build the registry: built-ins plus configured presets.
    ///
    /// Invalid configured presets are skipped with a warning.
    pub fn build_registry(&self) -> PresetRegistry {
        let mut registry = builtin_registry();
        registry.register_documents(self.presets.clone());
        registry
    }

    /// The preset a first run should select, validated against `registry`.
    pub fn initial_preset<'a>(&'a self, registry: &'a PresetRegistry) -> &'a str {
        match self.default_preset.as_deref() {
            Some(key) if registry.has(key) => key,
            Some(key) => {
                log::warn!(
                    "Default preset '{}' is not registered, using '{}'",
                    key,
                    registry.default_key()
                );
                registry.default_key()
            },
            None => registry.default_key(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_every_section() {
        let config = ThemeConfig::from_toml(
            r##"
            [theme]
            default_mode = "dark"
            default_preset = "mono"

            [storage]
            mode_key = "app-mode"

            [transition]
            enabled = true
            duration_ms = 450

            [presets.mono]
            label = "Mono"
            [presets.mono.styles.light]
            primary = "#000000"
            [presets.mono.styles.dark]
            primary = "#ffffff"
            "##,
        )
        .unwrap();

        assert_eq!(config.default_mode, ModePreference::Dark);
        assert_eq!(config.default_preset.as_deref(), Some("mono"));
        assert_eq!(config.storage_keys.mode_key, "app-mode");
        assert_eq!(config.storage_keys.preset_key, DEFAULT_PRESET_KEY);
        assert!(config.transition.enabled);
        assert_eq!(config.transition.duration_ms, 450);

        let registry = config.build_registry();
        assert!(registry.has("mono"));
        assert_eq!(config.initial_preset(&registry), "mono");
    }

    #[test]
    fn invalid_mode_is_a_parse_error() {
        let err = ThemeConfig::from_toml("[theme]\ndefault_mode = \"sepia\"").unwrap_err();
        assert!(matches!(err, ThemeError::ParseError { .. }));
    }

    #[test]
    fn incomplete_configured_preset_is_skipped() {
        let config = ThemeConfig::from_toml(
            r##"
            [presets.half.styles.light]
            primary = "#000000"
            "##,
        )
        .unwrap();

        let registry = config.build_registry();
        assert!(!registry.has("half"));
    }

    #[test]
    fn unknown_default_preset_falls_back_to_registry_default() {
        let config = ThemeConfig::new().with_default_preset("nope");
        let registry = config.build_registry();
        assert_eq!(config.initial_preset(&registry), registry.default_key());
    }

    #[test]
    fn merge_prefers_values_set_in_other() {
        let mut base = ThemeConfig::new()
            .with_default_mode(ModePreference::Light)
            .with_default_preset("ocean-breeze");
        base.merge(ThemeConfig::new().with_default_preset("forest-canopy"));

        assert_eq!(base.default_mode, ModePreference::Light);
        assert_eq!(base.default_preset.as_deref(), Some("forest-canopy"));
    }

    #[test]
    fn from_file_rejects_other_extensions() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("theme.yaml");
        fs::write(&path, "theme: {}").unwrap();

        assert!(matches!(
            ThemeConfig::from_file(&path),
            Err(ThemeError::UnsupportedFormat { .. })
        ));
    }

    #[test]
    fn from_file_reads_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("theme.toml");
        fs::write(&path, "[theme]\ndefault_mode = \"light\"\n").unwrap();

        let config = ThemeConfig::from_file(&path).unwrap();
        assert_eq!(config.default_mode, ModePreference::Light);
    }
}
