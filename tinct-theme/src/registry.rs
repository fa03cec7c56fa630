//! # Preset Registry
//!
//! Keeps every known [PresetDefinition] keyed by a string id, in registration
//! order. One preset is designated the default; it is what style lookups fall
//! back to when asked for a key that is not registered.
//!
//! ```rust
//! use tinct_theme::builtin::builtin_registry;
//! use tinct_theme::mode::ResolvedMode;
//!
//! let registry = builtin_registry();
//! assert!(registry.has("ocean-breeze"));
//!
//! // Unknown keys fall back to the default preset (and log a warning).
//! let styles = registry.get_styles("does-not-exist", ResolvedMode::Dark);
//! assert_eq!(styles, registry.get_styles(registry.default_key(), ResolvedMode::Dark));
//! ```

use std::fs;
use std::path::Path;

use indexmap::IndexMap;
use rand::Rng;

use crate::error::{ThemeError, ThemeResult};
use crate::mode::ResolvedMode;
use crate::preset::{PresetDefinition, PresetDocument};
use crate::style::StyleSet;

/// Direction for stepping through presets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleDirection {
    /// The next preset in label order.
    Next,
    /// The previous preset in label order.
    Previous,
}

/// Registry of palette presets.
#[derive(Debug, Clone)]
pub struct PresetRegistry {
    presets: IndexMap<String, PresetDefinition>,
    default_key: String,
}

impl PresetRegistry {
    /// Create a registry whose default preset is `definition`.
    pub fn new(default_key: impl Into<String>, definition: PresetDefinition) -> Self {
        let default_key = default_key.into();
        let mut presets = IndexMap::new();
        presets.insert(default_key.clone(), definition);
        Self {
            presets,
            default_key,
        }
    }

    /// Register a preset. Registered presets cannot be replaced.
    pub fn register(&mut self, key: impl Into<String>, definition: PresetDefinition) -> ThemeResult<()> {
        let key = key.into();
        if self.presets.contains_key(&key) {
            return Err(ThemeError::DuplicatePreset { key });
        }
        log::debug!("Registered preset '{}'", key);
        self.presets.insert(key, definition);
        Ok(())
    }

    /// Validate a raw document and register it.
    pub fn register_document(&mut self, key: impl Into<String>, document: PresetDocument) -> ThemeResult<()> {
        let key = key.into();
        let definition = document.into_definition(&key)?;
        self.register(key, definition)
    }

    /// Builder-style [PresetRegistry::register].
    pub fn with_preset(mut self, key: impl Into<String>, definition: PresetDefinition) -> ThemeResult<Self> {
        self.register(key, definition)?;
        Ok(self)
    }

    /// Get a preset by key.
    pub fn get(&self, key: &str) -> Option<&PresetDefinition> {
        self.presets.get(key)
    }

    /// Get a preset by key, or [ThemeError::UnknownPreset].
    pub fn try_get(&self, key: &str) -> ThemeResult<&PresetDefinition> {
        self.get(key).ok_or_else(|| ThemeError::unknown_preset(key))
    }

    /// Whether a preset is registered under `key`.
    pub fn has(&self, key: &str) -> bool {
        self.presets.contains_key(key)
    }

    /// All presets in registration order.
    pub fn list(&self) -> impl Iterator<Item = (&str, &PresetDefinition)> {
        self.presets.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// All keys in registration order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.presets.keys().map(String::as_str)
    }

    /// Number of registered presets.
    pub fn len(&self) -> usize {
        self.presets.len()
    }

    /// A registry always holds its default preset.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Key of the default preset.
    pub fn default_key(&self) -> &str {
        &self.default_key
    }

    /// The default preset.
    pub fn default_preset(&self) -> &PresetDefinition {
        &self.presets[self.default_key.as_str()]
    }

    /// Styles of `key` for `mode`, falling back to the default preset.
    ///
    /// Falling back logs a warning: an unknown key here is a configuration bug.
    pub fn get_styles(&self, key: &str, mode: ResolvedMode) -> &StyleSet {
        match self.presets.get(key) {
            Some(preset) => preset.styles(mode),
            None => {
                log::warn!(
                    "Preset '{}' is not registered, using '{}' {} styles",
                    key,
                    self.default_key,
                    mode
                );
                self.default_preset().styles(mode)
            },
        }
    }

    /// Keys whose label contains `query` (case-insensitive), sorted by label.
    ///
    /// A blank query matches everything.
    pub fn search(&self, query: &str) -> Vec<&str> {
        let query = query.trim().to_lowercase();
        let mut matches: Vec<(&str, &PresetDefinition)> = self
            .list()
            .filter(|(_, preset)| query.is_empty() || preset.label().to_lowercase().contains(&query))
            .collect();
        matches.sort_by(|a, b| a.1.label().cmp(b.1.label()).then_with(|| a.0.cmp(b.0)));
        matches.into_iter().map(|(key, _)| key).collect()
    }

    /// Step from `current` to the neighbouring preset in label order, wrapping around.
    ///
    /// An unknown `current` yields the first preset.
    pub fn cycle(&self, current: &str, direction: CycleDirection) -> &str {
        let ordered = self.search("");
        let len = ordered.len();
        let next = match ordered.iter().position(|key| *key == current) {
            Some(index) => match direction {
                CycleDirection::Next => (index + 1) % len,
                CycleDirection::Previous => (index + len - 1) % len,
            },
            None => 0,
        };
        ordered[next]
    }

    /// A uniformly random key.
    pub fn random_key<R: Rng + ?Sized>(&self, rng: &mut R) -> &str {
        let index = rng.random_range(0..self.presets.len());
        self.presets
            .get_index(index)
            .map(|(key, _)| key.as_str())
            .unwrap_or(self.default_key.as_str())
    }

    /// Load a preset pack (`.toml` or `.json`) mapping keys to documents.
    ///
    /// Invalid or duplicate entries are skipped with a warning. Returns how
    /// many presets were registered.
    pub fn load_file<P: AsRef<Path>>(&mut self, path: P) -> ThemeResult<usize> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ThemeError::file_not_found(path));
        }
        let content = fs::read_to_string(path)?;

        let documents: IndexMap<String, PresetDocument> =
            match path.extension().and_then(|s| s.to_str()) {
                Some("toml") => toml::from_str(&content).map_err(|e| ThemeError::parse_error(path, e))?,
                Some("json") => {
                    serde_json::from_str(&content).map_err(|e| ThemeError::parse_error(path, e))?
                },
                _ => {
                    return Err(ThemeError::UnsupportedFormat {
                        path: path.to_path_buf(),
                    })
                },
            };

        log::info!("Loading {} presets from {:?}", documents.len(), path);
        Ok(self.register_documents(documents))
    }

    /// Register a batch of documents, skipping invalid ones with a warning.
    pub fn register_documents(&mut self, documents: IndexMap<String, PresetDocument>) -> usize {
        let mut registered = 0;
        for (key, document) in documents {
            match self.register_document(key, document) {
                Ok(()) => registered += 1,
                Err(e) => log::warn!("Skipping preset: {}", e),
            }
        }
        registered
    }
}
