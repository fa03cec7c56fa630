//! # Palette Presets
//!
//! A preset is a named palette with one [StyleSet] per [ResolvedMode].
//!
//! Presets come from two places: built-in definitions and preset documents
//! loaded from TOML/JSON. Documents are loose (either mode may be missing);
//! converting one into a [PresetDefinition] validates it, so a registered
//! preset always has both modes.
//!
//! ```toml
//! label = "Ocean Breeze"
//! created_at = "2026-10-01T00:00:00Z"
//!
//! [styles.light]
//! primary = "oklch(0.55 0.12 230)"
//!
//! [styles.dark]
//! primary = "oklch(0.72 0.11 230)"
//! ```

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{ThemeError, ThemeResult};
use crate::mode::ResolvedMode;
use crate::style::StyleSet;

/// Presets created within this many days are flagged as new.
pub const NEW_PRESET_WINDOW_DAYS: i64 = 5;

/// A validated, immutable palette preset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PresetDefinition {
    label: String,
    created_at: Option<DateTime<Utc>>,
    light: StyleSet,
    dark: StyleSet,
}

impl PresetDefinition {
    /// Build a preset from both style sets, validating them.
    ///
    /// `key` is only used for error messages.
    pub fn new(
        key: &str,
        label: impl Into<String>,
        light: StyleSet,
        dark: StyleSet,
    ) -> ThemeResult<Self> {
        PresetDocument {
            label: Some(label.into()),
            created_at: None,
            styles: DocumentStyles {
                light: Some(light),
                dark: Some(dark),
            },
        }
        .into_definition(key)
    }

    /// Build a preset from style sets known to be complete.
    pub(crate) fn trusted(label: &str, light: StyleSet, dark: StyleSet) -> Self {
        debug_assert!(!light.is_empty() && !dark.is_empty());
        Self {
            label: label.to_string(),
            created_at: None,
            light,
            dark,
        }
    }

    /// Attach a creation timestamp.
    pub fn with_created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = Some(created_at);
        self
    }

    /// User-facing name.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// When the preset was created, if known.
    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        self.created_at
    }

    /// Styles for a mode.
    pub fn styles(&self, mode: ResolvedMode) -> &StyleSet {
        match mode {
            ResolvedMode::Light => &self.light,
            ResolvedMode::Dark => &self.dark,
        }
    }

    /// Whether the preset was created within [NEW_PRESET_WINDOW_DAYS] of `now`.
    pub fn is_new(&self, now: DateTime<Utc>) -> bool {
        self.created_at
            .is_some_and(|created| created > now - Duration::days(NEW_PRESET_WINDOW_DAYS))
    }
}

/// A preset as written in a file, before validation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PresetDocument {
    /// User-facing name. Defaults to the preset key.
    #[serde(default)]
    pub label: Option<String>,
    /// Creation timestamp (RFC 3339).
    #[serde(default, alias = "createdAt")]
    pub created_at: Option<DateTime<Utc>>,
    /// Per-mode styles.
    #[serde(default)]
    pub styles: DocumentStyles,
}

/// Per-mode style tables of a [PresetDocument].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentStyles {
    /// Light mode styles.
    #[serde(default)]
    pub light: Option<StyleSet>,
    /// Dark mode styles.
    #[serde(default)]
    pub dark: Option<StyleSet>,
}

impl PresetDocument {
    /// Validate the document and turn it into a definition registered as `key`.
    pub fn into_definition(self, key: &str) -> ThemeResult<PresetDefinition> {
        let light = require_mode(key, ResolvedMode::Light, self.styles.light)?;
        let dark = require_mode(key, ResolvedMode::Dark, self.styles.dark)?;

        Ok(PresetDefinition {
            label: self.label.unwrap_or_else(|| key.to_string()),
            created_at: self.created_at,
            light,
            dark,
        })
    }
}

fn require_mode(key: &str, mode: ResolvedMode, styles: Option<StyleSet>) -> ThemeResult<StyleSet> {
    let styles = match styles {
        Some(styles) if !styles.is_empty() => styles,
        _ => {
            return Err(ThemeError::IncompletePreset {
                key: key.to_string(),
                mode,
            })
        },
    };

    if let Some(role) = styles.first_invalid_role() {
        return Err(ThemeError::InvalidRole {
            key: key.to_string(),
            role: role.to_string(),
        });
    }

    Ok(styles)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn minimal() -> StyleSet {
        StyleSet::new().with("primary", "#000000")
    }

    #[test]
    fn document_without_dark_styles_is_rejected() {
        let doc = PresetDocument {
            label: Some("Ocean Breeze".into()),
            created_at: None,
            styles: DocumentStyles {
                light: Some(minimal()),
                dark: None,
            },
        };

        match doc.into_definition("ocean-breeze") {
            Err(ThemeError::IncompletePreset { key, mode }) => {
                assert_eq!(key, "ocean-breeze");
                assert_eq!(mode, ResolvedMode::Dark);
            },
            other => panic!("expected IncompletePreset, got {other:?}"),
        }
    }

    #[test]
    fn empty_style_table_counts_as_missing() {
        let result = PresetDefinition::new("x", "X", StyleSet::new(), minimal());
        assert!(matches!(
            result,
            Err(ThemeError::IncompletePreset { mode: ResolvedMode::Light, .. })
        ));
    }

    #[test]
    fn invalid_role_names_are_rejected() {
        let light = StyleSet::new().with("primary color", "#000");
        let result = PresetDefinition::new("x", "X", light, minimal());
        assert!(matches!(result, Err(ThemeError::InvalidRole { .. })));
    }

    #[test]
    fn label_defaults_to_key() {
        let doc: PresetDocument = toml::from_str(
            r##"
            [styles.light]
            primary = "#fff"
            [styles.dark]
            primary = "#000"
            "##,
        )
        .unwrap();

        let preset = doc.into_definition("mono").unwrap();
        assert_eq!(preset.label(), "mono");
        assert_eq!(preset.styles(ResolvedMode::Dark).get("primary"), Some("#000"));
    }

    #[test]
    fn json_documents_accept_camel_case_timestamps() {
        let doc: PresetDocument = serde_json::from_str(
            r##"{
                "label": "Sunset",
                "createdAt": "2026-10-15T12:00:00Z",
                "styles": { "light": { "primary": "#f00" }, "dark": { "primary": "#900" } }
            }"##,
        )
        .unwrap();

        let preset = doc.into_definition("sunset").unwrap();
        assert!(preset.created_at().is_some());
    }

    #[test]
    fn new_flag_uses_five_day_window() {
        let now = Utc.with_ymd_and_hms(2026, 10, 19, 0, 0, 0).unwrap();
        let preset = PresetDefinition::new("x", "X", minimal(), minimal()).unwrap();
        assert!(!preset.is_new(now));

        let recent = preset
            .clone()
            .with_created_at(Utc.with_ymd_and_hms(2026, 10, 16, 0, 0, 0).unwrap());
        assert!(recent.is_new(now));

        let old = preset.with_created_at(Utc.with_ymd_and_hms(2026, 10, 1, 0, 0, 0).unwrap());
        assert!(!old.is_new(now));
    }
}
