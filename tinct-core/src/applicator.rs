// SPDX-License-Identifier: LGPL-3.0-only

//! Projecting a [ThemeState] onto a live style target.

use std::fmt::Write as _;

use indexmap::IndexMap;
use tinct_theme::mode::ResolvedMode;
use tinct_theme::state::ThemeState;

use crate::error::StyleError;

/// Default prefix for custom property names.
pub const DEFAULT_PREFIX: &str = "--";

/// A surface that accepts named style properties, such as a document root.
pub trait StyleTarget {
    /// Set one property.
    fn set_property(&mut self, name: &str, value: &str) -> Result<(), StyleError>;

    /// Tell the target which concrete mode is active.
    fn set_color_scheme(&mut self, _mode: ResolvedMode) {}
}

/// Writes every style of a [ThemeState] to a [StyleTarget].
///
/// Application is best effort: a property the target rejects is logged and
/// skipped, and the remaining ones are still applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyleApplicator {
    prefix: String,
}

impl StyleApplicator {
    /// Create an applicator with a custom property prefix.
    pub fn new(prefix: impl Into<String>) -> Self {
        Self { prefix: prefix.into() }
    }

    /// Prefix prepended to role names.
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Property name for a style role.
    pub fn property_name(&self, role: &str) -> String {
        format!("{}{}", self.prefix, role)
    }

    /// Apply `state` to `target`.
    pub fn apply(&self, state: &ThemeState, target: &mut dyn StyleTarget) {
        target.set_color_scheme(state.resolved_mode);

        let mut failed = 0;
        for (role, value) in state.styles.iter() {
            let name = self.property_name(role);
            if let Err(e) = target.set_property(&name, value) {
                log::warn!("Skipping style '{}' of preset '{}': {}", name, state.preset_key, e);
                failed += 1;
            }
        }

        log::trace!(
            "Applied preset '{}' ({}) with {} of {} styles",
            state.preset_key,
            state.resolved_mode,
            state.styles.len() - failed,
            state.styles.len()
        );
    }
}

impl Default for StyleApplicator {
    fn default() -> Self {
        Self::new(DEFAULT_PREFIX)
    }
}

/// An in-memory set of CSS custom properties.
///
/// Rejects names that are not custom properties and values that would break
/// out of a declaration. Renders to a CSS rule with [CssVariables::to_css].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CssVariables {
    selector: String,
    color_scheme: Option<ResolvedMode>,
    properties: IndexMap<String, String>,
}

impl CssVariables {
    /// Variables for the `:root` selector.
    pub fn new() -> Self {
        Self::with_selector(":root")
    }

    /// Variables for a custom selector.
    pub fn with_selector(selector: impl Into<String>) -> Self {
        Self {
            selector: selector.into(),
            color_scheme: None,
            properties: IndexMap::new(),
        }
    }

    /// Value of a property.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.properties.get(name).map(String::as_str)
    }

    /// All properties in the order they were first set.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.properties.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Number of properties.
    pub fn len(&self) -> usize {
        self.properties.len()
    }

    /// Whether no property is set.
    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }

    /// The last color scheme applied.
    pub fn color_scheme(&self) -> Option<ResolvedMode> {
        self.color_scheme
    }

    /// Render as a CSS rule.
    pub fn to_css(&self) -> String {
        let mut css = String::new();
        let _ = writeln!(css, "{} {{", self.selector);
        if let Some(mode) = self.color_scheme {
            let _ = writeln!(css, "  color-scheme: {};", mode);
        }
        for (name, value) in &self.properties {
            let _ = writeln!(css, "  {}: {};", name, value);
        }
        css.push_str("}\n");
        css
    }
}

impl Default for CssVariables {
    fn default() -> Self {
        Self::new()
    }
}

impl StyleTarget for CssVariables {
    fn set_property(&mut self, name: &str, value: &str) -> Result<(), StyleError> {
        let valid_name = name.len() > 2
            && name.starts_with("--")
            && name[2..].chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !valid_name {
            return Err(StyleError::InvalidName(name.to_string()));
        }

        let value = value.trim();
        if value.is_empty() || value.contains(|c| matches!(c, ';' | '{' | '}' | '\n' | '\r')) {
            return Err(StyleError::InvalidValue {
                name: name.to_string(),
                value: value.to_string(),
            });
        }

        self.properties.insert(name.to_string(), value.to_string());
        Ok(())
    }

    fn set_color_scheme(&mut self, mode: ResolvedMode) {
        self.color_scheme = Some(mode);
    }
}
