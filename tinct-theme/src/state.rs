//! Composed theme snapshots.

use serde::Serialize;

use crate::mode::ResolvedMode;
use crate::registry::PresetRegistry;
use crate::style::StyleSet;

/// Immutable snapshot of everything a style target needs.
///
/// Snapshots are recomputed whenever the preset or resolved mode changes and
/// compare by value, so consumers can skip re-applying an identical state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ThemeState {
    /// The selected preset.
    pub preset_key: String,
    /// The applied mode.
    pub resolved_mode: ResolvedMode,
    /// Styles of the preset for the applied mode.
    pub styles: StyleSet,
}

impl ThemeState {
    /// Compose a snapshot from its inputs.
    ///
    /// An unregistered `preset_key` keeps its key but receives the default
    /// preset's styles (see [PresetRegistry::get_styles]).
    pub fn compose(preset_key: &str, resolved_mode: ResolvedMode, registry: &PresetRegistry) -> Self {
        Self {
            preset_key: preset_key.to_string(),
            resolved_mode,
            styles: registry.get_styles(preset_key, resolved_mode).clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builtin::{builtin_registry, DEFAULT_PRESET};

    #[test]
    fn compose_selects_styles_by_mode() {
        let registry = builtin_registry();
        let state = ThemeState::compose(DEFAULT_PRESET, ResolvedMode::Dark, &registry);

        assert_eq!(state.resolved_mode, ResolvedMode::Dark);
        assert_eq!(
            &state.styles,
            registry.get(DEFAULT_PRESET).unwrap().styles(ResolvedMode::Dark)
        );
    }

    #[test]
    fn compose_is_referentially_stable() {
        let registry = builtin_registry();
        let a = ThemeState::compose("ocean-breeze", ResolvedMode::Light, &registry);
        let b = ThemeState::compose("ocean-breeze", ResolvedMode::Light, &registry);
        assert_eq!(a, b);
    }

    #[test]
    fn unknown_preset_uses_default_styles() {
        let registry = builtin_registry();
        let state = ThemeState::compose("does-not-exist", ResolvedMode::Dark, &registry);
        assert_eq!(&state.styles, registry.default_preset().styles(ResolvedMode::Dark));
    }
}
