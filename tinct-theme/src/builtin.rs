//! Built-in palette presets.
//!
//! Every built-in defines the same roles for both modes so switching presets
//! never leaves a stale custom property behind on the style target.

use crate::preset::PresetDefinition;
use crate::registry::PresetRegistry;
use crate::style::StyleSet;

/// Key of the built-in default preset.
pub const DEFAULT_PRESET: &str = "default";

/// Keys of all built-in presets, in registration order.
pub const BUILTIN_PRESETS: [&str; 4] = [DEFAULT_PRESET, "ocean-breeze", "sunset-horizon", "forest-canopy"];

/// Create a registry containing every built-in preset, with `default` as the default.
pub fn builtin_registry() -> PresetRegistry {
    let mut registry = PresetRegistry::new(DEFAULT_PRESET, default_preset());
    for (key, preset) in [
        ("ocean-breeze", ocean_breeze()),
        ("sunset-horizon", sunset_horizon()),
        ("forest-canopy", forest_canopy()),
    ] {
        if let Err(e) = registry.register(key, preset) {
            log::error!("Built-in preset rejected: {}", e);
        }
    }
    registry
}

/// The neutral default palette.
pub fn default_preset() -> PresetDefinition {
    PresetDefinition::trusted(
        "Default",
        palette(&[
            ("background", "#ffffff"),
            ("foreground", "#0a0a0a"),
            ("card", "#ffffff"),
            ("card-foreground", "#0a0a0a"),
            ("primary", "#171717"),
            ("primary-foreground", "#fafafa"),
            ("secondary", "#f5f5f5"),
            ("secondary-foreground", "#171717"),
            ("muted", "#f5f5f5"),
            ("muted-foreground", "#737373"),
            ("accent", "#f5f5f5"),
            ("accent-foreground", "#171717"),
            ("destructive", "#e7000b"),
            ("border", "#e5e5e5"),
            ("input", "#e5e5e5"),
            ("ring", "#a1a1a1"),
        ]),
        palette(&[
            ("background", "#0a0a0a"),
            ("foreground", "#fafafa"),
            ("card", "#171717"),
            ("card-foreground", "#fafafa"),
            ("primary", "#e5e5e5"),
            ("primary-foreground", "#171717"),
            ("secondary", "#262626"),
            ("secondary-foreground", "#fafafa"),
            ("muted", "#262626"),
            ("muted-foreground", "#a1a1a1"),
            ("accent", "#404040"),
            ("accent-foreground", "#fafafa"),
            ("destructive", "#ff6467"),
            ("border", "#2e2e2e"),
            ("input", "#383838"),
            ("ring", "#737373"),
        ]),
    )
}

fn ocean_breeze() -> PresetDefinition {
    PresetDefinition::trusted(
        "Ocean Breeze",
        palette(&[
            ("background", "#f0f8ff"),
            ("foreground", "#374151"),
            ("card", "#ffffff"),
            ("card-foreground", "#374151"),
            ("primary", "#22c55e"),
            ("primary-foreground", "#ffffff"),
            ("secondary", "#e0f2fe"),
            ("secondary-foreground", "#4b5563"),
            ("muted", "#f3f4f6"),
            ("muted-foreground", "#6b7280"),
            ("accent", "#d1fae5"),
            ("accent-foreground", "#374151"),
            ("destructive", "#ef4444"),
            ("border", "#e5e7eb"),
            ("input", "#e5e7eb"),
            ("ring", "#22c55e"),
        ]),
        palette(&[
            ("background", "#0f172a"),
            ("foreground", "#d1d5db"),
            ("card", "#1e293b"),
            ("card-foreground", "#d1d5db"),
            ("primary", "#34d399"),
            ("primary-foreground", "#0f172a"),
            ("secondary", "#2d3748"),
            ("secondary-foreground", "#a1a1aa"),
            ("muted", "#1e293b"),
            ("muted-foreground", "#6b7280"),
            ("accent", "#374151"),
            ("accent-foreground", "#a1a1aa"),
            ("destructive", "#ef4444"),
            ("border", "#4b5563"),
            ("input", "#4b5563"),
            ("ring", "#34d399"),
        ]),
    )
}

fn sunset_horizon() -> PresetDefinition {
    PresetDefinition::trusted(
        "Sunset Horizon",
        palette(&[
            ("background", "#fff9f5"),
            ("foreground", "#333333"),
            ("card", "#ffffff"),
            ("card-foreground", "#333333"),
            ("primary", "#ff7e5f"),
            ("primary-foreground", "#ffffff"),
            ("secondary", "#ffedea"),
            ("secondary-foreground", "#b35340"),
            ("muted", "#fff0eb"),
            ("muted-foreground", "#78716c"),
            ("accent", "#feb47b"),
            ("accent-foreground", "#3d3436"),
            ("destructive", "#e63946"),
            ("border", "#ffe0d6"),
            ("input", "#ffe0d6"),
            ("ring", "#ff7e5f"),
        ]),
        palette(&[
            ("background", "#2a2024"),
            ("foreground", "#f2e9e4"),
            ("card", "#392f35"),
            ("card-foreground", "#f2e9e4"),
            ("primary", "#ff7e5f"),
            ("primary-foreground", "#ffffff"),
            ("secondary", "#463a41"),
            ("secondary-foreground", "#f2e9e4"),
            ("muted", "#392f35"),
            ("muted-foreground", "#d7c6bc"),
            ("accent", "#feb47b"),
            ("accent-foreground", "#2a2024"),
            ("destructive", "#e63946"),
            ("border", "#463a41"),
            ("input", "#463a41"),
            ("ring", "#ff7e5f"),
        ]),
    )
}

fn forest_canopy() -> PresetDefinition {
    PresetDefinition::trusted(
        "Forest Canopy",
        palette(&[
            ("background", "#f8f5f0"),
            ("foreground", "#3e2723"),
            ("card", "#f8f5f0"),
            ("card-foreground", "#3e2723"),
            ("primary", "#2e7d32"),
            ("primary-foreground", "#ffffff"),
            ("secondary", "#e8f5e9"),
            ("secondary-foreground", "#1b5e20"),
            ("muted", "#f0e9e0"),
            ("muted-foreground", "#6d4c41"),
            ("accent", "#c8e6c9"),
            ("accent-foreground", "#1b5e20"),
            ("destructive", "#c62828"),
            ("border", "#e0d6c9"),
            ("input", "#e0d6c9"),
            ("ring", "#2e7d32"),
        ]),
        palette(&[
            ("background", "#1c2a1f"),
            ("foreground", "#f0ebe5"),
            ("card", "#2d3a2e"),
            ("card-foreground", "#f0ebe5"),
            ("primary", "#4caf50"),
            ("primary-foreground", "#0a1f0c"),
            ("secondary", "#3e4a3d"),
            ("secondary-foreground", "#d7e0d6"),
            ("muted", "#2d3a2e"),
            ("muted-foreground", "#d7cfc4"),
            ("accent", "#388e3c"),
            ("accent-foreground", "#f0ebe5"),
            ("destructive", "#c62828"),
            ("border", "#3e4a3d"),
            ("input", "#3e4a3d"),
            ("ring", "#4caf50"),
        ]),
    )
}

fn palette(entries: &[(&str, &str)]) -> StyleSet {
    entries.iter().copied().collect()
}
