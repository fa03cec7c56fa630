use std::fs;

use chrono::{Duration, TimeZone, Utc};
use tinct_theme::builtin::{builtin_registry, BUILTIN_PRESETS, DEFAULT_PRESET};
use tinct_theme::config::ThemeConfig;
use tinct_theme::error::ThemeError;
use tinct_theme::mode::{resolve_mode, ModePreference, ResolvedMode};
use tinct_theme::state::ThemeState;

#[test]
fn test_all_builtins_complete() {
    let registry = builtin_registry();
    assert_eq!(registry.len(), BUILTIN_PRESETS.len());

    for key in BUILTIN_PRESETS {
        let preset = registry.get(key).unwrap();
        let light: Vec<&str> = preset.styles(ResolvedMode::Light).roles().collect();
        let dark: Vec<&str> = preset.styles(ResolvedMode::Dark).roles().collect();
        assert!(!light.is_empty(), "{key} has no light styles");
        assert_eq!(light, dark, "{key} defines different roles per mode");
    }
}

#[test]
fn test_load_toml_pack() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("pack.toml");
    fs::write(
        &path,
        r##"
        [lavender]
        label = "Lavender"
        created_at = "2024-03-01T00:00:00Z"
        [lavender.styles.light]
        primary = "#7c3aed"
        background = "#faf5ff"
        [lavender.styles.dark]
        primary = "#a78bfa"
        background = "#1e1b4b"

        [broken]
        label = "Broken"
        [broken.styles.light]
        primary = "#000000"
        "##,
    )
    .unwrap();

    let mut registry = builtin_registry();
    let added = registry.load_file(&path).unwrap();

    assert_eq!(added, 1);
    assert!(registry.has("lavender"));
    assert!(!registry.has("broken"));
    assert_eq!(registry.get_styles("lavender", ResolvedMode::Dark).get("primary"), Some("#a78bfa"));
}

#[test]
fn test_load_json_pack_with_camel_case_timestamp() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("pack.json");
    fs::write(
        &path,
        r##"{
            "rose": {
                "label": "Rose",
                "createdAt": "2024-06-10T12:00:00Z",
                "styles": {
                    "light": { "primary": "#e11d48" },
                    "dark": { "primary": "#fb7185" }
                }
            }
        }"##,
    )
    .unwrap();

    let mut registry = builtin_registry();
    assert_eq!(registry.load_file(&path).unwrap(), 1);

    let rose = registry.get("rose").unwrap();
    let created = Utc.with_ymd_and_hms(2024, 6, 10, 12, 0, 0).unwrap();
    assert_eq!(rose.created_at(), Some(created));
    assert!(rose.is_new(created + Duration::days(2)));
    assert!(!rose.is_new(created + Duration::days(6)));
}

#[test]
fn test_load_file_errors() {
    let dir = tempfile::tempdir().unwrap();
    let mut registry = builtin_registry();

    let missing = registry.load_file(dir.path().join("missing.toml")).unwrap_err();
    assert!(matches!(missing, ThemeError::FileNotFound { .. }));

    let yaml = dir.path().join("pack.yaml");
    fs::write(&yaml, "a: b").unwrap();
    assert!(matches!(registry.load_file(&yaml).unwrap_err(), ThemeError::UnsupportedFormat { .. }));

    let bad = dir.path().join("bad.json");
    fs::write(&bad, "{").unwrap();
    assert!(matches!(registry.load_file(&bad).unwrap_err(), ThemeError::ParseError { .. }));
}

#[test]
fn test_config_file_layers() {
    let dir = tempfile::tempdir().unwrap();
    let system = dir.path().join("system.toml");
    let user = dir.path().join("user.toml");
    fs::write(&system, "[theme]\ndefault_mode = \"dark\"\ndefault_preset = \"ocean-breeze\"\n").unwrap();
    fs::write(&user, "[theme]\ndefault_preset = \"forest-canopy\"\n").unwrap();

    let mut config = ThemeConfig::from_file(&system).unwrap();
    config.merge(ThemeConfig::from_file(&user).unwrap());

    assert_eq!(config.default_mode, ModePreference::Dark);
    assert_eq!(config.default_preset.as_deref(), Some("forest-canopy"));
}

#[test]
fn test_compose_every_combination() {
    let registry = builtin_registry();
    for preference in ModePreference::ALL {
        for signal in [ResolvedMode::Light, ResolvedMode::Dark] {
            let mode = resolve_mode(preference, signal);
            let state = ThemeState::compose(DEFAULT_PRESET, mode, &registry);
            assert_eq!(state.resolved_mode, preference.concrete().unwrap_or(signal));
            assert_eq!(&state.styles, registry.get_styles(DEFAULT_PRESET, mode));
        }
    }
}
