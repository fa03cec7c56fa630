use std::cell::{Cell, RefCell};
use std::rc::Rc;

use tinct_core::applicator::CssVariables;
use tinct_core::service::ThemeService;
use tinct_core::transition::{ImmediateTransitions, RevealTransition, TransitionHost};
use tinct_services::storage::{FileStorage, KeyValueStorage, MemoryStorage};
use tinct_services::system::ManualColorScheme;
use tinct_theme::builtin::builtin_registry;
use tinct_theme::config::ThemeConfig;
use tinct_theme::mode::{ModePreference, ResolvedMode};
use tinct_theme::preset::{DocumentStyles, PresetDocument};
use tinct_theme::registry::CycleDirection;
use tinct_theme::state::ThemeState;
use tinct_theme::style::StyleSet;
use tinct_theme::transition::{Coords, TransitionConfig};

fn service_with(storage: &MemoryStorage, scheme: &ManualColorScheme) -> ThemeService {
    ThemeService::builder()
        .registry(builtin_registry())
        .storage(storage.clone())
        .color_scheme(scheme.clone())
        .transitions(ImmediateTransitions)
        .build()
}

#[test]
fn test_explicit_modes_ignore_the_os_signal() {
    let scheme = ManualColorScheme::new(true);
    let service = service_with(&MemoryStorage::new(), &scheme);

    service.set_mode(ModePreference::Light);
    assert_eq!(service.resolved_mode(), ResolvedMode::Light);
    scheme.set_prefers_dark(false);
    scheme.set_prefers_dark(true);
    assert_eq!(service.resolved_mode(), ResolvedMode::Light);

    service.set_mode(ModePreference::Dark);
    scheme.set_prefers_dark(false);
    assert_eq!(service.resolved_mode(), ResolvedMode::Dark);
}

#[test]
fn test_system_mode_tracks_the_os_signal() {
    let scheme = ManualColorScheme::new(false);
    let service = service_with(&MemoryStorage::new(), &scheme);
    assert_eq!(service.mode(), ModePreference::System);

    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = seen.clone();
    let _sub = service.subscribe(move |state| sink.borrow_mut().push(state.resolved_mode));

    scheme.set_prefers_dark(true);
    assert_eq!(service.resolved_mode(), ResolvedMode::Dark);
    assert_eq!(*seen.borrow(), vec![ResolvedMode::Dark]);

    service.set_mode(ModePreference::Light);
    assert!(!service.is_following_system());
    assert_eq!(scheme.watcher_count(), 0);

    scheme.set_prefers_dark(false);
    scheme.set_prefers_dark(true);
    assert_eq!(*seen.borrow(), vec![ResolvedMode::Dark, ResolvedMode::Light]);
}

#[test]
fn test_returning_to_system_resolves_immediately() {
    let scheme = ManualColorScheme::new(false);
    let service = service_with(&MemoryStorage::new(), &scheme);
    service.set_mode(ModePreference::Light);

    scheme.set_prefers_dark(true);
    service.set_mode(ModePreference::System);

    assert_eq!(service.resolved_mode(), ResolvedMode::Dark);
    assert_eq!(scheme.watcher_count(), 1);
}

#[test]
fn test_initial_state_follows_dark_os() {
    let scheme = ManualColorScheme::new(true);
    let service = service_with(&MemoryStorage::new(), &scheme);
    let registry = builtin_registry();

    let state = service.theme_state();
    assert_eq!(state.preset_key, "default");
    assert_eq!(state.resolved_mode, ResolvedMode::Dark);
    assert_eq!(&state.styles, registry.get_styles("default", ResolvedMode::Dark));
}

#[test]
fn test_set_preset_twice_is_one_transition() {
    let service = service_with(&MemoryStorage::new(), &ManualColorScheme::new(false));
    let count = Rc::new(Cell::new(0));
    let counter = count.clone();
    let _sub = service.subscribe(move |_| counter.set(counter.get() + 1));

    service.set_preset("ocean-breeze");
    let first = service.theme_state();
    service.set_preset("ocean-breeze");

    assert_eq!(count.get(), 1);
    assert_eq!(service.theme_state(), first);
}

#[test]
fn test_unknown_preset_is_ignored() {
    let storage = MemoryStorage::new();
    let service = service_with(&storage, &ManualColorScheme::new(false));
    service.set_preset("sunset-horizon");
    let before = service.theme_state();

    service.set_preset("does-not-exist");

    assert_eq!(service.preset_key(), "sunset-horizon");
    assert_eq!(service.theme_state(), before);
    assert_eq!(storage.get("tinct-theme-preset").as_deref(), Some("\"sunset-horizon\""));
}

#[test]
fn test_mode_survives_restart() {
    let storage = MemoryStorage::new();
    let scheme = ManualColorScheme::new(false);

    for mode in ModePreference::ALL {
        let service = service_with(&storage, &scheme);
        service.set_mode(mode);
        service.dispose();

        let restarted = service_with(&storage, &scheme);
        assert_eq!(restarted.mode(), mode);
    }
}

#[test]
fn test_preset_survives_restart_in_a_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("preferences.json");
    let scheme = ManualColorScheme::new(false);

    let build = || {
        ThemeService::builder()
            .storage(FileStorage::open(&path))
            .color_scheme(scheme.clone())
            .transitions(ImmediateTransitions)
            .build()
    };

    build().set_preset("forest-canopy");
    assert_eq!(build().preset_key(), "forest-canopy");
}

#[test]
fn test_toggle_from_light_lands_on_dark() {
    let service = service_with(&MemoryStorage::new(), &ManualColorScheme::new(false));
    service.set_mode(ModePreference::Light);

    service.toggle_mode(None);
    assert_eq!(service.mode(), ModePreference::Dark);
}

#[test]
fn test_toggle_from_system_uses_the_resolved_mode() {
    let scheme = ManualColorScheme::new(true);
    let service = service_with(&MemoryStorage::new(), &scheme);

    service.toggle_mode(None);
    assert_eq!(service.mode(), ModePreference::Light);
    assert_eq!(scheme.watcher_count(), 0);
}

#[test]
fn test_incomplete_preset_falls_back_to_default() {
    let dark_only_missing = PresetDocument {
        label: Some("Ocean Breeze".to_string()),
        created_at: None,
        styles: DocumentStyles {
            light: Some(StyleSet::new().with("primary", "#0ea5e9")),
            dark: None,
        },
    };

    let mut registry = tinct_theme::registry::PresetRegistry::new("default", tinct_theme::builtin::default_preset());
    assert!(registry.register_document("ocean-breeze", dark_only_missing).is_err());

    let service = ThemeService::builder()
        .registry(registry.clone())
        .storage(MemoryStorage::new())
        .color_scheme(ManualColorScheme::new(true))
        .transitions(ImmediateTransitions)
        .build();
    service.set_preset("ocean-breeze");
    assert_eq!(service.preset_key(), "default");

    let state = ThemeState::compose("ocean-breeze", ResolvedMode::Dark, &registry);
    assert_eq!(&state.styles, registry.get_styles("default", ResolvedMode::Dark));
}

#[test]
fn test_corrupt_storage_falls_back_to_defaults() {
    let mut storage = MemoryStorage::new();
    storage.set("tinct-theme-mode", "{").unwrap();
    storage.set("tinct-theme-preset", "\"no-such-preset\"").unwrap();

    let config = ThemeConfig::new().with_default_mode(ModePreference::Dark);
    let service = ThemeService::builder()
        .config(config)
        .storage(storage)
        .color_scheme(ManualColorScheme::new(false))
        .transitions(ImmediateTransitions)
        .build();

    assert_eq!(service.mode(), ModePreference::Dark);
    assert_eq!(service.preset_key(), "default");
}

#[test]
fn test_configured_default_preset() {
    let config = ThemeConfig::new().with_default_preset("sunset-horizon");
    let service = ThemeService::builder()
        .config(config)
        .storage(MemoryStorage::new())
        .color_scheme(ManualColorScheme::new(false))
        .transitions(ImmediateTransitions)
        .build();

    assert_eq!(service.preset_key(), "sunset-horizon");
}

#[test]
fn test_cycle_wraps_around() {
    let service = service_with(&MemoryStorage::new(), &ManualColorScheme::new(false));
    let count = service.presets().len();

    let start = service.preset_key();
    for _ in 0..count {
        service.cycle_preset(CycleDirection::Next);
    }
    assert_eq!(service.preset_key(), start);

    let next = service.cycle_preset(CycleDirection::Next);
    assert_eq!(service.cycle_preset(CycleDirection::Previous), start);
    assert_ne!(next, start);
}

#[test]
fn test_randomize_selects_a_registered_preset() {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    let service = service_with(&MemoryStorage::new(), &ManualColorScheme::new(false));
    let mut rng = StdRng::seed_from_u64(7);
    for _ in 0..10 {
        let key = service.randomize_preset_with(&mut rng);
        assert!(service.presets().has(&key));
        assert_eq!(service.preset_key(), key);
    }
}

#[test]
fn test_sync_storage_applies_external_writes() {
    let storage = MemoryStorage::new();
    let service = service_with(&storage, &ManualColorScheme::new(false));

    let mut other_tab = storage.clone();
    other_tab.set("tinct-theme-mode", "\"dark\"").unwrap();
    other_tab.set("tinct-theme-preset", "\"forest-canopy\"").unwrap();
    service.sync_storage();

    assert_eq!(service.resolved_mode(), ResolvedMode::Dark);
    assert_eq!(service.preset_key(), "forest-canopy");
}

struct RecordingHost {
    supports: bool,
    reduced_motion: bool,
    reduced_motion_reads: Rc<Cell<usize>>,
    runs: Rc<RefCell<Vec<Coords>>>,
}

impl TransitionHost for RecordingHost {
    fn supports_transitions(&self) -> bool {
        self.supports
    }

    fn prefers_reduced_motion(&self) -> bool {
        self.reduced_motion_reads.set(self.reduced_motion_reads.get() + 1);
        self.reduced_motion
    }

    fn run_transition(&mut self, origin: Coords, update: &mut dyn FnMut()) {
        self.runs.borrow_mut().push(origin);
        update();
    }
}

fn toggle_with(supports: bool, reduced_motion: bool, coords: Option<Coords>) -> (usize, usize, ModePreference) {
    let runs = Rc::new(RefCell::new(Vec::new()));
    let reads = Rc::new(Cell::new(0));
    let service = ThemeService::builder()
        .storage(MemoryStorage::new())
        .color_scheme(ManualColorScheme::new(false))
        .transitions(RecordingHost {
            supports,
            reduced_motion,
            reduced_motion_reads: reads.clone(),
            runs: runs.clone(),
        })
        .build();

    service.toggle_mode(coords);
    let run_count = runs.borrow().len();
    (run_count, reads.get(), service.mode())
}

#[test]
fn test_toggle_animates_only_when_all_conditions_hold() {
    let coords = Some(Coords::new(12.0, 34.0));

    assert_eq!(toggle_with(true, false, coords).0, 1);
    assert_eq!(toggle_with(false, false, coords).0, 0);
    assert_eq!(toggle_with(true, true, coords).0, 0);
    assert_eq!(toggle_with(true, false, None).0, 0);

    // The flip itself always happens.
    for (supports, reduced, coords) in [(true, false, coords), (false, false, coords), (true, true, None)] {
        assert_eq!(toggle_with(supports, reduced, coords).2, ModePreference::Dark);
    }
}

#[test]
fn test_reduced_motion_is_read_once_per_toggle() {
    let (_, reads, _) = toggle_with(true, false, Some(Coords::default()));
    assert_eq!(reads, 1);

    let (_, reads, _) = toggle_with(false, false, Some(Coords::default()));
    assert_eq!(reads, 0);
}

#[test]
fn test_animated_toggle_writes_the_origin() {
    let service = ThemeService::builder()
        .storage(MemoryStorage::new())
        .color_scheme(ManualColorScheme::new(false))
        .transitions(RevealTransition::with_reduced_motion(TransitionConfig::new(true, 250), || false))
        .build();
    let target = Rc::new(RefCell::new(CssVariables::new()));
    let _attached = service.attach_target(target.clone());

    service.toggle_mode(Some(Coords::new(40.0, 60.0)));

    let target = target.borrow();
    assert_eq!(target.get("--x"), Some("40px"));
    assert_eq!(target.get("--y"), Some("60px"));
    assert_eq!(target.color_scheme(), Some(ResolvedMode::Dark));
}

#[test]
fn test_init_with_explicit_collaborators() {
    let storage = MemoryStorage::new();
    let mut seeded = storage.clone();
    seeded.set("tinct-theme-mode", "\"light\"").unwrap();

    let service = ThemeService::init(Box::new(storage), builtin_registry(), ThemeConfig::default());
    assert_eq!(service.mode(), ModePreference::Light);
    assert_eq!(service.resolved_mode(), ResolvedMode::Light);
    service.dispose();
}
