// SPDX-License-Identifier: LGPL-3.0-only

//! The [ThemeService] facade.
//!
//! A service owns one reactive chain:
//!
//! ```text
//! PreferenceStore ──mode──▶ ModeResolver ◀── SystemSignalObserver
//!        │                      │
//!        └──preset──────────────┴──▶ ThemeState ──▶ style targets, subscribers
//! ```
//!
//! Mutators write to the preference store; its listeners drive the resolver
//! and the composer, so by the time a mutator returns the new state has been
//! applied to every attached target and every subscriber has seen it.

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use rand::Rng;
use tinct_services::preferences::{PreferenceChange, PreferenceStore};
use tinct_services::storage::{FileStorage, KeyValueStorage, MemoryStorage};
use tinct_services::system::{ColorSchemeSource, SystemColorScheme};
#[cfg(feature = "watcher")]
use tinct_services::watcher::StorageWatcher;
use tinct_theme::config::ThemeConfig;
use tinct_theme::mode::{ModePreference, ResolvedMode};
use tinct_theme::observer::{Observers, Subscription};
use tinct_theme::registry::{CycleDirection, PresetRegistry};
use tinct_theme::state::ThemeState;
use tinct_theme::transition::{plan_toggle, Coords, ToggleTransition};

use crate::applicator::{StyleApplicator, StyleTarget};
use crate::resolver::ModeResolver;
use crate::system_observer::SystemSignalObserver;
use crate::transition::{ImmediateTransitions, RevealTransition, TransitionHost};

type SharedTarget = Rc<RefCell<dyn StyleTarget>>;

struct ServiceInner {
    disposed: Cell<bool>,
    registry: PresetRegistry,
    preferences: PreferenceStore,
    system: SystemSignalObserver,
    polled_system: Option<SystemColorScheme>,
    resolver: ModeResolver,
    preset_key: RefCell<String>,
    state: RefCell<ThemeState>,
    generation: Cell<u64>,
    applicator: StyleApplicator,
    targets: RefCell<Vec<(u64, SharedTarget)>>,
    next_target_id: Cell<u64>,
    transitions: RefCell<Option<Box<dyn TransitionHost>>>,
    observers: Observers<ThemeState>,
    wiring: RefCell<Vec<Subscription>>,
    #[cfg(feature = "watcher")]
    watcher: RefCell<Option<StorageWatcher>>,
}

impl ServiceInner {
    fn recompose(&self) {
        let next = ThemeState::compose(&self.preset_key.borrow(), self.resolver.resolved(), &self.registry);
        if *self.state.borrow() == next {
            return;
        }

        log::debug!("Theme state: preset '{}', {}", next.preset_key, next.resolved_mode);
        let generation = self.generation.get() + 1;
        self.generation.set(generation);
        *self.state.borrow_mut() = next.clone();

        // A listener may mutate the service; the nested recompose then
        // delivers the newer state and this dispatch must not follow it.
        let current = || self.generation.get() == generation;
        self.apply_to_targets(&next, &current);
        self.observers.notify_while(&next, current);
    }

    fn poll_system(&self) -> bool {
        self.polled_system.as_ref().is_some_and(SystemColorScheme::poll)
    }

    fn select_preset(&self, key: &str) {
        if *self.preset_key.borrow() == key {
            return;
        }
        *self.preset_key.borrow_mut() = key.to_string();
        self.recompose();
    }

    fn on_preference_change(&self, change: &PreferenceChange) {
        match change {
            PreferenceChange::Mode(ModePreference::System) => {
                self.poll_system();
                self.resolver.set_preference(ModePreference::System);
            },
            PreferenceChange::Mode(mode) => self.resolver.set_preference(*mode),
            PreferenceChange::Preset(key) if self.registry.has(key) => self.select_preset(key),
            PreferenceChange::Preset(key) => {
                log::warn!("Ignoring stored preset '{}': not registered", key);
            },
        }
    }

    fn snapshot_targets(&self) -> Vec<SharedTarget> {
        self.targets
            .borrow()
            .iter()
            .map(|(_, target)| target.clone())
            .collect()
    }

    fn apply_to_targets(&self, state: &ThemeState, current: &dyn Fn() -> bool) {
        for target in self.snapshot_targets() {
            if !current() {
                break;
            }
            match target.try_borrow_mut() {
                Ok(mut target) => self.applicator.apply(state, &mut *target),
                Err(_) => log::warn!("Style target is busy, skipping update"),
            }
        }
    }

    fn write_origin(&self, origin: Coords) {
        for target in self.snapshot_targets() {
            if let Ok(mut target) = target.try_borrow_mut() {
                for (name, value) in [("--x", origin.x), ("--y", origin.y)] {
                    if let Err(e) = target.set_property(name, &format!("{}px", value)) {
                        log::warn!("Failed to set transition origin: {}", e);
                    }
                }
            }
        }
    }
}

/// Lends the transition host out of its slot and puts it back on drop, also
/// when the transition or a subscriber panics.
struct LentHost<'a> {
    slot: &'a RefCell<Option<Box<dyn TransitionHost>>>,
    host: Box<dyn TransitionHost>,
}

impl Drop for LentHost<'_> {
    fn drop(&mut self) {
        let host = std::mem::replace(&mut self.host, Box::new(ImmediateTransitions));
        *self.slot.borrow_mut() = Some(host);
    }
}

/// Builder for [ThemeService].
///
/// Every collaborator has a default: the registry comes from the
/// configuration, storage is the user's preferences file, the color scheme
/// is read from the desktop and toggles are animated when the configuration
/// enables transitions.
pub struct ThemeServiceBuilder {
    config: ThemeConfig,
    registry: Option<PresetRegistry>,
    storage: Option<Box<dyn KeyValueStorage>>,
    color_scheme: Option<Rc<dyn ColorSchemeSource>>,
    polled_system: Option<SystemColorScheme>,
    transitions: Option<Box<dyn TransitionHost>>,
    applicator: StyleApplicator,
    #[cfg(feature = "watcher")]
    watch_storage: bool,
}

impl ThemeServiceBuilder {
    fn new() -> Self {
        Self {
            config: ThemeConfig::default(),
            registry: None,
            storage: None,
            color_scheme: None,
            polled_system: None,
            transitions: None,
            applicator: StyleApplicator::default(),
            #[cfg(feature = "watcher")]
            watch_storage: true,
        }
    }

    /// Defaults, storage keys and transition settings.
    pub fn config(mut self, config: ThemeConfig) -> Self {
        self.config = config;
        self
    }

    /// Use `registry` instead of the one built from the configuration.
    pub fn registry(mut self, registry: PresetRegistry) -> Self {
        self.registry = Some(registry);
        self
    }

    /// Persist preferences in `storage`.
    pub fn storage(self, storage: impl KeyValueStorage + 'static) -> Self {
        self.boxed_storage(Box::new(storage))
    }

    /// Persist preferences in already boxed `storage`.
    pub fn boxed_storage(mut self, storage: Box<dyn KeyValueStorage>) -> Self {
        self.storage = Some(storage);
        self
    }

    /// Read the OS color scheme from `source`. The host is responsible for
    /// refreshing it.
    pub fn color_scheme(mut self, source: impl ColorSchemeSource + 'static) -> Self {
        self.color_scheme = Some(Rc::new(source));
        self.polled_system = None;
        self
    }

    /// Read the OS color scheme from `source` and refresh it through
    /// [ThemeService::poll_system]. This is the default, with
    /// [SystemColorScheme::new].
    pub fn system_color_scheme(mut self, source: SystemColorScheme) -> Self {
        self.color_scheme = Some(Rc::new(source.clone()));
        self.polled_system = Some(source);
        self
    }

    /// Carry out animated toggles with `host`.
    pub fn transitions(mut self, host: impl TransitionHost + 'static) -> Self {
        self.transitions = Some(Box::new(host));
        self
    }

    /// Prefix for style property names (default `--`).
    pub fn style_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.applicator = StyleApplicator::new(prefix);
        self
    }

    /// Whether to watch file storage for external writes (default on).
    #[cfg(feature = "watcher")]
    pub fn watch_storage(mut self, watch: bool) -> Self {
        self.watch_storage = watch;
        self
    }

    /// Create the service and compute the initial state.
    pub fn build(self) -> ThemeService {
        let registry = self.registry.unwrap_or_else(|| self.config.build_registry());

        let storage = self.storage.unwrap_or_else(|| match FileStorage::open_default() {
            Ok(storage) => Box::new(storage),
            Err(e) => {
                log::warn!("{}; preferences will not persist", e);
                Box::new(MemoryStorage::new())
            },
        });

        #[cfg(feature = "watcher")]
        let watcher = match storage.path() {
            Some(path) if self.watch_storage => match StorageWatcher::new(path) {
                Ok(watcher) => Some(watcher),
                Err(e) => {
                    log::warn!("{}", e);
                    None
                },
            },
            _ => None,
        };

        let (color_scheme, polled_system) = match self.color_scheme {
            Some(source) => (source, self.polled_system),
            None => {
                let system = SystemColorScheme::new();
                (Rc::new(system.clone()) as Rc<dyn ColorSchemeSource>, Some(system))
            },
        };
        let transitions = self
            .transitions
            .unwrap_or_else(|| Box::new(RevealTransition::new(self.config.transition)));

        let preferences = PreferenceStore::new(storage, self.config.storage_keys.clone(), self.config.default_mode);

        let preset_key = match preferences.preset() {
            Some(key) if registry.has(&key) => key,
            Some(key) => {
                log::warn!("Stored preset '{}' is not registered, using the default", key);
                self.config.initial_preset(&registry).to_string()
            },
            None => self.config.initial_preset(&registry).to_string(),
        };

        let system = SystemSignalObserver::new(color_scheme);
        let resolver = ModeResolver::new(preferences.mode(), system.clone());
        let state = ThemeState::compose(&preset_key, resolver.resolved(), &registry);

        log::info!(
            "Theme service ready: mode {} ({}), preset '{}'",
            preferences.mode(),
            state.resolved_mode,
            preset_key
        );

        let inner = Rc::new(ServiceInner {
            disposed: Cell::new(false),
            registry,
            preferences,
            system,
            polled_system,
            resolver,
            preset_key: RefCell::new(preset_key),
            state: RefCell::new(state),
            generation: Cell::new(0),
            applicator: self.applicator,
            targets: RefCell::new(Vec::new()),
            next_target_id: Cell::new(0),
            transitions: RefCell::new(Some(transitions)),
            observers: Observers::new(),
            wiring: RefCell::new(Vec::new()),
            #[cfg(feature = "watcher")]
            watcher: RefCell::new(watcher),
        });

        let weak: Weak<ServiceInner> = Rc::downgrade(&inner);
        let on_preferences = inner.preferences.subscribe(move |change| {
            if let Some(inner) = weak.upgrade() {
                inner.on_preference_change(change);
            }
        });

        let weak: Weak<ServiceInner> = Rc::downgrade(&inner);
        let on_resolved = inner.resolver.subscribe(move |_| {
            if let Some(inner) = weak.upgrade() {
                inner.recompose();
            }
        });

        inner.wiring.borrow_mut().extend([on_preferences, on_resolved]);

        ThemeService { inner }
    }
}

/// Theme state for one application, or one test.
///
/// Cloning yields another handle to the same service. Using any handle after
/// [ThemeService::dispose] is a programming error and panics.
#[derive(Clone)]
pub struct ThemeService {
    inner: Rc<ServiceInner>,
}

impl ThemeService {
    /// Start building a service.
    pub fn builder() -> ThemeServiceBuilder {
        ThemeServiceBuilder::new()
    }

    /// Create a service from explicit storage, registry and defaults. The
    /// color scheme is read from the desktop; call [ThemeService::poll_system]
    /// to pick up changes.
    pub fn init(storage: Box<dyn KeyValueStorage>, registry: PresetRegistry, defaults: ThemeConfig) -> Self {
        Self::builder()
            .config(defaults)
            .registry(registry)
            .boxed_storage(storage)
            .build()
    }

    /// Tear the service down: detach from the OS signal, drop every
    /// subscriber and target. Calling it twice is harmless.
    pub fn dispose(&self) {
        if self.inner.disposed.replace(true) {
            return;
        }

        self.inner.wiring.borrow_mut().clear();
        self.inner.resolver.release();
        self.inner.observers.clear();
        self.inner.targets.borrow_mut().clear();
        #[cfg(feature = "watcher")]
        self.inner.watcher.borrow_mut().take();

        log::debug!("Theme service disposed");
    }

    /// Whether [ThemeService::dispose] was called.
    pub fn is_disposed(&self) -> bool {
        self.inner.disposed.get()
    }

    fn live(&self) -> &ServiceInner {
        assert!(!self.inner.disposed.get(), "ThemeService used after dispose()");
        &self.inner
    }

    /// The current snapshot.
    pub fn theme_state(&self) -> ThemeState {
        self.live().state.borrow().clone()
    }

    /// The mode preference.
    pub fn mode(&self) -> ModePreference {
        self.live().resolver.preference()
    }

    /// The applied mode.
    pub fn resolved_mode(&self) -> ResolvedMode {
        self.live().resolver.resolved()
    }

    /// The selected preset.
    pub fn preset_key(&self) -> String {
        self.live().preset_key.borrow().clone()
    }

    /// All registered presets.
    pub fn presets(&self) -> &PresetRegistry {
        &self.live().registry
    }

    /// Whether the resolver currently watches the OS signal.
    pub fn is_following_system(&self) -> bool {
        self.live().system.is_attached()
    }

    /// Persist and apply a mode preference.
    pub fn set_mode(&self, mode: ModePreference) {
        self.live().preferences.set_mode(mode);
    }

    /// Persist and apply a preset. Unregistered keys are ignored with a warning.
    pub fn set_preset(&self, key: &str) {
        let inner = self.live();
        if !inner.registry.has(key) {
            log::warn!("Unknown preset '{}', keeping '{}'", key, inner.preset_key.borrow());
            return;
        }

        inner.preferences.set_preset(key);
        inner.select_preset(key);
    }

    /// Switch to the opposite of the applied mode.
    ///
    /// The result is always an explicit `Light` or `Dark` preference, also
    /// when the current preference is `System`. With `coords` and a host
    /// that can animate (and no reduced motion request), the switch runs
    /// inside a reveal centred on `coords`.
    pub fn toggle_mode(&self, coords: Option<Coords>) {
        let inner = self.live();
        let target = ModePreference::from(inner.resolver.resolved().toggle());

        let host = inner.transitions.borrow_mut().take();
        let Some(host) = host else {
            // Toggled from inside a running transition.
            inner.preferences.set_mode(target);
            return;
        };
        let mut lent = LentHost {
            slot: &inner.transitions,
            host,
        };

        let supports = lent.host.supports_transitions();
        let reduced_motion = supports && lent.host.prefers_reduced_motion();

        match plan_toggle(supports, reduced_motion, coords) {
            ToggleTransition::Animated { origin } => {
                inner.write_origin(origin);
                lent.host.run_transition(origin, &mut || inner.preferences.set_mode(target));
            },
            ToggleTransition::Immediate => inner.preferences.set_mode(target),
        }
    }

    /// Select the next or previous preset in label order. Returns the new key.
    pub fn cycle_preset(&self, direction: CycleDirection) -> String {
        let key = {
            let inner = self.live();
            let current = inner.preset_key.borrow().clone();
            inner.registry.cycle(&current, direction).to_string()
        };
        self.set_preset(&key);
        key
    }

    /// Select a random preset. Returns the new key.
    pub fn randomize_preset(&self) -> String {
        self.randomize_preset_with(&mut rand::rng())
    }

    /// Select a random preset using `rng`. Returns the new key.
    pub fn randomize_preset_with<R: Rng + ?Sized>(&self, rng: &mut R) -> String {
        let key = self.live().registry.random_key(rng).to_string();
        self.set_preset(&key);
        key
    }

    /// Get notified of every new snapshot.
    pub fn subscribe(&self, callback: impl Fn(&ThemeState) + 'static) -> Subscription {
        self.live().observers.subscribe(callback)
    }

    /// Apply the current state to `target` now and after every change,
    /// until the returned subscription ends.
    pub fn attach_target<T: StyleTarget + 'static>(&self, target: Rc<RefCell<T>>) -> Subscription {
        let inner = self.live();
        let target: SharedTarget = target;

        {
            let state = inner.state.borrow().clone();
            match target.try_borrow_mut() {
                Ok(mut target) => inner.applicator.apply(&state, &mut *target),
                Err(_) => log::warn!("Style target is busy, skipping initial apply"),
            }
        }

        let id = inner.next_target_id.get();
        inner.next_target_id.set(id + 1);
        inner.targets.borrow_mut().push((id, target));

        let weak = Rc::downgrade(&self.inner);
        Subscription::new(move || {
            if let Some(inner) = weak.upgrade() {
                inner.targets.borrow_mut().retain(|(entry, _)| *entry != id);
            }
        })
    }

    /// Re-read the desktop color scheme the service created (or was given
    /// through [ThemeServiceBuilder::system_color_scheme]). Returns whether it
    /// changed. Always `false` for other sources.
    pub fn poll_system(&self) -> bool {
        self.live().poll_system()
    }

    /// Re-read preferences written by another process and apply them.
    pub fn sync_storage(&self) {
        self.live().preferences.sync();
    }

    /// Handle pending change events of the preferences file. Returns whether
    /// storage was re-read.
    #[cfg(feature = "watcher")]
    pub fn pump_storage_events(&self) -> bool {
        let changed = self
            .live()
            .watcher
            .borrow()
            .as_ref()
            .is_some_and(StorageWatcher::poll_changed);
        if changed {
            self.sync_storage();
        }
        changed
    }

    /// Handle pending change events of the preferences file. Always `false`
    /// without the `watcher` feature.
    #[cfg(not(feature = "watcher"))]
    pub fn pump_storage_events(&self) -> bool {
        let _ = self.live();
        false
    }
}

impl std::fmt::Debug for ThemeService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut s = f.debug_struct("ThemeService");
        s.field("disposed", &self.inner.disposed.get());
        if !self.inner.disposed.get() {
            s.field("state", &self.inner.state.borrow());
        }
        s.finish()
    }
}
