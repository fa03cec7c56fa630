// SPDX-License-Identifier: LGPL-3.0-only

//! Reactive mode resolution.

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use tinct_theme::mode::{resolve_mode, ModePreference, ResolvedMode};
use tinct_theme::observer::{Observers, Subscription};

use crate::system_observer::SystemSignalObserver;

struct ResolverInner {
    system: SystemSignalObserver,
    preference: Cell<ModePreference>,
    resolved: Cell<ResolvedMode>,
    system_watch: RefCell<Option<Subscription>>,
    observers: Observers<ResolvedMode>,
}

impl ResolverInner {
    fn update(&self, resolved: ResolvedMode) {
        if self.resolved.replace(resolved) != resolved {
            log::debug!("Resolved mode changed to {}", resolved);
            self.observers.notify(&resolved);
        }
    }

    fn follow_system(self: &Rc<Self>) {
        if self.system_watch.borrow().is_some() {
            return;
        }

        let weak: Weak<ResolverInner> = Rc::downgrade(self);
        let watch = self.system.subscribe(move |signal| {
            if let Some(inner) = weak.upgrade() {
                if inner.preference.get() == ModePreference::System {
                    inner.update(signal);
                }
            }
        });
        *self.system_watch.borrow_mut() = Some(watch);
    }

    fn stop_following_system(&self) {
        let watch = self.system_watch.borrow_mut().take();
        drop(watch);
    }
}

/// Holds the mode preference and keeps the resolved mode up to date.
///
/// While the preference is [ModePreference::System] the resolver is
/// subscribed to the system signal; for `Light` and `Dark` it is not, so OS
/// changes cause no work at all. Listeners are only told about actual
/// changes of the resolved mode.
pub struct ModeResolver {
    inner: Rc<ResolverInner>,
}

impl ModeResolver {
    /// Create a resolver for `preference`.
    pub fn new(preference: ModePreference, system: SystemSignalObserver) -> Self {
        let resolved = resolve_mode(preference, system.current_signal());
        let inner = Rc::new(ResolverInner {
            system,
            preference: Cell::new(preference),
            resolved: Cell::new(resolved),
            system_watch: RefCell::new(None),
            observers: Observers::new(),
        });

        if preference == ModePreference::System {
            inner.follow_system();
        }

        Self { inner }
    }

    /// Current preference.
    pub fn preference(&self) -> ModePreference {
        self.inner.preference.get()
    }

    /// Current resolved mode.
    pub fn resolved(&self) -> ResolvedMode {
        self.inner.resolved.get()
    }

    /// Whether the resolver is watching the system signal.
    pub fn is_following_system(&self) -> bool {
        self.inner.system_watch.borrow().is_some()
    }

    /// Change the preference and re-resolve.
    pub fn set_preference(&self, preference: ModePreference) {
        if self.inner.preference.replace(preference) == preference {
            return;
        }

        match preference {
            ModePreference::System => {
                // Read the signal before subscribing so there is no stale window.
                self.inner.update(self.inner.system.current_signal());
                self.inner.follow_system();
            },
            ModePreference::Light | ModePreference::Dark => {
                self.inner.stop_following_system();
                self.inner.update(resolve_mode(preference, self.inner.system.current_signal()));
            },
        }
    }

    /// Stop watching the system signal for good. The resolved mode is frozen
    /// until the next [ModeResolver::set_preference].
    pub fn release(&self) {
        self.inner.stop_following_system();
    }

    /// Get notified when the resolved mode changes.
    pub fn subscribe(&self, callback: impl Fn(ResolvedMode) + 'static) -> Subscription {
        self.inner.observers.subscribe(move |mode| callback(*mode))
    }
}

impl Drop for ModeResolver {
    fn drop(&mut self) {
        self.inner.stop_following_system();
    }
}

impl std::fmt::Debug for ModeResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModeResolver")
            .field("preference", &self.preference())
            .field("resolved", &self.resolved())
            .field("following_system", &self.is_following_system())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use tinct_services::system::ManualColorScheme;

    use super::*;

    fn setup(preference: ModePreference, dark: bool) -> (ManualColorScheme, ModeResolver) {
        let source = ManualColorScheme::new(dark);
        let observer = SystemSignalObserver::new(Rc::new(source.clone()));
        (source, ModeResolver::new(preference, observer))
    }

    #[test]
    fn explicit_preferences_ignore_the_signal() {
        for dark in [false, true] {
            let (_, light) = setup(ModePreference::Light, dark);
            assert_eq!(light.resolved(), ResolvedMode::Light);
            let (_, dark_pref) = setup(ModePreference::Dark, dark);
            assert_eq!(dark_pref.resolved(), ResolvedMode::Dark);
        }
    }

    #[test]
    fn system_follows_the_signal() {
        let (source, resolver) = setup(ModePreference::System, true);
        assert_eq!(resolver.resolved(), ResolvedMode::Dark);

        source.set_prefers_dark(false);
        assert_eq!(resolver.resolved(), ResolvedMode::Light);
    }

    #[test]
    fn leaving_system_detaches_immediately() {
        let (source, resolver) = setup(ModePreference::System, false);
        assert_eq!(source.watcher_count(), 1);

        resolver.set_preference(ModePreference::Light);
        assert_eq!(source.watcher_count(), 0);
        assert!(!resolver.is_following_system());

        let changes = Rc::new(Cell::new(0));
        let counter = changes.clone();
        let _sub = resolver.subscribe(move |_| counter.set(counter.get() + 1));

        source.set_prefers_dark(true);
        assert_eq!(resolver.resolved(), ResolvedMode::Light);
        assert_eq!(changes.get(), 0);
    }

    #[test]
    fn returning_to_system_reads_the_current_signal() {
        let (source, resolver) = setup(ModePreference::Light, false);
        source.set_prefers_dark(true);

        resolver.set_preference(ModePreference::System);
        assert_eq!(resolver.resolved(), ResolvedMode::Dark);
        assert_eq!(source.watcher_count(), 1);

        // Repeated switches never stack watches.
        resolver.set_preference(ModePreference::Dark);
        resolver.set_preference(ModePreference::System);
        assert_eq!(source.watcher_count(), 1);
    }

    #[test]
    fn notifies_only_on_resolved_changes() {
        let (source, resolver) = setup(ModePreference::System, true);
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = seen.clone();
        let _sub = resolver.subscribe(move |mode| sink.borrow_mut().push(mode));

        // System resolved to dark already; an explicit dark changes nothing.
        resolver.set_preference(ModePreference::Dark);
        source.set_prefers_dark(false);
        resolver.set_preference(ModePreference::Light);

        assert_eq!(*seen.borrow(), vec![ResolvedMode::Light]);
    }

    #[test]
    fn dropping_the_resolver_releases_the_watch() {
        let (source, resolver) = setup(ModePreference::System, false);
        drop(resolver);
        assert_eq!(source.watcher_count(), 0);
    }
}
