// SPDX-License-Identifier: LGPL-3.0-only

//! Shares one OS color-scheme watch among any number of consumers.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use tinct_services::system::ColorSchemeSource;
use tinct_theme::mode::ResolvedMode;
use tinct_theme::observer::{Observers, Subscription};

struct ObserverInner {
    source: Rc<dyn ColorSchemeSource>,
    observers: Observers<ResolvedMode>,
    upstream: RefCell<Option<Subscription>>,
}

impl ObserverInner {
    fn attach(self: &Rc<Self>) {
        if self.upstream.borrow().is_some() {
            return;
        }

        let weak: Weak<ObserverInner> = Rc::downgrade(self);
        let subscription = self.source.watch(Box::new(move |prefers_dark| {
            if let Some(inner) = weak.upgrade() {
                let mode = ResolvedMode::from_prefers_dark(prefers_dark);
                log::debug!("System color scheme is now {}", mode);
                inner.observers.notify(&mode);
            }
        }));

        log::trace!("Attached system color scheme watch");
        *self.upstream.borrow_mut() = Some(subscription);
    }

    fn detach_if_unused(&self) {
        if !self.observers.is_empty() {
            return;
        }

        let upstream = self.upstream.borrow_mut().take();
        if upstream.is_some() {
            log::trace!("Detached system color scheme watch");
        }
        drop(upstream);
    }
}

/// The OS color-scheme signal as a [ResolvedMode].
///
/// At most one watch is attached to the underlying source, and only while
/// somebody is subscribed. Clones share the same watch.
#[derive(Clone)]
pub struct SystemSignalObserver {
    inner: Rc<ObserverInner>,
}

impl SystemSignalObserver {
    /// Wrap a color scheme source.
    pub fn new(source: Rc<dyn ColorSchemeSource>) -> Self {
        Self {
            inner: Rc::new(ObserverInner {
                source,
                observers: Observers::new(),
                upstream: RefCell::new(None),
            }),
        }
    }

    /// Read the signal now.
    pub fn current_signal(&self) -> ResolvedMode {
        ResolvedMode::from_prefers_dark(self.inner.source.prefers_dark())
    }

    /// Get notified of every change of the signal.
    pub fn subscribe(&self, callback: impl Fn(ResolvedMode) + 'static) -> Subscription {
        let listener = self.inner.observers.subscribe(move |mode| callback(*mode));
        self.inner.attach();

        let weak = Rc::downgrade(&self.inner);
        Subscription::new(move || {
            listener.unsubscribe();
            if let Some(inner) = weak.upgrade() {
                inner.detach_if_unused();
            }
        })
    }

    /// Whether a watch is currently attached to the source.
    pub fn is_attached(&self) -> bool {
        self.inner.upstream.borrow().is_some()
    }

    /// Number of subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.inner.observers.len()
    }
}

impl std::fmt::Debug for SystemSignalObserver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SystemSignalObserver")
            .field("attached", &self.is_attached())
            .field("subscribers", &self.subscriber_count())
            .finish()
    }
}
