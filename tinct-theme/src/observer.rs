//! Listener registry used by every notifying part of tinct.
//!
//! [Observers] is based on [Rc] and [RefCell] like the rest of the reactive
//! graph and is meant for a single UI thread. Dispatch iterates a snapshot of
//! the listeners, so subscribing or unsubscribing from inside a listener is
//! allowed:
//!
//! - a listener removed mid-dispatch is not called if its turn has not come yet,
//! - a listener added mid-dispatch is first called on the next notification,
//! - every listener is called at most once per notification.

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

struct Entry<T> {
    id: u64,
    active: Cell<bool>,
    callback: Box<dyn Fn(&T)>,
}

struct Registry<T> {
    next_id: Cell<u64>,
    entries: RefCell<Vec<Rc<Entry<T>>>>,
}

impl<T> Registry<T> {
    fn remove(&self, id: u64) {
        let mut entries = self.entries.borrow_mut();
        if let Some(index) = entries.iter().position(|entry| entry.id == id) {
            entries.remove(index).active.set(false);
        }
    }
}

/// Ordered set of listeners for values of type `T`.
pub struct Observers<T: 'static> {
    registry: Rc<Registry<T>>,
}

impl<T: 'static> Observers<T> {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            registry: Rc::new(Registry {
                next_id: Cell::new(0),
                entries: RefCell::new(Vec::new()),
            }),
        }
    }

    /// Register a listener. It stays registered until the returned
    /// [Subscription] is dropped or unsubscribed.
    pub fn subscribe(&self, callback: impl Fn(&T) + 'static) -> Subscription {
        let id = self.registry.next_id.get();
        self.registry.next_id.set(id + 1);

        self.registry.entries.borrow_mut().push(Rc::new(Entry {
            id,
            active: Cell::new(true),
            callback: Box::new(callback),
        }));

        let registry: Weak<Registry<T>> = Rc::downgrade(&self.registry);
        Subscription::new(move || {
            if let Some(registry) = registry.upgrade() {
                registry.remove(id);
            }
        })
    }

    /// Call every listener with `value`.
    pub fn notify(&self, value: &T) {
        self.notify_while(value, || true);
    }

    /// Call listeners with `value` until `current` returns `false`.
    ///
    /// `current` is checked before each listener.
    pub fn notify_while(&self, value: &T, current: impl Fn() -> bool) {
        let snapshot: Vec<Rc<Entry<T>>> = self.registry.entries.borrow().clone();
        for entry in snapshot {
            if !current() {
                break;
            }
            if entry.active.get() {
                (entry.callback)(value);
            }
        }
    }

    /// Number of registered listeners.
    pub fn len(&self) -> usize {
        self.registry.entries.borrow().len()
    }

    /// Whether no listener is registered.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Remove every listener. Outstanding subscriptions become no-ops.
    pub fn clear(&self) {
        for entry in self.registry.entries.borrow_mut().drain(..) {
            entry.active.set(false);
        }
    }
}

impl<T: 'static> Default for Observers<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Handle to a registered listener.
///
/// Dropping the handle removes the listener. Use [Subscription::forget] to
/// keep it registered for the lifetime of the registry.
#[must_use = "dropping a Subscription removes the listener immediately"]
pub struct Subscription {
    cancel: Option<Box<dyn FnOnce()>>,
}

impl Subscription {
    /// Create a subscription that runs `cancel` once when it ends.
    pub fn new(cancel: impl FnOnce() + 'static) -> Self {
        Self {
            cancel: Some(Box::new(cancel)),
        }
    }

    /// A subscription with nothing to cancel.
    pub fn empty() -> Self {
        Self { cancel: None }
    }

    /// Remove the listener now.
    pub fn unsubscribe(mut self) {
        self.cancel_now();
    }

    /// Keep the listener registered and drop the handle.
    pub fn forget(mut self) {
        self.cancel = None;
    }

    fn cancel_now(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.cancel_now();
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.cancel.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn notifies_in_subscription_order() {
        let observers = Observers::<u32>::new();
        let log = Rc::new(RefCell::new(Vec::new()));

        let l1 = log.clone();
        let _a = observers.subscribe(move |v| l1.borrow_mut().push(("a", *v)));
        let l2 = log.clone();
        let _b = observers.subscribe(move |v| l2.borrow_mut().push(("b", *v)));

        observers.notify(&1);
        assert_eq!(*log.borrow(), vec![("a", 1), ("b", 1)]);
    }

    #[test]
    fn notify_while_stops_once_superseded() {
        let observers = Observers::<u32>::new();
        let log = Rc::new(RefCell::new(Vec::new()));
        let live = Rc::new(Cell::new(true));

        let (l1, stop) = (log.clone(), live.clone());
        let _a = observers.subscribe(move |v| {
            l1.borrow_mut().push(("a", *v));
            stop.set(false);
        });
        let l2 = log.clone();
        let _b = observers.subscribe(move |v| l2.borrow_mut().push(("b", *v)));

        let check = live.clone();
        observers.notify_while(&1, move || check.get());
        assert_eq!(*log.borrow(), vec![("a", 1)]);
    }

    #[test]
    fn dropping_the_subscription_removes_the_listener() {
        let observers = Observers::<u32>::new();
        let count = Rc::new(Cell::new(0));

        let c = count.clone();
        let sub = observers.subscribe(move |_| c.set(c.get() + 1));
        observers.notify(&0);
        drop(sub);
        observers.notify(&0);

        assert_eq!(count.get(), 1);
        assert!(observers.is_empty());
    }

    #[test]
    fn forget_keeps_the_listener() {
        let observers = Observers::<u32>::new();
        let count = Rc::new(Cell::new(0));

        let c = count.clone();
        observers.subscribe(move |_| c.set(c.get() + 1)).forget();
        observers.notify(&0);

        assert_eq!(count.get(), 1);
        assert_eq!(observers.len(), 1);
    }

    #[test]
    fn listener_removed_during_dispatch_is_skipped() {
        let observers = Rc::new(Observers::<u32>::new());
        let second_calls = Rc::new(Cell::new(0));
        let slot: Rc<RefCell<Option<Subscription>>> = Rc::new(RefCell::new(None));

        let s = slot.clone();
        let _first = observers.subscribe(move |_| {
            s.borrow_mut().take();
        });
        let c = second_calls.clone();
        *slot.borrow_mut() = Some(observers.subscribe(move |_| c.set(c.get() + 1)));

        observers.notify(&0);
        assert_eq!(second_calls.get(), 0);
        assert_eq!(observers.len(), 1);
    }

    #[test]
    fn listener_added_during_dispatch_waits_for_next_notification() {
        let observers = Rc::new(Observers::<u32>::new());
        let late_calls = Rc::new(Cell::new(0));
        let held: Rc<RefCell<Vec<Subscription>>> = Rc::new(RefCell::new(Vec::new()));

        let obs = Rc::downgrade(&observers);
        let calls = late_calls.clone();
        let h = held.clone();
        let _adder = observers.subscribe(move |_| {
            if let Some(obs) = obs.upgrade() {
                if h.borrow().is_empty() {
                    let calls = calls.clone();
                    h.borrow_mut()
                        .push(obs.subscribe(move |_| calls.set(calls.get() + 1)));
                }
            }
        });

        observers.notify(&0);
        assert_eq!(late_calls.get(), 0);
        observers.notify(&0);
        assert_eq!(late_calls.get(), 1);
    }

    #[test]
    fn clear_detaches_everything() {
        let observers = Observers::<u32>::new();
        let count = Rc::new(Cell::new(0));
        let c = count.clone();
        let sub = observers.subscribe(move |_| c.set(c.get() + 1));

        observers.clear();
        observers.notify(&0);
        sub.unsubscribe();

        assert_eq!(count.get(), 0);
    }
}
