// SPDX-License-Identifier: LGPL-3.0-only

//! Typed preference slots on top of a [KeyValueStorage].
//!
//! Two slots are persisted: the mode preference and the preset key. Each is
//! stored as a raw JSON scalar (`"dark"`, `"ocean-breeze"`) under the key
//! named by [StorageKeys].
//!
//! Listeners registered with [PreferenceStore::subscribe] run synchronously:
//! by the time `set_mode`/`set_preset` returns, every listener has seen the
//! change. Write failures are logged and never reach the caller; the
//! in-memory value is updated regardless.

use std::cell::{Cell, RefCell};

use serde::de::DeserializeOwned;
use tinct_theme::config::StorageKeys;
use tinct_theme::mode::ModePreference;
use tinct_theme::observer::{Observers, Subscription};

use crate::storage::KeyValueStorage;

/// A change to one preference slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PreferenceChange {
    /// The mode preference changed.
    Mode(ModePreference),
    /// The preset key changed.
    Preset(String),
}

/// Persistent mode and preset preferences.
pub struct PreferenceStore {
    storage: RefCell<Box<dyn KeyValueStorage>>,
    keys: StorageKeys,
    default_mode: ModePreference,
    mode: Cell<ModePreference>,
    preset: RefCell<Option<String>>,
    observers: Observers<PreferenceChange>,
}

impl PreferenceStore {
    /// Load both slots from `storage`.
    ///
    /// A missing or undecodable mode falls back to `default_mode`; a missing
    /// or undecodable preset is left unset.
    pub fn new(storage: Box<dyn KeyValueStorage>, keys: StorageKeys, default_mode: ModePreference) -> Self {
        let mode = read_slot(storage.as_ref(), &keys.mode_key).unwrap_or(default_mode);
        let preset = read_slot(storage.as_ref(), &keys.preset_key);

        log::debug!("Loaded preferences: mode={}, preset={:?}", mode, preset);

        Self {
            storage: RefCell::new(storage),
            keys,
            default_mode,
            mode: Cell::new(mode),
            preset: RefCell::new(preset),
            observers: Observers::new(),
        }
    }

    /// Storage keys in use.
    pub fn keys(&self) -> &StorageKeys {
        &self.keys
    }

    /// The mode used when nothing valid is persisted.
    pub fn default_mode(&self) -> ModePreference {
        self.default_mode
    }

    /// Current mode preference.
    pub fn mode(&self) -> ModePreference {
        self.mode.get()
    }

    /// Persisted preset key, if any.
    pub fn preset(&self) -> Option<String> {
        self.preset.borrow().clone()
    }

    /// Persist a mode preference and notify listeners.
    ///
    /// Setting the current value again writes nothing and notifies nobody.
    pub fn set_mode(&self, mode: ModePreference) {
        if self.mode.get() == mode {
            return;
        }

        self.mode.set(mode);
        self.write(&self.keys.mode_key, mode.as_str());
        self.observers.notify(&PreferenceChange::Mode(mode));
    }

    /// Persist a preset key and notify listeners.
    ///
    /// The key is stored as given; callers validate it against a registry.
    pub fn set_preset(&self, key: &str) {
        if self.preset.borrow().as_deref() == Some(key) {
            return;
        }

        *self.preset.borrow_mut() = Some(key.to_string());
        self.write(&self.keys.preset_key, key);
        self.observers.notify(&PreferenceChange::Preset(key.to_string()));
    }

    /// Register a change listener.
    pub fn subscribe(&self, callback: impl Fn(&PreferenceChange) + 'static) -> Subscription {
        self.observers.subscribe(callback)
    }

    /// Re-read storage and notify listeners of every slot that changed.
    ///
    /// Used after another writer touched the backing store.
    pub fn sync(&self) {
        if let Err(e) = self.storage.borrow_mut().reload() {
            log::warn!("Failed to reload preferences: {}", e);
            return;
        }

        let (mode, preset) = {
            let storage = self.storage.borrow();
            (
                read_slot(storage.as_ref(), &self.keys.mode_key).unwrap_or(self.default_mode),
                read_slot::<String>(storage.as_ref(), &self.keys.preset_key),
            )
        };

        if mode != self.mode.get() {
            log::debug!("Mode preference changed externally: {}", mode);
            self.mode.set(mode);
            self.observers.notify(&PreferenceChange::Mode(mode));
        }

        if preset != *self.preset.borrow() {
            log::debug!("Preset preference changed externally: {:?}", preset);
            *self.preset.borrow_mut() = preset.clone();
            if let Some(key) = preset {
                self.observers.notify(&PreferenceChange::Preset(key));
            }
        }
    }

    fn write(&self, key: &str, value: &str) {
        let encoded = match serde_json::to_string(value) {
            Ok(encoded) => encoded,
            Err(e) => {
                log::warn!("Failed to encode preference '{}': {}", key, e);
                return;
            },
        };

        if let Err(e) = self.storage.borrow_mut().set(key, &encoded) {
            log::warn!("Failed to persist preference '{}': {}", key, e);
        }
    }
}

impl std::fmt::Debug for PreferenceStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PreferenceStore")
            .field("keys", &self.keys)
            .field("mode", &self.mode.get())
            .field("preset", &self.preset.borrow())
            .field("listeners", &self.observers.len())
            .finish()
    }
}

/// Decode one slot, logging values that are present but corrupt.
fn read_slot<T: DeserializeOwned>(storage: &dyn KeyValueStorage, key: &str) -> Option<T> {
    let raw = storage.get(key)?;
    match serde_json::from_str(&raw) {
        Ok(value) => Some(value),
        Err(e) => {
            log::warn!("Ignoring corrupt preference '{}' ({:?}): {}", key, raw, e);
            None
        },
    }
}
