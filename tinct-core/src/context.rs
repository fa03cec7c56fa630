// SPDX-License-Identifier: LGPL-3.0-only

//! Scoped access to a [ThemeService] without passing it through every call.
//!
//! ```rust
//! use tinct_core::context;
//! use tinct_core::service::ThemeService;
//! use tinct_core::transition::ImmediateTransitions;
//! use tinct_services::storage::MemoryStorage;
//! use tinct_services::system::ManualColorScheme;
//!
//! let service = ThemeService::builder()
//!     .storage(MemoryStorage::new())
//!     .color_scheme(ManualColorScheme::new(true))
//!     .transitions(ImmediateTransitions)
//!     .build();
//!
//! context::provide(&service, || {
//!     let theme = context::use_theme();
//!     assert!(theme.resolved_mode().is_dark());
//! });
//! assert!(context::try_use_theme().is_none());
//! ```

use std::cell::RefCell;

use crate::service::ThemeService;

thread_local! {
    static SCOPES: RefCell<Vec<ThemeService>> = const { RefCell::new(Vec::new()) };
}

struct ScopeGuard;

impl Drop for ScopeGuard {
    fn drop(&mut self) {
        SCOPES.with(|scopes| {
            scopes.borrow_mut().pop();
        });
    }
}

/// Run `f` with `service` as the current theme. Scopes nest; the innermost wins.
pub fn provide<R>(service: &ThemeService, f: impl FnOnce() -> R) -> R {
    SCOPES.with(|scopes| scopes.borrow_mut().push(service.clone()));
    let _guard = ScopeGuard;
    f()
}

/// The current theme.
///
/// # Panics
///
/// Panics when called outside of [provide].
pub fn use_theme() -> ThemeService {
    match try_use_theme() {
        Some(service) => service,
        None => panic!("use_theme() called outside of a theme scope; wrap the caller in context::provide()"),
    }
}

/// The current theme, if inside a [provide] scope.
pub fn try_use_theme() -> Option<ThemeService> {
    SCOPES.with(|scopes| scopes.borrow().last().cloned())
}
