#![warn(missing_docs)]

//! Light/dark mode and palette presets that persist, follow the OS, and
//! project onto any style target.

pub use tinct_core as core;
pub use tinct_services as services;
pub use tinct_theme as theme;

/// A "prelude" for users of tinct.
///
/// Importing this module brings into scope the most common types
/// needed to set up a theme service.
///
/// ```rust
/// use tinct::prelude::*;
///
/// let service = ThemeService::builder()
///     .storage(MemoryStorage::new())
///     .color_scheme(ManualColorScheme::new(false))
///     .transitions(ImmediateTransitions)
///     .build();
///
/// service.set_mode(ModePreference::Dark);
/// assert_eq!(service.resolved_mode(), ResolvedMode::Dark);
/// ```
pub mod prelude {
    pub use crate::core::applicator::{CssVariables, StyleApplicator, StyleTarget};
    pub use crate::core::context::{provide, try_use_theme, use_theme};
    pub use crate::core::error::StyleError;
    pub use crate::core::service::{ThemeService, ThemeServiceBuilder};
    pub use crate::core::transition::{ImmediateTransitions, RevealTransition, TransitionHost};

    pub use crate::services::storage::{FileStorage, KeyValueStorage, MemoryStorage};
    pub use crate::services::system::{ColorSchemeSource, ManualColorScheme, SystemColorScheme};

    pub use crate::theme::builtin::builtin_registry;
    pub use crate::theme::config::ThemeConfig;
    pub use crate::theme::mode::{ModePreference, ResolvedMode};
    pub use crate::theme::observer::Subscription;
    pub use crate::theme::preset::PresetDefinition;
    pub use crate::theme::registry::{CycleDirection, PresetRegistry};
    pub use crate::theme::state::ThemeState;
    pub use crate::theme::style::StyleSet;
    pub use crate::theme::transition::{Coords, TransitionConfig};
}
