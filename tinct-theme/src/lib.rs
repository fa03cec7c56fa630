#![warn(missing_docs)]

//! # Tinct Theming Layer
//!
//! Data model and pure logic of the tinct theme engine: light/dark mode
//! preferences, palette presets, theme composition and configuration.
//! Nothing in this crate touches the operating system or persistent storage;
//! see `tinct-services` and `tinct-core` for that.
//!
//! ## Overview
//!
//! - **[ModePreference](mode::ModePreference)**: what the user asked for (light, dark or system)
//! - **[ResolvedMode](mode::ResolvedMode)**: what is actually applied (light or dark)
//! - **[PresetDefinition](preset::PresetDefinition)**: a named palette with styles for both modes
//! - **[PresetRegistry](registry::PresetRegistry)**: all known presets plus a designated default
//! - **[ThemeState](state::ThemeState)**: the composed snapshot handed to style targets
//! - **[ThemeConfig](config::ThemeConfig)**: defaults from environment variables and TOML files
//! - **[Observers](observer::Observers)**: the listener registry the reactive graph is built on
//!
//! ## Quick Start
//!
//! ```rust
//! use tinct_theme::builtin::builtin_registry;
//! use tinct_theme::mode::{resolve_mode, ModePreference, ResolvedMode};
//! use tinct_theme::state::ThemeState;
//!
//! let registry = builtin_registry();
//!
//! // The OS reports dark, the user follows the system.
//! let mode = resolve_mode(ModePreference::System, ResolvedMode::Dark);
//! let state = ThemeState::compose("ocean-breeze", mode, &registry);
//!
//! assert_eq!(state.resolved_mode, ResolvedMode::Dark);
//! assert!(state.styles.get("primary").is_some());
//! ```
//!
//! ## Presets from Files
//!
//! ```rust,no_run
//! use tinct_theme::builtin::builtin_registry;
//!
//! let mut registry = builtin_registry();
//! let added = registry.load_file("presets.toml").unwrap();
//! println!("{added} presets loaded");
//! ```

/// Contains the built-in presets.
pub mod builtin;
/// Contains the [config::ThemeConfig] struct for theme configuration.
pub mod config;
/// Contains the [error::ThemeError] type.
pub mod error;
/// Contains mode preferences and their resolution.
pub mod mode;
/// Contains the [observer::Observers] listener registry.
pub mod observer;
/// Contains palette preset definitions.
pub mod preset;
/// Contains the [registry::PresetRegistry].
pub mod registry;
/// Contains the [state::ThemeState] snapshot.
pub mod state;
/// Contains the [style::StyleSet] type.
pub mod style;
/// Contains transition planning and reveal progress.
pub mod transition;

pub use error::{ThemeError, ThemeResult};
pub use mode::{resolve_mode, ModePreference, ResolvedMode};
pub use preset::{PresetDefinition, PresetDocument};
pub use registry::{CycleDirection, PresetRegistry};
pub use state::ThemeState;
pub use style::StyleSet;
