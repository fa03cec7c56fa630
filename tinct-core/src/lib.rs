// SPDX-License-Identifier: LGPL-3.0-only

#![warn(missing_docs)]

//! Core library for tinct => See `tinct` crate.
//!
//! Wires preferences, the OS color-scheme signal and the preset registry into
//! a reactive chain and applies the result to style targets.

/// Contains the [StyleTarget](applicator::StyleTarget) trait and the [StyleApplicator](applicator::StyleApplicator).
pub mod applicator;

/// Contains scoped access to a [ThemeService](service::ThemeService).
pub mod context;

/// Contains the [StyleError](error::StyleError) type.
pub mod error;

/// Contains the reactive [ModeResolver](resolver::ModeResolver).
pub mod resolver;

/// Contains the [ThemeService](service::ThemeService) facade.
pub mod service;

/// Contains the shared OS color-scheme observer.
pub mod system_observer;

/// Contains transition hosts for animated mode toggles.
pub mod transition;
