// SPDX-License-Identifier: LGPL-3.0-only

//! Hosts that carry out animated mode toggles.

use std::time::Instant;

use tinct_services::system::detect_reduced_motion;
use tinct_theme::transition::{Coords, Reveal, TransitionConfig};

/// The runtime's visual transition capability.
pub trait TransitionHost {
    /// Whether the host can animate a change at all.
    fn supports_transitions(&self) -> bool;

    /// Whether the user asked for reduced motion. Read once per toggle.
    fn prefers_reduced_motion(&self) -> bool;

    /// Run `update` inside an animation that reveals the new state from `origin`.
    ///
    /// `update` must be called exactly once.
    fn run_transition(&mut self, origin: Coords, update: &mut dyn FnMut());
}

/// A host without transition support. Every toggle is immediate.
#[derive(Debug, Clone, Copy, Default)]
pub struct ImmediateTransitions;

impl TransitionHost for ImmediateTransitions {
    fn supports_transitions(&self) -> bool {
        false
    }

    fn prefers_reduced_motion(&self) -> bool {
        false
    }

    fn run_transition(&mut self, _origin: Coords, update: &mut dyn FnMut()) {
        update();
    }
}

/// A host that animates toggles with a circular reveal.
///
/// The renderer reads [RevealTransition::radius] each frame and clips the new
/// state to that circle until the reveal completes.
pub struct RevealTransition {
    config: TransitionConfig,
    reduced_motion: Box<dyn Fn() -> bool>,
    active: Option<Reveal>,
}

impl RevealTransition {
    /// Create a host that reads reduced motion from the desktop.
    pub fn new(config: TransitionConfig) -> Self {
        Self::with_reduced_motion(config, detect_reduced_motion)
    }

    /// Create a host with a custom reduced motion query.
    pub fn with_reduced_motion(config: TransitionConfig, reduced_motion: impl Fn() -> bool + 'static) -> Self {
        Self {
            config,
            reduced_motion: Box::new(reduced_motion),
            active: None,
        }
    }

    /// Transition settings.
    pub fn config(&self) -> &TransitionConfig {
        &self.config
    }

    /// The running reveal, if it has not completed yet.
    pub fn active(&self) -> Option<&Reveal> {
        self.active.as_ref()
    }

    /// Progress of the running reveal.
    pub fn progress(&self) -> Option<f32> {
        self.active.as_ref().map(Reveal::progress)
    }

    /// Current radius of the running reveal in a `width` x `height` viewport.
    pub fn radius(&self, width: f32, height: f32) -> Option<f32> {
        self.active
            .as_ref()
            .map(|reveal| reveal.radius_at(Instant::now(), width, height))
    }

    /// Drop the reveal once it has completed. Returns whether one is still running.
    pub fn update(&mut self) -> bool {
        if self
            .active
            .as_ref()
            .is_some_and(|reveal| reveal.is_complete_at(Instant::now()))
        {
            self.active = None;
        }
        self.active.is_some()
    }
}

impl TransitionHost for RevealTransition {
    fn supports_transitions(&self) -> bool {
        self.config.is_enabled()
    }

    fn prefers_reduced_motion(&self) -> bool {
        (self.reduced_motion)()
    }

    fn run_transition(&mut self, origin: Coords, update: &mut dyn FnMut()) {
        log::debug!("Starting reveal at ({}, {})", origin.x, origin.y);
        self.active = Some(Reveal::new(origin, self.config.duration()));
        update();
    }
}

impl std::fmt::Debug for RevealTransition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RevealTransition")
            .field("config", &self.config)
            .field("active", &self.active)
            .finish()
    }
}
