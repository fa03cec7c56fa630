//! # Theme Transitions
//!
//! Decides whether a mode toggle animates, and tracks a running circular
//! reveal that expands from the point the user clicked.

use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

/// Configuration for theme transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransitionConfig {
    /// Whether transitions are enabled.
    #[serde(default)]
    pub enabled: bool,
    /// Transition duration in milliseconds.
    #[serde(default = "default_duration_ms")]
    pub duration_ms: u64,
}

fn default_duration_ms() -> u64 {
    300
}

impl TransitionConfig {
    /// Create a new transition configuration.
    pub fn new(enabled: bool, duration_ms: u64) -> Self {
        Self { enabled, duration_ms }
    }

    /// Get the transition duration.
    pub fn duration(&self) -> Duration {
        Duration::from_millis(self.duration_ms)
    }

    /// Check if transitions are enabled.
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }
}

impl Default for TransitionConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            duration_ms: default_duration_ms(),
        }
    }
}

/// Viewport coordinates (in pixels) a reveal starts from.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Coords {
    /// Horizontal position.
    pub x: f32,
    /// Vertical position.
    pub y: f32,
}

impl Coords {
    /// Create coordinates.
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// How a mode toggle is carried out.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ToggleTransition {
    /// Flip the mode right away.
    Immediate,
    /// Flip the mode inside an animated reveal centred on `origin`.
    Animated {
        /// Where the reveal starts.
        origin: Coords,
    },
}

/// Choose how to toggle.
///
/// Animation needs all three: the host can animate, the user has not asked
/// for reduced motion, and coordinates were supplied.
pub fn plan_toggle(supports_transitions: bool, prefers_reduced_motion: bool, coords: Option<Coords>) -> ToggleTransition {
    match coords {
        Some(origin) if supports_transitions && !prefers_reduced_motion => ToggleTransition::Animated { origin },
        _ => ToggleTransition::Immediate,
    }
}

/// A running circular reveal.
#[derive(Debug, Clone)]
pub struct Reveal {
    origin: Coords,
    start_time: Instant,
    duration: Duration,
}

impl Reveal {
    /// Start a reveal now.
    pub fn new(origin: Coords, duration: Duration) -> Self {
        Self::starting_at(origin, duration, Instant::now())
    }

    /// Start a reveal at a given instant.
    pub fn starting_at(origin: Coords, duration: Duration, start_time: Instant) -> Self {
        Self {
            origin,
            start_time,
            duration,
        }
    }

    /// Where the reveal started.
    pub fn origin(&self) -> Coords {
        self.origin
    }

    /// Progress at `now`, from 0.0 to 1.0.
    pub fn progress_at(&self, now: Instant) -> f32 {
        let elapsed = now.saturating_duration_since(self.start_time);
        if self.duration.is_zero() || elapsed >= self.duration {
            1.0
        } else {
            elapsed.as_secs_f32() / self.duration.as_secs_f32()
        }
    }

    /// Progress now.
    pub fn progress(&self) -> f32 {
        self.progress_at(Instant::now())
    }

    /// Whether the reveal has finished at `now`.
    pub fn is_complete_at(&self, now: Instant) -> bool {
        self.progress_at(now) >= 1.0
    }

    /// Radius that covers the whole `width` x `height` viewport from the origin.
    pub fn final_radius(&self, width: f32, height: f32) -> f32 {
        let dx = self.origin.x.max(width - self.origin.x);
        let dy = self.origin.y.max(height - self.origin.y);
        dx.hypot(dy)
    }

    /// Radius of the reveal circle at `now`.
    pub fn radius_at(&self, now: Instant, width: f32, height: f32) -> f32 {
        self.final_radius(width, height) * self.progress_at(now)
    }
}
