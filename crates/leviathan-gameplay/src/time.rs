//! Session clock and day/night phases.
//!
//! This module provides:
//! - A monotonic session clock with sanitized frame deltas
//! - The five named phases of the day cycle
//! - A cycle that maps elapsed seconds to a phase

use serde::{Deserialize, Serialize};

/// Delta used when the host reports a missing or invalid frame time.
pub const DEFAULT_DELTA: f32 = 1.0 / 60.0;
/// Largest delta accepted in one tick.
pub const MAX_DELTA: f32 = 0.25;

/// Replaces a missing or invalid frame delta and caps long frames.
#[must_use]
pub fn sanitize_delta(dt: f32) -> f32 {
    if dt.is_finite() && dt > 0.0 {
        dt.min(MAX_DELTA)
    } else {
        DEFAULT_DELTA
    }
}

/// Monotonic time source consumed by the simulation.
pub trait TimeSource {
    /// Elapsed game seconds.
    fn now(&self) -> f64;
    /// Seconds since the previous tick.
    fn delta_seconds(&self) -> f32;
}

/// Simple session clock advanced by the host each frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SimClock {
    now: f64,
    delta: f32,
}

impl SimClock {
    /// Creates a clock at time zero.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a clock at a specific time.
    #[must_use]
    pub fn at(now: f64) -> Self {
        Self { now, delta: 0.0 }
    }

    /// Advances the clock, returning the sanitized delta.
    ///
    /// Non-finite or non-positive deltas become [`DEFAULT_DELTA`]; large
    /// deltas are capped at [`MAX_DELTA`].
    pub fn advance(&mut self, dt: f32) -> f32 {
        let dt = sanitize_delta(dt);
        self.delta = dt;
        self.now += f64::from(dt);
        dt
    }
}

impl TimeSource for SimClock {
    fn now(&self) -> f64 {
        self.now
    }

    fn delta_seconds(&self) -> f32 {
        self.delta
    }
}

/// Named period of the day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DayPhase {
    /// Early morning
    Dawn,
    /// Daytime
    Day,
    /// Afternoon
    Afternoon,
    /// Evening
    Dusk,
    /// Night, when monsters respawn
    Night,
}

impl DayPhase {
    /// Parses the phase names used by the sky system.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "dawn" => Some(Self::Dawn),
            "day" => Some(Self::Day),
            "afternoon" => Some(Self::Afternoon),
            "dusk" => Some(Self::Dusk),
            "night" => Some(Self::Night),
            _ => None,
        }
    }

    /// Whether this is night.
    #[must_use]
    pub const fn is_night(self) -> bool {
        matches!(self, Self::Night)
    }
}

/// Day cycle split into five equal phases.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DayCycle {
    /// Length of one full day in seconds
    pub cycle_seconds: f32,
}

impl Default for DayCycle {
    fn default() -> Self {
        Self {
            cycle_seconds: 200.0,
        }
    }
}

impl DayCycle {
    /// Creates a cycle of the given length.
    #[must_use]
    pub fn new(cycle_seconds: f32) -> Self {
        Self {
            cycle_seconds: cycle_seconds.max(1.0),
        }
    }

    /// Fraction of the current day elapsed, in `[0, 1)`.
    #[must_use]
    pub fn fraction(&self, elapsed: f64) -> f32 {
        let cycle = f64::from(self.cycle_seconds.max(1.0));
        (elapsed.rem_euclid(cycle) / cycle) as f32
    }

    /// Phase at the given elapsed time.
    #[must_use]
    pub fn phase_at(&self, elapsed: f64) -> DayPhase {
        match self.fraction(elapsed) {
            f if f < 0.2 => DayPhase::Dawn,
            f if f < 0.4 => DayPhase::Day,
            f if f < 0.6 => DayPhase::Afternoon,
            f if f < 0.8 => DayPhase::Dusk,
            _ => DayPhase::Night,
        }
    }
}
