//! Fixed timestep accumulator.
//!
//! Converts variable frame durations into a whole number of fixed simulation
//! ticks, dropping time when the host falls too far behind.

/// Maximum frame delta accepted, to prevent a spiral of death.
pub const MAX_FRAME_DT: f32 = 0.25;

/// Fixed timestep accumulator.
#[derive(Debug, Clone)]
pub struct FixedStep {
    /// Fixed simulation delta
    fixed_dt: f32,
    /// Unsimulated time carried between frames
    accumulator: f32,
    /// Upper bound on ticks per frame
    max_steps: u32,
    /// Ticks produced so far
    total_steps: u64,
}

impl Default for FixedStep {
    fn default() -> Self {
        Self::new(60)
    }
}

impl FixedStep {
    /// Creates an accumulator for `tick_rate` ticks per second.
    #[must_use]
    pub fn new(tick_rate: u32) -> Self {
        Self {
            fixed_dt: 1.0 / tick_rate.max(1) as f32,
            accumulator: 0.0,
            max_steps: 10,
            total_steps: 0,
        }
    }

    /// The fixed simulation delta.
    #[must_use]
    pub fn fixed_dt(&self) -> f32 {
        self.fixed_dt
    }

    /// Ticks produced so far.
    #[must_use]
    pub fn total_steps(&self) -> u64 {
        self.total_steps
    }

    /// Adds a frame's worth of time and returns how many ticks to run.
    pub fn accumulate(&mut self, frame_dt: f32) -> u32 {
        let frame_dt = if frame_dt.is_finite() {
            frame_dt.clamp(0.0, MAX_FRAME_DT)
        } else {
            0.0
        };
        self.accumulator += frame_dt;

        let mut count = 0;
        while self.accumulator >= self.fixed_dt && count < self.max_steps {
            self.accumulator -= self.fixed_dt;
            count += 1;
        }

        // Still behind after the cap: drop the backlog
        if self.accumulator > self.fixed_dt * 2.0 {
            self.accumulator = 0.0;
        }

        self.total_steps += u64::from(count);
        count
    }

    /// Interpolation factor between the last two ticks, in `[0, 1)`.
    #[must_use]
    pub fn alpha(&self) -> f32 {
        self.accumulator / self.fixed_dt
    }
}
