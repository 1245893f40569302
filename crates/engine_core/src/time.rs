//! Time management for the fixed-step simulation loop.

use std::time::Duration;

/// Upper bound on fixed steps drained per frame before the backlog is dropped.
const MAX_STEPS_PER_FRAME: u32 = 8;

/// Manages frame timing and the fixed-step accumulator.
///
/// Hosts feed frame time through [`Time::advance`]; physics runs through
/// [`Time::should_fixed_update`] at a constant rate.
#[derive(Debug)]
pub struct Time {
    /// Total elapsed time since start.
    elapsed: Duration,
    /// Fixed timestep for physics (default 60 Hz).
    fixed_timestep: Duration,
    /// Accumulated time for fixed updates.
    accumulator: Duration,
    /// Fixed steps consumed since start.
    fixed_steps: u64,
}

impl Default for Time {
    fn default() -> Self {
        Self::new()
    }
}

impl Time {
    /// Create a new time manager.
    pub fn new() -> Self {
        Self {
            elapsed: Duration::ZERO,
            fixed_timestep: Duration::from_secs_f64(1.0 / 60.0),
            accumulator: Duration::ZERO,
            fixed_steps: 0,
        }
    }

    /// Advance simulated time by one frame of length `delta`.
    pub fn advance(&mut self, delta: Duration) {
        self.elapsed += delta;
        self.accumulator += delta;

        let max_backlog = self.fixed_timestep * MAX_STEPS_PER_FRAME;
        if self.accumulator > max_backlog {
            log::warn!(
                "Fixed-step backlog of {:.3}s exceeds {} steps, dropping the excess",
                self.accumulator.as_secs_f32(),
                MAX_STEPS_PER_FRAME
            );
            self.accumulator = max_backlog;
        }
    }

    /// Get total elapsed time in seconds.
    pub fn elapsed_seconds(&self) -> f32 {
        self.elapsed.as_secs_f32()
    }

    /// Get the fixed timestep in seconds.
    pub fn fixed_timestep_seconds(&self) -> f32 {
        self.fixed_timestep.as_secs_f32()
    }

    /// Number of fixed steps consumed so far.
    pub fn fixed_steps(&self) -> u64 {
        self.fixed_steps
    }

    /// Check if a fixed update should run and consume the time.
    pub fn should_fixed_update(&mut self) -> bool {
        if self.accumulator >= self.fixed_timestep {
            self.accumulator -= self.fixed_timestep;
            self.fixed_steps += 1;
            true
        } else {
            false
        }
    }

    /// Set the fixed timestep rate in Hz.
    pub fn set_fixed_rate(&mut self, hz: f64) {
        self.fixed_timestep = Duration::from_secs_f64(1.0 / hz);
    }
}
