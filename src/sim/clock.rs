//! Fixed timestep clock
//!
//! Converts variable real frame time into a whole number of uniform
//! simulation steps. Works in integer nanoseconds so step counts never drift.

use std::time::Duration;

use crate::settings::ClockSettings;

#[derive(Debug, Clone)]
pub struct Clock {
    step: Duration,
    max_frame_delta: Duration,
    accumulator: Duration,
}

impl Clock {
    pub fn new(step: Duration, max_frame_delta: Duration) -> Self {
        assert!(!step.is_zero(), "clock step must be positive");
        Self {
            step,
            max_frame_delta,
            accumulator: Duration::ZERO,
        }
    }

    pub fn from_settings(settings: &ClockSettings) -> Self {
        Self::new(
            Duration::from_secs_f64(settings.step_secs),
            Duration::from_secs_f64(settings.max_frame_delta),
        )
    }

    /// Feed real elapsed time, returning how many fixed steps to simulate.
    ///
    /// Deltas above `max_frame_delta` are clamped; the excess is dropped
    /// instead of turning into a burst of catch-up steps.
    pub fn tick(&mut self, real_delta: Duration) -> u32 {
        let delta = if real_delta > self.max_frame_delta {
            log::warn!(
                "Frame delta {:?} exceeds cap {:?}, discarding excess",
                real_delta,
                self.max_frame_delta
            );
            self.max_frame_delta
        } else {
            real_delta
        };

        self.accumulator += delta;
        let step_nanos = self.step.as_nanos();
        let acc_nanos = self.accumulator.as_nanos();
        let steps = acc_nanos / step_nanos;
        let remainder = acc_nanos % step_nanos;
        // remainder < step, which itself fits in a Duration
        self.accumulator = Duration::from_nanos(remainder as u64);
        u32::try_from(steps).unwrap_or_else(|_| {
            log::warn!("{} steps owed this frame, saturating at u32::MAX", steps);
            u32::MAX
        })
    }

    /// Step length in seconds, for integrating velocities
    pub fn step_secs(&self) -> f32 {
        self.step.as_secs_f32()
    }

    pub fn step(&self) -> Duration {
        self.step
    }

    /// Fraction of a step left in the accumulator (render interpolation)
    pub fn alpha(&self) -> f32 {
        (self.accumulator.as_secs_f64() / self.step.as_secs_f64()) as f32
    }

    /// Drop any carried remainder
    pub fn reset(&mut self) {
        self.accumulator = Duration::ZERO;
    }
}
