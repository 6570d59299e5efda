//! Delay gate between "sticks centered" and heading-hold engaging.

use core::time::Duration;

use crate::config::{Corrections, HoldConfig};

/// Hold delay in milliseconds for the current drive speeds.
///
/// The delay is meant to scale with how hard the robot is still turning. By
/// default the left speed is compared against itself, so the delay is always
/// zero; `hook_delay_uses_right_speed` compares left against right instead.
pub fn hook_delay(
    left_speed: f64,
    right_speed: f64,
    config: &HoldConfig,
    corrections: &Corrections,
) -> f64 {
    let other = if corrections.hook_delay_uses_right_speed {
        right_speed
    } else {
        left_speed
    };
    (left_speed - other).abs() * config.hook_multiplier
}

/// Timer that restarts each time the sticks become centered.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct HoldTimer {
    pub running: bool,
    pub started_at: Duration,
}

/// What the timer decided on one tick.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct TimerTick {
    pub elapsed_ms: f64,
    pub driving_straight: bool,
}

impl HoldTimer {
    /// Advance the timer by one tick.
    ///
    /// Elapsed time is the difference of the two millisecond counts and must
    /// strictly exceed `hook_delay`, so a zero delay still needs the clock to
    /// cross one millisecond boundary while centered. Afterwards the timer runs
    /// exactly while the sticks are centered.
    pub fn tick(&mut self, sticks_centered: bool, hook_delay: f64, now: Duration) -> TimerTick {
        if sticks_centered && !self.running {
            self.started_at = now;
        }

        let elapsed_ms = now.as_millis().saturating_sub(self.started_at.as_millis()) as f64;
        let driving_straight = sticks_centered && elapsed_ms > hook_delay;

        self.running = sticks_centered;

        TimerTick {
            elapsed_ms,
            driving_straight,
        }
    }
}
