use crate::{
    config::{Corrections, HoldConfig},
    utils::heading_difference,
};

/// Heading-hold corrector state.
///
/// Unlike a textbook PID this one reproduces the tuned robot's arithmetic:
/// the integral is reassigned every tick, the reset band is centered on the
/// target heading rather than zero, and the derivative is computed after the
/// output from a freshly recomputed error, so it only ever feeds the next tick.
/// Each quirk can be turned off through [`Corrections`].
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct HeadingPid {
    pub target_heading: f64,
    pub integral: f64,
    pub prev_error: f64,
    pub derivative: f64,
}

/// Terms that made up one tick's correction.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct PidTerms {
    pub error: f64,
    pub integral: f64,
    pub derivative: f64,
    pub correction: f64,
}

impl HeadingPid {
    /// Capture the heading to hold and clear accumulated terms.
    pub fn engage(&mut self, heading: f64) {
        self.target_heading = heading;
        self.integral = 0.0;
        self.derivative = 0.0;
        self.prev_error = 0.0;
    }

    fn error_to(&self, heading: f64, corrections: &Corrections) -> f64 {
        if corrections.wrap_heading_error {
            heading_difference(self.target_heading, heading)
        } else {
            self.target_heading - heading
        }
    }

    fn integral_resets(&self, error: f64, config: &HoldConfig, corrections: &Corrections) -> bool {
        let tol = config.error_tolerance;
        if corrections.zero_centered_integral_reset {
            error.abs() < tol
        } else {
            // true for every finite error
            error < self.target_heading + tol || error > self.target_heading - tol
        }
    }

    pub fn next(
        &mut self,
        heading: f64,
        config: &HoldConfig,
        corrections: &Corrections,
    ) -> PidTerms {
        let dt = config.tick_period;
        let error = self.error_to(heading, corrections);

        if corrections.accumulate_integral {
            self.integral += error * dt;
        } else {
            self.integral = error * config.integral_scale;
        }
        if self.integral_resets(error, config, corrections) {
            self.integral = 0.0;
        }

        let applied_derivative = if corrections.track_previous_error {
            self.derivative = (error - self.prev_error) / dt;
            self.prev_error = error;
            self.derivative
        } else {
            let applied = self.derivative;
            self.prev_error = self.error_to(heading, corrections);
            self.derivative = (error - self.prev_error) / dt;
            applied
        };

        let correction =
            (config.kp * error) + (config.ki * self.integral) + (config.kd * applied_derivative);
        PidTerms {
            error,
            integral: self.integral,
            derivative: applied_derivative,
            correction,
        }
    }
}
