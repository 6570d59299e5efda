/// Whether a stick axis is pushed outside the symmetric band `[-deadband, deadband]`.
#[inline]
pub fn is_active(value: f64, deadband: f64) -> bool {
    value < -deadband || value > deadband
}

/// Result of classifying both drive axes for one tick.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct StickClass {
    pub throttle_active: bool,
    pub steering_active: bool,
}

impl StickClass {
    pub fn classify(throttle: f64, steering: f64, deadband: f64) -> Self {
        Self {
            throttle_active: is_active(throttle, deadband),
            steering_active: is_active(steering, deadband),
        }
    }

    /// Driving forward or backward with no turn input. Both sticks at rest is
    /// *not* centered: hold only engages while the robot is being driven.
    pub fn sticks_centered(&self) -> bool {
        self.throttle_active && !self.steering_active
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DB: f64 = 0.04;

    #[test]
    fn inside_band_is_inactive() {
        for v in [-0.04, -0.02, 0.0, 0.01, 0.04] {
            assert!(!is_active(v, DB), "{v} should be inside the deadband");
        }
    }

    #[test]
    fn outside_band_is_active() {
        for v in [-1.0, -0.041, 0.041, 0.5, 1.0] {
            assert!(is_active(v, DB), "{v} should be outside the deadband");
        }
    }

    #[test]
    fn steering_past_deadband_never_centered() {
        for throttle in [-1.0, -0.5, 0.0, 0.03, 0.5, 1.0] {
            for steering in [-1.0, -0.05, 0.05, 1.0] {
                assert!(!StickClass::classify(throttle, steering, DB).sticks_centered());
            }
        }
    }

    #[test]
    fn centered_requires_throttle() {
        assert!(!StickClass::classify(0.0, 0.0, DB).sticks_centered());
        assert!(StickClass::classify(0.6, 0.0, DB).sticks_centered());
        assert!(StickClass::classify(-0.6, 0.03, DB).sticks_centered());
    }
}
