use crate::{config::MixerConfig, driver_control::DriveCommand};

/// Normalized motor commands for each side of the drivetrain.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct MotorOutputs {
    pub left: f64,
    pub right: f64,
}

fn apply_deadband(value: f64, deadband: f64) -> f64 {
    if value.abs() > deadband {
        if value > 0.0 {
            (value - deadband) / (1.0 - deadband)
        } else {
            (value + deadband) / (1.0 - deadband)
        }
    } else {
        0.0
    }
}

/// Curvature ("cheesy") drive mixer.
///
/// Turn rate scales with throttle, so the steer input sets the path curvature
/// rather than a rotation speed. Quick turn rotates in place and charges a
/// quick-stop accumulator that counter-steers once normal driving resumes.
#[derive(Clone, Debug, Default)]
pub struct CurvatureDrive {
    config: MixerConfig,
    quick_stop_accumulator: f64,
}

impl CurvatureDrive {
    pub fn new(config: MixerConfig) -> Self {
        Self {
            config,
            quick_stop_accumulator: 0.0,
        }
    }

    pub fn quick_stop_accumulator(&self) -> f64 {
        self.quick_stop_accumulator
    }

    pub fn reset(&mut self) {
        self.quick_stop_accumulator = 0.0;
    }

    fn update_quick_stop_accumulator(&mut self) {
        if self.quick_stop_accumulator > 1.0 {
            self.quick_stop_accumulator -= 1.0;
        } else if self.quick_stop_accumulator < -1.0 {
            self.quick_stop_accumulator += 1.0;
        } else {
            self.quick_stop_accumulator = 0.0;
        }
    }

    pub fn mix(&mut self, command: &DriveCommand) -> MotorOutputs {
        let cfg = self.config;
        let throttle = apply_deadband(command.throttle.clamp(-1.0, 1.0), cfg.deadband);
        let steer = apply_deadband(command.steer.clamp(-1.0, 1.0), cfg.deadband);

        let (angular, over_power) = if command.quick_turn {
            if throttle.abs() < cfg.quick_stop_threshold {
                let alpha = cfg.quick_stop_alpha;
                self.quick_stop_accumulator =
                    (1.0 - alpha) * self.quick_stop_accumulator + alpha * steer * 2.0;
            }
            (steer, true)
        } else {
            let angular = throttle.abs() * steer - self.quick_stop_accumulator;
            self.update_quick_stop_accumulator();
            (angular, false)
        };

        let mut left = throttle + angular;
        let mut right = throttle - angular;

        // shift the excess onto the other side so in-place turns keep their rate
        if over_power {
            if left > 1.0 {
                right -= left - 1.0;
                left = 1.0;
            } else if right > 1.0 {
                left -= right - 1.0;
                right = 1.0;
            } else if left < -1.0 {
                right -= left + 1.0;
                left = -1.0;
            } else if right < -1.0 {
                left -= right + 1.0;
                right = -1.0;
            }
        }

        let max_magnitude = left.abs().max(right.abs());
        if max_magnitude > 1.0 {
            left /= max_magnitude;
            right /= max_magnitude;
        }

        let right_sign = if cfg.invert_right_side { -1.0 } else { 1.0 };
        MotorOutputs {
            left: left * cfg.max_output,
            right: right * cfg.max_output * right_sign,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    fn uninverted() -> CurvatureDrive {
        CurvatureDrive::new(MixerConfig {
            deadband: 0.0,
            invert_right_side: false,
            ..MixerConfig::default()
        })
    }

    fn cmd(throttle: f64, steer: f64, quick_turn: bool) -> DriveCommand {
        DriveCommand {
            throttle,
            steer,
            quick_turn,
        }
    }

    #[test]
    fn deadband_rescales() {
        assert_eq!(apply_deadband(0.01, 0.02), 0.0);
        assert!(close(apply_deadband(1.0, 0.02), 1.0));
        assert!(close(apply_deadband(-0.51, 0.02), -0.5));
    }

    #[test]
    fn straight_drive_is_symmetric() {
        let mut drive = uninverted();
        let out = drive.mix(&cmd(0.5, 0.0, false));
        assert_eq!(out, MotorOutputs { left: 0.5, right: 0.5 });
    }

    #[test]
    fn right_side_inverted_by_default() {
        let mut drive = CurvatureDrive::new(MixerConfig::default());
        let out = drive.mix(&cmd(1.0, 0.0, false));
        assert!(close(out.left, 1.0));
        assert!(close(out.right, -1.0));
    }

    #[test]
    fn turn_rate_scales_with_throttle() {
        let mut drive = uninverted();
        let out = drive.mix(&cmd(0.5, 0.4, false));
        assert!(close(out.left, 0.7));
        assert!(close(out.right, 0.3));

        let out = drive.mix(&cmd(0.0, 0.4, false));
        assert_eq!(out, MotorOutputs { left: 0.0, right: 0.0 });
    }

    #[test]
    fn outputs_are_normalized() {
        let mut drive = uninverted();
        let out = drive.mix(&cmd(1.0, 1.0, false));
        assert!(close(out.left, 1.0));
        assert!(close(out.right, 0.0));
        let out = drive.mix(&cmd(2.0, 0.0, false));
        assert!(close(out.left, 1.0));
    }

    #[test]
    fn quick_turn_rotates_in_place() {
        let mut drive = uninverted();
        let out = drive.mix(&cmd(0.0, 0.6, true));
        assert!(close(out.left, 0.6));
        assert!(close(out.right, -0.6));
        assert!(close(drive.quick_stop_accumulator(), 0.12));
    }

    #[test]
    fn over_power_shifts_excess() {
        let mut drive = uninverted();
        let out = drive.mix(&cmd(0.8, 0.5, true));
        assert!(close(out.left, 1.0));
        assert!(close(out.right, 0.0));
        // fast throttle does not charge the accumulator
        assert_eq!(drive.quick_stop_accumulator(), 0.0);
    }

    #[test]
    fn quick_stop_counter_steers_then_clears() {
        let mut drive = uninverted();
        for _ in 0..50 {
            drive.mix(&cmd(0.0, 1.0, true));
        }
        let charged = drive.quick_stop_accumulator();
        assert!(charged > 1.0 && charged <= 2.0);

        // counter-rotation overpowers the throttle, then gets normalized
        let out = drive.mix(&cmd(0.5, 0.0, false));
        assert!(close(out.right, 1.0));
        assert!(close(out.left, (0.5 - charged) / (0.5 + charged)));
        assert!(close(drive.quick_stop_accumulator(), charged - 1.0));

        drive.mix(&cmd(0.5, 0.0, false));
        assert_eq!(drive.quick_stop_accumulator(), 0.0);
    }

    #[test]
    fn max_output_scales() {
        let mut drive = CurvatureDrive::new(MixerConfig {
            deadband: 0.0,
            max_output: 0.5,
            invert_right_side: false,
            ..MixerConfig::default()
        });
        let out = drive.mix(&cmd(1.0, 0.0, false));
        assert_eq!(out, MotorOutputs { left: 0.5, right: 0.5 });
    }
}
