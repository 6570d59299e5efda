use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Tuning for the heading-hold controller.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HoldConfig {
    /// Stick deadband used to decide whether an axis is pushed.
    pub deadband: f64,
    /// Scales the drive-speed differential into the hold delay (milliseconds).
    pub hook_multiplier: f64,
    pub kp: f64,
    pub ki: f64,
    pub kd: f64,
    /// Band used by the integral reset rule.
    pub error_tolerance: f64,
    /// Divisor applied to manual steering while not holding.
    pub cont_div: f64,
    /// Nominal loop period used as `dt` by the derivative term.
    pub tick_period: f64,
    /// Factor applied to the heading error to form the integral term.
    pub integral_scale: f64,
}

impl Default for HoldConfig {
    fn default() -> Self {
        Self {
            deadband: 0.04,
            hook_multiplier: 0.5,
            kp: 0.01,
            ki: 0.0072,
            kd: 0.0,
            error_tolerance: 0.9,
            cont_div: 1.25,
            tick_period: 0.2,
            integral_scale: 0.2,
        }
    }
}

/// Opt-in fixes for behaviors the controller reproduces literally by default.
///
/// Every switch is off unless set, so an unconfigured controller drives
/// exactly like the robot it was tuned on.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Corrections {
    /// Compute the hold delay from `|left - right|` instead of `|left - left|`.
    pub hook_delay_uses_right_speed: bool,
    /// Reset the integral when `|error| < error_tolerance`.
    pub zero_centered_integral_reset: bool,
    /// Accumulate `error * tick_period` instead of reassigning each tick.
    pub accumulate_integral: bool,
    /// Derive from the previous tick's error and apply it on the same tick.
    pub track_previous_error: bool,
    /// Wrap the heading error into `[-180, 180)` degrees.
    pub wrap_heading_error: bool,
}

/// Tuning for the curvature drive mixer.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MixerConfig {
    pub deadband: f64,
    pub max_output: f64,
    /// Below this throttle a quick turn charges the quick-stop accumulator.
    pub quick_stop_threshold: f64,
    pub quick_stop_alpha: f64,
    /// Negate the right side so both sides drive forward on mirrored motors.
    pub invert_right_side: bool,
}

impl Default for MixerConfig {
    fn default() -> Self {
        Self {
            deadband: 0.02,
            max_output: 1.0,
            quick_stop_threshold: 0.2,
            quick_stop_alpha: 0.1,
            invert_right_side: true,
        }
    }
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControllerConfig {
    pub hold: HoldConfig,
    pub corrections: Corrections,
    pub mixer: MixerConfig,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("{0} must be a finite number")]
    NotFinite(&'static str),

    #[error("{0} must not be negative (got {1})")]
    Negative(&'static str, f64),

    #[error("{0} must be greater than zero (got {1})")]
    NotPositive(&'static str, f64),

    #[error("{0} is out of range (got {1})")]
    OutOfRange(&'static str, f64),
}

fn finite(name: &'static str, value: f64) -> Result<f64, ConfigError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(ConfigError::NotFinite(name))
    }
}

fn non_negative(name: &'static str, value: f64) -> Result<(), ConfigError> {
    if finite(name, value)? < 0.0 {
        return Err(ConfigError::Negative(name, value));
    }
    Ok(())
}

fn positive(name: &'static str, value: f64) -> Result<(), ConfigError> {
    if finite(name, value)? <= 0.0 {
        return Err(ConfigError::NotPositive(name, value));
    }
    Ok(())
}

impl HoldConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        non_negative("hold.deadband", self.deadband)?;
        non_negative("hold.hook_multiplier", self.hook_multiplier)?;
        non_negative("hold.error_tolerance", self.error_tolerance)?;
        finite("hold.kp", self.kp)?;
        finite("hold.ki", self.ki)?;
        finite("hold.kd", self.kd)?;
        finite("hold.integral_scale", self.integral_scale)?;
        positive("hold.tick_period", self.tick_period)?;
        if finite("hold.cont_div", self.cont_div)? == 0.0 {
            return Err(ConfigError::OutOfRange("hold.cont_div", self.cont_div));
        }
        Ok(())
    }
}

impl MixerConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        non_negative("mixer.deadband", self.deadband)?;
        if self.deadband >= 1.0 {
            return Err(ConfigError::OutOfRange("mixer.deadband", self.deadband));
        }
        positive("mixer.max_output", self.max_output)?;
        if self.max_output > 1.0 {
            return Err(ConfigError::OutOfRange("mixer.max_output", self.max_output));
        }
        non_negative("mixer.quick_stop_threshold", self.quick_stop_threshold)?;
        non_negative("mixer.quick_stop_alpha", self.quick_stop_alpha)?;
        if self.quick_stop_alpha > 1.0 {
            return Err(ConfigError::OutOfRange(
                "mixer.quick_stop_alpha",
                self.quick_stop_alpha,
            ));
        }
        Ok(())
    }
}

impl ControllerConfig {
    /// Parse and validate a JSON config. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.hold.validate()?;
        self.mixer.validate()
    }
}
