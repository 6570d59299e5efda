//! # heading-hold
//!
//! Heading-assisted driver control for differential drivetrains.
//!
//! While the operator drives with the turn stick centered, the controller
//! waits out a short delay, captures the current heading and steers to hold
//! it. Any turn input hands steering straight back to the operator.
//!
//! The crate is split into small pieces that each run once per control tick:
//!
//! - [`deadband`]: decides whether the throttle and turn axes are pushed.
//! - [`hold_timer`]: gates hold engagement behind the hook delay.
//! - [`pid`]: the heading corrector.
//! - [`driver_control`]: the state machine tying them together, as a pure
//!   [`update`](driver_control::update) function and an owning
//!   [`HeadingHoldController`](driver_control::HeadingHoldController).
//! - [`curvature`]: turns a [`DriveCommand`] into left/right motor outputs.
//!
//! ```
//! use heading_hold::{ControlSample, ControllerConfig, CurvatureDrive, HeadingHoldController};
//! use heading_hold::clock::ManualClock;
//!
//! let config = ControllerConfig::default();
//! let mut hold = HeadingHoldController::new(config, ManualClock::new());
//! let mut mixer = CurvatureDrive::new(config.mixer);
//!
//! let sample = ControlSample { throttle: 0.5, heading: 90.0, ..ControlSample::default() };
//! let outputs = mixer.mix(&hold.update(&sample));
//! assert!(outputs.left > 0.0);
//! ```

pub mod clock;
pub mod config;
pub mod curvature;
pub mod deadband;
pub mod driver_control;
pub mod hold_timer;
pub mod logger;
pub mod pid;
pub mod utils;

pub use config::{ConfigError, ControllerConfig, Corrections, HoldConfig, MixerConfig};
pub use curvature::{CurvatureDrive, MotorOutputs};
pub use driver_control::{
    ControlSample, ControllerState, Diagnostics, DriveCommand, HeadingHoldController, HoldState,
};
