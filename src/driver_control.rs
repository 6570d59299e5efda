//! Heading-assisted driver control.
//!
//! Each tick the operator's sticks are classified, the hold timer is advanced,
//! and the controller either passes attenuated manual steering through or
//! replaces it with a heading-hold correction. The output is a [`DriveCommand`]
//! for a curvature drive mixer.

use core::time::Duration;

use log::{debug, trace};

use crate::{
    clock::{Clock, MonotonicClock},
    config::ControllerConfig,
    deadband::StickClass,
    hold_timer::{HoldTimer, hook_delay},
    pid::{HeadingPid, PidTerms},
};

/// Inputs sampled once per control tick.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct ControlSample {
    pub throttle: f64,
    pub steering: f64,
    pub quick_turn: bool,
    /// Degrees, unwrapped.
    pub heading: f64,
    pub left_speed: f64,
    pub right_speed: f64,
}

/// Parameters for the drive mixer this tick.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct DriveCommand {
    pub throttle: f64,
    pub steer: f64,
    pub quick_turn: bool,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum HoldState {
    Inactive,
    Holding,
}

/// Everything the controller carries between ticks.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct ControllerState {
    pub timer: HoldTimer,
    /// Whether heading-hold was active on the previous tick.
    pub hold_active: bool,
    pub pid: HeadingPid,
}

impl ControllerState {
    pub fn hold_state(&self) -> HoldState {
        if self.hold_active {
            HoldState::Holding
        } else {
            HoldState::Inactive
        }
    }

    /// Heading being held, if hold is active.
    pub fn target_heading(&self) -> Option<f64> {
        self.hold_active.then_some(self.pid.target_heading)
    }
}

/// Internal scalars of one tick, for telemetry.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Diagnostics {
    pub now: Duration,
    pub timer_started_at: Duration,
    pub elapsed_ms: f64,
    pub hook_delay: f64,
    pub sticks_centered: bool,
    pub driving_straight: bool,
    pub heading: f64,
    pub target_heading: f64,
    pub error: f64,
    pub integral: f64,
    pub derivative: f64,
    pub correction: f64,
}

/// Advance the controller by one tick.
pub fn update(
    state: ControllerState,
    sample: &ControlSample,
    config: &ControllerConfig,
    now: Duration,
) -> (ControllerState, DriveCommand) {
    let (state, command, _) = update_with_diagnostics(state, sample, config, now);
    (state, command)
}

/// [`update`], also returning the tick's [`Diagnostics`].
pub fn update_with_diagnostics(
    mut state: ControllerState,
    sample: &ControlSample,
    config: &ControllerConfig,
    now: Duration,
) -> (ControllerState, DriveCommand, Diagnostics) {
    let hold = &config.hold;
    let corrections = &config.corrections;

    let sticks = StickClass::classify(sample.throttle, sample.steering, hold.deadband);
    let sticks_centered = sticks.sticks_centered();
    let delay = hook_delay(sample.left_speed, sample.right_speed, hold, corrections);
    let timer = state.timer.tick(sticks_centered, delay, now);

    let mut terms = PidTerms::default();
    let command = if timer.driving_straight {
        if !state.hold_active {
            state.pid.engage(sample.heading);
            debug!("heading hold engaged at {:.2} deg", sample.heading);
        }
        terms = state.pid.next(sample.heading, hold, corrections);
        DriveCommand {
            throttle: sample.throttle,
            steer: terms.correction,
            quick_turn: false,
        }
    } else {
        if state.hold_active {
            debug!(
                "heading hold released (target {:.2} deg, heading {:.2} deg)",
                state.pid.target_heading, sample.heading
            );
        }
        DriveCommand {
            throttle: sample.throttle,
            steer: sample.steering / hold.cont_div,
            quick_turn: sample.quick_turn,
        }
    };
    state.hold_active = timer.driving_straight;

    let diagnostics = Diagnostics {
        now,
        timer_started_at: state.timer.started_at,
        elapsed_ms: timer.elapsed_ms,
        hook_delay: delay,
        sticks_centered,
        driving_straight: timer.driving_straight,
        heading: sample.heading,
        target_heading: state.pid.target_heading,
        error: terms.error,
        integral: terms.integral,
        derivative: terms.derivative,
        correction: terms.correction,
    };
    trace!("{diagnostics:?}");

    (state, command, diagnostics)
}

/// Long-lived heading-hold controller owning its state and clock.
pub struct HeadingHoldController<C: Clock = MonotonicClock> {
    config: ControllerConfig,
    clock: C,
    state: ControllerState,
    last_diagnostics: Diagnostics,
}

impl HeadingHoldController<MonotonicClock> {
    pub fn with_monotonic_clock(config: ControllerConfig) -> Self {
        Self::new(config, MonotonicClock::new())
    }
}

impl<C: Clock> HeadingHoldController<C> {
    pub fn new(config: ControllerConfig, clock: C) -> Self {
        Self {
            config,
            clock,
            state: ControllerState::default(),
            last_diagnostics: Diagnostics::default(),
        }
    }

    /// Run one control tick. Call exactly once per loop period.
    pub fn update(&mut self, sample: &ControlSample) -> DriveCommand {
        let now = self.clock.now();
        let (state, command, diagnostics) =
            update_with_diagnostics(self.state, sample, &self.config, now);
        self.state = state;
        self.last_diagnostics = diagnostics;
        command
    }

    pub fn state(&self) -> &ControllerState {
        &self.state
    }

    pub fn hold_state(&self) -> HoldState {
        self.state.hold_state()
    }

    pub fn diagnostics(&self) -> &Diagnostics {
        &self.last_diagnostics
    }

    pub fn config(&self) -> &ControllerConfig {
        &self.config
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Drop hold and timer state, e.g. when driver control restarts.
    pub fn reset(&mut self) {
        self.state = ControllerState::default();
        self.last_diagnostics = Diagnostics::default();
    }
}
