use core::time::Duration;

use heading_hold::{
    ControlSample, ControllerConfig, CurvatureDrive, HeadingHoldController, MotorOutputs,
    clock::MonotonicClock, logger,
};
use log::{LevelFilter, info, warn};
use vexide::{prelude::*, smart::imu::InertialSensor};

const CONFIG_PATH: &str = "hold.json";
const LOOP_PERIOD: Duration = Duration::from_millis(20);
const MAX_VOLTS: f64 = 12.0;

fn load_config() -> ControllerConfig {
    let Ok(json) = std::fs::read_to_string(CONFIG_PATH) else {
        info!("no {CONFIG_PATH} on the SD card, using default tuning");
        return ControllerConfig::default();
    };
    match ControllerConfig::from_json(&json) {
        Ok(config) => {
            info!("loaded {CONFIG_PATH}");
            config
        }
        Err(e) => {
            warn!("ignoring {CONFIG_PATH}: {e}");
            ControllerConfig::default()
        }
    }
}

pub struct Robot {
    controller: Controller,
    left_motors: [Motor; 2],
    right_motors: [Motor; 2],
    imu: InertialSensor,
    hold: HeadingHoldController<MonotonicClock>,
    mixer: CurvatureDrive,
    last_heading: f64,
    imu_ok: bool,
}

impl Robot {
    async fn new(peripherals: Peripherals) -> Self {
        let config = load_config();
        let mut imu = InertialSensor::new(peripherals.port_5);
        if let Err(e) = imu.calibrate().await {
            warn!("imu calibration failed: {e}");
        }
        Self {
            controller: peripherals.primary_controller,
            left_motors: [
                Motor::new(peripherals.port_1, Gearset::Blue, Direction::Forward),
                Motor::new(peripherals.port_2, Gearset::Blue, Direction::Forward),
            ],
            right_motors: [
                Motor::new(peripherals.port_3, Gearset::Blue, Direction::Forward),
                Motor::new(peripherals.port_4, Gearset::Blue, Direction::Forward),
            ],
            imu,
            hold: HeadingHoldController::with_monotonic_clock(config),
            mixer: CurvatureDrive::new(config.mixer),
            last_heading: 0.0,
            imu_ok: true,
        }
    }

    fn heading(&mut self) -> f64 {
        // unwrapped rotation, so hold survives crossing the 0/360 seam
        match self.imu.rotation() {
            Ok(rotation) => {
                if !self.imu_ok {
                    info!("imu heading restored");
                    self.imu_ok = true;
                }
                self.last_heading = rotation.as_degrees();
            }
            Err(e) => {
                if self.imu_ok {
                    warn!("imu heading unavailable, holding last value: {e}");
                    self.imu_ok = false;
                }
            }
        }
        self.last_heading
    }

    fn sample(&mut self) -> ControlSample {
        let c_state = self.controller.state().unwrap_or_default();
        ControlSample {
            throttle: c_state.left_stick.y(),
            steering: c_state.right_stick.x(),
            quick_turn: c_state.button_l1.is_pressed(),
            heading: self.heading(),
            left_speed: self.left_motors[0].velocity().unwrap_or_default(),
            right_speed: self.right_motors[0].velocity().unwrap_or_default(),
        }
    }

    fn set_drive(&mut self, outputs: MotorOutputs) {
        let vl = (outputs.left * MAX_VOLTS).clamp(-MAX_VOLTS, MAX_VOLTS);
        let vr = (outputs.right * MAX_VOLTS).clamp(-MAX_VOLTS, MAX_VOLTS);
        for m in self.left_motors.iter_mut() {
            let _ = m.set_voltage(vl);
        }
        for m in self.right_motors.iter_mut() {
            let _ = m.set_voltage(vr);
        }
    }
}

impl Compete for Robot {
    async fn disabled(&mut self) {
        self.set_drive(MotorOutputs::default());
    }

    async fn driver(&mut self) {
        info!("driver control started");
        self.hold.reset();
        self.mixer.reset();
        loop {
            let sample = self.sample();
            let command = self.hold.update(&sample);
            let outputs = self.mixer.mix(&command);
            self.set_drive(outputs);
            sleep(LOOP_PERIOD).await;
        }
    }
}

#[vexide::main]
async fn main(peripherals: Peripherals) {
    let _ = logger::init(LevelFilter::Debug);
    let robot = Robot::new(peripherals).await;
    robot.compete().await;
}
