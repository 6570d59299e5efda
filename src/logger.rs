//! Console logger for the [`log`] facade.
//!
//! Each record is printed as `LEVEL [uptime] target - message`, where uptime
//! counts from the first time the logger is installed:
//!
//! ```text
//! DEBUG [12s 340ms] heading_hold::driver_control - heading hold engaged at 91.20 deg
//! ```

use core::time::Duration;
use std::sync::OnceLock;

use humantime::{FormattedDuration, format_duration};
use log::{LevelFilter, Metadata, Record, SetLoggerError};

use crate::clock::{Clock, MonotonicClock};

pub struct ConsoleLogger {
    clock: MonotonicClock,
}

impl ConsoleLogger {
    fn new() -> Self {
        Self {
            clock: MonotonicClock::new(),
        }
    }
}

/// Uptime truncated to whole milliseconds, e.g. `1h 1m 1s 250ms`.
pub fn format_uptime(uptime: Duration) -> FormattedDuration {
    format_duration(Duration::from_millis(uptime.as_millis() as u64))
}

fn format_line(record: &Record, uptime: Duration) -> String {
    format!(
        "{} [{}] {} - {}",
        record.level(),
        format_uptime(uptime),
        record.target(),
        record.args()
    )
}

impl log::Log for ConsoleLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            println!("{}", format_line(record, self.clock.now()));
        }
    }

    fn flush(&self) {}
}

static LOGGER: OnceLock<ConsoleLogger> = OnceLock::new();

/// Install the console logger with the given maximum level.
///
/// # Errors
///
/// Returns [`SetLoggerError`] if a logger has already been set.
pub fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
    let logger = LOGGER.get_or_init(ConsoleLogger::new);
    log::set_logger(logger).map(|()| log::set_max_level(level))
}

#[cfg(test)]
mod tests {
    use super::*;
    use log::Level;

    #[test]
    fn uptime_formatting() {
        assert_eq!(format_uptime(Duration::ZERO).to_string(), "0s");
        assert_eq!(format_uptime(Duration::from_millis(12_340)).to_string(), "12s 340ms");
        assert_eq!(format_uptime(Duration::from_millis(125_007)).to_string(), "2m 5s 7ms");
    }

    #[test]
    fn uptime_rolls_over_into_hours() {
        assert_eq!(format_uptime(Duration::from_secs(3661)).to_string(), "1h 1m 1s");
    }

    #[test]
    fn uptime_drops_sub_millisecond_part() {
        let uptime = Duration::from_micros(2_500_750);
        assert_eq!(format_uptime(uptime).to_string(), "2s 500ms");
    }

    #[test]
    fn line_layout() {
        let line = format_line(
            &Record::builder()
                .level(Level::Warn)
                .target("heading_hold::robot")
                .args(format_args!("imu read failed"))
                .build(),
            Duration::from_millis(1_500),
        );
        assert_eq!(line, "WARN [1s 500ms] heading_hold::robot - imu read failed");
    }

    #[test]
    fn init_installs_once() {
        assert!(init(LevelFilter::Debug).is_ok());
        assert!(init(LevelFilter::Trace).is_err());
        assert_eq!(log::max_level(), LevelFilter::Debug);
    }
}
