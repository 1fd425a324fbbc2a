//! Sensor subsystem: per-sensor conversions and the aggregating [`Sampler`].
//!
//! The sampler reads every sensor through the [`SensorPort`] once per
//! sample interval and writes accepted values into the shared
//! [`SensorSnapshot`].  A rejected reading leaves the previous value in
//! place; nothing here can fail the control loop.

pub mod battery;
pub mod climate;
pub mod ultrasonic;

use embedded_hal::digital::PinState;
use log::debug;

use crate::app::context::SensorSnapshot;
use crate::app::ports::{DigitalInput, SensorPort};
use crate::config::{BatteryConfig, ClimateConfig, SystemConfig, UltrasonicConfig};

/// What one [`Sampler::sample`] call accepted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SampleOutcome {
    pub fill_accepted: bool,
    pub temperature_accepted: bool,
    pub humidity_accepted: bool,
    pub battery_accepted: bool,
}

/// Reads all sensors and applies the validity filters.
#[derive(Debug, Clone)]
pub struct Sampler {
    ultrasonic: UltrasonicConfig,
    climate: ClimateConfig,
    battery: BatteryConfig,
}

impl Sampler {
    pub fn new(config: &SystemConfig) -> Self {
        Self {
            ultrasonic: config.ultrasonic,
            climate: config.climate,
            battery: config.battery,
        }
    }

    /// Read every sensor once and update `snap` in place.
    ///
    /// Blocks for at most the echo timeout plus one probe transaction.
    pub fn sample(&self, hw: &mut impl SensorPort, snap: &mut SensorSnapshot) -> SampleOutcome {
        let mut outcome = SampleOutcome::default();

        let echo = hw.measure_echo_us(self.ultrasonic.echo_timeout_ms.saturating_mul(1_000));
        match ultrasonic::fill_level(echo, &self.ultrasonic) {
            Ok(pct) => {
                snap.trash_level = pct;
                outcome.fill_accepted = true;
            }
            Err(e) => debug!("Sampler: fill level kept ({})", e),
        }

        let reading = hw.read_climate();
        match climate::validate_temperature(reading.temperature_c, &self.climate) {
            Ok(t) => {
                snap.temperature = t;
                outcome.temperature_accepted = true;
            }
            Err(e) => debug!("Sampler: temperature kept ({})", e),
        }
        match climate::validate_humidity(reading.humidity, &self.climate) {
            Ok(h) => {
                snap.humidity = h;
                outcome.humidity_accepted = true;
            }
            Err(e) => debug!("Sampler: humidity kept ({})", e),
        }

        snap.flame_detected = hw.read_level(DigitalInput::Flame) == PinState::Low;
        match hw.read_battery_raw() {
            Some(raw) => {
                snap.battery_level = battery::raw_to_percent(raw, &self.battery);
                outcome.battery_accepted = true;
            }
            None => debug!("Sampler: battery kept (ADC read failed)"),
        }

        outcome
    }
}
