//! Plausibility filter for the temperature / humidity probe.

use crate::config::ClimateConfig;
use crate::error::SensorError;

/// Accepts finite values on the closed range `[min, max]`.
pub fn validate_temperature(celsius: f32, cfg: &ClimateConfig) -> Result<f32, SensorError> {
    if celsius.is_nan() {
        return Err(SensorError::NotANumber);
    }
    if !(cfg.min_temperature_c..=cfg.max_temperature_c).contains(&celsius) {
        return Err(SensorError::OutOfRange);
    }
    Ok(celsius)
}

/// Accepts finite values in `(min, max]`: a probe reporting exactly 0 %
/// has failed.
pub fn validate_humidity(percent: f32, cfg: &ClimateConfig) -> Result<f32, SensorError> {
    if percent.is_nan() {
        return Err(SensorError::NotANumber);
    }
    if percent <= cfg.min_humidity_exclusive || percent > cfg.max_humidity {
        return Err(SensorError::OutOfRange);
    }
    Ok(percent)
}
