//! Echo pulse width → container fill percentage.
//!
//! The ranger looks down from the lid, so distance measures empty
//! headspace: the closer the echo, the fuller the bin.

use crate::config::UltrasonicConfig;
use crate::error::SensorError;

/// One-way distance in cm for a round-trip echo of `echo_us`.
pub fn echo_to_distance_cm(echo_us: u32, cfg: &UltrasonicConfig) -> f32 {
    echo_us as f32 * cfg.speed_of_sound_cm_per_us / 2.0
}

/// Linear map of headspace onto [0, 100] %, clamped.
pub fn distance_to_fill_percent(distance_cm: f32, cfg: &UltrasonicConfig) -> f32 {
    let span = cfg.empty_distance_cm - cfg.full_distance_cm;
    let pct = (cfg.empty_distance_cm - distance_cm) / span * 100.0;
    pct.clamp(0.0, 100.0)
}

/// Full conversion with validity filtering.  `None` is a timed-out echo.
pub fn fill_level(echo_us: Option<u32>, cfg: &UltrasonicConfig) -> Result<f32, SensorError> {
    let echo_us = echo_us.ok_or(SensorError::EchoTimeout)?;
    let distance = echo_to_distance_cm(echo_us, cfg);
    if !(cfg.min_valid_cm..=cfg.max_valid_cm).contains(&distance) {
        return Err(SensorError::OutOfRange);
    }
    Ok(distance_to_fill_percent(distance, cfg))
}
