//! Battery monitor: ADC code → pack voltage → percentage.
//!
//! ```text
//!   V_adc = raw / full_scale × V_ref
//!   V_bat = V_adc × divider_multiplier
//!   %     = (V_bat − empty) / span × 100, clamped to [0, 100]
//! ```

use crate::config::BatteryConfig;

pub fn raw_to_volts(raw: u16, cfg: &BatteryConfig) -> f32 {
    f32::from(raw) / cfg.adc_full_scale * cfg.reference_volts * cfg.divider_multiplier
}

pub fn volts_to_percent(volts: f32, cfg: &BatteryConfig) -> f32 {
    ((volts - cfg.empty_volts) / cfg.span_volts * 100.0).clamp(0.0, 100.0)
}

pub fn raw_to_percent(raw: u16, cfg: &BatteryConfig) -> f32 {
    volts_to_percent(raw_to_volts(raw, cfg), cfg)
}
