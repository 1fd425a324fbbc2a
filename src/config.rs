//! System configuration parameters
//!
//! All tunable parameters for the SmartBin principal node.  Values are
//! compiled-in defaults; a board integrator may override them with a JSON
//! document via [`SystemConfig::from_json`].  Nothing is persisted.

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Ultrasonic fill-level calibration.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct UltrasonicConfig {
    /// Hard bound on the echo wait (milliseconds).
    pub echo_timeout_ms: u32,
    /// Round-trip conversion constant (cm per microsecond).
    pub speed_of_sound_cm_per_us: f32,
    /// Readings below this distance are rejected (cm).
    pub min_valid_cm: f32,
    /// Readings above this distance are rejected (cm).
    pub max_valid_cm: f32,
    /// Headspace at which the container reads 100 % full (cm).
    pub full_distance_cm: f32,
    /// Headspace at which the container reads 0 % full (cm).
    pub empty_distance_cm: f32,
}

/// Plausibility window for the temperature / humidity probe.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ClimateConfig {
    pub min_temperature_c: f32,
    pub max_temperature_c: f32,
    /// Humidity must be strictly above this value.
    pub min_humidity_exclusive: f32,
    pub max_humidity: f32,
}

/// Battery voltage conversion.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct BatteryConfig {
    /// ADC code corresponding to the reference voltage (e.g. 4096 for 12-bit).
    pub adc_full_scale: f32,
    /// ADC reference voltage (V).
    pub reference_volts: f32,
    /// Divider-network compensation multiplier.
    pub divider_multiplier: f32,
    /// Battery voltage reported as 0 %.
    pub empty_volts: f32,
    /// Voltage span from empty to full.
    pub span_volts: f32,
}

/// Core system configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SystemConfig {
    // --- Timing ---
    /// Scheduler loop period (milliseconds).  Dominates the motor step rate.
    pub loop_period_ms: u32,
    /// Sensor sampling interval (milliseconds).
    pub sample_interval_ms: u32,
    /// Network report interval (milliseconds).
    pub network_interval_ms: u32,
    /// Serial console report interval (milliseconds).
    pub serial_interval_ms: u32,
    /// Reserved for auto-close-after-idle (milliseconds).
    pub window_timeout_ms: u32,
    /// Debounce settle delay before confirming a falling edge (milliseconds).
    pub debounce_settle_ms: u32,
    /// Client-side HTTP timeout (milliseconds).
    pub http_timeout_ms: u32,

    // --- Window / deposits ---
    /// Motor steps for one open or close run.
    pub window_steps: u32,
    /// Tokens credited per confirmed deposit.
    pub deposit_reward: u32,

    // --- Sensors ---
    pub ultrasonic: UltrasonicConfig,
    pub climate: ClimateConfig,
    pub battery: BatteryConfig,

    // --- Alerts ---
    /// Battery percentage below which the low-battery alert fires.
    pub low_battery_percent: f32,
    /// Fill percentage above which the container-full alert fires.
    pub full_container_percent: f32,

    // --- Network ---
    pub wifi_ssid: heapless::String<32>,
    pub wifi_password: heapless::String<64>,
    /// Report endpoint (HTTP POST).
    pub endpoint_url: heapless::String<96>,
    /// Association attempts at boot, one second apart.
    pub wifi_boot_attempts: u32,
}

fn hs<const N: usize>(s: &str) -> heapless::String<N> {
    let mut out = heapless::String::new();
    // Defaults are compile-time literals that fit their capacity.
    let _ = out.push_str(s);
    out
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            // Timing
            loop_period_ms: 50,
            sample_interval_ms: 3_000,
            network_interval_ms: 10_000,
            serial_interval_ms: 2_000,
            window_timeout_ms: 10_000,
            debounce_settle_ms: 50,
            http_timeout_ms: 3_000,

            // Window / deposits
            window_steps: 512,
            deposit_reward: 10,

            ultrasonic: UltrasonicConfig {
                echo_timeout_ms: 30,
                speed_of_sound_cm_per_us: 0.034,
                min_valid_cm: 2.0,
                max_valid_cm: 200.0,
                full_distance_cm: 5.0,
                empty_distance_cm: 33.0,
            },
            climate: ClimateConfig {
                min_temperature_c: -10.0,
                max_temperature_c: 60.0,
                min_humidity_exclusive: 0.0,
                max_humidity: 100.0,
            },
            battery: BatteryConfig {
                adc_full_scale: 4096.0,
                reference_volts: 3.3,
                divider_multiplier: 12.1,
                empty_volts: 10.0,
                span_volts: 2.6,
            },

            // Alerts
            low_battery_percent: 20.0,
            full_container_percent: 85.0,

            // Network
            wifi_ssid: hs("smartbin"),
            wifi_password: hs("change-me-please"),
            endpoint_url: hs("http://192.168.43.42:3000/data"),
            wifi_boot_attempts: 15,
        }
    }
}

impl SystemConfig {
    /// Parse a JSON override document and validate it.
    pub fn from_json(json: &str) -> Result<Self, Error> {
        let cfg: Self =
            serde_json::from_str(json).map_err(|_| Error::Config("malformed JSON"))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Reject values that would stall the loop or divide by zero.
    pub fn validate(&self) -> Result<(), Error> {
        if self.loop_period_ms == 0 {
            return Err(Error::Config("loop_period_ms must be > 0"));
        }
        let shortest_interval = self
            .sample_interval_ms
            .min(self.network_interval_ms)
            .min(self.serial_interval_ms);
        if shortest_interval == 0 {
            return Err(Error::Config("report/sample intervals must be > 0"));
        }
        if self.loop_period_ms > shortest_interval {
            return Err(Error::Config("loop_period_ms exceeds the shortest task interval"));
        }
        if self.debounce_settle_ms >= self.loop_period_ms.saturating_mul(4) {
            return Err(Error::Config("debounce settle too long for loop period"));
        }
        if self.window_steps == 0 {
            return Err(Error::Config("window_steps must be > 0"));
        }
        let u = &self.ultrasonic;
        if u.full_distance_cm >= u.empty_distance_cm {
            return Err(Error::Config("full_distance_cm must be below empty_distance_cm"));
        }
        if u.min_valid_cm >= u.max_valid_cm || u.speed_of_sound_cm_per_us <= 0.0 {
            return Err(Error::Config("invalid ultrasonic range"));
        }
        let b = &self.battery;
        if b.adc_full_scale <= 0.0 || b.span_volts <= 0.0 {
            return Err(Error::Config("battery scale and span must be > 0"));
        }
        if self.endpoint_url.is_empty() {
            return Err(Error::Config("endpoint_url is empty"));
        }
        Ok(())
    }
}
