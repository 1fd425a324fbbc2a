//! ESP32 time adapter.
//!
//! The control loop runs on a wrapping `u32` millisecond counter; this
//! adapter derives it from the microsecond boot clock.
//!
//! - **`target_os = "espidf"`**: `esp_timer_get_time()` via
//!   [`hw_init::now_us`](crate::drivers::hw_init::now_us).
//! - **`not(target_os = "espidf")`**: `std::time::Instant` from the same
//!   helper, for host-side testing and simulation.

use crate::drivers::hw_init;

/// Time adapter for the ESP32 platform.
#[derive(Debug, Clone, Copy, Default)]
pub struct Esp32TimeAdapter;

impl Esp32TimeAdapter {
    pub fn new() -> Self {
        Self
    }

    /// Milliseconds since boot, wrapping at `u32::MAX` (~49.7 days).
    pub fn now_ms(&self) -> u32 {
        (hw_init::now_us() / 1_000) as u32
    }

    /// Seconds since boot (monotonic, no wrap).
    pub fn uptime_secs(&self) -> u64 {
        hw_init::now_us() / 1_000_000
    }
}
