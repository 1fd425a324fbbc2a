//! Port traits: the hexagonal boundary between domain logic and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ Controller (domain)
//! ```
//!
//! Driven adapters (pins, probe, Wi-Fi, UART, log) implement these traits.
//! The [`Controller`](super::service::Controller) consumes them via
//! generics, so the domain core never touches hardware directly.
//!
//! ## Blocking contract
//!
//! Only three calls may block, each with a hard bound supplied by the
//! caller: [`SensorPort::measure_echo_us`] (echo timeout),
//! [`SensorPort::settle_ms`] (debounce settle) and
//! [`NetworkPort::post_json`] (HTTP timeout).  Everything else returns
//! immediately.

use embedded_hal::digital::PinState;

use crate::drivers::stepper::CoilPattern;

// ───────────────────────────────────────────────────────────────
// Sensor port (driven adapter: hardware → domain)
// ───────────────────────────────────────────────────────────────

/// Digital inputs sampled by the loop.  All are active-low.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DigitalInput {
    Button,
    Infrared,
    Flame,
}

/// Raw probe output.  Either value may be NaN after a failed read.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClimateReading {
    pub temperature_c: f32,
    pub humidity: f32,
}

impl ClimateReading {
    /// Reading reported when the probe did not answer.
    pub const FAILED: Self = Self {
        temperature_c: f32::NAN,
        humidity: f32::NAN,
    };
}

/// Read-side port: pin levels, pulse timing, analog and probe access.
pub trait SensorPort {
    /// Fire the ultrasonic trigger and time the echo pulse.
    ///
    /// May block up to `timeout_us`.  Returns `None` on timeout.
    fn measure_echo_us(&mut self, timeout_us: u32) -> Option<u32>;

    /// Read the temperature / humidity probe.
    fn read_climate(&mut self) -> ClimateReading;

    /// Raw ADC code of the battery divider, `None` if the conversion failed.
    fn read_battery_raw(&mut self) -> Option<u16>;

    /// Current level of a digital input.
    fn read_level(&mut self, input: DigitalInput) -> PinState;

    /// Busy-wait for `ms` milliseconds.  Used only for debounce settling.
    fn settle_ms(&mut self, ms: u32);
}

// ───────────────────────────────────────────────────────────────
// Coil port (driven adapter: domain → hardware)
// ───────────────────────────────────────────────────────────────

/// Write-side port for the stepper coil outputs.
pub trait CoilPort {
    /// Drive all four coils to `pattern` (a table row or all-off).
    fn energize(&mut self, pattern: CoilPattern);
}

// ───────────────────────────────────────────────────────────────
// Network port (send JSON, get status code)
// ───────────────────────────────────────────────────────────────

/// Outcome of one POST.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostReply {
    /// HTTP status when positive; transport error code when zero or negative.
    pub code: i32,
    /// Response body, if one was read.
    pub body: Option<String>,
}

impl PostReply {
    pub fn failed(code: i32) -> Self {
        Self { code, body: None }
    }
}

pub trait NetworkPort {
    /// Current station association state.  Must not block.
    fn is_connected(&mut self) -> bool;

    /// POST `body` as `application/json` to the configured endpoint.
    ///
    /// May block up to `timeout_ms`; a timeout is reported as a
    /// non-positive code.
    fn post_json(&mut self, body: &str, timeout_ms: u32) -> PostReply;
}

// ───────────────────────────────────────────────────────────────
// Console port (serial link to the display node)
// ───────────────────────────────────────────────────────────────

/// Maximum accepted inbound line length.
pub const CONSOLE_LINE_CAP: usize = 128;

pub trait ConsolePort {
    /// Write one line (terminator appended by the adapter).
    fn write_line(&mut self, line: &str);

    /// Next complete inbound line, if any.  Never blocks.
    fn read_line(&mut self) -> Option<heapless::String<CONSOLE_LINE_CAP>>;
}

// ───────────────────────────────────────────────────────────────
// Event sink port (driven adapter: domain → logging)
// ───────────────────────────────────────────────────────────────

/// The domain emits structured [`AppEvent`](super::events::AppEvent)s
/// through this port.  Adapters decide where they go.
pub trait EventSink {
    fn emit(&mut self, event: &super::events::AppEvent);
}
