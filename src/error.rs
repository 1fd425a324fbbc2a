//! Unified error types for the SmartBin firmware.
//!
//! A single `Error` enum that every subsystem can convert into, keeping
//! the control loop's error handling uniform.  All variants are `Copy`
//! so they can be passed through the sampler and reporting paths without
//! allocation.
//!
//! Nothing in the control loop is fatal: sensor errors are absorbed by
//! the sampler (last good value retained) and comms errors are logged
//! and retried on the next scheduled interval.

use core::fmt;

// ---------------------------------------------------------------------------
// Top-level firmware error
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// A sensor could not be read or returned implausible data.
    Sensor(SensorError),
    /// An actuator output could not be driven.
    Actuator(ActuatorError),
    /// Network or serial communication failed.
    Comms(CommsError),
    /// Configuration is invalid.
    Config(&'static str),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sensor(e) => write!(f, "sensor: {e}"),
            Self::Actuator(e) => write!(f, "actuator: {e}"),
            Self::Comms(e) => write!(f, "comms: {e}"),
            Self::Config(msg) => write!(f, "config: {msg}"),
        }
    }
}

impl core::error::Error for Error {}

// ---------------------------------------------------------------------------
// Sensor errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SensorError {
    /// Ultrasonic echo did not arrive (or did not end) within the bounded wait.
    EchoTimeout,
    /// Reading is outside the physically plausible range.
    OutOfRange,
    /// Probe returned NaN.
    NotANumber,
    /// Probe frame failed its checksum.
    ProbeChecksum,
    /// Probe did not answer the start signal in time.
    ProbeTimeout,
}

impl fmt::Display for SensorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EchoTimeout => write!(f, "echo timeout"),
            Self::OutOfRange => write!(f, "reading out of range"),
            Self::NotANumber => write!(f, "reading is NaN"),
            Self::ProbeChecksum => write!(f, "probe checksum mismatch"),
            Self::ProbeTimeout => write!(f, "probe timeout"),
        }
    }
}

impl From<SensorError> for Error {
    fn from(e: SensorError) -> Self {
        Self::Sensor(e)
    }
}

// ---------------------------------------------------------------------------
// Actuator errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActuatorError {
    /// GPIO set failed.
    GpioWriteFailed,
}

impl fmt::Display for ActuatorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::GpioWriteFailed => write!(f, "GPIO write failed"),
        }
    }
}

impl From<ActuatorError> for Error {
    fn from(e: ActuatorError) -> Self {
        Self::Actuator(e)
    }
}

// ---------------------------------------------------------------------------
// Communications errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommsError {
    /// The transport reported a failure.  Carries the (non-positive) code.
    SendFailed(i32),
    /// The payload could not be serialised.
    Encode,
    /// Station association failed at boot.
    ConnectFailed,
    /// Inbound command was malformed or named an unknown command.
    BadCommand,
}

impl fmt::Display for CommsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SendFailed(code) => write!(f, "send failed (code {code})"),
            Self::Encode => write!(f, "payload encoding failed"),
            Self::ConnectFailed => write!(f, "WiFi connect failed"),
            Self::BadCommand => write!(f, "unrecognised command"),
        }
    }
}

impl From<CommsError> for Error {
    fn from(e: CommsError) -> Self {
        Self::Comms(e)
    }
}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

/// Firmware-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
