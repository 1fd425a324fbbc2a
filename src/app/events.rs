//! Outbound application events.
//!
//! The [`Controller`](super::service::Controller) emits these through the
//! [`EventSink`](super::ports::EventSink) port.  Adapters on the other
//! side decide what to do with them; the firmware logs them.

use crate::drivers::stepper::Direction;
use crate::error::CommsError;

use super::commands::AppCommand;
use super::report::Alert;

/// Structured events emitted by the application core.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AppEvent {
    /// The controller has started (coils off, initial link state known).
    Started { connected: bool },

    /// A run toward the open position was commanded.
    WindowOpening,

    /// A run toward the closed position was commanded.
    WindowClosing,

    /// The motor finished a run and the coils are de-energized.
    MotorStopped { direction: Direction, steps: u32 },

    /// A confirmed deposit was credited.
    DepositCounted { deposits: u32, tokens: u32 },

    /// An alert condition holds on this iteration.
    Alert(Alert),

    /// Station association changed since the previous check.
    ConnectivityChanged { connected: bool },

    /// The network report was accepted with this HTTP status.
    ReportSent { status: u16 },

    /// The network report failed; it is not retried.
    ReportFailed(CommsError),

    /// An inbound command was accepted.
    CommandReceived(AppCommand),

    /// An inbound line could not be parsed as a command.
    CommandRejected,
}
