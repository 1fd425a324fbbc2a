//! Inbound commands to the controller.
//!
//! Two sources speak the same envelope, `{"command":"<name>", ...}`:
//! the display node over the serial link (with a `timestamp` field the
//! controller ignores) and the web server in its reply to a report POST.
//! Server replies without a command carry `{"status": "..."}` instead.

use serde::Deserialize;

use crate::error::CommsError;

/// Commands that external adapters can send into the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppCommand {
    /// Emit a console report on the current iteration.
    Refresh,
    /// Open the flap (same as a button press).
    OpenWindow,
    /// Close the flap.
    CloseWindow,
}

#[derive(Deserialize)]
struct Envelope {
    command: Option<heapless::String<16>>,
}

impl AppCommand {
    /// Map a command name to a command.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim() {
            "refresh" => Some(Self::Refresh),
            "open" => Some(Self::OpenWindow),
            "close" => Some(Self::CloseWindow),
            _ => None,
        }
    }

    /// Parse a JSON envelope.  `Ok(None)` means well-formed but no command
    /// (e.g. a plain status reply).
    pub fn parse(text: &str) -> Result<Option<Self>, CommsError> {
        let env: Envelope =
            serde_json::from_str(text.trim()).map_err(|_| CommsError::BadCommand)?;
        match env.command {
            None => Ok(None),
            Some(name) if name.is_empty() => Ok(None),
            Some(name) => Self::from_name(&name)
                .map(Some)
                .ok_or(CommsError::BadCommand),
        }
    }
}
