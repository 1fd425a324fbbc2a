//! Serial console adapter: the UART link to the display node.
//!
//! Outbound lines are written whole with a `\n` terminator.  Inbound bytes
//! are drained without blocking and assembled into lines by
//! [`LineAssembler`]; an over-long line is dropped up to its terminator.
//!
//! - **`target_os = "espidf"`**: `esp_idf_svc::hal::uart::UartDriver`.
//! - **all other targets**: in-memory queues for host-side tests.

use log::warn;

use crate::app::ports::{CONSOLE_LINE_CAP, ConsolePort};

#[cfg(target_os = "espidf")]
use esp_idf_svc::hal::{delay::NON_BLOCK, uart::UartDriver};

// ───────────────────────────────────────────────────────────────
// Line assembly
// ───────────────────────────────────────────────────────────────

#[derive(Debug, Default)]
pub struct LineAssembler {
    buf: heapless::String<CONSOLE_LINE_CAP>,
    overflowed: bool,
}

impl LineAssembler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one byte.  Returns a line when `byte` terminates one.
    pub fn push(&mut self, byte: u8) -> Option<heapless::String<CONSOLE_LINE_CAP>> {
        match byte {
            b'\n' => {
                let line = core::mem::take(&mut self.buf);
                if core::mem::take(&mut self.overflowed) {
                    warn!("Console: dropped over-long line");
                    return None;
                }
                (!line.is_empty()).then_some(line)
            }
            b'\r' => None,
            _ if self.overflowed => None,
            _ => {
                // Non-ASCII bytes cannot be part of a valid command line.
                if !byte.is_ascii() || self.buf.push(byte as char).is_err() {
                    self.overflowed = true;
                }
                None
            }
        }
    }
}

// ───────────────────────────────────────────────────────────────
// Adapter
// ───────────────────────────────────────────────────────────────

pub struct SerialConsole {
    #[cfg(target_os = "espidf")]
    uart: UartDriver<'static>,
    #[cfg(not(target_os = "espidf"))]
    sim_rx: std::collections::VecDeque<u8>,
    #[cfg(not(target_os = "espidf"))]
    sim_tx: Vec<String>,
    assembler: LineAssembler,
}

impl SerialConsole {
    #[cfg(target_os = "espidf")]
    pub fn new(uart: UartDriver<'static>) -> Self {
        Self {
            uart,
            assembler: LineAssembler::new(),
        }
    }

    #[cfg(not(target_os = "espidf"))]
    pub fn new() -> Self {
        Self {
            sim_rx: std::collections::VecDeque::new(),
            sim_tx: Vec::new(),
            assembler: LineAssembler::new(),
        }
    }

    /// Queue bytes as if the display node had sent them.
    #[cfg(not(target_os = "espidf"))]
    pub fn sim_receive(&mut self, bytes: &[u8]) {
        self.sim_rx.extend(bytes);
    }

    /// Lines written so far.
    #[cfg(not(target_os = "espidf"))]
    pub fn sim_sent(&self) -> &[String] {
        &self.sim_tx
    }

    #[cfg(target_os = "espidf")]
    fn next_byte(&mut self) -> Option<u8> {
        let mut byte = [0u8; 1];
        match self.uart.read(&mut byte, NON_BLOCK) {
            Ok(1) => Some(byte[0]),
            _ => None,
        }
    }

    #[cfg(not(target_os = "espidf"))]
    fn next_byte(&mut self) -> Option<u8> {
        self.sim_rx.pop_front()
    }
}

#[cfg(not(target_os = "espidf"))]
impl Default for SerialConsole {
    fn default() -> Self {
        Self::new()
    }
}

impl ConsolePort for SerialConsole {
    #[cfg(target_os = "espidf")]
    fn write_line(&mut self, line: &str) {
        for chunk in [line.as_bytes(), b"\n".as_slice()] {
            if let Err(e) = self.uart.write(chunk) {
                warn!("Console: UART write failed: {}", e);
                return;
            }
        }
    }

    #[cfg(not(target_os = "espidf"))]
    fn write_line(&mut self, line: &str) {
        self.sim_tx.push(line.to_owned());
    }

    fn read_line(&mut self) -> Option<heapless::String<CONSOLE_LINE_CAP>> {
        while let Some(byte) = self.next_byte() {
            if let Some(line) = self.assembler.push(byte) {
                return Some(line);
            }
        }
        None
    }
}
