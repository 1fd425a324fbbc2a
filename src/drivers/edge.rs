//! Debounce-by-resettle falling-edge detector for active-low inputs.
//!
//! Polled every loop iteration.  A HIGH→LOW change between two polls is a
//! candidate edge: the detector waits a short settle period through the
//! sensor port, re-reads, and accepts the edge only if the line is still
//! LOW.  A disagreeing re-read is noise and is dropped without a trace.
//!
//! The stored "last level" is always the *raw* level from the first read,
//! never the confirmed result, so a bounce back to HIGH before the next
//! poll is seen as a fresh candidate edge.

use embedded_hal::digital::PinState;
use log::debug;

use crate::app::ports::{DigitalInput, SensorPort};

#[derive(Debug, Clone)]
pub struct EdgeDetector {
    input: DigitalInput,
    last_level: PinState,
    settle_ms: u32,
}

impl EdgeDetector {
    /// Starts from HIGH (released): an input already LOW on the first poll
    /// counts as an edge.
    pub fn new(input: DigitalInput, settle_ms: u32) -> Self {
        Self {
            input,
            last_level: PinState::High,
            settle_ms,
        }
    }

    /// Poll once.  Returns `true` on a confirmed falling edge.
    pub fn poll(&mut self, hw: &mut impl SensorPort) -> bool {
        self.poll_gated(hw, true)
    }

    /// Poll once, but only spend the settle delay (and report an edge)
    /// when `armed`.  The raw level is tracked either way.
    pub fn poll_gated(&mut self, hw: &mut impl SensorPort, armed: bool) -> bool {
        let level = hw.read_level(self.input);
        let falling = self.last_level == PinState::High && level == PinState::Low;
        self.last_level = level;

        if !falling || !armed {
            return false;
        }

        hw.settle_ms(self.settle_ms);
        if hw.read_level(self.input) == PinState::Low {
            true
        } else {
            debug!("{:?}: edge rejected as noise", self.input);
            false
        }
    }

    /// Last raw level seen was LOW (input active).
    pub fn is_low(&self) -> bool {
        self.last_level == PinState::Low
    }

    pub fn input(&self) -> DigitalInput {
        self.input
    }
}
