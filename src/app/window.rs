//! Window (flap) controller on top of the [`MotorSequencer`].
//!
//! `open()` and `close()` each start one full run and flip the commanded
//! state immediately; there is no position feedback.  An open also arms
//! a pending close, which is started the moment the opening run reports
//! completion, so a press produces one open-then-close cycle.

use log::info;

use crate::drivers::stepper::{Direction, MotorSequencer, RunComplete};

#[derive(Debug, Clone)]
pub struct Window {
    open: bool,
    close_pending: bool,
    steps: u32,
}

impl Window {
    pub fn new(steps: u32) -> Self {
        Self {
            open: false,
            close_pending: false,
            steps,
        }
    }

    /// Start an opening run.  Returns `false` (and does nothing) if the
    /// window is already commanded open.
    pub fn open(&mut self, motor: &mut MotorSequencer) -> bool {
        if self.open {
            return false;
        }
        motor.start_run(Direction::Clockwise, self.steps);
        self.open = true;
        self.close_pending = true;
        info!("Window: opening");
        true
    }

    /// Start a closing run.  Returns `false` if already commanded closed.
    pub fn close(&mut self, motor: &mut MotorSequencer) -> bool {
        if !self.open {
            return false;
        }
        motor.start_run(Direction::CounterClockwise, self.steps);
        self.open = false;
        self.close_pending = false;
        info!("Window: closing");
        true
    }

    /// Completion hook.  Starts the pending close after an opening run;
    /// returns `true` when it did.
    pub fn on_run_complete(&mut self, done: RunComplete, motor: &mut MotorSequencer) -> bool {
        if done.direction == Direction::Clockwise && self.close_pending && self.open {
            return self.close(motor);
        }
        false
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn close_pending(&self) -> bool {
        self.close_pending
    }
}
