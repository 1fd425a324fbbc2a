//! 4-phase unipolar stepper driver (28BYJ-48 via ULN2003).
//!
//! Full-step, single-coil ("wave") drive.  The coil table is data: each
//! [`Phase`] maps to exactly one [`CoilPattern`] row, and advancing the
//! rotor is a modulo-4 walk over the table in the commanded direction.
//!
//! ```text
//!   phase │ IN1 IN2 IN3 IN4
//!   ──────┼────────────────
//!     A   │  1   0   0   0
//!     B   │  0   1   0   0
//!     C   │  0   0   1   0
//!     D   │  0   0   0   1
//! ```
//!
//! [`MotorSequencer`] never waits: it advances one phase per call, and the
//! control loop period sets the step rate.

use embedded_hal::digital::{OutputPin, PinState};
use log::{info, warn};

use crate::app::ports::CoilPort;
use crate::error::ActuatorError;

// ---------------------------------------------------------------------------
// Direction
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Clockwise,
    CounterClockwise,
}

impl Direction {
    pub fn opposite(self) -> Self {
        match self {
            Self::Clockwise => Self::CounterClockwise,
            Self::CounterClockwise => Self::Clockwise,
        }
    }
}

// ---------------------------------------------------------------------------
// Coil patterns
// ---------------------------------------------------------------------------

/// Output levels for the four coils, bit `n` = IN(n+1).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CoilPattern(u8);

impl CoilPattern {
    /// All coils de-energized.
    pub const OFF: Self = Self(0b0000);

    pub const fn bits(self) -> u8 {
        self.0
    }

    /// Level for coil `index` (0..4).
    pub fn level(self, index: usize) -> PinState {
        PinState::from(self.0 & (1 << index) != 0)
    }

    pub fn is_off(self) -> bool {
        self.0 == 0
    }
}

/// Energization table, indexed by [`Phase`].
const PHASE_TABLE: [CoilPattern; Phase::COUNT] = [
    CoilPattern(0b0001),
    CoilPattern(0b0010),
    CoilPattern(0b0100),
    CoilPattern(0b1000),
];

/// Rotor position within one electrical cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Phase {
    A = 0,
    B = 1,
    C = 2,
    D = 3,
}

impl Phase {
    pub const COUNT: usize = 4;

    fn from_index(idx: usize) -> Self {
        match idx % Self::COUNT {
            0 => Self::A,
            1 => Self::B,
            2 => Self::C,
            _ => Self::D,
        }
    }

    pub fn index(self) -> usize {
        self as usize
    }

    /// Neighbouring phase in `dir`, wrapping modulo 4.
    pub fn advance(self, dir: Direction) -> Self {
        match dir {
            Direction::Clockwise => Self::from_index(self.index() + 1),
            Direction::CounterClockwise => Self::from_index(self.index() + Self::COUNT - 1),
        }
    }

    pub fn pattern(self) -> CoilPattern {
        PHASE_TABLE[self.index()]
    }
}

// ---------------------------------------------------------------------------
// Motor sequencer
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MotorStatus {
    Idle,
    Stepping,
}

/// Reported by [`MotorSequencer::step`] on the call that finishes a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunComplete {
    pub direction: Direction,
    pub steps: u32,
}

/// Non-blocking run-to-count state machine.
#[derive(Debug, Clone)]
pub struct MotorSequencer {
    phase: Phase,
    direction: Direction,
    running: bool,
    steps_taken: u32,
    target_steps: u32,
}

impl Default for MotorSequencer {
    fn default() -> Self {
        Self::new()
    }
}

impl MotorSequencer {
    pub fn new() -> Self {
        Self {
            phase: Phase::A,
            direction: Direction::Clockwise,
            running: false,
            steps_taken: 0,
            target_steps: 0,
        }
    }

    /// Idle → Stepping.  A run already in progress is replaced; the rotor
    /// continues from its current phase.
    pub fn start_run(&mut self, direction: Direction, steps: u32) {
        if steps == 0 {
            warn!("Motor: ignoring zero-step run");
            return;
        }
        info!("Motor: run {:?} x{}", direction, steps);
        self.direction = direction;
        self.target_steps = steps;
        self.steps_taken = 0;
        self.running = true;
    }

    /// Advance one phase if stepping.  Returns `Some` on the call that
    /// reaches the target; the coils are already de-energized by then.
    pub fn step(&mut self, coils: &mut impl CoilPort) -> Option<RunComplete> {
        if !self.running {
            return None;
        }

        self.phase = self.phase.advance(self.direction);
        coils.energize(self.phase.pattern());
        self.steps_taken += 1;

        if self.steps_taken < self.target_steps {
            return None;
        }

        let done = RunComplete {
            direction: self.direction,
            steps: self.steps_taken,
        };
        self.running = false;
        self.steps_taken = 0;
        coils.energize(CoilPattern::OFF);
        info!("Motor: stopped after {} steps", done.steps);
        Some(done)
    }

    pub fn status(&self) -> MotorStatus {
        if self.running {
            MotorStatus::Stepping
        } else {
            MotorStatus::Idle
        }
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn steps_taken(&self) -> u32 {
        self.steps_taken
    }

    pub fn target_steps(&self) -> u32 {
        self.target_steps
    }
}

// ---------------------------------------------------------------------------
// GPIO coil bank
// ---------------------------------------------------------------------------

/// Four `embedded-hal` output pins driven as one coil bank.
pub struct GpioCoils<P: OutputPin> {
    pins: [P; 4],
    current: CoilPattern,
}

impl<P: OutputPin> GpioCoils<P> {
    /// Takes ownership of the pins and de-energizes them.
    pub fn new(pins: [P; 4]) -> Self {
        let mut bank = Self {
            pins,
            current: CoilPattern::OFF,
        };
        bank.energize(CoilPattern::OFF);
        bank
    }

    pub fn current(&self) -> CoilPattern {
        self.current
    }
}

impl<P: OutputPin> CoilPort for GpioCoils<P> {
    fn energize(&mut self, pattern: CoilPattern) {
        for (i, pin) in self.pins.iter_mut().enumerate() {
            if pin.set_state(pattern.level(i)).is_err() {
                warn!("Coil IN{}: {}", i + 1, ActuatorError::GpioWriteFailed);
            }
        }
        self.current = pattern;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::convert::Infallible;
    use embedded_hal::digital::ErrorType;

    #[derive(Default)]
    struct Recorder {
        writes: Vec<CoilPattern>,
    }

    impl CoilPort for Recorder {
        fn energize(&mut self, pattern: CoilPattern) {
            self.writes.push(pattern);
        }
    }

    #[test]
    fn phase_wraps_in_both_directions() {
        assert_eq!(Phase::D.advance(Direction::Clockwise), Phase::A);
        assert_eq!(Phase::A.advance(Direction::CounterClockwise), Phase::D);
        assert_eq!(Phase::B.advance(Direction::Clockwise), Phase::C);
    }

    #[test]
    fn every_table_row_energizes_exactly_one_coil() {
        for idx in 0..Phase::COUNT {
            let p = Phase::from_index(idx).pattern();
            assert_eq!(p.bits().count_ones(), 1);
        }
    }

    #[test]
    fn full_run_ends_idle_with_coils_off() {
        let mut motor = MotorSequencer::new();
        let mut coils = Recorder::default();
        motor.start_run(Direction::Clockwise, 512);

        for _ in 0..511 {
            assert!(motor.step(&mut coils).is_none());
        }
        let done = motor.step(&mut coils).expect("run should complete on step 512");

        assert_eq!(done.steps, 512);
        assert_eq!(motor.status(), MotorStatus::Idle);
        assert_eq!(motor.steps_taken(), 0);
        assert_eq!(coils.writes.last(), Some(&CoilPattern::OFF));
        // 512 phase writes + the final all-off.
        assert_eq!(coils.writes.len(), 513);
    }

    #[test]
    fn idle_motor_writes_nothing() {
        let mut motor = MotorSequencer::new();
        let mut coils = Recorder::default();
        assert!(motor.step(&mut coils).is_none());
        assert!(coils.writes.is_empty());
    }

    #[test]
    fn clockwise_then_counterclockwise_retraces_phases() {
        let mut motor = MotorSequencer::new();
        let mut coils = Recorder::default();
        motor.start_run(Direction::Clockwise, 3);
        while motor.step(&mut coils).is_none() {}
        assert_eq!(motor.phase(), Phase::D);

        motor.start_run(Direction::CounterClockwise, 3);
        while motor.step(&mut coils).is_none() {}
        assert_eq!(motor.phase(), Phase::A);
    }

    #[test]
    fn zero_step_run_is_ignored() {
        let mut motor = MotorSequencer::new();
        motor.start_run(Direction::Clockwise, 0);
        assert_eq!(motor.status(), MotorStatus::Idle);
    }

    struct FakePin<'a> {
        idx: usize,
        levels: &'a core::cell::RefCell<[bool; 4]>,
    }

    impl ErrorType for FakePin<'_> {
        type Error = Infallible;
    }

    impl OutputPin for FakePin<'_> {
        fn set_low(&mut self) -> Result<(), Infallible> {
            self.levels.borrow_mut()[self.idx] = false;
            Ok(())
        }
        fn set_high(&mut self) -> Result<(), Infallible> {
            self.levels.borrow_mut()[self.idx] = true;
            Ok(())
        }
    }

    #[test]
    fn gpio_bank_drives_pins_from_pattern() {
        let levels = core::cell::RefCell::new([true; 4]);
        let pins = [0, 1, 2, 3].map(|idx| FakePin { idx, levels: &levels });
        let mut bank = GpioCoils::new(pins);
        assert_eq!(*levels.borrow(), [false; 4], "new() de-energizes");

        bank.energize(Phase::C.pattern());
        assert_eq!(*levels.borrow(), [false, false, true, false]);
        assert_eq!(bank.current(), Phase::C.pattern());
    }
}
