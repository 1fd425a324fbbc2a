//! Mock adapters for integration tests.
//!
//! Scripted inputs on the sensor side, full call history on the output
//! side, so tests can assert on every coil write, POST body, console line
//! and emitted event without touching real GPIO.

use std::collections::VecDeque;

use embedded_hal::digital::PinState;
use smartbin::app::events::AppEvent;
use smartbin::app::ports::{
    CONSOLE_LINE_CAP, ClimateReading, CoilPort, ConsolePort, DigitalInput, EventSink, NetworkPort,
    PostReply, SensorPort,
};
use smartbin::drivers::stepper::CoilPattern;

// ── Scripted digital input ────────────────────────────────────

/// Returns queued levels first, then holds `held` forever.
#[derive(Debug, Clone)]
pub struct InputScript {
    queue: VecDeque<PinState>,
    held: PinState,
}

impl Default for InputScript {
    fn default() -> Self {
        Self {
            queue: VecDeque::new(),
            held: PinState::High,
        }
    }
}

#[allow(dead_code)]
impl InputScript {
    pub fn hold(&mut self, level: PinState) {
        self.queue.clear();
        self.held = level;
    }

    pub fn queue(&mut self, levels: &[PinState]) {
        self.queue.extend(levels);
    }

    fn read(&mut self) -> PinState {
        self.queue.pop_front().unwrap_or(self.held)
    }
}

// ── MockHardware ──────────────────────────────────────────────

pub struct MockHardware {
    pub echo_us: Option<u32>,
    pub climate: ClimateReading,
    pub battery_raw: Option<u16>,
    pub button: InputScript,
    pub infrared: InputScript,
    pub flame: InputScript,
    pub coil_writes: Vec<CoilPattern>,
    pub settles: Vec<u32>,
}

#[allow(dead_code)]
impl MockHardware {
    pub fn new() -> Self {
        Self {
            echo_us: None,
            climate: ClimateReading::FAILED,
            battery_raw: Some(4095),
            button: InputScript::default(),
            infrared: InputScript::default(),
            flame: InputScript::default(),
            coil_writes: Vec::new(),
            settles: Vec::new(),
        }
    }

    pub fn last_coils(&self) -> Option<CoilPattern> {
        self.coil_writes.last().copied()
    }

    /// Coil writes that energized a phase (all-off excluded).
    pub fn phase_writes(&self) -> usize {
        self.coil_writes.iter().filter(|p| !p.is_off()).count()
    }
}

impl Default for MockHardware {
    fn default() -> Self {
        Self::new()
    }
}

impl SensorPort for MockHardware {
    fn measure_echo_us(&mut self, _timeout_us: u32) -> Option<u32> {
        self.echo_us
    }

    fn read_climate(&mut self) -> ClimateReading {
        self.climate
    }

    fn read_battery_raw(&mut self) -> Option<u16> {
        self.battery_raw
    }

    fn read_level(&mut self, input: DigitalInput) -> PinState {
        match input {
            DigitalInput::Button => self.button.read(),
            DigitalInput::Infrared => self.infrared.read(),
            DigitalInput::Flame => self.flame.read(),
        }
    }

    fn settle_ms(&mut self, ms: u32) {
        self.settles.push(ms);
    }
}

impl CoilPort for MockHardware {
    fn energize(&mut self, pattern: CoilPattern) {
        self.coil_writes.push(pattern);
    }
}

// ── MockNetwork ───────────────────────────────────────────────

pub struct MockNetwork {
    pub connected: bool,
    pub reply: PostReply,
    pub posts: Vec<String>,
}

#[allow(dead_code)]
impl MockNetwork {
    pub fn online() -> Self {
        Self {
            connected: true,
            reply: PostReply {
                code: 200,
                body: Some(r#"{"status":"Datos recibidos"}"#.into()),
            },
            posts: Vec::new(),
        }
    }

    pub fn offline() -> Self {
        Self {
            connected: false,
            ..Self::online()
        }
    }
}

impl NetworkPort for MockNetwork {
    fn is_connected(&mut self) -> bool {
        self.connected
    }

    fn post_json(&mut self, body: &str, _timeout_ms: u32) -> PostReply {
        self.posts.push(body.to_owned());
        self.reply.clone()
    }
}

// ── MockConsole ───────────────────────────────────────────────

#[derive(Default)]
pub struct MockConsole {
    pub inbound: VecDeque<String>,
    pub lines: Vec<String>,
}

#[allow(dead_code)]
impl MockConsole {
    pub fn send(&mut self, line: &str) {
        self.inbound.push_back(line.to_owned());
    }
}

impl ConsolePort for MockConsole {
    fn write_line(&mut self, line: &str) {
        self.lines.push(line.to_owned());
    }

    fn read_line(&mut self) -> Option<heapless::String<CONSOLE_LINE_CAP>> {
        let line = self.inbound.pop_front()?;
        let mut out = heapless::String::new();
        out.push_str(&line).ok()?;
        Some(out)
    }
}

// ── RecordingSink ─────────────────────────────────────────────

#[derive(Default)]
pub struct RecordingSink {
    pub events: Vec<AppEvent>,
}

#[allow(dead_code)]
impl RecordingSink {
    pub fn count(&self, pred: impl Fn(&AppEvent) -> bool) -> usize {
        self.events.iter().filter(|e| pred(e)).count()
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }
}

impl EventSink for RecordingSink {
    fn emit(&mut self, event: &AppEvent) {
        self.events.push(*event);
    }
}
