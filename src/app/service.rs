//! Controller: the hexagonal core and its scheduler iteration.
//!
//! [`Controller`] owns every piece of loop state: the snapshot, the edge
//! detectors, the motor and window, the report timers and the last known
//! link state.  Nothing is global; the binary owns one controller and
//! lends it the adapters for each [`tick`](Controller::tick).
//!
//! ```text
//!  SensorPort ──▶ ┌──────────────────────────────┐ ──▶ EventSink
//!                 │          Controller           │
//!    CoilPort ◀── │ Sampler · Edges · Motor ·     │ ◀─▶ ConsolePort
//!                 │ Window · Reports · Alerts     │ ◀─▶ NetworkPort
//!                 └──────────────────────────────┘
//! ```

use log::{debug, info, warn};

use crate::config::SystemConfig;
use crate::error::CommsError;
use crate::drivers::edge::EdgeDetector;
use crate::drivers::stepper::{CoilPattern, MotorSequencer};
use crate::scheduler::{TaskId, TaskTimers};
use crate::sensors::Sampler;

use super::commands::AppCommand;
use super::context::SensorSnapshot;
use super::events::AppEvent;
use super::ports::{ConsolePort, CoilPort, DigitalInput, EventSink, NetworkPort, SensorPort};
use super::report::{
    AlertThresholds, Delivered, NetworkReport, ReportDispatcher, SerialReport, evaluate_alerts,
};
use super::window::Window;

// ───────────────────────────────────────────────────────────────
// Controller
// ───────────────────────────────────────────────────────────────

pub struct Controller {
    config: SystemConfig,
    snapshot: SensorSnapshot,
    sampler: Sampler,
    button: EdgeDetector,
    deposit: EdgeDetector,
    motor: MotorSequencer,
    window: Window,
    dispatcher: ReportDispatcher,
    alert_limits: AlertThresholds,
    timers: TaskTimers,
    wifi_connected: bool,
    iterations: u64,
}

impl Controller {
    /// Build the controller with boot defaults.  Call [`start`](Self::start)
    /// before the first tick.
    pub fn new(config: SystemConfig) -> Self {
        let settle = config.debounce_settle_ms;
        Self {
            snapshot: SensorSnapshot::default(),
            sampler: Sampler::new(&config),
            button: EdgeDetector::new(DigitalInput::Button, settle),
            deposit: EdgeDetector::new(DigitalInput::Infrared, settle),
            motor: MotorSequencer::new(),
            window: Window::new(config.window_steps),
            dispatcher: ReportDispatcher::new(config.http_timeout_ms),
            alert_limits: AlertThresholds {
                low_battery: config.low_battery_percent,
                full_container: config.full_container_percent,
            },
            timers: TaskTimers::from_config(&config),
            wifi_connected: false,
            iterations: 0,
            config,
        }
    }

    // ── Lifecycle ─────────────────────────────────────────────

    /// De-energize the coils and record the initial link state.
    pub fn start(
        &mut self,
        coils: &mut impl CoilPort,
        net: &mut impl NetworkPort,
        sink: &mut impl EventSink,
    ) {
        coils.energize(CoilPattern::OFF);
        self.wifi_connected = net.is_connected();
        sink.emit(&AppEvent::Started {
            connected: self.wifi_connected,
        });
        info!("Controller started (wifi={})", self.wifi_connected);
    }

    // ── Per-iteration orchestration ───────────────────────────

    /// Run one loop iteration at time `now_ms`.
    ///
    /// The `hw` parameter satisfies **both** [`SensorPort`] and
    /// [`CoilPort`], which avoids a double mutable borrow while keeping the
    /// port boundary explicit.  Task order within the iteration is fixed:
    /// sample → button → deposit → motor → inbound commands → network
    /// report → console report → alerts → connectivity.
    pub fn tick(
        &mut self,
        now_ms: u32,
        hw: &mut (impl SensorPort + CoilPort),
        net: &mut impl NetworkPort,
        console: &mut impl ConsolePort,
        sink: &mut impl EventSink,
    ) {
        self.iterations += 1;

        // 1. Sensors (gated)
        let sampler = &self.sampler;
        let snapshot = &mut self.snapshot;
        self.timers
            .get_mut(TaskId::Sample)
            .run_if_due(now_ms, true, || sampler.sample(hw, snapshot));

        // 2. Button → open
        if self.button.poll(hw) {
            if self.window.is_open() {
                debug!("Button: window already open");
            } else {
                self.open_window(sink);
            }
        }

        // 3. Deposit, counted only while open
        if self.deposit.poll_gated(hw, self.window.is_open()) {
            self.snapshot.record_deposit(self.config.deposit_reward);
            sink.emit(&AppEvent::DepositCounted {
                deposits: self.snapshot.daily_deposits,
                tokens: self.snapshot.user_tokens,
            });
        }

        // 4. Motor (one phase per iteration)
        if let Some(done) = self.motor.step(hw) {
            sink.emit(&AppEvent::MotorStopped {
                direction: done.direction,
                steps: done.steps,
            });
            if self.window.on_run_complete(done, &mut self.motor) {
                sink.emit(&AppEvent::WindowClosing);
            }
            self.snapshot.window_open = self.window.is_open();
        }

        // 5. Inbound console commands
        while let Some(line) = console.read_line() {
            self.handle_line(&line, now_ms, sink);
        }

        // 6. Network report (only while associated)
        let snapshot = &self.snapshot;
        let button = &self.button;
        let dispatcher = &self.dispatcher;
        let sent = self
            .timers
            .get_mut(TaskId::NetworkReport)
            .run_if_due(now_ms, self.wifi_connected, || {
                let report =
                    NetworkReport::from_snapshot(snapshot, button.is_low(), uptime_s(now_ms));
                dispatcher.send_network(net, &report)
            });
        if let Some(result) = sent {
            self.on_network_result(result, now_ms, sink);
        }

        // 7. Console report (always)
        let snapshot = &self.snapshot;
        let dispatcher = &self.dispatcher;
        let wifi = self.wifi_connected;
        self.timers
            .get_mut(TaskId::SerialReport)
            .run_if_due(now_ms, true, || {
                let report = SerialReport::from_snapshot(snapshot, uptime_s(now_ms), wifi);
                if let Err(e) = dispatcher.send_serial(console, &report) {
                    warn!("Console report: {}", e);
                }
            });

        // 8. Alerts, every iteration, no suppression
        for alert in evaluate_alerts(&self.snapshot, &self.alert_limits) {
            sink.emit(&AppEvent::Alert(alert));
        }

        // 9. Connectivity, logged on change only
        let connected = net.is_connected();
        if connected != self.wifi_connected {
            self.wifi_connected = connected;
            sink.emit(&AppEvent::ConnectivityChanged { connected });
        }
    }

    // ── Command handling ──────────────────────────────────────

    /// Apply an inbound command from the console or a server reply.
    pub fn handle_command(&mut self, cmd: AppCommand, now_ms: u32, sink: &mut impl EventSink) {
        sink.emit(&AppEvent::CommandReceived(cmd));
        match cmd {
            AppCommand::Refresh => self.timers.expedite(TaskId::SerialReport, now_ms),
            AppCommand::OpenWindow => {
                if !self.window.is_open() {
                    self.open_window(sink);
                }
            }
            AppCommand::CloseWindow => {
                if self.window.close(&mut self.motor) {
                    self.snapshot.window_open = false;
                    sink.emit(&AppEvent::WindowClosing);
                }
            }
        }
    }

    fn handle_line(&mut self, line: &str, now_ms: u32, sink: &mut impl EventSink) {
        match AppCommand::parse(line) {
            Ok(Some(cmd)) => self.handle_command(cmd, now_ms, sink),
            Ok(None) => {}
            Err(e) => {
                debug!("Inbound line dropped ({}): {}", e, line);
                sink.emit(&AppEvent::CommandRejected);
            }
        }
    }

    fn open_window(&mut self, sink: &mut impl EventSink) {
        if self.window.open(&mut self.motor) {
            self.snapshot.window_open = true;
            sink.emit(&AppEvent::WindowOpening);
        }
    }

    fn on_network_result(
        &mut self,
        result: Result<Delivered, CommsError>,
        now_ms: u32,
        sink: &mut impl EventSink,
    ) {
        match result {
            Ok(delivered) => {
                sink.emit(&AppEvent::ReportSent {
                    status: delivered.status,
                });
                if let Some(body) = delivered.body {
                    self.handle_line(&body, now_ms, sink);
                }
            }
            Err(e) => sink.emit(&AppEvent::ReportFailed(e)),
        }
    }

    // ── Queries ───────────────────────────────────────────────

    pub fn snapshot(&self) -> &SensorSnapshot {
        &self.snapshot
    }

    pub fn motor(&self) -> &MotorSequencer {
        &self.motor
    }

    pub fn window_is_open(&self) -> bool {
        self.window.is_open()
    }

    pub fn wifi_connected(&self) -> bool {
        self.wifi_connected
    }

    pub fn iterations(&self) -> u64 {
        self.iterations
    }

    pub fn config(&self) -> &SystemConfig {
        &self.config
    }

    pub fn timers(&self) -> &TaskTimers {
        &self.timers
    }
}

/// Whole seconds since boot.
fn uptime_s(now_ms: u32) -> u32 {
    now_ms / 1_000
}
