//! End-to-end tests of the controller loop against mock adapters.

use embedded_hal::digital::PinState;
use smartbin::app::commands::AppCommand;
use smartbin::app::events::AppEvent;
use smartbin::app::ports::PostReply;
use smartbin::app::report::Alert;
use smartbin::app::service::Controller;
use smartbin::config::SystemConfig;
use smartbin::drivers::stepper::{CoilPattern, Direction};
use smartbin::error::CommsError;

use crate::mock_hw::{MockConsole, MockHardware, MockNetwork, RecordingSink};

const PERIOD: u32 = 50;

struct Rig {
    ctrl: Controller,
    hw: MockHardware,
    net: MockNetwork,
    console: MockConsole,
    sink: RecordingSink,
    now: u32,
}

impl Rig {
    fn new(net: MockNetwork) -> Self {
        let mut rig = Self {
            ctrl: Controller::new(SystemConfig::default()),
            hw: MockHardware::new(),
            net,
            console: MockConsole::default(),
            sink: RecordingSink::default(),
            now: 0,
        };
        rig.ctrl.start(&mut rig.hw, &mut rig.net, &mut rig.sink);
        rig
    }

    fn tick(&mut self) {
        self.now += PERIOD;
        self.ctrl.tick(
            self.now,
            &mut self.hw,
            &mut self.net,
            &mut self.console,
            &mut self.sink,
        );
    }

    fn run_until(&mut self, until_ms: u32) {
        while self.now < until_ms {
            self.tick();
        }
    }

    fn command(&mut self, cmd: AppCommand) {
        self.ctrl.handle_command(cmd, self.now, &mut self.sink);
    }
}

// ── Start-up ──────────────────────────────────────────────────

#[test]
fn start_turns_coils_off_and_reports_link() {
    let rig = Rig::new(MockNetwork::online());
    assert_eq!(rig.hw.coil_writes, vec![CoilPattern::OFF]);
    assert_eq!(rig.sink.events, vec![AppEvent::Started { connected: true }]);
    assert!(rig.ctrl.wifi_connected());
}

// ── Deposits ──────────────────────────────────────────────────

#[test]
fn deposit_ignored_while_window_closed() {
    let mut rig = Rig::new(MockNetwork::offline());
    rig.hw.infrared.hold(PinState::Low);
    rig.tick();
    rig.tick();

    assert_eq!(rig.ctrl.snapshot().daily_deposits, 0);
    assert_eq!(rig.ctrl.snapshot().user_tokens, 0);
    assert!(rig.hw.settles.is_empty(), "no settle delay spent while disarmed");

    // Beam still blocked when the window opens: not a new edge.
    rig.command(AppCommand::OpenWindow);
    rig.tick();
    assert_eq!(rig.ctrl.snapshot().daily_deposits, 0);
}

#[test]
fn deposit_counted_while_window_open() {
    let mut rig = Rig::new(MockNetwork::offline());
    rig.command(AppCommand::OpenWindow);
    rig.tick();

    rig.hw.infrared.hold(PinState::Low);
    rig.tick();
    assert_eq!(rig.ctrl.snapshot().daily_deposits, 1);
    assert_eq!(rig.ctrl.snapshot().user_tokens, 10);

    // Held LOW: no second credit.
    rig.tick();
    assert_eq!(rig.ctrl.snapshot().daily_deposits, 1);

    // Release and block again: second deposit.
    rig.hw.infrared.hold(PinState::High);
    rig.tick();
    rig.hw.infrared.hold(PinState::Low);
    rig.tick();
    assert_eq!(rig.ctrl.snapshot().daily_deposits, 2);
    assert_eq!(rig.ctrl.snapshot().user_tokens, 20);
    assert!(rig.sink.events.contains(&AppEvent::DepositCounted {
        deposits: 2,
        tokens: 20
    }));
}

#[test]
fn deposit_bounce_is_not_counted() {
    let mut rig = Rig::new(MockNetwork::offline());
    rig.command(AppCommand::OpenWindow);
    rig.tick();

    // First read LOW, re-read after settle HIGH.
    rig.hw.infrared.queue(&[PinState::Low, PinState::High]);
    rig.tick();
    assert_eq!(rig.ctrl.snapshot().daily_deposits, 0);
    assert_eq!(rig.hw.settles, vec![50]);
}

// ── Window / motor ────────────────────────────────────────────

#[test]
fn open_runs_forward_then_chains_close() {
    let mut rig = Rig::new(MockNetwork::offline());
    rig.command(AppCommand::OpenWindow);
    assert!(rig.sink.events.contains(&AppEvent::WindowOpening));
    assert!(rig.ctrl.snapshot().window_open);

    for _ in 0..512 {
        rig.tick();
    }
    assert!(rig.sink.events.contains(&AppEvent::MotorStopped {
        direction: Direction::Clockwise,
        steps: 512
    }));
    assert!(rig.sink.events.contains(&AppEvent::WindowClosing));
    assert!(!rig.ctrl.snapshot().window_open);
    assert!(rig.ctrl.motor().is_running(), "close run chained immediately");

    for _ in 0..512 {
        rig.tick();
    }
    assert!(rig.sink.events.contains(&AppEvent::MotorStopped {
        direction: Direction::CounterClockwise,
        steps: 512
    }));
    assert!(!rig.ctrl.motor().is_running());
    assert!(!rig.ctrl.window_is_open());
    assert_eq!(rig.hw.phase_writes(), 1024);
    assert_eq!(rig.hw.last_coils(), Some(CoilPattern::OFF));

    // Idle motor leaves the coils alone.
    let writes = rig.hw.coil_writes.len();
    rig.tick();
    assert_eq!(rig.hw.coil_writes.len(), writes);
}

#[test]
fn button_opens_window_once() {
    let mut rig = Rig::new(MockNetwork::offline());
    rig.hw.button.hold(PinState::Low);
    rig.tick();
    assert!(rig.ctrl.window_is_open());

    // Second press while still open is ignored.
    rig.hw.button.hold(PinState::High);
    rig.tick();
    rig.hw.button.hold(PinState::Low);
    rig.tick();

    let openings = rig.sink.count(|e| *e == AppEvent::WindowOpening);
    assert_eq!(openings, 1);
}

#[test]
fn close_command_reverses_open_run() {
    let mut rig = Rig::new(MockNetwork::offline());
    rig.command(AppCommand::OpenWindow);
    for _ in 0..10 {
        rig.tick();
    }
    rig.command(AppCommand::CloseWindow);
    assert!(!rig.ctrl.window_is_open());
    assert_eq!(rig.ctrl.motor().direction(), Direction::CounterClockwise);

    // Close run completes with no further chained run.
    for _ in 0..512 {
        rig.tick();
    }
    assert!(!rig.ctrl.motor().is_running());
    assert_eq!(rig.sink.count(|e| *e == AppEvent::WindowClosing), 1);
}

// ── Alerts ────────────────────────────────────────────────────

#[test]
fn fire_alert_repeats_every_iteration() {
    let mut rig = Rig::new(MockNetwork::offline());
    rig.hw.flame.hold(PinState::Low);
    rig.run_until(3_000);
    assert!(rig.ctrl.snapshot().flame_detected);
    assert_eq!(rig.sink.count(|e| *e == AppEvent::Alert(Alert::Fire)), 1);

    for _ in 0..5 {
        rig.tick();
    }
    assert_eq!(rig.sink.count(|e| *e == AppEvent::Alert(Alert::Fire)), 6);

    // Cleared at the next sample.
    rig.hw.flame.hold(PinState::High);
    rig.run_until(6_000);
    rig.sink.clear();
    rig.tick();
    assert_eq!(rig.sink.count(|e| matches!(e, AppEvent::Alert(_))), 0);
}

#[test]
fn full_container_alert_after_sample() {
    let mut rig = Rig::new(MockNetwork::offline());
    // ~5 cm echo: container full.
    rig.hw.echo_us = Some(294);
    rig.run_until(3_000);

    assert!(rig.ctrl.snapshot().trash_level > 85.0);
    assert!(rig
        .sink
        .events
        .iter()
        .any(|e| matches!(e, AppEvent::Alert(Alert::ContainerFull { .. }))));
}

#[test]
fn failed_battery_conversion_keeps_last_level() {
    let mut rig = Rig::new(MockNetwork::offline());
    // ~11.3 V at the pack: roughly half charge.
    rig.hw.battery_raw = Some(1_159);
    rig.run_until(3_000);
    let level = rig.ctrl.snapshot().battery_level;
    assert!((level - 50.0).abs() < 1.0, "battery {level}");

    rig.hw.battery_raw = None;
    rig.run_until(9_000);
    assert_eq!(rig.ctrl.snapshot().battery_level, level);
    let low_battery = rig
        .sink
        .count(|e| matches!(e, AppEvent::Alert(Alert::LowBattery { .. })));
    assert_eq!(low_battery, 0);
}

// ── Connectivity + network reporting ──────────────────────────

#[test]
fn connectivity_change_logged_once_per_transition() {
    let mut rig = Rig::new(MockNetwork::online());
    rig.tick();
    rig.net.connected = false;
    rig.tick();
    rig.tick();
    rig.net.connected = true;
    rig.tick();
    rig.tick();

    let changes: Vec<_> = rig
        .sink
        .events
        .iter()
        .filter(|e| matches!(e, AppEvent::ConnectivityChanged { .. }))
        .collect();
    assert_eq!(
        changes,
        vec![
            &AppEvent::ConnectivityChanged { connected: false },
            &AppEvent::ConnectivityChanged { connected: true },
        ]
    );
}

#[test]
fn network_report_every_ten_seconds_while_online() {
    let mut rig = Rig::new(MockNetwork::online());
    rig.run_until(9_950);
    assert!(rig.net.posts.is_empty());

    rig.tick();
    assert_eq!(rig.net.posts.len(), 1);
    assert!(rig.net.posts[0].contains(r#""type":"data""#), "{}", rig.net.posts[0]);
    assert!(rig.sink.events.contains(&AppEvent::ReportSent { status: 200 }));

    rig.run_until(20_000);
    assert_eq!(rig.net.posts.len(), 2);
}

#[test]
fn network_report_skipped_offline_then_sent_on_reconnect() {
    let mut rig = Rig::new(MockNetwork::offline());
    rig.run_until(25_000);
    assert!(rig.net.posts.is_empty());

    rig.net.connected = true;
    rig.tick(); // connectivity check picks up the link
    assert!(rig.net.posts.is_empty());
    rig.tick(); // overdue report goes out now
    assert_eq!(rig.net.posts.len(), 1);
}

#[test]
fn failed_report_waits_for_next_interval() {
    let mut rig = Rig::new(MockNetwork::online());
    rig.net.reply = PostReply::failed(-1);
    rig.run_until(10_000);
    assert_eq!(rig.net.posts.len(), 1);
    assert!(rig
        .sink
        .events
        .contains(&AppEvent::ReportFailed(CommsError::SendFailed(-1))));

    rig.run_until(19_950);
    assert_eq!(rig.net.posts.len(), 1, "no retry before the interval");
    rig.tick();
    assert_eq!(rig.net.posts.len(), 2);
}

#[test]
fn server_reply_command_is_applied() {
    let mut rig = Rig::new(MockNetwork::online());
    rig.net.reply = PostReply {
        code: 200,
        body: Some(r#"{"command":"open"}"#.into()),
    };
    rig.run_until(10_000);

    assert!(rig
        .sink
        .events
        .contains(&AppEvent::CommandReceived(AppCommand::OpenWindow)));
    assert!(rig.ctrl.window_is_open());
}

#[test]
fn network_report_carries_live_button_and_counters() {
    let mut rig = Rig::new(MockNetwork::online());
    rig.run_until(9_900);
    rig.hw.button.hold(PinState::Low);
    rig.tick(); // 9 950: button edge opens the window
    rig.tick(); // 10 000: report

    let body = &rig.net.posts[0];
    assert!(body.contains(r#""button":true"#), "{body}");
    assert!(body.contains(r#""win":true"#), "{body}");
    assert!(body.contains(r#""time":10"#), "{body}");
}

// ── Console ───────────────────────────────────────────────────

#[test]
fn console_report_reflects_link_state() {
    let mut rig = Rig::new(MockNetwork::online());
    rig.run_until(2_000);
    assert_eq!(rig.console.lines.len(), 1);
    assert!(rig.console.lines[0].contains(r#""type":"status""#));
    assert!(rig.console.lines[0].contains(r#""wifi":true"#));
}

#[test]
fn console_close_command_while_idle_is_harmless() {
    let mut rig = Rig::new(MockNetwork::offline());
    rig.console.send(r#"{"command":"close"}"#);
    rig.tick();
    assert!(rig
        .sink
        .events
        .contains(&AppEvent::CommandReceived(AppCommand::CloseWindow)));
    assert!(!rig.ctrl.window_is_open());
}
