//! Reporting dispatcher: payload shapes, the two sinks, and alerts.
//!
//! | Sink    | Interval | Gate               | Payload                    |
//! |---------|----------|--------------------|----------------------------|
//! | Network | 10 s     | station associated | `type:"data"`, integers    |
//! | Console | 2 s      | none               | `type:"status"`, 1-decimal |
//!
//! A failed network send is logged and dropped; the next interval sends
//! whatever the snapshot holds then.

use serde::Serialize;

use crate::error::CommsError;

use super::context::SensorSnapshot;
use super::ports::{ConsolePort, NetworkPort};

// ───────────────────────────────────────────────────────────────
// Payloads
// ───────────────────────────────────────────────────────────────

/// Body of the periodic HTTP POST.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct NetworkReport {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub trash: i32,
    pub temp: i32,
    pub hum: i32,
    pub flame: bool,
    pub bat: i32,
    pub tokens: u32,
    pub deps: u32,
    pub win: bool,
    /// Live button state (pressed = true).
    pub button: bool,
    /// Seconds since boot.
    pub time: u32,
}

impl NetworkReport {
    /// Float fields are truncated toward zero.
    pub fn from_snapshot(snap: &SensorSnapshot, button_pressed: bool, uptime_s: u32) -> Self {
        Self {
            kind: "data",
            trash: snap.trash_level as i32,
            temp: snap.temperature as i32,
            hum: snap.humidity as i32,
            flame: snap.flame_detected,
            bat: snap.battery_level as i32,
            tokens: snap.user_tokens,
            deps: snap.daily_deposits,
            win: snap.window_open,
            button: button_pressed,
            time: uptime_s,
        }
    }
}

/// Line written to the display node over the serial link.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SerialReport {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub trash: f32,
    pub temp: f32,
    pub hum: f32,
    pub flame: bool,
    pub bat: f32,
    pub tokens: u32,
    pub deps: u32,
    pub win: bool,
    pub uptime: u32,
    pub wifi: bool,
}

fn one_decimal(v: f32) -> f32 {
    (v * 10.0).round() / 10.0
}

impl SerialReport {
    pub fn from_snapshot(snap: &SensorSnapshot, uptime_s: u32, wifi: bool) -> Self {
        Self {
            kind: "status",
            trash: one_decimal(snap.trash_level),
            temp: one_decimal(snap.temperature),
            hum: one_decimal(snap.humidity),
            flame: snap.flame_detected,
            bat: one_decimal(snap.battery_level),
            tokens: snap.user_tokens,
            deps: snap.daily_deposits,
            win: snap.window_open,
            uptime: uptime_s,
            wifi,
        }
    }
}

// ───────────────────────────────────────────────────────────────
// Alerts
// ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Alert {
    Fire,
    LowBattery { percent: i32 },
    ContainerFull { percent: i32 },
}

/// Alert thresholds, in percent.
#[derive(Debug, Clone, Copy)]
pub struct AlertThresholds {
    pub low_battery: f32,
    pub full_container: f32,
}

/// Every alert that holds for `snap`.  Pure: no memory of earlier calls.
pub fn evaluate_alerts(snap: &SensorSnapshot, limits: &AlertThresholds) -> heapless::Vec<Alert, 3> {
    let mut out = heapless::Vec::new();
    // Capacity equals the number of alert kinds; pushes cannot fail.
    if snap.flame_detected {
        let _ = out.push(Alert::Fire);
    }
    if snap.battery_level < limits.low_battery {
        let _ = out.push(Alert::LowBattery {
            percent: snap.battery_level as i32,
        });
    }
    if snap.trash_level > limits.full_container {
        let _ = out.push(Alert::ContainerFull {
            percent: snap.trash_level as i32,
        });
    }
    out
}

// ───────────────────────────────────────────────────────────────
// Dispatcher
// ───────────────────────────────────────────────────────────────

/// Reply to an accepted network report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Delivered {
    pub status: u16,
    pub body: Option<String>,
}

#[derive(Debug, Clone, Copy)]
pub struct ReportDispatcher {
    http_timeout_ms: u32,
}

impl ReportDispatcher {
    pub fn new(http_timeout_ms: u32) -> Self {
        Self { http_timeout_ms }
    }

    /// POST one [`NetworkReport`].  A non-positive code is a failure.
    pub fn send_network(
        &self,
        net: &mut impl NetworkPort,
        report: &NetworkReport,
    ) -> Result<Delivered, CommsError> {
        let body = serde_json::to_string(report).map_err(|_| CommsError::Encode)?;
        let reply = net.post_json(&body, self.http_timeout_ms);
        if reply.code <= 0 {
            return Err(CommsError::SendFailed(reply.code));
        }
        Ok(Delivered {
            status: u16::try_from(reply.code).unwrap_or(u16::MAX),
            body: reply.body,
        })
    }

    /// Write one [`SerialReport`] line.
    pub fn send_serial(
        &self,
        console: &mut impl ConsolePort,
        report: &SerialReport,
    ) -> Result<(), CommsError> {
        let line = serde_json::to_string(report).map_err(|_| CommsError::Encode)?;
        console.write_line(&line);
        Ok(())
    }
}
