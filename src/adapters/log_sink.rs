//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing structured application events to
//! the ESP-IDF logger (UART0 in production), one tagged line per event.

use log::{info, warn};

use crate::app::events::AppEvent;
use crate::app::ports::EventSink;
use crate::app::report::Alert;

/// Adapter that logs every [`AppEvent`] to the serial console.
#[derive(Debug, Default)]
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &AppEvent) {
        match event {
            AppEvent::Started { connected } => {
                info!("START | coils off | wifi={}", connected);
            }
            AppEvent::WindowOpening => info!("WINDOW | opening"),
            AppEvent::WindowClosing => info!("WINDOW | closing"),
            AppEvent::MotorStopped { direction, steps } => {
                info!("MOTOR | stopped {:?} after {} steps", direction, steps);
            }
            AppEvent::DepositCounted { deposits, tokens } => {
                info!("DEPOSIT | deposits={} tokens={}", deposits, tokens);
            }
            AppEvent::Alert(alert) => match alert {
                Alert::Fire => warn!("ALERT | flame detected"),
                Alert::LowBattery { percent } => warn!("ALERT | battery low ({}%)", percent),
                Alert::ContainerFull { percent } => warn!("ALERT | container full ({}%)", percent),
            },
            AppEvent::ConnectivityChanged { connected } => {
                if *connected {
                    info!("NET | WiFi connected");
                } else {
                    warn!("NET | WiFi disconnected");
                }
            }
            AppEvent::ReportSent { status } => info!("NET | report sent (HTTP {})", status),
            AppEvent::ReportFailed(e) => warn!("NET | report dropped: {}", e),
            AppEvent::CommandReceived(cmd) => info!("CMD | {:?}", cmd),
            AppEvent::CommandRejected => warn!("CMD | unrecognised input"),
        }
    }
}
