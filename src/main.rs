//! SmartBin Firmware: Main Entry Point
//!
//! Single-threaded cooperative control loop with hexagonal adapters.
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │                      Adapters (outer ring)                     │
//! │                                                                │
//! │  HardwareAdapter   LogEventSink   WifiNetwork   SerialConsole  │
//! │  (Sensor+Coil)     (EventSink)    (NetworkPort) (ConsolePort)  │
//! │                                                                │
//! │  ──────────────── Port Trait Boundary ───────────────────      │
//! │                                                                │
//! │  ┌────────────────────────────────────────────────────────┐    │
//! │  │              Controller (pure logic)                   │    │
//! │  │  Sampler · Edges · Motor · Window · Reports · Alerts   │    │
//! │  └────────────────────────────────────────────────────────┘    │
//! │                                                                │
//! │  Loop: read clock → tick → delay(loop period)                  │
//! └────────────────────────────────────────────────────────────────┘
//! ```
#![deny(unused_must_use)]

use anyhow::Result;
use log::{info, warn};

use esp_idf_svc::eventloop::EspSystemEventLoop;
use esp_idf_svc::hal::delay::{Ets, FreeRtos};
use esp_idf_svc::hal::gpio::AnyIOPin;
use esp_idf_svc::hal::peripherals::Peripherals;
use esp_idf_svc::hal::uart::{self, UartDriver};
use esp_idf_svc::hal::units::Hertz;
use esp_idf_svc::nvs::EspDefaultNvsPartition;

use smartbin::adapters::console::SerialConsole;
use smartbin::adapters::hardware::HardwareAdapter;
use smartbin::adapters::log_sink::LogEventSink;
use smartbin::adapters::network::WifiNetwork;
use smartbin::adapters::time::Esp32TimeAdapter;
use smartbin::app::service::Controller;
use smartbin::config::SystemConfig;
use smartbin::drivers::hw_init;
use smartbin::pins;

/// Board-integrator override, baked in at build time.
fn load_config() -> SystemConfig {
    let Some(json) = option_env!("SMARTBIN_CONFIG_JSON") else {
        return SystemConfig::default();
    };
    match SystemConfig::from_json(json) {
        Ok(cfg) => {
            info!("Config: using build-time override");
            cfg
        }
        Err(e) => {
            warn!("Config override rejected ({}), using defaults", e);
            SystemConfig::default()
        }
    }
}

// ── Main ──────────────────────────────────────────────────────

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;

    info!("╔══════════════════════════════════════╗");
    info!("║  SmartBin principal v{}           ║", env!("CARGO_PKG_VERSION"));
    info!("╚══════════════════════════════════════╝");

    // ── 2. Configuration ──────────────────────────────────────
    let config = load_config();

    // ── 3. Peripherals ────────────────────────────────────────
    if let Err(e) = hw_init::init_peripherals() {
        // Peripheral init failure is critical: log and halt.
        log::error!("HAL init failed: {}, halting", e);
        #[allow(clippy::empty_loop)]
        loop {}
    }

    let peripherals = Peripherals::take()?;
    let sysloop = EspSystemEventLoop::take()?;
    let nvs = EspDefaultNvsPartition::take().ok();

    // ── 4. Construct adapters ─────────────────────────────────
    let mut hw = HardwareAdapter::new(Ets);
    let mut log_sink = LogEventSink::new();
    let clock = Esp32TimeAdapter::new();

    // Display link: the pin fields below must match pins.rs.
    const _: () = assert!(pins::DISPLAY_UART_TX_GPIO == 17 && pins::DISPLAY_UART_RX_GPIO == 16);
    let uart_cfg = uart::config::Config::default().baudrate(Hertz(pins::DISPLAY_UART_BAUD));
    let uart = UartDriver::new(
        peripherals.uart2,
        peripherals.pins.gpio17,
        peripherals.pins.gpio16,
        Option::<AnyIOPin>::None,
        Option::<AnyIOPin>::None,
        &uart_cfg,
    )?;
    let mut console = SerialConsole::new(uart);

    let mut net = WifiNetwork::new(peripherals.modem, sysloop, nvs, &config)?;
    if let Err(e) = net.connect_at_boot(config.wifi_boot_attempts, FreeRtos::delay_ms) {
        warn!("Boot: {}", e);
    }

    // ── 5. Controller ─────────────────────────────────────────
    let loop_period_ms = config.loop_period_ms;
    let mut controller = Controller::new(config);
    controller.start(&mut hw, &mut net, &mut log_sink);

    info!(
        "System ready after {} s. Entering control loop ({} ms period).",
        clock.uptime_secs(),
        loop_period_ms
    );

    // ── 6. Control loop ───────────────────────────────────────
    loop {
        let now_ms = clock.now_ms();
        controller.tick(now_ms, &mut hw, &mut net, &mut console, &mut log_sink);
        FreeRtos::delay_ms(loop_period_ms);
    }
}
