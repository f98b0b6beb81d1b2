//! DoorSentry Control ECU — Main Entry Point
//!
//! Hexagonal architecture around a blocking command dispatcher.
//!
//! ```text
//! ┌───────────────────────────────────────────────────────────────┐
//! │                      Adapters (outer ring)                    │
//! │                                                               │
//! │  SerialLinkAdapter  HardwareAdapter  EepromAdapter            │
//! │  (LinkPort)         (ActuatorPort)   (EepromPort+DelayPort)   │
//! │  TickTimerDriver    NvsAdapter       LogEventSink             │
//! │  (TickTimerPort)    (ConfigPort)     (EventSink)              │
//! │                                                               │
//! │  ──────────────── Port Trait Boundary ───────────────────     │
//! │                                                               │
//! │  ┌───────────────────────────────────────────────────────┐    │
//! │  │             LockService (pure logic)                  │    │
//! │  │  dispatcher · credential vault · tick sequencer       │    │
//! │  └───────────────────────────────────────────────────────┘    │
//! └───────────────────────────────────────────────────────────────┘
//! ```
#![deny(unused_must_use)]

use anyhow::Result;
use log::{error, info, warn};

use doorsentry::adapters::eeprom::EepromAdapter;
use doorsentry::adapters::hardware::HardwareAdapter;
use doorsentry::adapters::log_sink::LogEventSink;
use doorsentry::adapters::nvs::NvsAdapter;
use doorsentry::adapters::serial_link::SerialLinkAdapter;
use doorsentry::app::ports::{ActuatorPort, ConfigPort};
use doorsentry::app::service::LockService;
use doorsentry::config::SystemConfig;
use doorsentry::drivers;
use doorsentry::drivers::buzzer::BuzzerDriver;
use doorsentry::drivers::eeprom::EepromDriver;
use doorsentry::drivers::motor::MotorDriver;
use doorsentry::drivers::tick_timer::TickTimerDriver;
use doorsentry::drivers::uart_link::UartLinkDriver;
use doorsentry::drivers::watchdog::Watchdog;

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;

    info!("DoorSentry control ECU v{}", env!("CARGO_PKG_VERSION"));

    // ── 2. Load config from NVS (or defaults) ─────────────────
    let nvs = match NvsAdapter::new() {
        Ok(n) => Some(n),
        Err(e) => {
            warn!("NVS init failed ({}), running with defaults", e);
            None
        }
    };
    let config = match nvs.as_ref().map(ConfigPort::load) {
        Some(Ok(cfg)) => {
            info!("Config loaded from NVS");
            cfg
        }
        Some(Err(e)) => {
            warn!("NVS config load failed ({}), using defaults", e);
            SystemConfig::default()
        }
        None => SystemConfig::default(),
    };

    // ── 3. Initialise hardware peripherals ────────────────────
    if let Err(e) = drivers::hw_init::init_peripherals(&config) {
        // Peripheral init failure is critical — log and halt.
        // In production this triggers the watchdog reset after timeout.
        error!("HAL init failed: {} — halting", e);
        #[allow(clippy::empty_loop)]
        loop {}
    }
    let watchdog = Watchdog::new();

    // ── 4. Construct adapters ─────────────────────────────────
    let mut link = SerialLinkAdapter::new(UartLinkDriver::new(), watchdog);
    let mut hw = HardwareAdapter::new(MotorDriver::new(), BuzzerDriver::new());
    let mut timer = TickTimerDriver::new();
    let mut store = EepromAdapter::new(EepromDriver::new());
    let mut sink = LogEventSink::new();

    // ── 5. Construct the lock service ─────────────────────────
    let mut service = LockService::new(config);

    info!("System ready. Awaiting HMI handshake.");

    // ── 6. Dispatcher loop ────────────────────────────────────
    // Blocks for the lifetime of the appliance; only a link fault ends it.
    if let Err(e) = service.run(&mut link, &mut hw, &mut timer, &mut store, &mut sink) {
        error!("Dispatcher terminated: {}", e);
        hw.all_off();
        service.stats().log_summary();
    }

    Ok(())
}
