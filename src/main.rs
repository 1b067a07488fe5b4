//! SignalSight Firmware — Main Entry Point
//!
//! Hexagonal architecture with a single cooperative control loop.
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │                      Adapters (outer ring)                     │
//! │                                                                │
//! │  BoardAdapter          UartLink     LogEventSink   Esp32Time   │
//! │  (Button+Actuator)     (Serial)     (EventSink)    (TimePort)  │
//! │                                                                │
//! │  ──────────────── Port Trait Boundary ───────────────────      │
//! │                                                                │
//! │  ┌────────────────────────────────────────────────────────┐    │
//! │  │              AlertService (pure logic)                 │    │
//! │  │  Link · Chord · Debounce · Mode FSM                    │    │
//! │  └────────────────────────────────────────────────────────┘    │
//! └────────────────────────────────────────────────────────────────┘
//! ```
#![deny(unused_must_use)]

use anyhow::Result;
use esp_idf_hal::delay::{Delay, FreeRtos};
use esp_idf_hal::i2c::{I2cConfig, I2cDriver};
use esp_idf_hal::peripherals::Peripherals;
use esp_idf_hal::units::Hertz;
use log::{info, warn};

use signalsight::adapters::hardware::{BoardAdapter, UartLink};
use signalsight::adapters::log_sink::LogEventSink;
use signalsight::adapters::time::Esp32TimeAdapter;
use signalsight::app::service::AlertService;
use signalsight::config::SystemConfig;
use signalsight::drivers::hw_init;
use signalsight::drivers::lcd::Lcd1602;
use signalsight::error::{Error, InitError};
use signalsight::pins;

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;

    info!("╔══════════════════════════════════════╗");
    info!("║  SignalSight v{}                     ║", env!("CARGO_PKG_VERSION"));
    info!("╚══════════════════════════════════════╝");

    // ── 2. Configuration ──────────────────────────────────────
    let config = SystemConfig::default();
    config.validate()?;
    let loop_delay_ms = config.control_loop_interval_ms;

    // ── 3. Peripherals ────────────────────────────────────────
    hw_init::init_peripherals().map_err(Error::from)?;

    let peripherals = Peripherals::take()?;
    // Pin fields below must track pins::I2C_SDA_GPIO / I2C_SCL_GPIO.
    const _: () = assert!(pins::I2C_SDA_GPIO == 8 && pins::I2C_SCL_GPIO == 9);
    let i2c = I2cDriver::new(
        peripherals.i2c0,
        peripherals.pins.gpio8,
        peripherals.pins.gpio9,
        &I2cConfig::new().baudrate(Hertz(pins::I2C_FREQ_HZ)),
    )
    .map_err(|e| Error::from(InitError::I2cInstallFailed(e.code())))?;
    info!(
        "LCD on I2C0 (SDA={}, SCL={}, addr=0x{:02X})",
        pins::I2C_SDA_GPIO,
        pins::I2C_SCL_GPIO,
        pins::LCD_I2C_ADDR
    );

    let mut lcd = Lcd1602::new(i2c, Delay::new_default(), pins::LCD_I2C_ADDR);
    let display = match lcd.init() {
        Ok(()) => Some(lcd),
        Err(e) => {
            // Alerts still go out on lights and buzzer.
            warn!("LCD init failed ({}), running headless", e);
            None
        }
    };

    // ── 4. Adapters + service ─────────────────────────────────
    let mut board = BoardAdapter::new(display);
    let mut uart = UartLink;
    let clock = Esp32TimeAdapter::new();
    let mut log_sink = LogEventSink::new();

    let mut app = AlertService::new(config);
    app.start(&mut board, &clock, &mut log_sink);

    info!("System ready. Entering control loop ({} ms).", loop_delay_ms);

    // ── 5. Control loop ───────────────────────────────────────
    loop {
        app.tick(&mut board, &mut uart, &clock, &mut log_sink);
        FreeRtos::delay_ms(loop_delay_ms);
    }
}
