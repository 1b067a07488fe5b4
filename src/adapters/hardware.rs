//! Hardware adapter — bridges real peripherals to domain port traits.
//!
//! [`BoardAdapter`] owns the display driver and exposes the buttons,
//! indicators, buzzer and display through [`ButtonPort`] and
//! [`ActuatorPort`].  [`UartLink`] exposes the host UART as a
//! [`SerialPort`].  On non-espidf targets the pin helpers in
//! [`hw_init`](crate::drivers::hw_init) are simulation stubs.

use embedded_hal::delay::DelayNs;
use embedded_hal::i2c::I2c;
use log::warn;

use crate::app::ports::{ActuatorPort, ButtonPort, SerialPort};
use crate::drivers::button::ButtonId;
use crate::drivers::hw_init::{self, BUTTON_GPIOS, LED_GPIOS};
use crate::drivers::lcd::Lcd1602;
use crate::fsm::context::Indicator;

/// Concrete adapter for the alert board.
pub struct BoardAdapter<I2C, D> {
    /// `None` when the display failed to initialise; the board runs headless.
    display: Option<Lcd1602<I2C, D>>,
    display_errors: u32,
}

impl<I2C: I2c, D: DelayNs> BoardAdapter<I2C, D> {
    pub fn new(display: Option<Lcd1602<I2C, D>>) -> Self {
        Self {
            display,
            display_errors: 0,
        }
    }

    /// Failed display writes since boot.
    pub fn display_errors(&self) -> u32 {
        self.display_errors
    }
}

// ── ButtonPort implementation ─────────────────────────────────

impl<I2C, D> ButtonPort for BoardAdapter<I2C, D> {
    fn read_raw(&mut self) -> [bool; ButtonId::COUNT] {
        // Active-low: a held button pulls the line to ground.
        BUTTON_GPIOS.map(|pin| !hw_init::gpio_read(pin))
    }
}

// ── ActuatorPort implementation ───────────────────────────────

impl<I2C: I2c, D: DelayNs> ActuatorPort for BoardAdapter<I2C, D> {
    fn set_indicator(&mut self, light: Indicator, on: bool) {
        hw_init::gpio_write(LED_GPIOS[light as usize], on);
    }

    fn set_tone(&mut self, tone_hz: Option<u16>) {
        hw_init::buzzer_set(tone_hz);
    }

    fn show(&mut self, top: &str, bottom: &str) {
        let Some(lcd) = self.display.as_mut() else {
            return;
        };
        if let Err(e) = lcd.show(top, bottom) {
            self.display_errors = self.display_errors.wrapping_add(1);
            warn!("display write failed: {}", e);
        }
    }
}

// ── SerialPort implementation ─────────────────────────────────

/// Host UART, polled without blocking.
#[derive(Debug, Default)]
pub struct UartLink;

impl SerialPort for UartLink {
    fn read_byte(&mut self) -> Option<u8> {
        hw_init::uart_read_byte()
    }
}
