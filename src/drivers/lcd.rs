//! HD44780 16×2 character display behind a PCF8574 I²C backpack.
//!
//! The backpack exposes eight port bits; the usual wiring is:
//!
//! | PCF8574 bit | HD44780 line |
//! |-------------|--------------|
//! | P0          | RS           |
//! | P1          | RW (held low)|
//! | P2          | EN           |
//! | P3          | backlight    |
//! | P4–P7       | D4–D7        |
//!
//! The controller runs in 4-bit mode: each byte goes out as two nibbles,
//! each latched by a high→low pulse on EN.
//!
//! Generic over `embedded_hal` 1.0 so the same driver runs on the ESP-IDF
//! I²C master and on a recording mock in tests.

use embedded_hal::delay::DelayNs;
use embedded_hal::i2c::{ErrorKind, I2c};

use crate::error::{BusError, Error, Result};

pub const COLUMNS: usize = 16;
pub const ROWS: usize = 2;

const RS: u8 = 0x01;
const EN: u8 = 0x04;
const BACKLIGHT: u8 = 0x08;

const CMD_CLEAR: u8 = 0x01;
const CMD_ENTRY_MODE_INC: u8 = 0x06;
const CMD_DISPLAY_ON: u8 = 0x0C;
const CMD_FUNCTION_4BIT_2LINE: u8 = 0x28;
const CMD_SET_DDRAM: u8 = 0x80;

const ROW_OFFSETS: [u8; ROWS] = [0x00, 0x40];

fn bus_error<E: embedded_hal::i2c::Error>(e: &E) -> Error {
    match e.kind() {
        ErrorKind::NoAcknowledge(_) => BusError::NoAcknowledge.into(),
        _ => BusError::Other.into(),
    }
}

/// Character display driver.
pub struct Lcd1602<I2C, D> {
    i2c: I2C,
    delay: D,
    addr: u8,
}

impl<I2C: I2c, D: DelayNs> Lcd1602<I2C, D> {
    pub fn new(i2c: I2C, delay: D, addr: u8) -> Self {
        Self {
            i2c,
            delay,
            addr,
        }
    }

    /// Power-on initialisation into 4-bit, two-line mode.
    pub fn init(&mut self) -> Result<()> {
        self.delay.delay_ms(50);
        self.write_port(BACKLIGHT)?;

        // Three 8-bit "function set" nibbles, then switch to 4-bit.
        self.write_nibble(0x03, false)?;
        self.delay.delay_us(4500);
        self.write_nibble(0x03, false)?;
        self.delay.delay_us(4500);
        self.write_nibble(0x03, false)?;
        self.delay.delay_us(150);
        self.write_nibble(0x02, false)?;

        self.command(CMD_FUNCTION_4BIT_2LINE)?;
        self.command(CMD_DISPLAY_ON)?;
        self.clear()?;
        self.command(CMD_ENTRY_MODE_INC)
    }

    pub fn clear(&mut self) -> Result<()> {
        self.command(CMD_CLEAR)?;
        self.delay.delay_ms(2);
        Ok(())
    }

    pub fn set_cursor(&mut self, col: u8, row: u8) -> Result<()> {
        let offset = ROW_OFFSETS[usize::from(row).min(ROWS - 1)];
        self.command(CMD_SET_DDRAM | (offset + col.min(COLUMNS as u8 - 1)))
    }

    /// Write ASCII text at the cursor.  Other characters show as `?`.
    pub fn write_str(&mut self, text: &str) -> Result<()> {
        for ch in text.chars() {
            let byte = if ch.is_ascii() && !ch.is_ascii_control() {
                ch as u8
            } else {
                b'?'
            };
            self.write_byte(byte, true)?;
        }
        Ok(())
    }

    /// Clear and rewrite both lines, truncating each to the panel width.
    pub fn show(&mut self, top: &str, bottom: &str) -> Result<()> {
        self.clear()?;
        for (row, line) in [top, bottom].into_iter().enumerate() {
            self.set_cursor(0, row as u8)?;
            let end = line
                .char_indices()
                .nth(COLUMNS)
                .map_or(line.len(), |(idx, _)| idx);
            self.write_str(&line[..end])?;
        }
        Ok(())
    }

    /// Give back the bus and delay provider.
    pub fn release(self) -> (I2C, D) {
        (self.i2c, self.delay)
    }

    // ── Low level ─────────────────────────────────────────────

    fn command(&mut self, cmd: u8) -> Result<()> {
        self.write_byte(cmd, false)
    }

    fn write_byte(&mut self, byte: u8, data: bool) -> Result<()> {
        self.write_nibble(byte >> 4, data)?;
        self.write_nibble(byte & 0x0F, data)
    }

    fn write_nibble(&mut self, nibble: u8, data: bool) -> Result<()> {
        let rs = if data { RS } else { 0 };
        let bits = (nibble << 4) | rs | BACKLIGHT;
        self.write_port(bits | EN)?;
        self.delay.delay_us(1);
        self.write_port(bits & !EN)?;
        self.delay.delay_us(50);
        Ok(())
    }

    fn write_port(&mut self, bits: u8) -> Result<()> {
        self.i2c
            .write(self.addr, &[bits])
            .map_err(|e| bus_error(&e))
    }
}
