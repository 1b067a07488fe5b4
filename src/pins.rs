//! GPIO / peripheral pin assignments for the SignalSight alert board.
//!
//! Single source of truth — every driver references this module rather than
//! hard-coding pin numbers.

// ---------------------------------------------------------------------------
// Operator buttons (active-low, internal pull-up)
// ---------------------------------------------------------------------------

pub const BUTTON_RED_GPIO: i32 = 4;
pub const BUTTON_YELLOW_GPIO: i32 = 5;
pub const BUTTON_GREEN_GPIO: i32 = 6;

// ---------------------------------------------------------------------------
// Indicator lights (active-high)
// ---------------------------------------------------------------------------

pub const LED_RED_GPIO: i32 = 11;
pub const LED_YELLOW_GPIO: i32 = 12;
pub const LED_GREEN_GPIO: i32 = 13;

// ---------------------------------------------------------------------------
// Piezo buzzer (LEDC square wave)
// ---------------------------------------------------------------------------

pub const BUZZER_GPIO: i32 = 7;
/// LEDC timer resolution (bits).  10-bit covers 1–5 kHz tones.
pub const BUZZER_RESOLUTION_BITS: u32 = 10;
/// 50 % duty at 10-bit resolution.
pub const BUZZER_DUTY_ON: u32 = 512;

// ---------------------------------------------------------------------------
// I²C bus (16×2 LCD via PCF8574 backpack)
// ---------------------------------------------------------------------------

pub const I2C_SDA_GPIO: i32 = 8;
pub const I2C_SCL_GPIO: i32 = 9;
pub const I2C_FREQ_HZ: u32 = 100_000;
pub const LCD_I2C_ADDR: u8 = 0x27;

// ---------------------------------------------------------------------------
// UART link to the perception host
// ---------------------------------------------------------------------------

pub const UART_PORT: i32 = 1;
pub const UART_TX_GPIO: i32 = 17;
pub const UART_RX_GPIO: i32 = 18;
pub const UART_BAUD: i32 = 115_200;
/// Driver RX ring buffer (bytes).
pub const UART_RX_BUF: i32 = 256;
