//! Unified error types for the SignalSight firmware.
//!
//! The alert controller itself has no error state: bad protocol input is
//! dropped and missing data is modelled as `None`.  Errors only exist at
//! the edges: configuration, peripheral bring-up, and the display bus.
//! All variants are `Copy` so they pass through adapters without allocation.

use core::fmt;

// ---------------------------------------------------------------------------
// Top-level firmware error
// ---------------------------------------------------------------------------

/// Every fallible operation in the firmware funnels into this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// Peripheral initialisation failed.
    Init(InitError),
    /// Configuration is invalid.
    Config(&'static str),
    /// An I²C transaction to the display backpack failed.
    Bus(BusError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Init(e) => write!(f, "init: {e}"),
            Self::Config(msg) => write!(f, "config: {msg}"),
            Self::Bus(e) => write!(f, "bus: {e}"),
        }
    }
}

impl core::error::Error for Error {}

// ---------------------------------------------------------------------------
// Peripheral bring-up
// ---------------------------------------------------------------------------

/// Errors during one-shot peripheral initialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InitError {
    GpioConfigFailed(i32),
    LedcConfigFailed(i32),
    UartInstallFailed(i32),
    I2cInstallFailed(i32),
}

impl fmt::Display for InitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::GpioConfigFailed(rc) => write!(f, "GPIO config failed (rc={rc})"),
            Self::LedcConfigFailed(rc) => write!(f, "LEDC config failed (rc={rc})"),
            Self::UartInstallFailed(rc) => write!(f, "UART driver install failed (rc={rc})"),
            Self::I2cInstallFailed(rc) => write!(f, "I2C driver install failed (rc={rc})"),
        }
    }
}

impl From<InitError> for Error {
    fn from(e: InitError) -> Self {
        Self::Init(e)
    }
}

// ---------------------------------------------------------------------------
// Display bus
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BusError {
    /// Backpack did not acknowledge its address.
    NoAcknowledge,
    /// Any other bus-level failure.
    Other,
}

impl fmt::Display for BusError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoAcknowledge => write!(f, "no acknowledge"),
            Self::Other => write!(f, "transfer failed"),
        }
    }
}

impl From<BusError> for Error {
    fn from(e: BusError) -> Self {
        Self::Bus(e)
    }
}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

/// Firmware-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
