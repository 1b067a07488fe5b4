//! Application core — pure domain logic, zero I/O.
//!
//! This module contains the business rules for the SignalSight controller:
//! input arbitration between buttons, the chord gesture and the host link,
//! and mode orchestration.  All interaction with hardware happens through
//! **port traits** defined in [`ports`], keeping this layer fully testable
//! without real peripherals.

pub mod events;
pub mod ports;
pub mod service;
