//! SignalSight alert controller library.
//!
//! Exposes the pure-logic modules for integration testing and external
//! inspection. All ESP-IDF-specific code is guarded by
//! `#[cfg(target_os = "espidf")]` within each module.

#![deny(unused_must_use)]

pub mod app;
pub mod clock;
pub mod config;
pub mod error;
pub mod fsm;
pub mod link;

pub mod pins;

// Hardware-facing modules compile on the host too; their ESP-IDF calls
// are replaced by stubs behind cfg attributes.
pub mod adapters;
pub mod drivers;
