//! Port traits — the hexagonal boundary between domain logic and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ AlertService (domain)
//! ```
//!
//! Driven adapters (buttons, serial, clock, actuators, event sinks)
//! implement these traits.  The [`AlertService`](super::service::AlertService)
//! consumes them via generics, so the domain core never touches hardware
//! directly and runs unchanged against a simulated clock in tests.

use crate::clock::Millis;
use crate::drivers::button::ButtonId;
use crate::fsm::context::Indicator;

// ───────────────────────────────────────────────────────────────
// Time port (driven adapter: system timer → domain)
// ───────────────────────────────────────────────────────────────

/// Monotonic millisecond clock.  Allowed to wrap at `u32::MAX`.
pub trait TimePort {
    fn now_ms(&self) -> Millis;
}

// ───────────────────────────────────────────────────────────────
// Button port (driven adapter: GPIO → domain)
// ───────────────────────────────────────────────────────────────

/// Raw, undebounced button levels.
pub trait ButtonPort {
    /// One entry per [`ButtonId`], `true` when the line is pulled low
    /// (button held).
    fn read_raw(&mut self) -> [bool; ButtonId::COUNT];
}

// ───────────────────────────────────────────────────────────────
// Serial port (driven adapter: UART → domain)
// ───────────────────────────────────────────────────────────────

/// Non-blocking byte source from the perception host.
pub trait SerialPort {
    /// Next received byte, or `None` if nothing is waiting.
    fn read_byte(&mut self) -> Option<u8>;
}

// ───────────────────────────────────────────────────────────────
// Actuator port (driven adapter: domain → hardware)
// ───────────────────────────────────────────────────────────────

/// Write-only outputs.  Infallible from the domain's point of view;
/// adapters log and swallow bus errors.
pub trait ActuatorPort {
    /// Switch one indicator light.
    fn set_indicator(&mut self, light: Indicator, on: bool);

    /// Drive the buzzer at `Some(hz)`, or silence it with `None`.
    fn set_tone(&mut self, tone_hz: Option<u16>);

    /// Clear the display and write both lines.
    fn show(&mut self, top: &str, bottom: &str);
}

// ───────────────────────────────────────────────────────────────
// Event sink port (driven adapter: domain → logging / telemetry)
// ───────────────────────────────────────────────────────────────

/// The domain emits structured [`AppEvent`](super::events::AppEvent)s
/// through this port.  Adapters decide where they go.
pub trait EventSink {
    fn emit(&mut self, event: &super::events::AppEvent);
}
