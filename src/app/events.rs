//! Outbound application events.
//!
//! The [`AlertService`](super::service::AlertService) emits these through
//! the [`EventSink`](super::ports::EventSink) port.  Adapters on the other
//! side decide what to do with them.

use crate::drivers::chord::ChordAction;
use crate::fsm::Mode;

/// What moved the controller into a new mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionCause {
    /// Debounced press in Idle.
    Button,
    /// Mode token from the host link.
    Link,
    /// Three-button hold.
    Chord,
    /// A mode's own timer (Green dwell, confirmation).
    Timeout,
    /// Debounced press in an alert mode.
    ManualExit,
}

/// Structured events emitted by the application core.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    /// The service has started (carries initial mode).
    Started(Mode),

    /// The FSM moved between modes.
    ModeChanged {
        from: Mode,
        to: Mode,
        cause: TransitionCause,
    },

    /// The chord detector fired.
    Chord(ChordAction),

    /// An inbound line outgrew the buffer and was discarded.
    LinkOverflow,
}
