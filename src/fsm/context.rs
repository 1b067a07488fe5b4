//! Shared mutable context threaded through every FSM handler.
//!
//! `FsmContext` is the single struct that mode handlers read from and
//! write to.  It carries the latest inbound snapshot from the host link,
//! the per-mode timers, actuator command outputs, and configuration.
//! Think of it as the "blackboard" in a blackboard architecture.

use crate::clock::Millis;
use crate::config::SystemConfig;
use crate::drivers::patterns::{BeepPattern, Blinker};
use crate::link::InboundSnapshot;

// ---------------------------------------------------------------------------
// Per-mode timers (reset on every mode entry)
// ---------------------------------------------------------------------------

/// Timing state owned by the current mode.  Replaced wholesale by the
/// engine on each transition so nothing leaks across modes.
#[derive(Debug, Clone, Copy)]
pub struct ModeTimers {
    /// Timestamp of mode entry.
    pub entry_ms: Millis,
    /// Speed recorded on entry to Red or Green.
    pub speed_at_entry: Option<i32>,
    /// Indicator cadence, for modes that blink.
    pub blink: Option<Blinker>,
    /// Buzzer cadence, for modes that beep.
    pub beep: Option<BeepPattern>,
    /// Red: the one-shot escalation check has run.
    pub escalation_checked: bool,
    /// Red: beeping at the escalated rate.
    pub fast_beep: bool,
    /// Yellow: target was within proximity on the previous pass.
    pub target_close: bool,
}

impl ModeTimers {
    pub fn new(now_ms: Millis) -> Self {
        Self {
            entry_ms: now_ms,
            speed_at_entry: None,
            blink: None,
            beep: None,
            escalation_checked: false,
            fast_beep: false,
            target_close: false,
        }
    }
}

// ---------------------------------------------------------------------------
// Actuator commands (written by mode handlers; consumed by the service)
// ---------------------------------------------------------------------------

/// The three indicator lights.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Indicator {
    Red = 0,
    Yellow = 1,
    Green = 2,
}

impl Indicator {
    pub const ALL: [Self; 3] = [Self::Red, Self::Yellow, Self::Green];
}

/// Two-line text for the character display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisplayText {
    pub top: &'static str,
    pub bottom: &'static str,
}

impl DisplayText {
    pub const fn new(top: &'static str, bottom: &'static str) -> Self {
        Self { top, bottom }
    }
}

/// Commands that mode handlers write to request actuator actions.
/// The service applies these to the hardware after each FSM tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ActuatorCommands {
    /// Indicator states indexed by `Indicator as usize`.
    pub indicators: [bool; 3],
    /// Buzzer tone, `None` = silent.
    pub tone_hz: Option<u16>,
}

impl ActuatorCommands {
    /// Everything dark and quiet.
    pub fn all_off() -> Self {
        Self::default()
    }

    pub fn set(&mut self, light: Indicator, on: bool) {
        self.indicators[light as usize] = on;
    }

    pub fn is_on(&self, light: Indicator) -> bool {
        self.indicators[light as usize]
    }
}

/// Which message the Confirming mode shows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Confirmation {
    /// A button press left an alert mode.
    #[default]
    ManualExit,
    /// The chord cleared a fault.
    FaultCleared,
}

// ---------------------------------------------------------------------------
// FsmContext
// ---------------------------------------------------------------------------

/// The shared context passed to every mode handler function.
pub struct FsmContext {
    // -- Timing --
    /// Current time, set by the service before each FSM call.
    pub now_ms: Millis,
    /// Milliseconds since the current mode was entered.
    pub dwell_ms: u32,
    /// Timers belonging to the current mode.
    pub timers: ModeTimers,

    // -- Inputs --
    /// Latest speed/distance from the host link.
    pub inbound: InboundSnapshot,
    /// Message for the next Confirming entry.
    pub confirmation: Confirmation,

    // -- Outputs --
    pub commands: ActuatorCommands,
    display: DisplayText,
    display_pending: bool,

    // -- Configuration --
    pub config: SystemConfig,
}

impl FsmContext {
    /// Create a new context with the given configuration.
    pub fn new(config: SystemConfig) -> Self {
        Self {
            now_ms: 0,
            dwell_ms: 0,
            timers: ModeTimers::new(0),
            inbound: InboundSnapshot::default(),
            confirmation: Confirmation::default(),
            commands: ActuatorCommands::all_off(),
            display: DisplayText::new("", ""),
            display_pending: false,
            config,
        }
    }

    /// Request a display rewrite.
    pub fn show(&mut self, text: DisplayText) {
        self.display = text;
        self.display_pending = true;
    }

    /// Text currently requested for the display.
    pub fn display(&self) -> DisplayText {
        self.display
    }

    /// Take the pending display write, if any.
    pub fn take_display(&mut self) -> Option<DisplayText> {
        core::mem::take(&mut self.display_pending).then_some(self.display)
    }
}
