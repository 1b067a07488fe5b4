//! Function-pointer finite state machine engine.
//!
//! Classic embedded FSM pattern:
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │  StateTable                                              │
//! │  ┌────────────┬───────────┬──────────┬────────────────┐  │
//! │  │ Mode       │ on_enter  │ on_exit  │ on_update      │  │
//! │  ├────────────┼───────────┼──────────┼────────────────┤  │
//! │  │ Idle       │ fn(ctx)   │ —        │ fn(ctx)->Opt   │  │
//! │  │ Red        │ fn(ctx)   │ —        │ fn(ctx)->Opt   │  │
//! │  │ Yellow     │ fn(ctx)   │ —        │ fn(ctx)->Opt   │  │
//! │  │ Green      │ fn(ctx)   │ —        │ fn(ctx)->Opt   │  │
//! │  │ Fault      │ fn(ctx)   │ fn(ctx)  │ fn(ctx)->Opt   │  │
//! │  │ Confirming │ fn(ctx)   │ —        │ fn(ctx)->Opt   │  │
//! │  └────────────┴───────────┴──────────┴────────────────┘  │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! Each loop pass the engine calls `on_update` for the **current** mode
//! with `ctx.dwell_ms` set to the time since entry.  If it returns
//! `Some(next)`, the engine runs `on_exit`, resets every per-mode timer in
//! the context, and runs `on_enter` for `next`.  Inputs (buttons, chord,
//! link) drive transitions from outside through [`Fsm::force_transition`].

pub mod context;
pub mod states;

use context::{FsmContext, ModeTimers};
use log::info;

use crate::clock::{Millis, elapsed_ms};
use crate::drivers::button::ButtonId;
use crate::link::ModeToken;

// ---------------------------------------------------------------------------
// Mode identity
// ---------------------------------------------------------------------------

/// Every mode the controller can be in.
/// Must stay in sync with the table built in [`states::build_state_table`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Mode {
    Idle = 0,
    Red = 1,
    Yellow = 2,
    Green = 3,
    Fault = 4,
    /// Transient confirmation message on the way back to Idle.
    Confirming = 5,
}

impl Mode {
    /// Total number of modes — used to size the table array.
    pub const COUNT: usize = 6;

    /// Convert an index back to `Mode`.  Panics on out-of-range in debug
    /// builds; returns `Fault` in release.
    pub fn from_index(idx: usize) -> Self {
        match idx {
            0 => Self::Idle,
            1 => Self::Red,
            2 => Self::Yellow,
            3 => Self::Green,
            4 => Self::Fault,
            5 => Self::Confirming,
            _ => {
                debug_assert!(false, "invalid mode index: {idx}");
                Self::Fault
            }
        }
    }

    /// The three alert modes that a debounced press can exit manually.
    pub fn is_alert(self) -> bool {
        matches!(self, Self::Red | Self::Yellow | Self::Green)
    }
}

impl From<ModeToken> for Mode {
    fn from(token: ModeToken) -> Self {
        match token {
            ModeToken::ActiveRed => Self::Red,
            ModeToken::ActiveYellow => Self::Yellow,
            ModeToken::ActiveGreen => Self::Green,
            ModeToken::Idle => Self::Idle,
            ModeToken::Fault => Self::Fault,
        }
    }
}

impl From<ButtonId> for Mode {
    fn from(button: ButtonId) -> Self {
        match button {
            ButtonId::Red => Self::Red,
            ButtonId::Yellow => Self::Yellow,
            ButtonId::Green => Self::Green,
        }
    }
}

// ---------------------------------------------------------------------------
// Function-pointer type aliases
// ---------------------------------------------------------------------------

/// Signature for `on_enter` and `on_exit` actions.
pub type StateActionFn = fn(&mut FsmContext);

/// Signature for the per-pass update handler.
/// Returns `Some(next)` to trigger a transition, or `None` to stay.
pub type StateUpdateFn = fn(&mut FsmContext) -> Option<Mode>;

/// Static descriptor for a single mode.
pub struct StateDescriptor {
    pub id: Mode,
    pub name: &'static str,
    pub on_enter: Option<StateActionFn>,
    pub on_exit: Option<StateActionFn>,
    pub on_update: StateUpdateFn,
}

// ---------------------------------------------------------------------------
// FSM engine
// ---------------------------------------------------------------------------

pub struct Fsm {
    /// Fixed-size table indexed by `Mode as usize`.
    table: [StateDescriptor; Mode::COUNT],
    current: usize,
    /// Timestamp at which the current mode was entered.
    entry_ms: Millis,
}

impl Fsm {
    pub fn new(table: [StateDescriptor; Mode::COUNT], initial: Mode) -> Self {
        Self {
            table,
            current: initial as usize,
            entry_ms: 0,
        }
    }

    /// Run the initial `on_enter`.  Call once before the first `tick()`.
    pub fn start(&mut self, ctx: &mut FsmContext) {
        info!("FSM starting in mode: {}", self.table[self.current].name);
        self.entry_ms = ctx.now_ms;
        ctx.dwell_ms = 0;
        ctx.timers = ModeTimers::new(ctx.now_ms);
        if let Some(enter) = self.table[self.current].on_enter {
            enter(ctx);
        }
    }

    /// Run the current mode's per-pass behaviour at `ctx.now_ms`.
    pub fn tick(&mut self, ctx: &mut FsmContext) {
        ctx.dwell_ms = elapsed_ms(ctx.now_ms, self.entry_ms);

        let next = (self.table[self.current].on_update)(ctx);

        if let Some(next_id) = next {
            self.transition(next_id, ctx);
        }
    }

    /// Transition to `next` unless it is already current.
    /// Returns whether a transition happened.
    pub fn force_transition(&mut self, next: Mode, ctx: &mut FsmContext) -> bool {
        if next as usize == self.current {
            return false;
        }
        self.transition(next, ctx);
        true
    }

    pub fn current_mode(&self) -> Mode {
        Mode::from_index(self.current)
    }

    /// Milliseconds spent in the current mode as of `now_ms`.
    pub fn dwell_ms(&self, now_ms: Millis) -> u32 {
        elapsed_ms(now_ms, self.entry_ms)
    }

    fn transition(&mut self, next_id: Mode, ctx: &mut FsmContext) {
        let next_idx = next_id as usize;

        info!(
            "FSM transition: {} -> {}",
            self.table[self.current].name, self.table[next_idx].name
        );

        if let Some(exit) = self.table[self.current].on_exit {
            exit(ctx);
        }

        self.current = next_idx;
        self.entry_ms = ctx.now_ms;
        ctx.dwell_ms = 0;
        ctx.timers = ModeTimers::new(ctx.now_ms);

        if let Some(enter) = self.table[self.current].on_enter {
            enter(ctx);
        }
    }
}
