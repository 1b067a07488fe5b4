//! Three-button chord gesture detector.
//!
//! Works on the **raw** levels, not the debounced ones, so the gesture is
//! not delayed by three separate debounce windows.
//!
//! | Current mode | Hold length          | Action      |
//! |--------------|----------------------|-------------|
//! | not Fault    | >= `enter_ms` (150)  | `EnterFault`|
//! | Fault        | >= `exit_ms` (1500)  | `ExitFault` |
//!
//! One action per continuous hold.  Releasing any button re-arms.

use crate::clock::{Millis, elapsed_ms};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChordAction {
    EnterFault,
    ExitFault,
}

#[derive(Debug, Clone)]
pub struct ChordDetector {
    enter_ms: u32,
    exit_ms: u32,
    /// When all three went down together; `None` while not all held.
    down_since: Option<Millis>,
    fired: bool,
}

impl ChordDetector {
    pub fn new(enter_ms: u32, exit_ms: u32) -> Self {
        Self {
            enter_ms,
            exit_ms,
            down_since: None,
            fired: false,
        }
    }

    /// Sample the chord once per loop pass.
    pub fn tick(&mut self, all_active: bool, in_fault: bool, now_ms: Millis) -> Option<ChordAction> {
        if !all_active {
            self.down_since = None;
            self.fired = false;
            return None;
        }

        let since = match self.down_since {
            Some(since) => since,
            None => {
                self.down_since = Some(now_ms);
                self.fired = false;
                now_ms
            }
        };

        if self.fired {
            return None;
        }

        let held = elapsed_ms(now_ms, since);
        let (threshold, action) = if in_fault {
            (self.exit_ms, ChordAction::ExitFault)
        } else {
            (self.enter_ms, ChordAction::EnterFault)
        };

        if held >= threshold {
            self.fired = true;
            return Some(action);
        }

        None
    }

    /// Whether a chord hold is currently in progress.
    pub fn is_held(&self) -> bool {
        self.down_since.is_some()
    }
}
