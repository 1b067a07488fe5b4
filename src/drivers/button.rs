//! Polled two-stage button debouncer.
//!
//! ## Hardware
//!
//! Three active-low momentary switches with pull-ups.  The main loop
//! samples every raw level once per pass and feeds it to [`ButtonBank::poll`].
//!
//! ## Debounce
//!
//! Each [`ButtonChannel`] keeps two clocks apart:
//!
//! | Field            | Updated when                               |
//! |------------------|--------------------------------------------|
//! | `last_raw`       | every sample that differs from the last    |
//! | `last_change_ms` | same moment, restarting the window         |
//! | `stable_low`     | raw level has held for > `debounce_ms`     |
//!
//! A press edge is emitted once, at the moment the stable state becomes
//! "pressed".  Releases are accepted silently.

use crate::clock::{Millis, elapsed_ms};

/// Identity of one operator button.  Also names the mode it selects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum ButtonId {
    Red = 0,
    Yellow = 1,
    Green = 2,
}

impl ButtonId {
    pub const COUNT: usize = 3;
    pub const ALL: [Self; Self::COUNT] = [Self::Red, Self::Yellow, Self::Green];
}

/// A debounced press, tagged with the button that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PressEdge {
    pub button: ButtonId,
    pub at_ms: Millis,
}

/// Debounce state for a single input line.
#[derive(Debug, Clone, Copy)]
pub struct ButtonChannel {
    id: ButtonId,
    /// Last sampled level (`true` = line low = pressed).
    last_raw: bool,
    last_change_ms: Millis,
    stable_low: bool,
}

impl ButtonChannel {
    pub fn new(id: ButtonId) -> Self {
        Self {
            id,
            last_raw: false,
            last_change_ms: 0,
            stable_low: false,
        }
    }

    /// Debounced level (`true` = held down).
    pub fn is_pressed(&self) -> bool {
        self.stable_low
    }

    /// Feed one raw sample.  `raw_low` is `true` while the line reads low.
    pub fn poll(&mut self, raw_low: bool, now_ms: Millis, debounce_ms: u32) -> Option<PressEdge> {
        if raw_low != self.last_raw {
            self.last_raw = raw_low;
            self.last_change_ms = now_ms;
        }

        if self.stable_low != self.last_raw
            && elapsed_ms(now_ms, self.last_change_ms) > debounce_ms
        {
            self.stable_low = self.last_raw;
            if self.stable_low {
                return Some(PressEdge {
                    button: self.id,
                    at_ms: now_ms,
                });
            }
        }

        None
    }
}

/// The three operator buttons, debounced together.
#[derive(Debug, Clone)]
pub struct ButtonBank {
    channels: [ButtonChannel; ButtonId::COUNT],
    debounce_ms: u32,
}

impl ButtonBank {
    pub fn new(debounce_ms: u32) -> Self {
        Self {
            channels: ButtonId::ALL.map(ButtonChannel::new),
            debounce_ms,
        }
    }

    /// Poll every channel and return the first press edge, if any.
    ///
    /// All channels advance their debounce state even when an earlier
    /// channel already produced an edge this pass.
    pub fn poll(&mut self, raw_low: [bool; ButtonId::COUNT], now_ms: Millis) -> Option<PressEdge> {
        let mut first = None;
        for (channel, raw) in self.channels.iter_mut().zip(raw_low) {
            let edge = channel.poll(raw, now_ms, self.debounce_ms);
            if first.is_none() {
                first = edge;
            }
        }
        first
    }
}
