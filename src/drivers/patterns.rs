//! Indicator and buzzer cadence generators.
//!
//! Both generators are driven by absolute millisecond timestamps from the
//! control loop rather than by a fixed tick period, so they keep correct
//! cadence regardless of how long a loop pass takes.
//!
//! | Generator     | Output        | Used by                     |
//! |---------------|---------------|-----------------------------|
//! | `Blinker`     | on/off        | Red (200ms), Yellow (600ms) |
//! | `BeepPattern` | tone or quiet | Red slow/fast, Yellow       |

use crate::clock::{Millis, elapsed_ms};
use crate::config::BeepProfile;

/// Square-wave toggler for an indicator light.  Starts lit.
#[derive(Debug, Clone, Copy)]
pub struct Blinker {
    half_period_ms: u32,
    last_toggle_ms: Millis,
    on: bool,
}

impl Blinker {
    pub fn new(half_period_ms: u32, now_ms: Millis) -> Self {
        Self {
            half_period_ms,
            last_toggle_ms: now_ms,
            on: true,
        }
    }

    /// Advance and return whether the light should be lit.
    pub fn tick(&mut self, now_ms: Millis) -> bool {
        if elapsed_ms(now_ms, self.last_toggle_ms) >= self.half_period_ms {
            self.on = !self.on;
            self.last_toggle_ms = now_ms;
        }
        self.on
    }
}

/// Two-phase buzzer cadence.  Starts in the silent phase.
#[derive(Debug, Clone, Copy)]
pub struct BeepPattern {
    profile: BeepProfile,
    last_toggle_ms: Millis,
    on: bool,
}

impl BeepPattern {
    pub fn new(profile: BeepProfile, now_ms: Millis) -> Self {
        Self {
            profile,
            last_toggle_ms: now_ms,
            on: false,
        }
    }

    /// Swap cadence without restarting the current phase.
    pub fn set_profile(&mut self, profile: BeepProfile) {
        self.profile = profile;
    }

    /// Silence and start a fresh off-phase at `now_ms`.
    pub fn restart(&mut self, now_ms: Millis) {
        self.on = false;
        self.last_toggle_ms = now_ms;
    }

    /// Advance and return the tone to play, if any.
    pub fn tick(&mut self, now_ms: Millis) -> Option<u16> {
        let phase_ms = if self.on {
            self.profile.on_ms
        } else {
            self.profile.off_ms
        };
        if elapsed_ms(now_ms, self.last_toggle_ms) >= phase_ms {
            self.on = !self.on;
            self.last_toggle_ms = now_ms;
        }
        self.on.then_some(self.profile.freq_hz)
    }
}
