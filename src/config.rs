//! System configuration parameters
//!
//! All tunable timing and threshold parameters for the SignalSight
//! alert controller.  Defaults match the deployed driver-alert unit.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// A two-phase buzzer cadence with its tone frequency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BeepProfile {
    /// Tone-on duration (milliseconds)
    pub on_ms: u32,
    /// Silence duration between tones (milliseconds)
    pub off_ms: u32,
    /// Tone frequency while on (Hz)
    pub freq_hz: u16,
}

/// Core system configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SystemConfig {
    // --- Inputs ---
    /// Raw button level must hold this long before it is accepted (ms)
    pub debounce_ms: u32,
    /// Three-button hold that forces Fault (ms)
    pub chord_enter_ms: u32,
    /// Three-button hold that clears Fault (ms)
    pub chord_exit_ms: u32,
    /// Transient confirmation message duration after manual/fault exit (ms)
    pub confirm_ms: u32,

    // --- Red ---
    /// Red indicator half-period (ms)
    pub red_blink_ms: u32,
    /// Dwell at which the deceleration check runs once (ms)
    pub red_escalate_after_ms: u32,
    /// Buzzer cadence before escalation
    pub red_slow_beep: BeepProfile,
    /// Buzzer cadence once escalated
    pub red_fast_beep: BeepProfile,

    // --- Yellow ---
    /// Yellow indicator half-period (ms)
    pub yellow_blink_ms: u32,
    /// Buzzer is enabled only at or below this distance (m)
    pub yellow_proximity_m: u32,
    /// Buzzer cadence while in range
    pub yellow_beep: BeepProfile,

    // --- Green ---
    /// Dwell after which the no-acceleration tone is evaluated (ms)
    pub green_tone_after_ms: u32,
    /// Dwell after which Green returns to Idle (ms)
    pub green_dwell_ms: u32,
    /// Continuous tone frequency (Hz)
    pub green_tone_hz: u16,

    // --- Timing ---
    /// Firmware control loop pacing delay (ms)
    pub control_loop_interval_ms: u32,
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            // Inputs
            debounce_ms: 35,
            chord_enter_ms: 150,
            chord_exit_ms: 1500,
            confirm_ms: 600,

            // Red
            red_blink_ms: 200,
            red_escalate_after_ms: 2000,
            red_slow_beep: BeepProfile {
                on_ms: 150,
                off_ms: 650,
                freq_hz: 2000,
            },
            red_fast_beep: BeepProfile {
                on_ms: 80,
                off_ms: 80,
                freq_hz: 3000,
            },

            // Yellow
            yellow_blink_ms: 600,
            yellow_proximity_m: 100,
            yellow_beep: BeepProfile {
                on_ms: 200,
                off_ms: 800,
                freq_hz: 1500,
            },

            // Green
            green_tone_after_ms: 3000,
            green_dwell_ms: 5000,
            green_tone_hz: 1000,

            // Timing
            control_loop_interval_ms: 2,
        }
    }
}

impl SystemConfig {
    /// Range-check every field.  Rejects, never clamps.
    pub fn validate(&self) -> Result<()> {
        if self.debounce_ms == 0 {
            return Err(Error::Config("debounce_ms must be > 0"));
        }
        if self.chord_enter_ms == 0 || self.chord_exit_ms <= self.chord_enter_ms {
            return Err(Error::Config("chord_exit_ms must exceed chord_enter_ms > 0"));
        }
        if self.red_blink_ms == 0 || self.yellow_blink_ms == 0 {
            return Err(Error::Config("blink half-periods must be > 0"));
        }
        for beep in [self.red_slow_beep, self.red_fast_beep, self.yellow_beep] {
            if beep.on_ms == 0 || beep.off_ms == 0 {
                return Err(Error::Config("beep phases must be > 0"));
            }
            if beep.freq_hz == 0 {
                return Err(Error::Config("beep frequency must be > 0"));
            }
        }
        if self.green_tone_hz == 0 {
            return Err(Error::Config("green_tone_hz must be > 0"));
        }
        if self.green_tone_after_ms >= self.green_dwell_ms {
            return Err(Error::Config("green_tone_after_ms must be below green_dwell_ms"));
        }
        Ok(())
    }
}
