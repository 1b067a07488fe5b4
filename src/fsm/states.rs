//! Concrete mode handler functions and table builder.
//!
//! Each mode is defined by plain `fn` pointers — no closures, no dynamic
//! dispatch, no heap.
//!
//! ```text
//!            ┌──[button / link]──▶ RED ─────┐
//!            │                              │
//!  IDLE ─────┼──[button / link]──▶ YELLOW ──┼──[press]──▶ CONFIRMING ──[600ms]──▶ IDLE
//!    ▲       │                              │
//!    │       └──[button / link]──▶ GREEN ───┘
//!    │                               │
//!    └───────────[5000ms dwell]──────┘
//!
//!  Any mode ──[chord 150ms / link FAULT]──▶ FAULT ──[chord 1500ms]──▶ CONFIRMING
//! ```
//!
//! Button, chord and link transitions are driven by the service through
//! `Fsm::force_transition`; the handlers here only own the timed ones.

use super::context::{ActuatorCommands, Confirmation, DisplayText, FsmContext, Indicator};
use super::{Mode, StateDescriptor};
use crate::drivers::patterns::{BeepPattern, Blinker};
use log::{info, warn};

pub const IDLE_TEXT: DisplayText = DisplayText::new("SignalSight", "Ready");
pub const RED_TEXT: DisplayText = DisplayText::new("RED LIGHT", "STOP");
pub const YELLOW_TEXT: DisplayText = DisplayText::new("YELLOW LIGHT", "SLOW DOWN");
pub const GREEN_TEXT: DisplayText = DisplayText::new("GREEN LIGHT", "GO");
pub const FAULT_TEXT: DisplayText = DisplayText::new("FAULT", "Check system");
pub const MANUAL_EXIT_TEXT: DisplayText = DisplayText::new("Manual exit", "Returning...");
pub const FAULT_CLEARED_TEXT: DisplayText = DisplayText::new("Fault cleared", "Returning...");

// ═══════════════════════════════════════════════════════════════════════════
//  Table builder
// ═══════════════════════════════════════════════════════════════════════════

/// Build the static mode table.  Called once at startup.
pub fn build_state_table() -> [StateDescriptor; Mode::COUNT] {
    [
        // Index 0 — Idle
        StateDescriptor {
            id: Mode::Idle,
            name: "Idle",
            on_enter: Some(idle_enter),
            on_exit: None,
            on_update: idle_update,
        },
        // Index 1 — Red
        StateDescriptor {
            id: Mode::Red,
            name: "Red",
            on_enter: Some(red_enter),
            on_exit: None,
            on_update: red_update,
        },
        // Index 2 — Yellow
        StateDescriptor {
            id: Mode::Yellow,
            name: "Yellow",
            on_enter: Some(yellow_enter),
            on_exit: None,
            on_update: yellow_update,
        },
        // Index 3 — Green
        StateDescriptor {
            id: Mode::Green,
            name: "Green",
            on_enter: Some(green_enter),
            on_exit: None,
            on_update: green_update,
        },
        // Index 4 — Fault
        StateDescriptor {
            id: Mode::Fault,
            name: "Fault",
            on_enter: Some(fault_enter),
            on_exit: Some(fault_exit),
            on_update: fault_update,
        },
        // Index 5 — Confirming
        StateDescriptor {
            id: Mode::Confirming,
            name: "Confirming",
            on_enter: Some(confirming_enter),
            on_exit: None,
            on_update: confirming_update,
        },
    ]
}

// ═══════════════════════════════════════════════════════════════════════════
//  IDLE
// ═══════════════════════════════════════════════════════════════════════════

fn idle_enter(ctx: &mut FsmContext) {
    ctx.commands = ActuatorCommands::all_off();
    ctx.show(IDLE_TEXT);
    info!("IDLE: waiting for input");
}

fn idle_update(_ctx: &mut FsmContext) -> Option<Mode> {
    None
}

// ═══════════════════════════════════════════════════════════════════════════
//  RED — fast blink, slow beep, escalate if the vehicle is not slowing
// ═══════════════════════════════════════════════════════════════════════════

fn red_enter(ctx: &mut FsmContext) {
    let now = ctx.now_ms;
    ctx.commands = ActuatorCommands::all_off();
    ctx.commands.set(Indicator::Red, true);
    ctx.timers.speed_at_entry = ctx.inbound.speed;
    ctx.timers.blink = Some(Blinker::new(ctx.config.red_blink_ms, now));
    ctx.timers.beep = Some(BeepPattern::new(ctx.config.red_slow_beep, now));
    ctx.show(RED_TEXT);
    info!("RED: entry speed {:?}", ctx.timers.speed_at_entry);
}

fn red_update(ctx: &mut FsmContext) -> Option<Mode> {
    let now = ctx.now_ms;

    if let Some(blink) = ctx.timers.blink.as_mut() {
        let on = blink.tick(now);
        ctx.commands.set(Indicator::Red, on);
    }

    if !ctx.timers.escalation_checked && ctx.dwell_ms >= ctx.config.red_escalate_after_ms {
        ctx.timers.escalation_checked = true;
        let decelerating = matches!(
            (ctx.inbound.speed, ctx.timers.speed_at_entry),
            (Some(current), Some(entry)) if current < entry
        );
        if !decelerating {
            ctx.timers.fast_beep = true;
            if let Some(beep) = ctx.timers.beep.as_mut() {
                beep.set_profile(ctx.config.red_fast_beep);
            }
            warn!(
                "RED: no deceleration (entry {:?}, now {:?}), escalating",
                ctx.timers.speed_at_entry, ctx.inbound.speed
            );
        }
    }

    ctx.commands.tone_hz = ctx.timers.beep.as_mut().and_then(|beep| beep.tick(now));
    None
}

// ═══════════════════════════════════════════════════════════════════════════
//  YELLOW — slow blink, beep only while the target is close
// ═══════════════════════════════════════════════════════════════════════════

fn yellow_enter(ctx: &mut FsmContext) {
    let now = ctx.now_ms;
    ctx.commands = ActuatorCommands::all_off();
    ctx.commands.set(Indicator::Yellow, true);
    ctx.timers.blink = Some(Blinker::new(ctx.config.yellow_blink_ms, now));
    ctx.timers.beep = Some(BeepPattern::new(ctx.config.yellow_beep, now));
    ctx.show(YELLOW_TEXT);
    info!("YELLOW: distance {:?}", ctx.inbound.distance);
}

fn yellow_update(ctx: &mut FsmContext) -> Option<Mode> {
    let now = ctx.now_ms;

    if let Some(blink) = ctx.timers.blink.as_mut() {
        let on = blink.tick(now);
        ctx.commands.set(Indicator::Yellow, on);
    }

    let in_range = ctx
        .inbound
        .distance
        .is_some_and(|d| d <= ctx.config.yellow_proximity_m);

    // Each approach starts from a fresh off-phase.
    ctx.commands.tone_hz = match ctx.timers.beep.as_mut() {
        Some(beep) if in_range => {
            if !ctx.timers.target_close {
                beep.restart(now);
            }
            beep.tick(now)
        }
        _ => None,
    };
    ctx.timers.target_close = in_range;
    None
}

// ═══════════════════════════════════════════════════════════════════════════
//  GREEN — solid light, reminder tone, automatic return to Idle
// ═══════════════════════════════════════════════════════════════════════════

fn green_enter(ctx: &mut FsmContext) {
    ctx.commands = ActuatorCommands::all_off();
    ctx.commands.set(Indicator::Green, true);
    ctx.timers.speed_at_entry = ctx.inbound.speed;
    ctx.show(GREEN_TEXT);
    info!("GREEN: entry speed {:?}", ctx.timers.speed_at_entry);
}

fn green_update(ctx: &mut FsmContext) -> Option<Mode> {
    if ctx.dwell_ms >= ctx.config.green_dwell_ms {
        info!("GREEN: dwell elapsed, returning to Idle");
        return Some(Mode::Idle);
    }

    ctx.commands.set(Indicator::Green, true);

    if ctx.dwell_ms < ctx.config.green_tone_after_ms {
        ctx.commands.tone_hz = None;
        return None;
    }

    let accelerating = matches!(
        (ctx.inbound.speed, ctx.timers.speed_at_entry),
        (Some(current), Some(entry)) if current > entry
    );
    ctx.commands.tone_hz = (!accelerating).then_some(ctx.config.green_tone_hz);
    None
}

// ═══════════════════════════════════════════════════════════════════════════
//  FAULT — everything lit, buzzer silent, held until the chord clears it
// ═══════════════════════════════════════════════════════════════════════════

fn assert_fault_outputs(ctx: &mut FsmContext) {
    ctx.commands.indicators = [true; 3];
    ctx.commands.tone_hz = None;
}

fn fault_enter(ctx: &mut FsmContext) {
    assert_fault_outputs(ctx);
    ctx.show(FAULT_TEXT);
    warn!("FAULT: outputs latched, hold all buttons to clear");
}

fn fault_update(ctx: &mut FsmContext) -> Option<Mode> {
    assert_fault_outputs(ctx);
    None
}

fn fault_exit(_ctx: &mut FsmContext) {
    info!("FAULT: cleared");
}

// ═══════════════════════════════════════════════════════════════════════════
//  CONFIRMING — brief message before Idle
// ═══════════════════════════════════════════════════════════════════════════

fn confirming_enter(ctx: &mut FsmContext) {
    ctx.commands = ActuatorCommands::all_off();
    ctx.show(match ctx.confirmation {
        Confirmation::ManualExit => MANUAL_EXIT_TEXT,
        Confirmation::FaultCleared => FAULT_CLEARED_TEXT,
    });
}

fn confirming_update(ctx: &mut FsmContext) -> Option<Mode> {
    (ctx.dwell_ms >= ctx.config.confirm_ms).then_some(Mode::Idle)
}
