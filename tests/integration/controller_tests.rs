//! End-to-end tests for the AlertService: buttons, chord and host link in,
//! lights, buzzer and display out, all against a simulated clock.

use crate::mock_hw::{ActuatorCall, Rig};

use signalsight::app::events::{AppEvent, TransitionCause};
use signalsight::config::SystemConfig;
use signalsight::drivers::button::ButtonId;
use signalsight::drivers::chord::ChordAction;
use signalsight::fsm::Mode;
use signalsight::fsm::context::Indicator;

const ALL_HELD: [bool; 3] = [true; 3];
const NONE_HELD: [bool; 3] = [false; 3];

fn cfg() -> SystemConfig {
    SystemConfig::default()
}

// ── Start-up ──────────────────────────────────────────────────

#[test]
fn starts_idle_with_ready_display_and_dark_outputs() {
    let rig = Rig::new();
    assert_eq!(rig.mode(), Mode::Idle);
    assert_eq!(rig.hw.shows(), [("SignalSight", "Ready")]);
    assert_eq!(rig.hw.tones(), [None]);
    for light in Indicator::ALL {
        assert!(!rig.hw.indicator(light));
    }
    assert_eq!(rig.sink.events, [AppEvent::Started(Mode::Idle)]);
}

// ── Debounce ──────────────────────────────────────────────────

#[test]
fn bouncing_press_enters_red_exactly_once() {
    let mut rig = Rig::new();
    // 30 ms of chatter, toggling every 3 ms.
    for i in 0..10 {
        rig.hw.raw[ButtonId::Red as usize] = i % 2 == 0;
        rig.run_for(3);
    }
    rig.hw.raw[ButtonId::Red as usize] = true;
    rig.run_for(100);
    rig.hw.raw[ButtonId::Red as usize] = false;
    rig.run_for(100);

    assert_eq!(rig.mode(), Mode::Red);
    assert_eq!(rig.mode_changes_to(Mode::Red), 1);
    assert_eq!(rig.hw.show_count("RED LIGHT"), 1);
}

#[test]
fn chatter_that_never_settles_is_ignored() {
    let mut rig = Rig::new();
    for i in 0..200 {
        rig.hw.raw[ButtonId::Yellow as usize] = i % 2 == 0;
        rig.run_for(20);
    }
    rig.hw.raw[ButtonId::Yellow as usize] = false;
    rig.run_for(100);
    assert_eq!(rig.mode(), Mode::Idle);
    assert_eq!(rig.mode_changes_to(Mode::Yellow), 0);
}

#[test]
fn short_glitch_below_window_is_ignored() {
    let mut rig = Rig::new();
    rig.hw.raw[ButtonId::Green as usize] = true;
    rig.run_for(cfg().debounce_ms);
    rig.hw.raw[ButtonId::Green as usize] = false;
    rig.run_for(200);
    assert_eq!(rig.mode(), Mode::Idle);
}

#[test]
fn each_button_selects_its_mode_from_idle() {
    for (button, mode, top) in [
        (ButtonId::Red, Mode::Red, "RED LIGHT"),
        (ButtonId::Yellow, Mode::Yellow, "YELLOW LIGHT"),
        (ButtonId::Green, Mode::Green, "GREEN LIGHT"),
    ] {
        let mut rig = Rig::new();
        rig.press(button, 60);
        assert_eq!(rig.mode(), mode);
        assert_eq!(rig.hw.show_count(top), 1);
        assert!(rig.sink.events.contains(&AppEvent::ModeChanged {
            from: Mode::Idle,
            to: mode,
            cause: TransitionCause::Button,
        }));
    }
}

// ── Link idempotence ──────────────────────────────────────────

#[test]
fn repeated_token_enters_once_and_speed_still_updates() {
    let mut rig = Rig::new();
    rig.send_now("STATE=ACTIVE_RED");
    rig.send_now("SPEED=30");
    assert_eq!(rig.app.status().speed, Some(30));
    rig.send_now("STATE=ACTIVE_RED SPEED=25");
    assert_eq!(rig.app.status().speed, Some(25));

    assert_eq!(rig.mode(), Mode::Red);
    assert_eq!(rig.mode_changes_to(Mode::Red), 1);
    assert_eq!(rig.hw.show_count("RED LIGHT"), 1);
}

#[test]
fn idle_token_while_idle_touches_nothing() {
    let mut rig = Rig::new();
    rig.hw.clear();
    rig.send_now("IDLE");
    rig.send_now("STATE=IDLE");
    rig.run_for(100);
    assert!(rig.hw.calls.is_empty(), "{:?}", rig.hw.calls);
    assert_eq!(rig.sink.events, [AppEvent::Started(Mode::Idle)]);
}

#[test]
fn token_switches_between_alert_modes() {
    let mut rig = Rig::new();
    rig.send_now("ACTIVE_RED");
    rig.send_now("ACTIVE_YELLOW");
    assert_eq!(rig.mode(), Mode::Yellow);
    rig.send_now("IDLE");
    assert_eq!(rig.mode(), Mode::Idle);
    assert_eq!(rig.hw.show_count("SignalSight"), 2);
}

#[test]
fn legacy_csv_frame_drives_mode_and_numbers() {
    let mut rig = Rig::new();
    rig.send_now("ACTIVE_YELLOW,45,60");
    let status = rig.app.status();
    assert_eq!(status.mode, Mode::Yellow);
    assert_eq!(status.distance, Some(45));
    assert_eq!(status.speed, Some(60));
}

#[test]
fn overflowing_line_is_reported_and_link_recovers() {
    let mut rig = Rig::new();
    let long = "X".repeat(200);
    rig.send_now(&long);
    assert!(rig.sink.events.contains(&AppEvent::LinkOverflow));
    assert_eq!(rig.mode(), Mode::Idle);
    rig.send_now("STATE=ACTIVE_GREEN");
    assert_eq!(rig.mode(), Mode::Green);
    assert!(rig.app.link_stats().overflows >= 1);
}

#[test]
fn garbage_lines_never_change_mode() {
    let mut rig = Rig::new();
    for line in ["", "hello", "STATE=", "STATE=PURPLE", "SPEED=abc", "=,=,=", "ACTIVE_RED extra"] {
        rig.send_now(line);
    }
    assert_eq!(rig.mode(), Mode::Idle);
    assert_eq!(rig.mode_changes_to(Mode::Red), 0);
}

// ── Chord ─────────────────────────────────────────────────────

#[test]
fn chord_held_150ms_enters_fault_once() {
    let mut rig = Rig::new();
    rig.set_buttons(ALL_HELD);
    // First sample at +1 ms; fires when held for the full threshold.
    rig.run_for(cfg().chord_enter_ms);
    assert_eq!(rig.mode(), Mode::Idle);
    rig.step();
    assert_eq!(rig.mode(), Mode::Fault);

    // Holding on past the exit threshold does nothing more.
    rig.run_for(3000);
    assert_eq!(rig.mode(), Mode::Fault);
    let chords: Vec<_> = rig
        .sink
        .events
        .iter()
        .filter(|e| matches!(e, AppEvent::Chord(_)))
        .collect();
    assert_eq!(chords, [&AppEvent::Chord(ChordAction::EnterFault)]);
    assert_eq!(rig.hw.show_count("FAULT"), 1);
}

#[test]
fn chord_release_and_rehold_fires_again() {
    let mut rig = Rig::new();
    rig.set_buttons(ALL_HELD);
    rig.run_for(200);
    assert_eq!(rig.mode(), Mode::Fault);
    rig.set_buttons(NONE_HELD);
    rig.run_for(50);

    // Clear via the link, then repeat the gesture.
    rig.send_now("IDLE");
    assert_eq!(rig.mode(), Mode::Idle);
    rig.set_buttons(ALL_HELD);
    rig.run_for(200);
    assert_eq!(rig.mode(), Mode::Fault);
    assert_eq!(rig.mode_changes_to(Mode::Fault), 2);
}

#[test]
fn long_chord_in_fault_exits_once_via_confirmation() {
    let mut rig = Rig::new();
    rig.send_now("FAULT");
    assert_eq!(rig.mode(), Mode::Fault);

    rig.set_buttons(ALL_HELD);
    rig.run_for(cfg().chord_exit_ms);
    assert_eq!(rig.mode(), Mode::Fault);
    rig.step();
    assert_eq!(rig.mode(), Mode::Confirming);
    assert_eq!(rig.hw.shows().last(), Some(&("Fault cleared", "Returning...")));

    // Keep holding: confirmation completes, no second action.
    rig.run_for(3000);
    assert_eq!(rig.mode(), Mode::Idle);
    let exits = rig
        .sink
        .events
        .iter()
        .filter(|e| **e == AppEvent::Chord(ChordAction::ExitFault))
        .count();
    assert_eq!(exits, 1);
    assert_eq!(rig.mode_changes_to(Mode::Fault), 1);
}

#[test]
fn short_chord_in_fault_does_not_exit() {
    let mut rig = Rig::new();
    rig.send_now("FAULT");
    rig.set_buttons(ALL_HELD);
    rig.run_for(1000);
    rig.set_buttons(NONE_HELD);
    rig.run_for(1000);
    assert_eq!(rig.mode(), Mode::Fault);
}

#[test]
fn chord_presses_do_not_select_a_mode() {
    let mut rig = Rig::new();
    rig.set_buttons(ALL_HELD);
    rig.run_for(100);
    // Debounce windows have elapsed, but no single-button mode was entered.
    assert_eq!(rig.mode_changes_to(Mode::Red), 0);
    assert_eq!(rig.mode(), Mode::Idle);
}

// ── Fault ─────────────────────────────────────────────────────

#[test]
fn fault_reasserts_outputs_every_pass() {
    let mut rig = Rig::new();
    rig.send_now("FAULT");
    rig.hw.clear();
    rig.run_for(10);
    let lit = rig
        .hw
        .calls
        .iter()
        .filter(|c| matches!(c, ActuatorCall::Indicator { on: true, .. }))
        .count();
    assert_eq!(lit, 30);
    assert_eq!(rig.hw.tones(), [None; 10]);
}

#[test]
fn single_press_in_fault_has_no_effect() {
    let mut rig = Rig::new();
    rig.send_now("FAULT");
    for button in ButtonId::ALL {
        rig.press(button, 80);
    }
    assert_eq!(rig.mode(), Mode::Fault);
}

#[test]
fn idle_token_leaves_fault() {
    let mut rig = Rig::new();
    rig.send_now("STATE=FAULT");
    rig.send_now("STATE=IDLE");
    assert_eq!(rig.mode(), Mode::Idle);
    assert!(rig.sink.events.contains(&AppEvent::ModeChanged {
        from: Mode::Fault,
        to: Mode::Idle,
        cause: TransitionCause::Link,
    }));
}

// ── Red escalation ────────────────────────────────────────────

fn red_with_speed_change(later: i32) -> Rig {
    let mut rig = Rig::new();
    rig.send_now("STATE=ACTIVE_RED SPEED=40");
    rig.run_for(1000);
    rig.send_now(&format!("SPEED={later}"));
    rig.run_for(1100);
    rig
}

#[test]
fn red_escalates_when_speed_holds() {
    let mut rig = red_with_speed_change(45);
    assert!(rig.app.status().fast_beep);
    rig.hw.clear();
    rig.run_for(1000);
    let fast = cfg().red_fast_beep.freq_hz;
    assert!(rig.hw.tones().contains(&Some(fast)));
    assert!(!rig.hw.tones().contains(&Some(cfg().red_slow_beep.freq_hz)));
}

#[test]
fn red_stays_slow_when_decelerating() {
    let mut rig = red_with_speed_change(30);
    assert!(!rig.app.status().fast_beep);
    rig.hw.clear();
    rig.send_now("SPEED=90");
    rig.run_for(3000);
    assert!(!rig.app.status().fast_beep);
    assert!(rig.hw.tones().contains(&Some(cfg().red_slow_beep.freq_hz)));
    assert!(!rig.hw.tones().contains(&Some(cfg().red_fast_beep.freq_hz)));
}

#[test]
fn red_light_blinks() {
    let mut rig = Rig::new();
    rig.send_now("ACTIVE_RED");
    rig.hw.clear();
    rig.run_for(1000);
    let toggles = rig
        .hw
        .calls
        .iter()
        .filter(|c| matches!(c, ActuatorCall::Indicator { light: Indicator::Red, .. }))
        .count();
    assert_eq!(toggles, 5);
}

// ── Yellow proximity ──────────────────────────────────────────

#[test]
fn yellow_silent_until_target_close() {
    let mut rig = Rig::new();
    rig.send_now("ACTIVE_YELLOW");
    rig.run_for(5000);
    assert!(rig.hw.tones().iter().all(Option::is_none));

    rig.send_now("DIST=150");
    rig.run_for(2000);
    assert!(rig.hw.tones().iter().all(Option::is_none));

    rig.send_now("DIST=80");
    let beep = cfg().yellow_beep;
    let heard = rig.run_until(beep.off_ms + beep.on_ms, |r| {
        r.hw.tones().last() == Some(&Some(beep.freq_hz))
    });
    assert!(heard.is_some());
    assert_eq!(rig.mode(), Mode::Yellow);
}

#[test]
fn yellow_going_out_of_range_silences_and_reapproach_restarts_cadence() {
    let mut rig = Rig::new();
    let beep = cfg().yellow_beep;
    rig.send_now("STATE=ACTIVE_YELLOW DIST=50");
    rig.run_for(2000);
    rig.send_now("DIST=500");
    assert_eq!(rig.app.status().tone_hz, None);
    rig.run_for(2000);
    assert_eq!(rig.app.status().tone_hz, None);

    rig.send_now("DIST=50");
    let back = rig.now();
    assert_eq!(rig.app.status().tone_hz, None);
    let first_tone = rig
        .run_until(5000, |r| r.app.status().tone_hz.is_some())
        .map(|_| rig.now().wrapping_sub(back));
    assert_eq!(first_tone, Some(beep.off_ms));
    assert_eq!(rig.hw.tones().last(), Some(&Some(beep.freq_hz)));
}

// ── Green ─────────────────────────────────────────────────────

#[test]
fn green_tone_from_3s_then_idle_at_5s() {
    let mut rig = Rig::new();
    rig.send_now("STATE=ACTIVE_GREEN SPEED=0");
    let entered = rig.now();
    assert!(rig.hw.indicator(Indicator::Green));

    let tone_at = rig
        .run_until(6000, |r| r.app.status().tone_hz.is_some())
        .map(|_| rig.now().wrapping_sub(entered));
    assert_eq!(tone_at, Some(cfg().green_tone_after_ms));

    let idle_at = rig
        .run_until(6000, |r| r.mode() == Mode::Idle)
        .map(|_| rig.now().wrapping_sub(entered));
    assert_eq!(idle_at, Some(cfg().green_dwell_ms));
    assert_eq!(rig.hw.tones().last(), Some(&None));
    assert!(rig.sink.events.contains(&AppEvent::ModeChanged {
        from: Mode::Green,
        to: Mode::Idle,
        cause: TransitionCause::Timeout,
    }));
}

#[test]
fn green_silent_while_accelerating_but_still_times_out() {
    let mut rig = Rig::new();
    rig.send_now("STATE=ACTIVE_GREEN SPEED=10");
    rig.send_now("SPEED=35");
    rig.run_for(4990);
    assert!(rig.hw.tones().iter().all(Option::is_none));
    rig.run_for(20);
    assert_eq!(rig.mode(), Mode::Idle);
}

#[test]
fn green_dwell_survives_clock_wrap() {
    let mut rig = Rig::starting_at(u32::MAX - 1000);
    rig.send_now("ACTIVE_GREEN");
    let n = rig.run_until(6000, |r| r.mode() == Mode::Idle);
    assert_eq!(n, Some(cfg().green_dwell_ms));
}

// ── Manual exit ───────────────────────────────────────────────

#[test]
fn press_in_yellow_confirms_then_lands_idle() {
    let mut rig = Rig::new();
    rig.send_now("ACTIVE_YELLOW");
    rig.hw.raw[ButtonId::Green as usize] = true;
    let n = rig.run_until(100, |r| r.mode() == Mode::Confirming);
    assert!(n.is_some());
    assert_eq!(rig.hw.shows().last(), Some(&("Manual exit", "Returning...")));
    assert!(!rig.hw.indicator(Indicator::Yellow));
    assert!(rig.sink.events.contains(&AppEvent::ModeChanged {
        from: Mode::Yellow,
        to: Mode::Confirming,
        cause: TransitionCause::ManualExit,
    }));

    rig.hw.raw[ButtonId::Green as usize] = false;
    let n = rig.run_until(1000, |r| r.mode() == Mode::Idle);
    assert_eq!(n, Some(cfg().confirm_ms));
    assert_eq!(rig.hw.shows().last(), Some(&("SignalSight", "Ready")));
}

#[test]
fn presses_during_confirmation_are_ignored() {
    let mut rig = Rig::new();
    rig.send_now("ACTIVE_RED");
    rig.press(ButtonId::Red, 40);
    assert_eq!(rig.mode(), Mode::Confirming);
    rig.press(ButtonId::Yellow, 40);
    assert_eq!(rig.mode(), Mode::Confirming);
    rig.run_for(cfg().confirm_ms);
    assert_eq!(rig.mode(), Mode::Idle);
    assert_eq!(rig.mode_changes_to(Mode::Yellow), 0);
}

#[test]
fn serial_keeps_flowing_during_confirmation() {
    let mut rig = Rig::new();
    rig.send_now("ACTIVE_YELLOW");
    rig.press(ButtonId::Yellow, 40);
    assert_eq!(rig.mode(), Mode::Confirming);

    // Longer than the line buffer, spread over the confirmation window.
    for i in 0..20 {
        rig.send(&format!("SPEED={i} DIST={}", i * 10));
        rig.run_for(10);
    }
    assert_eq!(rig.app.status().speed, Some(19));
    assert_eq!(rig.app.link_stats().overflows, 0);

    rig.send_now("STATE=ACTIVE_RED");
    assert_eq!(rig.mode(), Mode::Red);
}
