//! Application service — the hexagonal core.
//!
//! [`AlertService`] owns the mode FSM, the host command link, the debounced
//! button bank and the chord detector.  It exposes a hardware-agnostic API.
//! All I/O flows through port traits injected at call sites, making the
//! entire service testable with mock adapters and a simulated clock.
//!
//! ```text
//!  SerialPort ──▶ ┌──────────────────────────┐ ──▶ EventSink
//!  ButtonPort ──▶ │       AlertService        │
//!    TimePort ──▶ │ Link · Chord · Buttons    │
//! ActuatorPort ◀──│ FSM                       │
//!                 └──────────────────────────┘
//! ```
//!
//! ## Arbitration order (one pass)
//!
//! 1. Drain every waiting serial byte; a new token switches mode.
//! 2. Sample the raw chord; enter or clear Fault.
//! 3. Poll debounced edges; at most one press is acted on.
//! 4. Run the current mode's timed behaviour.
//! 5. Push changed outputs to the actuators.

use log::{debug, info};

use crate::config::SystemConfig;
use crate::drivers::button::{ButtonBank, PressEdge};
use crate::drivers::chord::{ChordAction, ChordDetector};
use crate::fsm::context::{ActuatorCommands, Confirmation, FsmContext, Indicator};
use crate::fsm::states::build_state_table;
use crate::fsm::{Fsm, Mode};
use crate::link::{CommandLink, LinkEvent, LinkStats};

use super::events::{AppEvent, TransitionCause};
use super::ports::{ActuatorPort, ButtonPort, EventSink, SerialPort, TimePort};

// ───────────────────────────────────────────────────────────────
// Status snapshot
// ───────────────────────────────────────────────────────────────

/// Point-in-time view of the controller for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ControllerStatus {
    pub mode: Mode,
    pub dwell_ms: u32,
    pub speed: Option<i32>,
    pub distance: Option<u32>,
    /// Red escalation latched for this dwell.
    pub fast_beep: bool,
    pub indicators: [bool; 3],
    pub tone_hz: Option<u16>,
}

// ───────────────────────────────────────────────────────────────
// AlertService
// ───────────────────────────────────────────────────────────────

/// The application service orchestrates all domain logic.
pub struct AlertService {
    fsm: Fsm,
    ctx: FsmContext,
    link: CommandLink,
    buttons: ButtonBank,
    chord: ChordDetector,
    /// Outputs last written to the hardware; `None` forces a full write.
    applied: Option<ActuatorCommands>,
    tick_count: u64,
}

impl AlertService {
    /// Construct the service from configuration.
    ///
    /// Does **not** start the FSM — call [`start`](Self::start) next.
    pub fn new(config: SystemConfig) -> Self {
        let buttons = ButtonBank::new(config.debounce_ms);
        let chord = ChordDetector::new(config.chord_enter_ms, config.chord_exit_ms);
        let ctx = FsmContext::new(config);
        let fsm = Fsm::new(build_state_table(), Mode::Idle);

        Self {
            fsm,
            ctx,
            link: CommandLink::new(),
            buttons,
            chord,
            applied: None,
            tick_count: 0,
        }
    }

    // ── Lifecycle ─────────────────────────────────────────────

    /// Enter Idle and bring every output to its baseline.
    pub fn start(
        &mut self,
        hw: &mut impl ActuatorPort,
        clock: &impl TimePort,
        sink: &mut impl EventSink,
    ) {
        self.ctx.now_ms = clock.now_ms();
        self.fsm.start(&mut self.ctx);
        self.applied = None;
        self.apply_actuators(hw);
        sink.emit(&AppEvent::Started(self.fsm.current_mode()));
        info!("AlertService started in {:?}", self.fsm.current_mode());
    }

    // ── Per-tick orchestration ────────────────────────────────

    /// Run one control-loop pass.
    ///
    /// The `hw` parameter satisfies **both** [`ButtonPort`] and
    /// [`ActuatorPort`] — this avoids a double mutable borrow while
    /// keeping the port boundary explicit.
    pub fn tick(
        &mut self,
        hw: &mut (impl ButtonPort + ActuatorPort),
        serial: &mut impl SerialPort,
        clock: &impl TimePort,
        sink: &mut impl EventSink,
    ) {
        self.tick_count += 1;
        let now = clock.now_ms();
        self.ctx.now_ms = now;

        // 1. Host link
        self.drain_serial(serial, sink);

        // 2. Chord on raw levels
        let raw = hw.read_raw();
        let all_active = raw.iter().all(|&held| held);
        let in_fault = self.fsm.current_mode() == Mode::Fault;
        if let Some(action) = self.chord.tick(all_active, in_fault, now) {
            self.handle_chord(action, sink);
        }

        // 3. Debounced presses
        if let Some(edge) = self.buttons.poll(raw, now) {
            if all_active {
                debug!("press of {:?} ignored during chord", edge.button);
            } else {
                self.handle_press(edge, sink);
            }
        }

        // 4. Timed behaviour
        let before = self.fsm.current_mode();
        self.fsm.tick(&mut self.ctx);
        let after = self.fsm.current_mode();
        if after != before {
            sink.emit(&AppEvent::ModeChanged {
                from: before,
                to: after,
                cause: TransitionCause::Timeout,
            });
        }

        // 5. Outputs
        self.apply_actuators(hw);
    }

    // ── Queries ───────────────────────────────────────────────

    /// Current FSM mode.
    pub fn state(&self) -> Mode {
        self.fsm.current_mode()
    }

    /// Snapshot for diagnostics and tests.
    pub fn status(&self) -> ControllerStatus {
        ControllerStatus {
            mode: self.fsm.current_mode(),
            dwell_ms: self.fsm.dwell_ms(self.ctx.now_ms),
            speed: self.ctx.inbound.speed,
            distance: self.ctx.inbound.distance,
            fast_beep: self.ctx.timers.fast_beep,
            indicators: self.ctx.commands.indicators,
            tone_hz: self.ctx.commands.tone_hz,
        }
    }

    pub fn link_stats(&self) -> LinkStats {
        self.link.stats()
    }

    /// Total control ticks executed since startup.
    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    // ── Internal ──────────────────────────────────────────────

    fn drain_serial(&mut self, serial: &mut impl SerialPort, sink: &mut impl EventSink) {
        while let Some(byte) = serial.read_byte() {
            let event = self.link.feed(byte);
            self.ctx.inbound = self.link.snapshot();
            match event {
                Some(LinkEvent::ModeChangeRequested(token)) => {
                    self.transition(Mode::from(token), TransitionCause::Link, sink);
                }
                Some(LinkEvent::Overflow) => sink.emit(&AppEvent::LinkOverflow),
                None => {}
            }
        }
    }

    fn handle_chord(&mut self, action: ChordAction, sink: &mut impl EventSink) {
        info!("chord: {:?}", action);
        sink.emit(&AppEvent::Chord(action));
        match action {
            ChordAction::EnterFault => {
                self.transition(Mode::Fault, TransitionCause::Chord, sink);
            }
            ChordAction::ExitFault => {
                self.ctx.confirmation = Confirmation::FaultCleared;
                self.transition(Mode::Confirming, TransitionCause::Chord, sink);
            }
        }
    }

    fn handle_press(&mut self, edge: PressEdge, sink: &mut impl EventSink) {
        match self.fsm.current_mode() {
            Mode::Idle => {
                self.transition(Mode::from(edge.button), TransitionCause::Button, sink);
            }
            mode if mode.is_alert() => {
                self.ctx.confirmation = Confirmation::ManualExit;
                self.transition(Mode::Confirming, TransitionCause::ManualExit, sink);
            }
            mode => debug!("press of {:?} ignored in {:?}", edge.button, mode),
        }
    }

    fn transition(&mut self, to: Mode, cause: TransitionCause, sink: &mut impl EventSink) {
        let from = self.fsm.current_mode();
        if self.fsm.force_transition(to, &mut self.ctx) {
            sink.emit(&AppEvent::ModeChanged { from, to, cause });
        }
    }

    /// Translate FSM actuator commands into port calls.
    fn apply_actuators(&mut self, hw: &mut impl ActuatorPort) {
        let cmds = self.ctx.commands;
        // Fault re-asserts every pass.
        let prev = match self.applied {
            Some(prev) if self.fsm.current_mode() != Mode::Fault => Some(prev),
            _ => None,
        };

        for light in Indicator::ALL {
            let on = cmds.is_on(light);
            if prev.is_none_or(|p| p.is_on(light) != on) {
                hw.set_indicator(light, on);
            }
        }

        if prev.is_none_or(|p| p.tone_hz != cmds.tone_hz) {
            hw.set_tone(cmds.tone_hz);
        }

        if let Some(text) = self.ctx.take_display() {
            hw.show(text.top, text.bottom);
        }

        self.applied = Some(cmds);
    }
}
