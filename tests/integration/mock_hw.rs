//! Mock hardware adapters for integration tests.
//!
//! Records every actuator call so tests can assert on the full command
//! history without touching real GPIO/LEDC/I²C.  Button levels and the
//! serial byte stream are scripted; time comes from a simulated clock.

use std::cell::Cell;
use std::collections::VecDeque;

use signalsight::app::events::AppEvent;
use signalsight::app::ports::{ActuatorPort, ButtonPort, EventSink, SerialPort, TimePort};
use signalsight::app::service::AlertService;
use signalsight::clock::Millis;
use signalsight::config::SystemConfig;
use signalsight::drivers::button::ButtonId;
use signalsight::fsm::Mode;
use signalsight::fsm::context::Indicator;

// ── Actuator call record ──────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActuatorCall {
    Indicator { light: Indicator, on: bool },
    Tone(Option<u16>),
    Show { top: String, bottom: String },
}

// ── MockHardware ──────────────────────────────────────────────

#[derive(Default)]
pub struct MockHardware {
    pub calls: Vec<ActuatorCall>,
    /// Raw button levels, `true` = held.
    pub raw: [bool; ButtonId::COUNT],
}

#[allow(dead_code)]
impl MockHardware {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn shows(&self) -> Vec<(&str, &str)> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                ActuatorCall::Show { top, bottom } => Some((top.as_str(), bottom.as_str())),
                _ => None,
            })
            .collect()
    }

    pub fn show_count(&self, top: &str) -> usize {
        self.shows().iter().filter(|(t, _)| *t == top).count()
    }

    pub fn tones(&self) -> Vec<Option<u16>> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                ActuatorCall::Tone(t) => Some(*t),
                _ => None,
            })
            .collect()
    }

    /// Last commanded state of `light` (off if never written).
    pub fn indicator(&self, light: Indicator) -> bool {
        self.calls
            .iter()
            .rev()
            .find_map(|c| match c {
                ActuatorCall::Indicator { light: l, on } if *l == light => Some(*on),
                _ => None,
            })
            .unwrap_or(false)
    }

    pub fn clear(&mut self) {
        self.calls.clear();
    }
}

impl ButtonPort for MockHardware {
    fn read_raw(&mut self) -> [bool; ButtonId::COUNT] {
        self.raw
    }
}

impl ActuatorPort for MockHardware {
    fn set_indicator(&mut self, light: Indicator, on: bool) {
        self.calls.push(ActuatorCall::Indicator { light, on });
    }

    fn set_tone(&mut self, tone_hz: Option<u16>) {
        self.calls.push(ActuatorCall::Tone(tone_hz));
    }

    fn show(&mut self, top: &str, bottom: &str) {
        self.calls.push(ActuatorCall::Show {
            top: top.to_owned(),
            bottom: bottom.to_owned(),
        });
    }
}

// ── MockSerial ────────────────────────────────────────────────

#[derive(Default)]
pub struct MockSerial {
    pub rx: VecDeque<u8>,
}

impl MockSerial {
    /// Queue `line` plus its LF terminator.
    pub fn send_line(&mut self, line: &str) {
        self.rx.extend(line.bytes());
        self.rx.push_back(b'\n');
    }
}

impl SerialPort for MockSerial {
    fn read_byte(&mut self) -> Option<u8> {
        self.rx.pop_front()
    }
}

// ── SimClock ──────────────────────────────────────────────────

pub struct SimClock {
    now: Cell<Millis>,
}

#[allow(dead_code)]
impl SimClock {
    pub fn at(start: Millis) -> Self {
        Self {
            now: Cell::new(start),
        }
    }

    pub fn advance(&self, ms: u32) {
        self.now.set(self.now.get().wrapping_add(ms));
    }
}

impl TimePort for SimClock {
    fn now_ms(&self) -> Millis {
        self.now.get()
    }
}

// ── RecordingSink ─────────────────────────────────────────────

#[derive(Default)]
pub struct RecordingSink {
    pub events: Vec<AppEvent>,
}

impl EventSink for RecordingSink {
    fn emit(&mut self, event: &AppEvent) {
        self.events.push(event.clone());
    }
}

// ── Rig: service + mocks, one tick per simulated millisecond ──

pub struct Rig {
    pub app: AlertService,
    pub hw: MockHardware,
    pub serial: MockSerial,
    pub clock: SimClock,
    pub sink: RecordingSink,
}

#[allow(dead_code)]
impl Rig {
    pub fn new() -> Self {
        Self::starting_at(0)
    }

    pub fn starting_at(start: Millis) -> Self {
        let mut rig = Self {
            app: AlertService::new(SystemConfig::default()),
            hw: MockHardware::new(),
            serial: MockSerial::default(),
            clock: SimClock::at(start),
            sink: RecordingSink::default(),
        };
        rig.app.start(&mut rig.hw, &rig.clock, &mut rig.sink);
        rig
    }

    pub fn now(&self) -> Millis {
        self.clock.now_ms()
    }

    /// Advance 1 ms and run one control pass.
    pub fn step(&mut self) {
        self.clock.advance(1);
        self.app
            .tick(&mut self.hw, &mut self.serial, &self.clock, &mut self.sink);
    }

    pub fn run_for(&mut self, ms: u32) {
        for _ in 0..ms {
            self.step();
        }
    }

    /// Run until `pred` holds or `limit` ms elapse; returns elapsed ms.
    pub fn run_until(&mut self, limit: u32, mut pred: impl FnMut(&Self) -> bool) -> Option<u32> {
        for elapsed in 1..=limit {
            self.step();
            if pred(self) {
                return Some(elapsed);
            }
        }
        None
    }

    pub fn send(&mut self, line: &str) {
        self.serial.send_line(line);
    }

    /// Send a line and process it on the next pass.
    pub fn send_now(&mut self, line: &str) {
        self.send(line);
        self.step();
    }

    pub fn set_buttons(&mut self, raw: [bool; ButtonId::COUNT]) {
        self.hw.raw = raw;
    }

    /// Clean press: hold `button` for `hold_ms`, then release for 50 ms.
    pub fn press(&mut self, button: ButtonId, hold_ms: u32) {
        self.hw.raw[button as usize] = true;
        self.run_for(hold_ms);
        self.hw.raw[button as usize] = false;
        self.run_for(50);
    }

    pub fn mode(&self) -> Mode {
        self.app.state()
    }

    pub fn mode_changes_to(&self, to: Mode) -> usize {
        self.sink
            .events
            .iter()
            .filter(|e| matches!(e, AppEvent::ModeChanged { to: t, .. } if *t == to))
            .count()
    }
}
