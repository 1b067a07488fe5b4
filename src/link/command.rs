//! Command line decoding and the inbound snapshot.
//!
//! ## Grammar
//!
//! Space-separated fields, any order, any subset:
//!
//! | Field            | Effect                                   |
//! |------------------|------------------------------------------|
//! | `STATE=<token>`  | mode request                             |
//! | `SPEED=<int>`    | signed, updates speed immediately        |
//! | `DIST=<int>`     | non-negative, updates distance           |
//! | `<token>` alone  | mode request, only as the whole line     |
//! | `<token>,<d>,<s>`| legacy CSV frame from the host script    |
//!
//! Tokens: `ACTIVE_RED`, `ACTIVE_YELLOW`, `ACTIVE_GREEN`, `IDLE`, `FAULT`.
//! Anything unrecognised is dropped silently.

use log::{debug, warn};

use super::codec::{DEFAULT_LINE_CAPACITY, Framed, LineDecoder};

const STATE_KEY: &str = "STATE=";
const SPEED_KEY: &str = "SPEED=";
const DIST_KEY: &str = "DIST=";

/// Mode tokens understood on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModeToken {
    ActiveRed,
    ActiveYellow,
    ActiveGreen,
    Idle,
    Fault,
}

impl ModeToken {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "ACTIVE_RED" => Some(Self::ActiveRed),
            "ACTIVE_YELLOW" => Some(Self::ActiveYellow),
            "ACTIVE_GREEN" => Some(Self::ActiveGreen),
            "IDLE" => Some(Self::Idle),
            "FAULT" => Some(Self::Fault),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::ActiveRed => "ACTIVE_RED",
            Self::ActiveYellow => "ACTIVE_YELLOW",
            Self::ActiveGreen => "ACTIVE_GREEN",
            Self::Idle => "IDLE",
            Self::Fault => "FAULT",
        }
    }
}

/// Everything recognised on one line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DecodedLine {
    pub token: Option<ModeToken>,
    pub speed: Option<i32>,
    pub distance: Option<u32>,
}

impl DecodedLine {
    pub fn is_empty(&self) -> bool {
        self.token.is_none() && self.speed.is_none() && self.distance.is_none()
    }
}

/// Decode a single line (terminator already stripped).
pub fn decode_line(line: &str) -> DecodedLine {
    let trimmed = line.trim();

    if !trimmed.contains('=') && trimmed.contains(',') {
        return decode_csv(trimmed);
    }

    let mut out = DecodedLine::default();
    let mut state_field: Option<&str> = None;

    for field in trimmed.split_ascii_whitespace() {
        if let Some(v) = field.strip_prefix(SPEED_KEY) {
            if let Ok(speed) = v.parse::<i32>() {
                out.speed = Some(speed);
            }
        } else if let Some(v) = field.strip_prefix(DIST_KEY) {
            if let Ok(distance) = v.parse::<u32>() {
                out.distance = Some(distance);
            }
        } else if let Some(v) = field.strip_prefix(STATE_KEY) {
            if state_field.is_none() {
                state_field = Some(v);
            }
        }
    }

    out.token = match state_field {
        Some(v) => ModeToken::parse(v),
        None => ModeToken::parse(trimmed),
    };
    out
}

fn decode_csv(line: &str) -> DecodedLine {
    let mut parts = line.split(',').map(str::trim);
    let (Some(token), Some(dist), Some(speed), None) =
        (parts.next(), parts.next(), parts.next(), parts.next())
    else {
        return DecodedLine::default();
    };
    let Some(token) = ModeToken::parse(token) else {
        return DecodedLine::default();
    };
    DecodedLine {
        token: Some(token),
        speed: speed.parse().ok(),
        distance: dist.parse().ok(),
    }
}

// ---------------------------------------------------------------------------
// Stateful link
// ---------------------------------------------------------------------------

/// Latest values received from the perception host.  `None` = unknown.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InboundSnapshot {
    pub speed: Option<i32>,
    pub distance: Option<u32>,
}

/// Link counters for diagnostics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LinkStats {
    /// Terminated lines handed to the decoder.
    pub lines: u32,
    /// Lines discarded because they outgrew the buffer.
    pub overflows: u32,
    /// Terminated lines that carried nothing recognisable.
    pub ignored: u32,
}

/// What the link wants the controller to know after a byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkEvent {
    /// A token different from the last applied one arrived.
    ModeChangeRequested(ModeToken),
    /// A partial line was discarded.
    Overflow,
}

/// Byte-in, event-out command link.
#[derive(Debug, Default)]
pub struct CommandLink<const N: usize = DEFAULT_LINE_CAPACITY> {
    decoder: LineDecoder<N>,
    snapshot: InboundSnapshot,
    last_token: Option<ModeToken>,
    stats: LinkStats,
}

impl<const N: usize> CommandLink<N> {
    pub fn new() -> Self {
        Self {
            decoder: LineDecoder::new(),
            snapshot: InboundSnapshot::default(),
            last_token: None,
            stats: LinkStats::default(),
        }
    }

    /// Feed one inbound byte.
    pub fn feed(&mut self, byte: u8) -> Option<LinkEvent> {
        match self.decoder.feed(byte)? {
            Framed::Overflow => {
                self.stats.overflows = self.stats.overflows.wrapping_add(1);
                warn!("link: line exceeded {} bytes, discarded", N);
                Some(LinkEvent::Overflow)
            }
            Framed::Line(bytes) => {
                self.stats.lines = self.stats.lines.wrapping_add(1);
                // A bad byte becomes U+FFFD and spoils only the field it sits in.
                let line = String::from_utf8_lossy(&bytes);
                self.apply(decode_line(&line))
            }
        }
    }

    fn apply(&mut self, decoded: DecodedLine) -> Option<LinkEvent> {
        if decoded.is_empty() {
            self.stats.ignored = self.stats.ignored.wrapping_add(1);
            return None;
        }
        if let Some(speed) = decoded.speed {
            self.snapshot.speed = Some(speed);
        }
        if let Some(distance) = decoded.distance {
            self.snapshot.distance = Some(distance);
        }

        let token = decoded.token?;
        if self.last_token == Some(token) {
            return None;
        }
        self.last_token = Some(token);
        debug!("link: token {}", token.as_str());
        Some(LinkEvent::ModeChangeRequested(token))
    }

    pub fn snapshot(&self) -> InboundSnapshot {
        self.snapshot
    }

    pub fn last_token(&self) -> Option<ModeToken> {
        self.last_token
    }

    pub fn stats(&self) -> LinkStats {
        self.stats
    }
}
