//! Newline-delimited line framer.
//!
//! Wire format:
//! ```text
//! ┌──────────────────────────────┬────┐
//! │ ASCII payload (<= N bytes)   │ LF │     CR bytes anywhere are dropped
//! └──────────────────────────────┴────┘
//! ```
//!
//! The framer accumulates bytes one at a time into a fixed buffer and
//! yields each complete line.  A byte that would push the buffer past
//! `N` discards everything collected so far; framing resumes with the
//! next byte.

use heapless::Vec;

/// Buffer capacity of the current board revision.
pub const DEFAULT_LINE_CAPACITY: usize = 96;

const LF: u8 = b'\n';
const CR: u8 = b'\r';

/// Outcome of feeding one byte.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Framed<const N: usize> {
    /// A terminator arrived; the collected line (without LF/CR).
    Line(Vec<u8, N>),
    /// The buffer overflowed and was discarded.
    Overflow,
}

/// Streaming line framer with a fixed `N`-byte buffer.
#[derive(Debug, Default)]
pub struct LineDecoder<const N: usize = DEFAULT_LINE_CAPACITY> {
    buf: Vec<u8, N>,
}

impl<const N: usize> LineDecoder<N> {
    pub fn new() -> Self {
        Self { buf: Vec::new() }
    }

    /// Feed a single byte.
    pub fn feed(&mut self, byte: u8) -> Option<Framed<N>> {
        match byte {
            CR => None,
            LF => Some(Framed::Line(core::mem::take(&mut self.buf))),
            _ => {
                if self.buf.push(byte).is_err() {
                    self.buf.clear();
                    return Some(Framed::Overflow);
                }
                None
            }
        }
    }
}
