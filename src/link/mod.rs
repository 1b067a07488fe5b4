//! Serial command link from the perception host.
//!
//! ```text
//!  UART bytes ──▶ LineDecoder ──▶ decode_line ──▶ CommandLink ──▶ LinkEvent
//!                 (framing,        (fields)        (snapshot,
//!                  overflow)                        idempotence)
//! ```

pub mod codec;
pub mod command;

pub use codec::{DEFAULT_LINE_CAPACITY, Framed, LineDecoder};
pub use command::{CommandLink, DecodedLine, InboundSnapshot, LinkEvent, LinkStats, ModeToken, decode_line};
