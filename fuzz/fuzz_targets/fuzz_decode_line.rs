//! Fuzz target: `decode_line`
//!
//! Any UTF-8 line must decode without panicking, and a decoded token must
//! round-trip through its wire spelling.
//!
//! cargo fuzz run fuzz_decode_line

#![no_main]

use libfuzzer_sys::fuzz_target;
use signalsight::link::{ModeToken, decode_line};

fuzz_target!(|data: &[u8]| {
    let Ok(line) = core::str::from_utf8(data) else {
        return;
    };
    let decoded = decode_line(line);
    if let Some(token) = decoded.token {
        assert_eq!(ModeToken::parse(token.as_str()), Some(token));
    }
});
