//! Fuzz target: `CommandLink::feed`
//!
//! Drives arbitrary byte sequences into the serial command link and
//! asserts that it never panics, that every LF is counted as a line, and
//! that the snapshot only ever holds values that were actually decoded.
//!
//! cargo fuzz run fuzz_command_link

#![no_main]

use libfuzzer_sys::fuzz_target;
use signalsight::link::{CommandLink, LinkEvent};

fuzz_target!(|data: &[u8]| {
    let mut link = CommandLink::<64>::new();
    let mut overflows = 0u32;

    for &b in data {
        if let Some(LinkEvent::Overflow) = link.feed(b) {
            overflows += 1;
        }
    }

    let stats = link.stats();
    let lf = data.iter().filter(|&&b| b == b'\n').count() as u32;
    assert_eq!(stats.lines, lf, "every LF terminates exactly one line");
    assert_eq!(stats.overflows, overflows);
    assert!(stats.ignored <= stats.lines);

    // Same input twice from a fresh link gives the same snapshot.
    let mut again = CommandLink::<64>::new();
    for &b in data {
        let _ = again.feed(b);
    }
    assert_eq!(again.snapshot(), link.snapshot());
    assert_eq!(again.last_token(), link.last_token());
});
