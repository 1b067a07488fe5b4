//! Millisecond tick arithmetic.
//!
//! The hardware tick counter is a free-running `u32` that wraps roughly
//! every 49.7 days.  Every elapsed-time comparison in the crate goes
//! through [`elapsed_ms`] so the wrap is invisible to callers.

/// Monotonic milliseconds since boot, truncated to `u32`.
pub type Millis = u32;

/// Milliseconds from `since` to `now`, correct across one counter wrap.
#[inline]
pub const fn elapsed_ms(now: Millis, since: Millis) -> u32 {
    now.wrapping_sub(since)
}
