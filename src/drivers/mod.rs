//! Input conditioning, output cadence, display, and hardware initialisation.

pub mod button;
pub mod chord;
pub mod hw_init;
pub mod lcd;
pub mod patterns;
