//! Sample-level DSP building blocks: conversions, one-pole filters and the
//! circular delay line.

pub mod delay_line;
pub mod filter;
pub mod helpers;

pub use delay_line::DelayLine;
pub use filter::{DcBlocker, OnePoleLowPass};
