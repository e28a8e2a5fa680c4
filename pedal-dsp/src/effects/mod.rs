//! Per-sample effect units.
//!
//! Each implements [`Effect`](crate::effect::Effect): a function of the
//! input sample, the unit's own filter memory and a parameter snapshot.
//!
//! | Unit | State | Role |
//! |------|-------|------|
//! | [`NoiseGate`] | envelope | First in chain; mutes hiss before gain stages |
//! | [`Overdrive`] | DC blocker, tone low-pass | Main drive stage |
//! | [`Delay`] | delay line, repeat tone low-pass | Echo |
//! | [`Distortion`] | none | Legacy waveshaper for the block path |

mod delay;
mod distortion;
mod noise_gate;
mod overdrive;

pub use delay::Delay;
pub use distortion::Distortion;
pub use noise_gate::{gate_gain, NoiseGate};
pub use overdrive::Overdrive;
