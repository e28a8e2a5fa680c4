//! # pedal-dsp
//!
//! A `no_std`, zero-allocation core for a single-channel guitar effects
//! pedal. One mono sample is converted, processed and written back on every
//! tick of a 48 kHz timer; a line-oriented ASCII protocol on a serial link
//! edits the effect parameters while audio runs.
//!
//! ## Architecture
//!
//! | Layer | Module | Purpose |
//! |-------|--------|---------|
//! | Config | [`constants`] | Sample rate, buffer sizes, timeouts |
//! | State | [`params`] | Parameter records and the shared atomic cells |
//! | Trait | [`effect`] / [`peripheral`] | `Effect` and the board seams |
//! | DSP | [`dsp`] / [`effects`] | Filters, delay line, gate, overdrive, delay |
//! | Engine | [`engine`] | Per-tick sample path and monitor ring |
//! | Protocol | [`protocol`] | Line buffer, command parser, dispatcher |
//! | Runtime | [`scheduler`] | Interrupt priorities, main loop, indicator LED |
//! | Presets | [`preset`] | Named settings rendered as protocol commands |
//!
//! ## Quick start
//!
//! ```ignore
//! use pedal_dsp::engine::SampleEngine;
//! use pedal_dsp::params::SharedParams;
//! use pedal_dsp::protocol::LineBuffer;
//! use pedal_dsp::scheduler::{self, MainLoop};
//!
//! static PARAMS: SharedParams = SharedParams::new();
//! static LINE: LineBuffer = LineBuffer::new();
//!
//! // Sample timer ISR (priority 1):
//! engine.on_sample_tick(&PARAMS, &mut adc, &mut dac);
//!
//! // UART receive ISR (priority 2):
//! scheduler::on_byte_received(&LINE, byte);
//!
//! // Main loop:
//! let mut main_loop = MainLoop::new(&PARAMS, &LINE);
//! loop {
//!     main_loop.poll(&mut uart);
//! }
//! ```
//!
//! ## Features
//!
//! | Feature | Default | Enables |
//! |---------|---------|---------|
//! | `defmt` | no | Structured logging and `defmt::Format` on public types |
//!
//! ## Audio parameters
//!
//! - **Sample rate:** 48 000 Hz ([`constants::SAMPLE_RATE`])
//! - **Converter:** 12-bit unsigned, mid-scale 2048 = silence
//! - **Delay line:** 4800 samples, 100 ms ([`constants::DELAY_BUFFER_SIZE`])

#![no_std]

pub(crate) mod log;

pub mod constants;
pub mod error;
pub mod params;
pub mod effect;
pub mod peripheral;
pub mod dsp;
pub mod effects;
pub mod engine;
pub mod protocol;
pub mod scheduler;
pub mod preset;
