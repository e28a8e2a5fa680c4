//! Real-time sample engine.
//!
//! Runs once per sample tick, at the lower of the two interrupt priorities:
//!
//! ```text
//!   convert (bounded wait) ──timeout──► skip tick, previous output holds
//!        │
//!   normalize ─► NoiseGate ─► Overdrive ─► Delay ─► × volume ─► clamp
//!        │                                                        │
//!   monitor ring ◄── raw code                      quantize ─► DAC write
//! ```
//!
//! All state is owned and pre-sized; nothing here allocates or blocks
//! beyond the conversion wait.

pub mod monitor;


pub use monitor::MonitorRing;

use crate::constants::{CONVERSION_TIMEOUT_MS, DELAY_BUFFER_SIZE, MONITOR_BUFFER_SIZE};
use crate::dsp::helpers::{
    hard_clip, normalize_code, normalize_code_full_scale, quantize_sample,
    quantize_sample_full_scale,
};
use crate::effect::Effect;
use crate::effects::{Delay, Distortion, NoiseGate, Overdrive};
use crate::log::trace;
use crate::params::{DelayParams, DistortionParams, NoiseGateParams, OverdriveParams, SharedParams};
use crate::peripheral::{SampleConverter, SampleOutput};

/// Parameters for one pass through the chain, copied from the shared cells
/// at the start of a tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChainParams {
    pub gate: NoiseGateParams,
    pub overdrive: OverdriveParams,
    pub delay: DelayParams,
    pub output_volume: f32,
}

impl ChainParams {
    /// Snapshot every field the chain reads.
    pub fn load(params: &SharedParams) -> Self {
        ChainParams {
            gate: params.gate.snapshot(),
            overdrive: params.overdrive.snapshot(),
            delay: params.delay.snapshot(),
            output_volume: params.output_volume.get(),
        }
    }
}

impl Default for ChainParams {
    fn default() -> Self {
        ChainParams {
            gate: NoiseGateParams::DEFAULT,
            overdrive: OverdriveParams::DEFAULT,
            delay: DelayParams::DEFAULT,
            output_volume: crate::params::DEFAULT_OUTPUT_VOLUME,
        }
    }
}

/// What one tick did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TickOutcome {
    /// A sample was converted, processed and written.
    Written { input: u16, output: u16 },
    /// The conversion timed out; nothing was written.
    Skipped,
}

/// Tick counters, for diagnostics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TickStats {
    pub written: u32,
    pub skipped: u32,
}

/// The fixed effect chain: NoiseGate → Overdrive → Delay.
pub struct Chain<const N: usize = DELAY_BUFFER_SIZE> {
    pub gate: NoiseGate,
    pub overdrive: Overdrive,
    pub delay: Delay<N>,
}

impl<const N: usize> Chain<N> {
    pub const fn new() -> Self {
        Chain {
            gate: NoiseGate::new(),
            overdrive: Overdrive::new(),
            delay: Delay::new(),
        }
    }

    /// Run one sample through the three effects in their fixed order.
    #[inline]
    pub fn process(&mut self, input: f32, params: &ChainParams) -> f32 {
        let gated = self.gate.process(input, &params.gate);
        let driven = self.overdrive.process(gated, &params.overdrive);
        self.delay.process(driven, &params.delay)
    }

    pub fn reset(&mut self) {
        self.gate.reset();
        self.overdrive.reset();
        self.delay.reset();
    }
}

impl<const N: usize> Default for Chain<N> {
    fn default() -> Self {
        Self::new()
    }
}

/// Owner of all per-sample state. Lives in the sample-tick interrupt.
///
/// # Example
/// ```ignore
/// static PARAMS: SharedParams = SharedParams::new();
/// let mut engine = SampleEngine::new();
///
/// // Sample timer ISR:
/// engine.on_sample_tick(&PARAMS, &mut adc, &mut dac);
/// ```
pub struct SampleEngine {
    chain: Chain,
    monitor: MonitorRing<MONITOR_BUFFER_SIZE>,
    stats: TickStats,
}

impl SampleEngine {
    pub const fn new() -> Self {
        SampleEngine {
            chain: Chain::new(),
            monitor: MonitorRing::new(),
            stats: TickStats {
                written: 0,
                skipped: 0,
            },
        }
    }

    /// Chain, output volume and clamp for one normalized sample.
    #[inline]
    pub fn process_sample(&mut self, input: f32, params: &ChainParams) -> f32 {
        let processed = self.chain.process(input, params);
        hard_clip(processed * params.output_volume, 1.0)
    }

    /// Handle one sample-timer expiry.
    ///
    /// On conversion timeout the tick is abandoned before any state changes:
    /// no sample is fabricated, the effects do not advance, and the output
    /// register keeps its previous code.
    pub fn on_sample_tick<C, O>(
        &mut self,
        params: &SharedParams,
        converter: &mut C,
        output: &mut O,
    ) -> TickOutcome
    where
        C: SampleConverter,
        O: SampleOutput,
    {
        let code = match converter.convert(CONVERSION_TIMEOUT_MS) {
            Ok(code) => code,
            Err(_e) => {
                self.stats.skipped = self.stats.skipped.wrapping_add(1);
                trace!("tick skipped: {}", _e);
                return TickOutcome::Skipped;
            }
        };

        let snapshot = ChainParams::load(params);
        let processed = self.process_sample(normalize_code(code), &snapshot);
        let out_code = quantize_sample(processed);
        output.write(out_code);

        self.monitor.push(code);
        self.stats.written = self.stats.written.wrapping_add(1);

        TickOutcome::Written {
            input: code,
            output: out_code,
        }
    }

    pub fn chain(&self) -> &Chain {
        &self.chain
    }

    pub fn monitor(&self) -> &MonitorRing<MONITOR_BUFFER_SIZE> {
        &self.monitor
    }

    pub fn monitor_mut(&mut self) -> &mut MonitorRing<MONITOR_BUFFER_SIZE> {
        &mut self.monitor
    }

    pub fn stats(&self) -> TickStats {
        self.stats
    }

    /// Clear effect memory and counters. The monitor ring is kept.
    pub fn reset(&mut self) {
        self.chain.reset();
        self.stats = TickStats::default();
    }

    /// Legacy block renderer over the monitor ring.
    ///
    /// See [`render_legacy_block`].
    pub fn render_legacy_block(
        &self,
        params: &SharedParams,
        out: &mut [u16; MONITOR_BUFFER_SIZE],
    ) {
        render_legacy_block(
            &self.monitor,
            &params.distortion.snapshot(),
            params.output_volume.get(),
            out,
        );
    }
}

impl Default for SampleEngine {
    fn default() -> Self {
        Self::new()
    }
}

/// Buffer-oriented distortion path, independent of the per-sample chain.
///
/// Processes the ring slot by slot: full-scale normalize, [`Distortion`],
/// volume, clamp, full-scale quantize. Nothing in the scheduler calls this;
/// it is kept for bench diagnostics.
pub fn render_legacy_block<const N: usize>(
    ring: &MonitorRing<N>,
    distortion: &DistortionParams,
    output_volume: f32,
    out: &mut [u16; N],
) {
    for (dst, &code) in out.iter_mut().zip(ring.raw().iter()) {
        let shaped = Distortion::shape(normalize_code_full_scale(code), distortion);
        let scaled = hard_clip(shaped * output_volume, 1.0);
        *dst = quantize_sample_full_scale(scaled);
    }
}
