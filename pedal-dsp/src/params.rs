//! Effect parameter sets and the cells that share them across priorities.
//!
//! Parameters are written by command dispatch (thread mode) and read by the
//! sample tick (interrupt). Each field lives in its own word-sized atomic, so
//! a reader sees either the old or the new value of every field and never a
//! torn one. The tick handler copies the cells into plain `*Params` structs
//! once per tick and hands those to the effects.
//!
//! Multi-field edits are not committed atomically: one tick may see the new
//! gain with the old threshold. Each field is still individually valid.

use core::ops::RangeInclusive;
use core::sync::atomic::{AtomicBool, AtomicU32, AtomicU8, Ordering};

use crate::constants::{DELAY_BUFFER_SIZE, SAMPLE_RATE_F32};

/// Overdrive waveshaper selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ClipMode {
    /// Rational soft saturation.
    Soft = 0,
    /// Hard knee with a quadratic transition.
    Hard = 1,
    /// Diode-like, different knees per half-wave.
    Asymmetric = 2,
}

impl ClipMode {
    /// Decode the wire/storage value. Anything but 0, 1 or 2 is `None`.
    pub const fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(ClipMode::Soft),
            1 => Some(ClipMode::Hard),
            2 => Some(ClipMode::Asymmetric),
            _ => None,
        }
    }

    pub const fn as_u8(self) -> u8 {
        self as u8
    }
}

/// Noise gate parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct NoiseGateParams {
    pub enabled: bool,
    /// Open level, linear amplitude.
    pub threshold: f32,
    /// Seconds.
    pub attack_time: f32,
    /// Seconds.
    pub release_time: f32,
}

impl NoiseGateParams {
    pub const THRESHOLD_RANGE: RangeInclusive<f32> = 0.001..=0.5;
    pub const ATTACK_RANGE: RangeInclusive<f32> = 0.0001..=0.1;
    pub const RELEASE_RANGE: RangeInclusive<f32> = 0.01..=1.0;

    pub const DEFAULT: Self = NoiseGateParams {
        enabled: true,
        threshold: 0.02,
        attack_time: 0.001,
        release_time: 0.1,
    };
}

impl Default for NoiseGateParams {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Overdrive parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct OverdriveParams {
    pub enabled: bool,
    pub gain: f32,
    pub threshold: f32,
    pub tone: f32,
    pub mix: f32,
    pub mode: ClipMode,
}

impl OverdriveParams {
    pub const GAIN_RANGE: RangeInclusive<f32> = 1.0..=100.0;
    pub const THRESHOLD_RANGE: RangeInclusive<f32> = 0.1..=0.95;
    pub const TONE_RANGE: RangeInclusive<f32> = 0.0..=1.0;
    pub const MIX_RANGE: RangeInclusive<f32> = 0.0..=1.0;

    pub const DEFAULT: Self = OverdriveParams {
        enabled: false,
        gain: 20.0,
        threshold: 0.6,
        tone: 0.5,
        mix: 0.8,
        mode: ClipMode::Soft,
    };
}

impl Default for OverdriveParams {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Delay parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DelayParams {
    pub enabled: bool,
    /// Delay in samples, `1..=DELAY_BUFFER_SIZE`.
    pub delay_length: usize,
    pub feedback: f32,
    pub mix: f32,
    pub tone: f32,
}

impl DelayParams {
    pub const FEEDBACK_RANGE: RangeInclusive<f32> = 0.0..=0.95;
    pub const MIX_RANGE: RangeInclusive<f32> = 0.0..=1.0;
    pub const TONE_RANGE: RangeInclusive<f32> = 0.0..=1.0;

    pub const DEFAULT: Self = DelayParams {
        enabled: false,
        delay_length: 2400,
        feedback: 0.6,
        mix: 0.5,
        tone: 0.5,
    };

    /// Convert a requested time to a delay length.
    ///
    /// Lengths outside `1..=DELAY_BUFFER_SIZE` (including zero, negative and
    /// NaN requests) become the full buffer.
    pub fn samples_for_ms(time_ms: f32) -> usize {
        // `as` saturates: negatives and NaN land on 0.
        let samples = ((time_ms / 1000.0) * SAMPLE_RATE_F32) as u32 as usize;
        if samples > 0 && samples <= DELAY_BUFFER_SIZE {
            samples
        } else {
            DELAY_BUFFER_SIZE
        }
    }

    /// The delay length expressed in milliseconds.
    pub fn time_ms(&self) -> f32 {
        self.delay_length as f32 * 1000.0 / SAMPLE_RATE_F32
    }
}

impl Default for DelayParams {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Legacy distortion waveshaper parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DistortionParams {
    pub gain: f32,
    pub threshold: f32,
}

impl DistortionParams {
    pub const DEFAULT: Self = DistortionParams {
        gain: 3.0,
        threshold: 0.7,
    };
}

impl Default for DistortionParams {
    fn default() -> Self {
        Self::DEFAULT
    }
}

pub const OUTPUT_VOLUME_RANGE: RangeInclusive<f32> = 0.0..=1.0;
pub const DEFAULT_OUTPUT_VOLUME: f32 = 0.8;

// ── Cells ──────────────────────────────────────────────────────────────────

/// An `f32` stored as its bit pattern in an `AtomicU32`.
pub struct ParamCell(AtomicU32);

impl ParamCell {
    pub const fn new(value: f32) -> Self {
        ParamCell(AtomicU32::new(value.to_bits()))
    }

    #[inline]
    pub fn get(&self) -> f32 {
        f32::from_bits(self.0.load(Ordering::Acquire))
    }

    #[inline]
    pub fn set(&self, value: f32) {
        self.0.store(value.to_bits(), Ordering::Release);
    }
}

pub struct NoiseGateCells {
    pub enabled: AtomicBool,
    pub threshold: ParamCell,
    pub attack_time: ParamCell,
    pub release_time: ParamCell,
}

impl NoiseGateCells {
    pub const fn new(p: NoiseGateParams) -> Self {
        NoiseGateCells {
            enabled: AtomicBool::new(p.enabled),
            threshold: ParamCell::new(p.threshold),
            attack_time: ParamCell::new(p.attack_time),
            release_time: ParamCell::new(p.release_time),
        }
    }

    pub fn snapshot(&self) -> NoiseGateParams {
        NoiseGateParams {
            enabled: self.enabled.load(Ordering::Acquire),
            threshold: self.threshold.get(),
            attack_time: self.attack_time.get(),
            release_time: self.release_time.get(),
        }
    }

    pub fn set_enabled(&self, on: bool) {
        self.enabled.store(on, Ordering::Release);
    }
}

pub struct OverdriveCells {
    pub enabled: AtomicBool,
    pub gain: ParamCell,
    pub threshold: ParamCell,
    pub tone: ParamCell,
    pub mix: ParamCell,
    mode: AtomicU8,
}

impl OverdriveCells {
    pub const fn new(p: OverdriveParams) -> Self {
        OverdriveCells {
            enabled: AtomicBool::new(p.enabled),
            gain: ParamCell::new(p.gain),
            threshold: ParamCell::new(p.threshold),
            tone: ParamCell::new(p.tone),
            mix: ParamCell::new(p.mix),
            mode: AtomicU8::new(p.mode.as_u8()),
        }
    }

    pub fn snapshot(&self) -> OverdriveParams {
        OverdriveParams {
            enabled: self.enabled.load(Ordering::Acquire),
            gain: self.gain.get(),
            threshold: self.threshold.get(),
            tone: self.tone.get(),
            mix: self.mix.get(),
            mode: self.mode(),
        }
    }

    pub fn set_enabled(&self, on: bool) {
        self.enabled.store(on, Ordering::Release);
    }

    pub fn mode(&self) -> ClipMode {
        // Only `set_mode` writes the cell, so the fallback never triggers.
        ClipMode::from_u8(self.mode.load(Ordering::Acquire)).unwrap_or(ClipMode::Soft)
    }

    pub fn set_mode(&self, mode: ClipMode) {
        self.mode.store(mode.as_u8(), Ordering::Release);
    }
}

pub struct DelayCells {
    pub enabled: AtomicBool,
    delay_length: AtomicU32,
    pub feedback: ParamCell,
    pub mix: ParamCell,
    pub tone: ParamCell,
}

impl DelayCells {
    pub const fn new(p: DelayParams) -> Self {
        DelayCells {
            enabled: AtomicBool::new(p.enabled),
            delay_length: AtomicU32::new(p.delay_length as u32),
            feedback: ParamCell::new(p.feedback),
            mix: ParamCell::new(p.mix),
            tone: ParamCell::new(p.tone),
        }
    }

    pub fn snapshot(&self) -> DelayParams {
        DelayParams {
            enabled: self.enabled.load(Ordering::Acquire),
            delay_length: self.delay_length(),
            feedback: self.feedback.get(),
            mix: self.mix.get(),
            tone: self.tone.get(),
        }
    }

    pub fn set_enabled(&self, on: bool) {
        self.enabled.store(on, Ordering::Release);
    }

    pub fn delay_length(&self) -> usize {
        self.delay_length.load(Ordering::Acquire) as usize
    }

    /// Store a delay length, clamped to `1..=DELAY_BUFFER_SIZE`.
    pub fn set_delay_length(&self, samples: usize) {
        let samples = samples.clamp(1, DELAY_BUFFER_SIZE);
        self.delay_length.store(samples as u32, Ordering::Release);
    }
}

pub struct DistortionCells {
    pub gain: ParamCell,
    pub threshold: ParamCell,
}

impl DistortionCells {
    pub const fn new(p: DistortionParams) -> Self {
        DistortionCells {
            gain: ParamCell::new(p.gain),
            threshold: ParamCell::new(p.threshold),
        }
    }

    pub fn snapshot(&self) -> DistortionParams {
        DistortionParams {
            gain: self.gain.get(),
            threshold: self.threshold.get(),
        }
    }
}

/// Every live parameter of the pedal, shareable between the sample tick
/// and command dispatch. Usually placed in a `static`.
///
/// ```ignore
/// static PARAMS: SharedParams = SharedParams::new();
/// ```
pub struct SharedParams {
    pub output_volume: ParamCell,
    pub gate: NoiseGateCells,
    pub overdrive: OverdriveCells,
    pub delay: DelayCells,
    pub distortion: DistortionCells,
    /// Pending indicator toggles, consumed by [`Indicator`](crate::scheduler::Indicator).
    blink_counter: AtomicU8,
}

impl SharedParams {
    /// Power-on defaults: gate on, overdrive and delay off, volume 0.8.
    pub const fn new() -> Self {
        SharedParams {
            output_volume: ParamCell::new(DEFAULT_OUTPUT_VOLUME),
            gate: NoiseGateCells::new(NoiseGateParams::DEFAULT),
            overdrive: OverdriveCells::new(OverdriveParams::DEFAULT),
            delay: DelayCells::new(DelayParams::DEFAULT),
            distortion: DistortionCells::new(DistortionParams::DEFAULT),
            blink_counter: AtomicU8::new(0),
        }
    }

    pub fn blink_counter(&self) -> u8 {
        self.blink_counter.load(Ordering::Acquire)
    }

    pub fn set_blink_counter(&self, count: u8) {
        self.blink_counter.store(count, Ordering::Release);
    }

    /// Decrement the blink counter if non-zero. Returns `true` if a blink
    /// was pending.
    pub fn take_blink(&self) -> bool {
        let count = self.blink_counter.load(Ordering::Acquire);
        if count == 0 {
            return false;
        }
        self.blink_counter.store(count - 1, Ordering::Release);
        true
    }
}

impl Default for SharedParams {
    fn default() -> Self {
        Self::new()
    }
}
