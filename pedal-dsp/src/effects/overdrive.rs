//! Overdrive: DC block, gain, waveshaper, tone, wet/dry mix, soft limiter.
//!
//! The filter coefficients, knees and slopes below set the voicing of the
//! pedal. Changing any of them changes the sound.

use crate::dsp::filter::{DcBlocker, OnePoleLowPass};
use crate::dsp::helpers::{abs, hard_clip};
use crate::effect::Effect;
use crate::params::{ClipMode, OverdriveParams};

/// Pre-filter pole. Removes DC and rumble before the gain stage.
const HP_ALPHA: f32 = 0.99;

/// Tone low-pass: `alpha = TONE_BASE + TONE_SPAN × tone`.
const TONE_BASE: f32 = 0.3;
const TONE_SPAN: f32 = 0.6;

/// Soft mode: `x / (1 + SOFT_CURVE·|x|)`, hard ±1 beyond `SOFT_LIMIT`.
const SOFT_CURVE: f32 = 0.3;
const SOFT_LIMIT: f32 = 3.0;
/// Below this the soft curve is indistinguishable from linear.
const SOFT_LINEAR_BELOW: f32 = 0.001;

/// Asymmetric mode: negative knee sits further out, both slopes differ.
const ASYM_NEGATIVE_KNEE: f32 = 1.5;
const ASYM_POSITIVE_SLOPE: f32 = 0.1;
const ASYM_NEGATIVE_SLOPE: f32 = 0.3;

/// Output limiter: compress above `LIMIT_KNEE` by `LIMIT_SLOPE`.
const LIMIT_KNEE: f32 = 0.95;
const LIMIT_SLOPE: f32 = 0.1;

/// Waveshaper transfer curve for one gained sample.
pub(crate) fn shape(gained: f32, mode: ClipMode, threshold: f32) -> f32 {
    match mode {
        ClipMode::Soft => {
            if abs(gained) < SOFT_LINEAR_BELOW {
                gained
            } else if gained > SOFT_LIMIT {
                1.0
            } else if gained < -SOFT_LIMIT {
                -1.0
            } else {
                gained / (1.0 + abs(gained) * SOFT_CURVE)
            }
        }
        ClipMode::Hard => {
            let level = abs(gained);
            let sign = if gained >= 0.0 { 1.0 } else { -1.0 };
            if level < threshold {
                2.0 * gained
            } else if level < 2.0 * threshold {
                let x = 2.0 - 3.0 * level / threshold;
                sign * (3.0 - x * x) / 3.0
            } else {
                sign
            }
        }
        ClipMode::Asymmetric => {
            let negative_knee = threshold * ASYM_NEGATIVE_KNEE;
            if gained > 0.0 {
                if gained > threshold {
                    threshold + (gained - threshold) * ASYM_POSITIVE_SLOPE
                } else {
                    gained
                }
            } else if gained < -negative_knee {
                -negative_knee + (gained + negative_knee) * ASYM_NEGATIVE_SLOPE
            } else {
                gained
            }
        }
    }
}

/// Compress the top of the range, then clamp to `[-1, 1]`.
pub(crate) fn soft_limit(x: f32) -> f32 {
    let compressed = if x > LIMIT_KNEE {
        LIMIT_KNEE + (x - LIMIT_KNEE) * LIMIT_SLOPE
    } else if x < -LIMIT_KNEE {
        -LIMIT_KNEE + (x + LIMIT_KNEE) * LIMIT_SLOPE
    } else {
        x
    };
    hard_clip(compressed, 1.0)
}

/// Overdrive stage.
///
/// # Example
/// ```ignore
/// let mut od = Overdrive::new();
/// let params = OverdriveParams { enabled: true, ..OverdriveParams::DEFAULT };
/// let out = od.process(sample, &params);
/// ```
pub struct Overdrive {
    hp: DcBlocker,
    lp: OnePoleLowPass,
}

impl Overdrive {
    pub const fn new() -> Self {
        Overdrive {
            hp: DcBlocker::new(),
            lp: OnePoleLowPass::new(),
        }
    }

    /// High-pass filter memory.
    pub fn hp_state(&self) -> f32 {
        self.hp.state()
    }

    /// Tone filter memory.
    pub fn lp_state(&self) -> f32 {
        self.lp.state()
    }
}

impl Default for Overdrive {
    fn default() -> Self {
        Self::new()
    }
}

impl Effect for Overdrive {
    type Params = OverdriveParams;

    fn process(&mut self, input: f32, params: &OverdriveParams) -> f32 {
        if !params.enabled {
            return input;
        }

        let hp_out = self.hp.process(input, HP_ALPHA);
        let gained = hp_out * params.gain;
        let clipped = shape(gained, params.mode, params.threshold);

        let tone_alpha = TONE_BASE + params.tone * TONE_SPAN;
        let toned = self.lp.process(clipped, tone_alpha);

        let mixed = params.mix * toned + (1.0 - params.mix) * input;
        soft_limit(mixed)
    }

    fn reset(&mut self) {
        self.hp.reset();
        self.lp.reset();
    }
}
