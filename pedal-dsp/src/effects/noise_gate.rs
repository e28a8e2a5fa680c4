//! Envelope-following noise gate with a smoothstep transition band.

use crate::constants::SAMPLE_RATE_F32;
use crate::dsp::helpers::abs;
use crate::effect::Effect;
use crate::params::NoiseGateParams;

/// Gate fully open above `threshold × OPEN_RATIO`.
const OPEN_RATIO: f32 = 1.2;

/// Gate fully closed below `threshold × CLOSE_RATIO`.
const CLOSE_RATIO: f32 = 0.8;

/// Width of the transition band, as a fraction of the threshold.
const BAND_RATIO: f32 = 0.4;

/// Coefficient used when `1 - 1/(t·fs)` reaches 1.
const MAX_COEFF: f32 = 0.999;

/// Smoothing coefficient for an attack or release time in seconds.
///
/// Negative results clamp to 0 (instant tracking) and results of 1 or more
/// clamp to [`MAX_COEFF`].
fn smoothing_coefficient(time: f32) -> f32 {
    let coeff = 1.0 - 1.0 / (time * SAMPLE_RATE_F32);
    if coeff < 0.0 {
        0.0
    } else if coeff >= 1.0 {
        MAX_COEFF
    } else {
        coeff
    }
}

/// Gate gain for an envelope level.
///
/// 0 below `0.8·threshold`, 1 above `1.2·threshold`, and `3p² - 2p³` across
/// the band in between, so the gain has no jumps at either edge.
pub fn gate_gain(envelope: f32, threshold: f32) -> f32 {
    if envelope > threshold * OPEN_RATIO {
        1.0
    } else if envelope < threshold * CLOSE_RATIO {
        0.0
    } else {
        let range = threshold * BAND_RATIO;
        let position = (envelope - threshold * CLOSE_RATIO) / range;
        position * position * (3.0 - 2.0 * position)
    }
}

/// Noise gate. The envelope rises with the attack time and falls with the
/// release time.
///
/// # Example
/// ```ignore
/// let mut gate = NoiseGate::new();
/// let out = gate.process(sample, &NoiseGateParams::DEFAULT);
/// ```
pub struct NoiseGate {
    envelope: f32,
}

impl NoiseGate {
    pub const fn new() -> Self {
        NoiseGate { envelope: 0.0 }
    }

    /// Current level estimate.
    pub fn envelope(&self) -> f32 {
        self.envelope
    }
}

impl Default for NoiseGate {
    fn default() -> Self {
        Self::new()
    }
}

impl Effect for NoiseGate {
    type Params = NoiseGateParams;

    fn process(&mut self, input: f32, params: &NoiseGateParams) -> f32 {
        if !params.enabled {
            return input;
        }

        let level = abs(input);
        let coeff = if level > self.envelope {
            smoothing_coefficient(params.attack_time)
        } else {
            smoothing_coefficient(params.release_time)
        };
        self.envelope += (level - self.envelope) * (1.0 - coeff);

        input * gate_gain(self.envelope, params.threshold)
    }

    fn reset(&mut self) {
        self.envelope = 0.0;
    }
}
