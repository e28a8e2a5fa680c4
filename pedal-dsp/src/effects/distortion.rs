//! Legacy soft-clip distortion. Stateless.

use crate::dsp::helpers::abs;
use crate::effect::Effect;
use crate::params::DistortionParams;

/// Gain followed by a soft knee at `±threshold`.
///
/// Above the knee the excess is squashed with `e / (1 + |e|)`, so the output
/// approaches `threshold + 1` but never reaches it. No final clamp: callers
/// scale and clamp.
pub struct Distortion;

impl Distortion {
    pub const fn new() -> Self {
        Distortion
    }

    /// The transfer curve, usable without an instance.
    pub fn shape(input: f32, params: &DistortionParams) -> f32 {
        let out = input * params.gain;
        let t = params.threshold;
        if out > t {
            t + (out - t) / (1.0 + abs(out - t))
        } else if out < -t {
            -t + (out + t) / (1.0 + abs(out + t))
        } else {
            out
        }
    }
}

impl Default for Distortion {
    fn default() -> Self {
        Self::new()
    }
}

impl Effect for Distortion {
    type Params = DistortionParams;

    fn process(&mut self, input: f32, params: &DistortionParams) -> f32 {
        Self::shape(input, params)
    }

    fn reset(&mut self) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f32, b: f32) -> bool {
        abs(a - b) < 1e-6
    }

    #[test]
    fn linear_below_threshold() {
        let p = DistortionParams::DEFAULT; // gain 3, threshold 0.7
        assert!(close(Distortion::shape(0.1, &p), 0.3));
        assert!(close(Distortion::shape(-0.2, &p), -0.6));
    }

    #[test]
    fn soft_knee_above_threshold() {
        let p = DistortionParams::DEFAULT;
        // 0.5 * 3 = 1.5, excess 0.8 -> 0.7 + 0.8 / 1.8
        assert!(close(Distortion::shape(0.5, &p), 0.7 + 0.8 / 1.8));
        assert!(close(Distortion::shape(-0.5, &p), -(0.7 + 0.8 / 1.8)));
    }

    #[test]
    fn output_bounded_by_threshold_plus_one() {
        let p = DistortionParams::DEFAULT;
        let mut d = Distortion::new();
        for x in [1.0, 10.0, 1000.0] {
            let y = d.process(x, &p);
            assert!(y < p.threshold + 1.0);
            assert!(d.process(-x, &p) > -(p.threshold + 1.0));
        }
    }

    #[test]
    fn curve_is_odd() {
        let p = DistortionParams {
            gain: 5.0,
            threshold: 0.4,
        };
        for x in [0.01, 0.07, 0.3, 0.9] {
            assert!(close(Distortion::shape(x, &p), -Distortion::shape(-x, &p)));
        }
    }
}
