//! Feedback delay with darkening repeats.
//!
//! The repeat tone filter sits only in the feedback path: each echo passes
//! through it once more than the previous one. The wet tap is the raw
//! delay-line read.

use crate::constants::DELAY_BUFFER_SIZE;
use crate::dsp::delay_line::DelayLine;
use crate::dsp::filter::OnePoleLowPass;
use crate::dsp::helpers::hard_clip;
use crate::effect::Effect;
use crate::params::DelayParams;

/// Repeat tone: `alpha = TONE_BASE + TONE_SPAN × tone`.
const TONE_BASE: f32 = 0.2;
const TONE_SPAN: f32 = 0.7;

/// Feedback is limited before it is summed into the line.
const FEEDBACK_LIMIT: f32 = 0.95;

/// Delay effect. Owns its delay line exclusively.
///
/// `N` is the line capacity; the pedal uses [`DELAY_BUFFER_SIZE`].
pub struct Delay<const N: usize = DELAY_BUFFER_SIZE> {
    line: DelayLine<N>,
    lp: OnePoleLowPass,
}

impl<const N: usize> Delay<N> {
    pub const fn new() -> Self {
        Delay {
            line: DelayLine::new(),
            lp: OnePoleLowPass::new(),
        }
    }

    /// The underlying delay line.
    pub fn line(&self) -> &DelayLine<N> {
        &self.line
    }

    /// Repeat tone filter memory.
    pub fn lp_state(&self) -> f32 {
        self.lp.state()
    }
}

impl<const N: usize> Default for Delay<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> Effect for Delay<N> {
    type Params = DelayParams;

    fn process(&mut self, input: f32, params: &DelayParams) -> f32 {
        if !params.enabled {
            return input;
        }

        let delayed = self.line.read(params.delay_length);

        let tone_alpha = TONE_BASE + params.tone * TONE_SPAN;
        let filtered = self.lp.process(delayed, tone_alpha);
        let feedback = hard_clip(filtered * params.feedback, FEEDBACK_LIMIT);

        self.line.write(input + feedback);

        input * (1.0 - params.mix) + delayed * params.mix
    }

    fn reset(&mut self) {
        self.line.clear();
        self.lp.reset();
    }
}
