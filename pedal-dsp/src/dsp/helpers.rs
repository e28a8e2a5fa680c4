//! Sample conversions and clipping helpers.

use crate::constants::{ADC_MAX_CODE, ADC_MID_SCALE, DAC_MAX_CODE};

/// `|x|` without `std`.
#[inline(always)]
pub fn abs(x: f32) -> f32 {
    libm::fabsf(x)
}

/// Clamp to `[-limit, limit]`.
#[inline(always)]
pub fn hard_clip(x: f32, limit: f32) -> f32 {
    if x > limit {
        limit
    } else if x < -limit {
        -limit
    } else {
        x
    }
}

/// Raw converter code (mid-scale = silence) to a signed unit sample.
///
/// 0 maps to -1.0, 2048 to 0.0, 4095 to just under +1.0.
#[inline(always)]
pub fn normalize_code(code: u16) -> f32 {
    (code as f32 - ADC_MID_SCALE) / ADC_MID_SCALE
}

/// Signed unit sample to an output code, clamped to the DAC range.
///
/// The fractional part is truncated; `+1.0` saturates to `DAC_MAX_CODE`.
#[inline(always)]
pub fn quantize_sample(sample: f32) -> u16 {
    // Float-to-int `as` saturates, so negative overshoot lands on 0.
    let code = (sample * ADC_MID_SCALE + ADC_MID_SCALE) as u16;
    if code > DAC_MAX_CODE {
        DAC_MAX_CODE
    } else {
        code
    }
}

/// Block-path normalization: full scale divided by two, minus one.
///
/// Differs from [`normalize_code`] by about 0.05%; kept for parity with the
/// legacy buffer renderer.
#[inline(always)]
pub fn normalize_code_full_scale(code: u16) -> f32 {
    code as f32 / (ADC_MAX_CODE as f32 / 2.0) - 1.0
}

/// Inverse of [`normalize_code_full_scale`], for a sample already in `[-1, 1]`.
#[inline(always)]
pub fn quantize_sample_full_scale(sample: f32) -> u16 {
    ((sample + 1.0) * (DAC_MAX_CODE as f32 / 2.0)) as u16
}
