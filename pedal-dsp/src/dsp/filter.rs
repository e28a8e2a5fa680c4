//! First-order recursive filters.
//!
//! Coefficients are passed per call rather than stored, because every
//! caller derives its coefficient from a live parameter (tone control).

/// One-pole low-pass: `y[n] = a·x[n] + (1 - a)·y[n-1]`.
///
/// `alpha = 1` passes the input through; smaller values smooth harder.
#[derive(Debug, Clone, Copy, Default)]
pub struct OnePoleLowPass {
    state: f32,
}

impl OnePoleLowPass {
    pub const fn new() -> Self {
        OnePoleLowPass { state: 0.0 }
    }

    #[inline(always)]
    pub fn process(&mut self, input: f32, alpha: f32) -> f32 {
        self.state = alpha * input + (1.0 - alpha) * self.state;
        self.state
    }

    /// Last output.
    pub fn state(&self) -> f32 {
        self.state
    }

    pub fn reset(&mut self) {
        self.state = 0.0;
    }
}

/// One-pole high-pass used as a DC/rumble blocker.
///
/// `out = x - s; s = x - alpha·out`. With `alpha` close to 1 the corner sits
/// a few tens of hertz above DC.
#[derive(Debug, Clone, Copy, Default)]
pub struct DcBlocker {
    state: f32,
}

impl DcBlocker {
    pub const fn new() -> Self {
        DcBlocker { state: 0.0 }
    }

    #[inline(always)]
    pub fn process(&mut self, input: f32, alpha: f32) -> f32 {
        let out = input - self.state;
        self.state = input - alpha * out;
        out
    }

    pub fn state(&self) -> f32 {
        self.state
    }

    pub fn reset(&mut self) {
        self.state = 0.0;
    }
}
