//! Raw-input monitoring ring.
//!
//! Every acquired converter code is recorded here, independent of the delay
//! line, so diagnostics can look at what the input actually saw.

use crate::constants::ADC_MID_CODE;

/// Fixed-size ring of raw input codes. Wraps silently.
pub struct MonitorRing<const N: usize> {
    samples: [u16; N],
    /// Next slot to write, always `< N`.
    index: usize,
    /// Number of valid samples, saturating at `N`.
    len: usize,
    /// Largest `|code - mid-scale|` since the last `clear_peak`.
    peak_deviation: u16,
}

impl<const N: usize> MonitorRing<N> {
    pub const fn new() -> Self {
        assert!(N >= 1, "monitor ring needs at least one slot");
        MonitorRing {
            samples: [ADC_MID_CODE; N],
            index: 0,
            len: 0,
            peak_deviation: 0,
        }
    }

    /// Record one code.
    pub fn push(&mut self, code: u16) {
        self.samples[self.index] = code;
        self.index = (self.index + 1) % N;
        if self.len < N {
            self.len += 1;
        }
        let deviation = (code as i32 - ADC_MID_CODE as i32).unsigned_abs() as u16;
        if deviation > self.peak_deviation {
            self.peak_deviation = deviation;
        }
    }

    /// Number of recorded samples, at most `N`.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Most recent code, if any.
    pub fn latest(&self) -> Option<u16> {
        if self.len == 0 {
            None
        } else {
            Some(self.samples[(self.index + N - 1) % N])
        }
    }

    /// Slot-ordered storage, as written (not chronological once wrapped).
    /// Unwritten slots hold mid-scale.
    pub fn raw(&self) -> &[u16; N] {
        &self.samples
    }

    /// Copy the recorded codes oldest-first into `out`. Returns the count.
    pub fn snapshot(&self, out: &mut [u16; N]) -> usize {
        let start = (self.index + N - self.len) % N;
        for (i, slot) in out.iter_mut().take(self.len).enumerate() {
            *slot = self.samples[(start + i) % N];
        }
        self.len
    }

    /// Peak distance from mid-scale since the last [`clear_peak`](Self::clear_peak).
    pub fn peak_deviation(&self) -> u16 {
        self.peak_deviation
    }

    pub fn clear_peak(&mut self) {
        self.peak_deviation = 0;
    }
}

impl<const N: usize> Default for MonitorRing<N> {
    fn default() -> Self {
        Self::new()
    }
}
