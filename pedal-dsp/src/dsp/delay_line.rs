//! Fixed-capacity circular delay line.
//!
//! Capacity invariant: the write cursor is always in `0..N`, and every read
//! index is computed from it with a checked modulo, so no access can fall
//! outside the buffer regardless of how many samples have been written.

/// Circular buffer of `N` samples with a single write cursor.
///
/// Samples are stored clamped to `[-1.0, 1.0]`.
pub struct DelayLine<const N: usize> {
    buffer: [f32; N],
    cursor: usize,
}

impl<const N: usize> DelayLine<N> {
    /// Create a silent delay line.
    ///
    /// # Panics
    ///
    /// Compile-time assertion: `N` must be at least 1.
    pub const fn new() -> Self {
        assert!(N >= 1, "delay line needs at least one slot");
        DelayLine {
            buffer: [0.0; N],
            cursor: 0,
        }
    }

    /// Total number of slots.
    pub const fn capacity(&self) -> usize {
        N
    }

    /// Current write position, always `< N`.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Index of the sample written `length` ticks ago.
    ///
    /// `length` is clamped to `1..=N`. `length == N` addresses the slot the
    /// cursor is about to overwrite, which holds the oldest sample.
    #[inline(always)]
    pub fn read_index(&self, length: usize) -> usize {
        let length = length.clamp(1, N);
        (self.cursor + N - length) % N
    }

    /// Read the sample written `length` ticks ago.
    #[inline(always)]
    pub fn read(&self, length: usize) -> f32 {
        self.buffer[self.read_index(length)]
    }

    /// Store `value` (clamped to `[-1, 1]`) at the cursor and advance it,
    /// wrapping at `N`.
    #[inline(always)]
    pub fn write(&mut self, value: f32) {
        let stored = if value > 1.0 {
            1.0
        } else if value < -1.0 {
            -1.0
        } else {
            value
        };
        self.buffer[self.cursor] = stored;
        self.cursor = (self.cursor + 1) % N;
    }

    /// Silence the buffer and rewind the cursor.
    pub fn clear(&mut self) {
        self.buffer = [0.0; N];
        self.cursor = 0;
    }
}

impl<const N: usize> Default for DelayLine<N> {
    fn default() -> Self {
        Self::new()
    }
}
