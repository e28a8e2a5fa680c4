//! Line-assembly buffer between the receive interrupt and the main loop.
//!
//! The receive interrupt appends bytes until a terminator arrives, then
//! raises the ready flag. The main loop takes the line and resets the
//! buffer, which lowers the flag again.
//!
//! # Safety Contract
//!
//! - Only ONE context may call [`push_byte()`](LineBuffer::push_byte) (the receive interrupt).
//! - Only ONE context may call [`take_line()`](LineBuffer::take_line) (the main loop).
//! - While the ready flag is set the producer does not touch the bytes; while
//!   it is clear the consumer does not read them.

use core::cell::UnsafeCell;
use core::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use crate::constants::LINE_BUFFER_SIZE;
use crate::log::warning;

/// What one received byte did to the buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RxEvent {
    /// Appended to the line under assembly.
    Stored,
    /// Discarded: the buffer is full, or a completed line is still pending.
    Dropped,
    /// A terminator completed a non-empty line.
    LineReady,
    /// A terminator with nothing buffered.
    Ignored,
}

/// Fixed-capacity line buffer.
///
/// The usable capacity is `N - 1`; the last slot is reserved, as a C string
/// would reserve it for its terminator.
pub struct LineBuffer<const N: usize = LINE_BUFFER_SIZE> {
    bytes: UnsafeCell<[u8; N]>,
    /// Bytes stored so far (only modified by the producer, and by the
    /// consumer while `ready` is set).
    len: AtomicUsize,
    /// A complete line is waiting for the consumer.
    ready: AtomicBool,
    /// Overflow already reported for the current line (producer only).
    overflowed: AtomicBool,
}

// SAFETY: The ready flag hands exclusive access to `bytes` back and forth.
// The producer writes only while `ready` is clear, the consumer reads only
// while it is set, and Release/Acquire on the flag orders those accesses.
unsafe impl<const N: usize> Sync for LineBuffer<N> {}
unsafe impl<const N: usize> Send for LineBuffer<N> {}

impl<const N: usize> LineBuffer<N> {
    /// Create an empty buffer.
    ///
    /// # Panics
    ///
    /// Compile-time assertion: `N` must be at least 2 (usable capacity is `N - 1`).
    pub const fn new() -> Self {
        assert!(N >= 2, "line buffer must have at least 2 slots (1 usable)");

        LineBuffer {
            bytes: UnsafeCell::new([0; N]),
            len: AtomicUsize::new(0),
            ready: AtomicBool::new(false),
            overflowed: AtomicBool::new(false),
        }
    }

    /// Usable capacity in bytes.
    pub const fn capacity(&self) -> usize {
        N - 1
    }

    /// Feed one received byte (producer side).
    pub fn push_byte(&self, byte: u8) -> RxEvent {
        if self.ready.load(Ordering::Acquire) {
            return RxEvent::Dropped;
        }

        let len = self.len.load(Ordering::Relaxed);

        if byte == b'\n' || byte == b'\r' {
            if len == 0 {
                return RxEvent::Ignored;
            }
            self.overflowed.store(false, Ordering::Relaxed);
            // Release publishes the stored bytes together with the flag.
            self.ready.store(true, Ordering::Release);
            return RxEvent::LineReady;
        }

        if len >= N - 1 {
            if !self.overflowed.swap(true, Ordering::Relaxed) {
                warning!("line buffer full, dropping bytes until terminator");
            }
            return RxEvent::Dropped;
        }

        // SAFETY: We are the sole producer and `ready` is clear, so the
        // consumer is not reading. `len < N - 1` keeps the index in bounds.
        unsafe {
            (*self.bytes.get())[len] = byte;
        }
        self.len.store(len + 1, Ordering::Release);
        RxEvent::Stored
    }

    /// Hand the pending line to `f` and reset the buffer (consumer side).
    ///
    /// Returns `None` if no line is ready. The buffer is reset whatever `f`
    /// makes of the line.
    pub fn take_line<R>(&self, f: impl FnOnce(&[u8]) -> R) -> Option<R> {
        if !self.ready.load(Ordering::Acquire) {
            return None;
        }

        let len = self.len.load(Ordering::Relaxed);

        // SAFETY: `ready` is set, so the producer leaves the bytes alone
        // until we clear it below. `len <= N - 1` by construction.
        let line = unsafe { &(&*self.bytes.get())[..len] };
        let result = f(line);

        self.len.store(0, Ordering::Relaxed);
        // Release orders the length reset before the producer can see the
        // buffer as free again.
        self.ready.store(false, Ordering::Release);
        Some(result)
    }

    /// Whether a complete line is waiting.
    pub fn is_ready(&self) -> bool {
        self.ready.load(Ordering::Acquire)
    }

    /// Bytes currently buffered.
    pub fn len(&self) -> usize {
        self.len.load(Ordering::Acquire)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<const N: usize> Default for LineBuffer<N> {
    fn default() -> Self {
        Self::new()
    }
}
