//! Seams to the board support code.
//!
//! Clock, GPIO and converter register setup live outside this crate. The
//! core only needs "convert one sample", "write one output code", "send
//! these bytes" and "bring the board up", expressed as the traits below.

use crate::error::{ConversionError, FatalError, LinkError};

/// Analog input: one start/poll/stop conversion cycle.
pub trait SampleConverter {
    /// Start a conversion and wait for it at most `timeout_ms`.
    ///
    /// Returns the raw unsigned code (mid-scale = silence) or
    /// [`ConversionError::Timeout`]. The converter is stopped either way.
    fn convert(&mut self, timeout_ms: u32) -> Result<u16, ConversionError>;
}

/// Analog output register.
pub trait SampleOutput {
    /// Commit one code. The previous code holds until the next call.
    fn write(&mut self, code: u16);
}

/// Outbound half of the serial control link.
pub trait ControlLink {
    /// Start an interrupt-driven transmit without waiting for it.
    ///
    /// `bytes` borrows a reply that is dropped as soon as the caller
    /// returns, while the transmit is still running. Implementations must
    /// copy it into a buffer they own before returning, and return
    /// [`LinkError::Busy`] if that buffer is still in use.
    fn submit(&mut self, bytes: &[u8]) -> Result<(), LinkError>;

    /// Transmit and wait for completion, at most `timeout_ms`.
    fn transmit_blocking(&mut self, bytes: &[u8], timeout_ms: u32) -> Result<(), LinkError>;
}

/// Peripheral bring-up, performed once before interrupts are enabled.
pub trait Board {
    /// Configure clocks, converters, the sample timer and the link.
    fn bring_up(&mut self) -> Result<(), FatalError>;

    /// Stop the system for good: mask interrupts and spin.
    fn halt(&mut self, error: FatalError) -> !;
}
