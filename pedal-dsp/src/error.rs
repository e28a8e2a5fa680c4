//! Error types for the hardware seams.
//!
//! None of these travel up the protocol: a skipped tick or a failed
//! transmit is recovered where it happens.

use thiserror::Error;

/// Failure of one analog-to-digital conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConversionError {
    /// The conversion did not complete within the allowed wait.
    #[error("conversion not ready after {0} ms")]
    Timeout(u32),
}

/// Failure to put a response on the control link.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LinkError {
    /// The interrupt-driven transmitter is still sending a previous frame.
    #[error("transmitter busy")]
    Busy,
    /// The blocking transmit did not finish in time.
    #[error("transmit timed out")]
    Timeout,
    /// The formatted response does not fit in the transmit buffer.
    #[error("response exceeds transmit buffer")]
    Overflow,
}

/// Peripheral bring-up failure. There is no recovery path: the board
/// support code halts on any of these.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FatalError {
    #[error("clock tree configuration failed")]
    Clock,
    #[error("converter initialization failed")]
    Converter,
    #[error("sample timer initialization failed")]
    Timer,
    #[error("control link initialization failed")]
    Link,
}
