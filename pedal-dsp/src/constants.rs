/// Audio sample rate in Hz (timer-driven, one sample per tick).
pub const SAMPLE_RATE: u32 = 48_000;

/// Sample rate as `f32`, for coefficient math.
pub const SAMPLE_RATE_F32: f32 = SAMPLE_RATE as f32;

/// Delay line capacity in samples (100 ms at 48 kHz).
pub const DELAY_BUFFER_SIZE: usize = 4800;

/// Raw-input monitoring ring length, in samples.
pub const MONITOR_BUFFER_SIZE: usize = 128;

/// Command line buffer size. One slot is reserved, so 63 bytes are usable.
pub const LINE_BUFFER_SIZE: usize = 64;

/// Maximum length of one response line, terminator included.
pub const TX_BUFFER_SIZE: usize = 128;

/// ADC code for 0 V signal (12-bit converter, centred).
pub const ADC_MID_CODE: u16 = 2048;

/// [`ADC_MID_CODE`] as `f32`, the normalization divisor.
pub const ADC_MID_SCALE: f32 = 2048.0;

/// Largest code the DAC accepts (12-bit, right aligned).
pub const DAC_MAX_CODE: u16 = 4095;

/// Largest code the ADC produces.
pub const ADC_MAX_CODE: u16 = 4095;

/// Bounded wait for one ADC conversion, in milliseconds.
pub const CONVERSION_TIMEOUT_MS: u32 = 1;

/// Bounded wait for the blocking fallback transmit, in milliseconds.
pub const BLOCKING_TX_TIMEOUT_MS: u32 = 100;

/// Indicator toggles requested by each applied command.
pub const COMMAND_BLINK_COUNT: u8 = 6;

/// Wait before each indicator toggle, in milliseconds.
pub const BLINK_HALF_PERIOD_MS: u32 = 50;
