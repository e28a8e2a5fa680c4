//! Entry points for the three execution contexts.
//!
//! | Context | Priority | Entry point |
//! |---------|----------|-------------|
//! | Control-link receive interrupt | [`CONTROL_RX_PRIORITY`] | [`on_byte_received`] |
//! | Sample-timer interrupt | [`SAMPLE_TICK_PRIORITY`] | [`SampleEngine::on_sample_tick`](crate::engine::SampleEngine::on_sample_tick) |
//! | Main loop (thread mode) | none | [`MainLoop::poll`], [`Indicator::service`] |
//!
//! The receive interrupt preempts an in-progress sample tick, so command
//! bytes are never held up by DSP load. The main loop never touches engine
//! state; it only writes [`SharedParams`] and reads the line buffer.
//!
//! ```ignore
//! static PARAMS: SharedParams = SharedParams::new();
//! static LINE: LineBuffer = LineBuffer::new();
//!
//! scheduler::start(&mut board);
//! let mut main_loop = MainLoop::new(&PARAMS, &LINE);
//! let mut indicator = Indicator::new(led, delay);
//! loop {
//!     main_loop.poll(&mut link);
//!     indicator.service(&PARAMS).ok();
//! }
//! ```
//!
//! ## Binding the interrupts
//!
//! RTIC takes `priority` as a literal, so a board crate repeats the values
//! and checks them against these constants:
//!
//! ```ignore
//! #[rtic::app(device = board_pac, peripherals = true)]
//! mod app {
//!     use pedal_dsp::scheduler::{self, CONTROL_RX_PRIORITY, SAMPLE_TICK_PRIORITY};
//!
//!     const _: () = assert!(CONTROL_RX_PRIORITY == 2 && SAMPLE_TICK_PRIORITY == 1);
//!
//!     #[local]
//!     struct Local {
//!         engine: SampleEngine,
//!         adc: BoardAdc,
//!         dac: BoardDac,
//!         uart_rx: UartRx,
//!     }
//!
//!     #[task(binds = LPUART1, local = [uart_rx], priority = 2)]
//!     fn control_rx_isr(cx: control_rx_isr::Context) {
//!         if let Ok(byte) = cx.local.uart_rx.read() {
//!             scheduler::on_byte_received(&LINE, byte);
//!         }
//!     }
//!
//!     #[task(binds = PIT, local = [engine, adc, dac], priority = 1)]
//!     fn sample_tick_isr(cx: sample_tick_isr::Context) {
//!         let l = cx.local;
//!         l.engine.on_sample_tick(&PARAMS, l.adc, l.dac);
//!     }
//! }
//! ```

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::StatefulOutputPin;

use crate::constants::{BLINK_HALF_PERIOD_MS, LINE_BUFFER_SIZE};
use crate::error::LinkError;
use crate::log::{info, warning};
use crate::params::SharedParams;
use crate::peripheral::{Board, ControlLink};
use crate::protocol::{dispatch_line, send_response, LineBuffer, RxEvent};

/// NVIC priority of the control-link receive interrupt.
pub const CONTROL_RX_PRIORITY: u8 = 2;

/// NVIC priority of the sample-timer interrupt.
pub const SAMPLE_TICK_PRIORITY: u8 = 1;

const _: () = assert!(
    CONTROL_RX_PRIORITY > SAMPLE_TICK_PRIORITY,
    "control-link receive must preempt the sample tick"
);

/// Receive-interrupt body: one byte into the line buffer.
#[inline]
pub fn on_byte_received<const N: usize>(line: &LineBuffer<N>, byte: u8) -> RxEvent {
    line.push_byte(byte)
}

/// Result of one main-loop pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PollOutcome {
    /// No line was waiting.
    Idle,
    /// A line was consumed but was not a command; nothing was sent.
    Ignored,
    /// A command was handled and its reply handed to the link.
    Replied,
    /// A command was handled but the reply could not be sent.
    SendFailed(LinkError),
}

/// Command side of the main loop.
pub struct MainLoop<'a, const N: usize = LINE_BUFFER_SIZE> {
    params: &'a SharedParams,
    line: &'a LineBuffer<N>,
}

impl<'a, const N: usize> MainLoop<'a, N> {
    pub fn new(params: &'a SharedParams, line: &'a LineBuffer<N>) -> Self {
        MainLoop { params, line }
    }

    /// Dispatch a pending line, if any, and send its reply.
    ///
    /// The line buffer is released before the reply goes out, so reception
    /// of the next command overlaps the transmit.
    pub fn poll<L: ControlLink>(&mut self, link: &mut L) -> PollOutcome {
        let params = self.params;
        let Some(result) = self.line.take_line(|bytes| dispatch_line(bytes, params)) else {
            return PollOutcome::Idle;
        };

        let response = match result {
            Ok(Some(response)) => response,
            Ok(None) => return PollOutcome::Ignored,
            Err(e) => {
                warning!("reply not formatted: {}", e);
                return PollOutcome::SendFailed(e);
            }
        };

        match send_response(link, response.as_bytes()) {
            Ok(()) => PollOutcome::Replied,
            Err(e) => {
                warning!("reply dropped: {}", e);
                PollOutcome::SendFailed(e)
            }
        }
    }
}

/// Status LED driven by the blink counter.
///
/// Each applied command asks for a short burst of toggles. One call to
/// [`service`](Indicator::service) performs at most one toggle, after a
/// fixed wait, so the burst spreads over several loop passes.
pub struct Indicator<P, D> {
    pin: P,
    delay: D,
}

impl<P, D> Indicator<P, D>
where
    P: StatefulOutputPin,
    D: DelayNs,
{
    pub fn new(pin: P, delay: D) -> Self {
        Indicator { pin, delay }
    }

    /// Consume one pending blink. Returns whether the pin was toggled.
    pub fn service(&mut self, params: &SharedParams) -> Result<bool, P::Error> {
        if !params.take_blink() {
            return Ok(false);
        }
        self.delay.delay_ms(BLINK_HALF_PERIOD_MS);
        self.pin.toggle()?;
        Ok(true)
    }

    /// Give the pin and delay back.
    pub fn release(self) -> (P, D) {
        (self.pin, self.delay)
    }
}

/// Bring the board up, or halt on failure. Called once before interrupts
/// are unmasked.
pub fn start<B: Board>(board: &mut B) {
    match board.bring_up() {
        Ok(()) => info!(
            "pedal up: control rx prio {}, sample tick prio {}",
            CONTROL_RX_PRIORITY,
            SAMPLE_TICK_PRIORITY
        ),
        Err(e) => board.halt(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::COMMAND_BLINK_COUNT;
    use crate::error::FatalError;
    use core::convert::Infallible;
    use embedded_hal::digital::{ErrorType, OutputPin};
    use heapless::String;

    // ── Mocks ─────────────────────────────────────────────────────────

    struct MockLink {
        last: String<128>,
        sent: usize,
        fail: Option<LinkError>,
    }

    impl MockLink {
        fn new() -> Self {
            MockLink {
                last: String::new(),
                sent: 0,
                fail: None,
            }
        }
    }

    impl ControlLink for MockLink {
        fn submit(&mut self, bytes: &[u8]) -> Result<(), LinkError> {
            if let Some(e) = self.fail {
                return Err(e);
            }
            self.last.clear();
            for &b in bytes {
                self.last.push(b as char).map_err(|_| LinkError::Overflow)?;
            }
            self.sent += 1;
            Ok(())
        }

        fn transmit_blocking(&mut self, bytes: &[u8], _timeout_ms: u32) -> Result<(), LinkError> {
            match self.fail {
                Some(LinkError::Busy) => Err(LinkError::Timeout),
                _ => self.submit(bytes),
            }
        }
    }

    struct MockPin {
        high: bool,
        toggles: usize,
    }

    impl ErrorType for MockPin {
        type Error = Infallible;
    }

    impl OutputPin for MockPin {
        fn set_low(&mut self) -> Result<(), Self::Error> {
            self.high = false;
            Ok(())
        }

        fn set_high(&mut self) -> Result<(), Self::Error> {
            self.high = true;
            Ok(())
        }
    }

    impl StatefulOutputPin for MockPin {
        fn is_set_high(&mut self) -> Result<bool, Self::Error> {
            Ok(self.high)
        }

        fn is_set_low(&mut self) -> Result<bool, Self::Error> {
            Ok(!self.high)
        }

        fn toggle(&mut self) -> Result<(), Self::Error> {
            self.high = !self.high;
            self.toggles += 1;
            Ok(())
        }
    }

    /// Delay that only adds up the time it was asked to wait.
    struct MockDelay {
        waited_ns: u64,
    }

    impl DelayNs for MockDelay {
        fn delay_ns(&mut self, ns: u32) {
            self.waited_ns += u64::from(ns);
        }
    }

    struct MockBoard {
        result: Result<(), FatalError>,
        brought_up: bool,
    }

    impl Board for MockBoard {
        fn bring_up(&mut self) -> Result<(), FatalError> {
            self.brought_up = true;
            self.result
        }

        fn halt(&mut self, error: FatalError) -> ! {
            panic!("halted: {:?}", error);
        }
    }

    fn feed<const N: usize>(line: &LineBuffer<N>, bytes: &[u8]) {
        for &b in bytes {
            on_byte_received(line, b);
        }
    }

    // ── Tests ─────────────────────────────────────────────────────────

    #[test]
    fn control_rx_outranks_sample_tick() {
        assert!(CONTROL_RX_PRIORITY > SAMPLE_TICK_PRIORITY);
    }

    #[test]
    fn priorities_match_interrupt_bindings() {
        assert_eq!(CONTROL_RX_PRIORITY, 2);
        assert_eq!(SAMPLE_TICK_PRIORITY, 1);
    }

    #[test]
    fn idle_without_a_line() {
        let params = SharedParams::new();
        let line: LineBuffer = LineBuffer::new();
        let mut link = MockLink::new();
        let mut main_loop = MainLoop::new(&params, &line);

        assert_eq!(main_loop.poll(&mut link), PollOutcome::Idle);
        feed(&line, b"VOL:0.5");
        assert_eq!(main_loop.poll(&mut link), PollOutcome::Idle);
        assert_eq!(link.sent, 0);
    }

    #[test]
    fn dispatches_and_replies() {
        let params = SharedParams::new();
        let line: LineBuffer = LineBuffer::new();
        let mut link = MockLink::new();
        let mut main_loop = MainLoop::new(&params, &line);

        feed(&line, b"VOL:0.5\n");
        assert_eq!(main_loop.poll(&mut link), PollOutcome::Replied);
        assert_eq!(link.last.as_str(), "ACK:VOL=0.50\n");
        assert!(line.is_empty());
        assert!(!line.is_ready());
        assert_eq!(main_loop.poll(&mut link), PollOutcome::Idle);
    }

    #[test]
    fn reply_outlives_poll_in_link_buffer() {
        let params = SharedParams::new();
        let line: LineBuffer = LineBuffer::new();
        let mut link = MockLink::new();
        let mut main_loop = MainLoop::new(&params, &line);

        feed(&line, b"STATUS\n");
        assert_eq!(main_loop.poll(&mut link), PollOutcome::Replied);

        // The reply is gone and the line buffer is refilling; the link's
        // own copy still holds every byte.
        feed(&line, b"VOL:0.25\n");
        assert_eq!(link.last.as_str(), "VOL:0.80,OVR:0,DLY:0,GATE:1\n");

        assert_eq!(main_loop.poll(&mut link), PollOutcome::Replied);
        assert_eq!(link.last.as_str(), "ACK:VOL=0.25\n");
        assert_eq!(link.sent, 2);
    }

    #[test]
    fn garbage_line_is_consumed_silently() {
        let params = SharedParams::new();
        let line: LineBuffer = LineBuffer::new();
        let mut link = MockLink::new();
        let mut main_loop = MainLoop::new(&params, &line);

        feed(&line, b"NOPE\n");
        assert_eq!(main_loop.poll(&mut link), PollOutcome::Ignored);
        assert_eq!(link.sent, 0);
        assert!(line.is_empty());

        // The buffer is free for the next command.
        feed(&line, b"STATUS\n");
        assert_eq!(main_loop.poll(&mut link), PollOutcome::Replied);
    }

    #[test]
    fn send_failure_is_reported_but_state_applies() {
        let params = SharedParams::new();
        let line: LineBuffer = LineBuffer::new();
        let mut link = MockLink::new();
        link.fail = Some(LinkError::Busy);
        let mut main_loop = MainLoop::new(&params, &line);

        feed(&line, b"DLY:ON\n");
        assert_eq!(
            main_loop.poll(&mut link),
            PollOutcome::SendFailed(LinkError::Timeout)
        );
        assert!(params.delay.snapshot().enabled);
    }

    #[test]
    fn indicator_burns_down_blink_counter() {
        let params = SharedParams::new();
        let mut indicator = Indicator::new(
            MockPin {
                high: false,
                toggles: 0,
            },
            MockDelay { waited_ns: 0 },
        );

        assert_eq!(indicator.service(&params), Ok(false));

        params.set_blink_counter(COMMAND_BLINK_COUNT);
        let mut toggled = 0;
        while indicator.service(&params) == Ok(true) {
            toggled += 1;
        }
        assert_eq!(toggled, COMMAND_BLINK_COUNT as usize);
        assert_eq!(params.blink_counter(), 0);

        let (pin, delay) = indicator.release();
        assert_eq!(pin.toggles, 6);
        // Even number of toggles: the LED ends where it started.
        assert!(!pin.high);
        assert_eq!(delay.waited_ns, 6 * 50 * 1_000_000);
    }

    #[test]
    fn command_then_indicator() {
        let params = SharedParams::new();
        let line: LineBuffer = LineBuffer::new();
        let mut link = MockLink::new();
        let mut main_loop = MainLoop::new(&params, &line);
        let mut indicator = Indicator::new(
            MockPin {
                high: false,
                toggles: 0,
            },
            MockDelay { waited_ns: 0 },
        );

        feed(&line, b"GATE:OFF\n");
        main_loop.poll(&mut link);
        assert_eq!(indicator.service(&params), Ok(true));
        assert_eq!(params.blink_counter(), COMMAND_BLINK_COUNT - 1);
    }

    #[test]
    fn start_brings_board_up() {
        let mut board = MockBoard {
            result: Ok(()),
            brought_up: false,
        };
        start(&mut board);
        assert!(board.brought_up);
    }

    #[test]
    #[should_panic(expected = "halted")]
    fn start_halts_on_fatal_error() {
        let mut board = MockBoard {
            result: Err(FatalError::Converter),
            brought_up: false,
        };
        start(&mut board);
    }
}
