//! Applying commands to the shared parameters and formatting the reply.
//!
//! Every field of a parameter list is range-checked on its own: an
//! out-of-range field is skipped and the rest still apply. The reply
//! echoes the values now in effect, not the ones requested.

use core::fmt::{self, Write};

use heapless::String;

use super::command::{Command, DelayUpdate, GateUpdate, OverdriveUpdate, Target};
use crate::constants::{BLOCKING_TX_TIMEOUT_MS, COMMAND_BLINK_COUNT, TX_BUFFER_SIZE};
use crate::error::LinkError;
use crate::log::{debug, warning};
use crate::params::{
    ClipMode, DelayParams, NoiseGateParams, OverdriveParams, SharedParams, OUTPUT_VOLUME_RANGE,
};
use crate::peripheral::ControlLink;

/// One formatted reply line, terminator included.
pub type Response = String<TX_BUFFER_SIZE>;

/// Parse and apply one received line.
///
/// Returns `Ok(None)` when the line is not a command (or a volume outside
/// its range): nothing changes and nothing is sent. An applied edit sets
/// the indicator blink counter; `STATUS` does not.
pub fn dispatch_line(line: &[u8], params: &SharedParams) -> Result<Option<Response>, LinkError> {
    let Some(command) = core::str::from_utf8(line).ok().and_then(Command::parse) else {
        debug!("unrecognised line ({} bytes)", line.len());
        return Ok(None);
    };

    let response = apply(&command, params);
    if command.is_edit() && !matches!(response, Ok(None)) {
        params.set_blink_counter(COMMAND_BLINK_COUNT);
        debug!("applied {}", command);
    }
    response
}

/// Apply a parsed command and build its reply.
pub fn apply(command: &Command, params: &SharedParams) -> Result<Option<Response>, LinkError> {
    match *command {
        Command::Volume(volume) => {
            if !OUTPUT_VOLUME_RANGE.contains(&volume) {
                return Ok(None);
            }
            params.output_volume.set(volume);
            format(format_args!("ACK:VOL={:.2}\n", volume)).map(Some)
        }
        Command::Toggle(target, on) => {
            match target {
                Target::Overdrive => params.overdrive.set_enabled(on),
                Target::Delay => params.delay.set_enabled(on),
                Target::Gate => params.gate.set_enabled(on),
            }
            let state = if on { "ON" } else { "OFF" };
            format(format_args!("ACK:{}={}\n", target.verb(), state)).map(Some)
        }
        Command::Overdrive(update) => apply_overdrive(&update, params).map(Some),
        Command::Delay(update) => apply_delay(&update, params).map(Some),
        Command::Gate(update) => apply_gate(&update, params).map(Some),
        Command::Status => status(params).map(Some),
    }
}

fn apply_overdrive(u: &OverdriveUpdate, params: &SharedParams) -> Result<Response, LinkError> {
    let cells = &params.overdrive;
    if OverdriveParams::GAIN_RANGE.contains(&u.gain) {
        cells.gain.set(u.gain);
    }
    if OverdriveParams::THRESHOLD_RANGE.contains(&u.threshold) {
        cells.threshold.set(u.threshold);
    }
    if OverdriveParams::TONE_RANGE.contains(&u.tone) {
        cells.tone.set(u.tone);
    }
    if let Some(mix) = u.mix.filter(|m| OverdriveParams::MIX_RANGE.contains(m)) {
        cells.mix.set(mix);
    }
    if let Some(mode) = u
        .mode
        .and_then(|m| u8::try_from(m).ok())
        .and_then(ClipMode::from_u8)
    {
        cells.set_mode(mode);
    }

    let p = cells.snapshot();
    format(format_args!(
        "ACK:OVR={:.1},{:.2},{:.2},{:.2},{}\n",
        p.gain,
        p.threshold,
        p.tone,
        p.mix,
        p.mode.as_u8()
    ))
}

fn apply_delay(u: &DelayUpdate, params: &SharedParams) -> Result<Response, LinkError> {
    let cells = &params.delay;
    // Time is always applied: out-of-range requests become the full line.
    cells.set_delay_length(DelayParams::samples_for_ms(u.time_ms));
    if DelayParams::FEEDBACK_RANGE.contains(&u.feedback) {
        cells.feedback.set(u.feedback);
    }
    if DelayParams::MIX_RANGE.contains(&u.mix) {
        cells.mix.set(u.mix);
    }
    if let Some(tone) = u.tone.filter(|t| DelayParams::TONE_RANGE.contains(t)) {
        cells.tone.set(tone);
    }

    let p = cells.snapshot();
    format(format_args!(
        "ACK:DLY={:.0}ms,{:.2},{:.2},{:.2}\n",
        p.time_ms(),
        p.feedback,
        p.mix,
        p.tone
    ))
}

fn apply_gate(u: &GateUpdate, params: &SharedParams) -> Result<Response, LinkError> {
    let cells = &params.gate;
    if NoiseGateParams::THRESHOLD_RANGE.contains(&u.threshold) {
        cells.threshold.set(u.threshold);
    }
    if let Some(attack) = u
        .attack_time
        .filter(|a| NoiseGateParams::ATTACK_RANGE.contains(a))
    {
        cells.attack_time.set(attack);
    }
    if let Some(release) = u
        .release_time
        .filter(|r| NoiseGateParams::RELEASE_RANGE.contains(r))
    {
        cells.release_time.set(release);
    }

    let p = cells.snapshot();
    format(format_args!(
        "ACK:GATE={:.3},{:.4},{:.2}\n",
        p.threshold, p.attack_time, p.release_time
    ))
}

fn status(params: &SharedParams) -> Result<Response, LinkError> {
    format(format_args!(
        "VOL:{:.2},OVR:{},DLY:{},GATE:{}\n",
        params.output_volume.get(),
        u8::from(params.overdrive.snapshot().enabled),
        u8::from(params.delay.snapshot().enabled),
        u8::from(params.gate.snapshot().enabled)
    ))
}

fn format(args: fmt::Arguments<'_>) -> Result<Response, LinkError> {
    let mut out = Response::new();
    out.write_fmt(args).map_err(|_| LinkError::Overflow)?;
    Ok(out)
}

/// Put a reply on the link: interrupt-driven submit first, bounded
/// blocking transmit if the submit cannot start.
pub fn send_response<L: ControlLink>(link: &mut L, bytes: &[u8]) -> Result<(), LinkError> {
    match link.submit(bytes) {
        Ok(()) => Ok(()),
        Err(_e) => {
            warning!("submit failed ({}), falling back to blocking transmit", _e);
            link.transmit_blocking(bytes, BLOCKING_TX_TIMEOUT_MS)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reply(line: &str, params: &SharedParams) -> Option<Response> {
        dispatch_line(line.as_bytes(), params).unwrap()
    }

    #[test]
    fn volume_in_range_is_applied() {
        let params = SharedParams::new();
        let r = reply("VOL:0.5", &params).unwrap();
        assert_eq!(r.as_str(), "ACK:VOL=0.50\n");
        assert_eq!(params.output_volume.get(), 0.5);
        assert_eq!(params.blink_counter(), COMMAND_BLINK_COUNT);
    }

    #[test]
    fn volume_out_of_range_is_silent() {
        let params = SharedParams::new();
        assert_eq!(reply("VOL:1.5", &params), None);
        assert_eq!(reply("VOL:-0.1", &params), None);
        assert_eq!(params.output_volume.get(), 0.8);
        assert_eq!(params.blink_counter(), 0);
    }

    #[test]
    fn toggle_acks() {
        let params = SharedParams::new();
        assert_eq!(reply("OVR:ON", &params).unwrap().as_str(), "ACK:OVR=ON\n");
        assert!(params.overdrive.snapshot().enabled);
        assert_eq!(reply("GATE:OFF", &params).unwrap().as_str(), "ACK:GATE=OFF\n");
        assert!(!params.gate.snapshot().enabled);
        assert_eq!(reply("DLY:ON", &params).unwrap().as_str(), "ACK:DLY=ON\n");
        assert!(params.delay.snapshot().enabled);
    }

    #[test]
    fn toggle_does_not_touch_parameters() {
        let params = SharedParams::new();
        let before = params.overdrive.snapshot();
        reply("OVR:ON", &params);
        let after = params.overdrive.snapshot();
        assert_eq!(
            OverdriveParams {
                enabled: false,
                ..after
            },
            before
        );
    }

    #[test]
    fn overdrive_full_list() {
        let params = SharedParams::new();
        let r = reply("OVR:35,0.4,0.7,0.9,1", &params).unwrap();
        assert_eq!(r.as_str(), "ACK:OVR=35.0,0.40,0.70,0.90,1\n");
        assert_eq!(params.overdrive.mode(), ClipMode::Hard);
        // Editing parameters does not enable the effect.
        assert!(!params.overdrive.snapshot().enabled);
    }

    #[test]
    fn overdrive_skips_out_of_range_fields_only() {
        let params = SharedParams::new();
        let r = reply("OVR:500,0.5,2.0,0.3,7", &params).unwrap();
        // Gain 500, tone 2.0 and mode 7 are dropped; threshold and mix land.
        assert_eq!(r.as_str(), "ACK:OVR=20.0,0.50,0.50,0.30,0\n");
    }

    #[test]
    fn overdrive_negative_mode_is_ignored() {
        let params = SharedParams::new();
        reply("OVR:20,0.6,0.5,0.8,2", &params);
        reply("OVR:20,0.6,0.5,0.8,-1", &params);
        assert_eq!(params.overdrive.mode(), ClipMode::Asymmetric);
    }

    #[test]
    fn delay_in_range() {
        let params = SharedParams::new();
        let r = reply("DLY:50,0.3,0.4", &params).unwrap();
        assert_eq!(r.as_str(), "ACK:DLY=50ms,0.30,0.40,0.50\n");
        assert_eq!(params.delay.delay_length(), 2400);
    }

    #[test]
    fn delay_zero_time_uses_full_line() {
        let params = SharedParams::new();
        reply("DLY:0,0.3,0.4", &params);
        assert_eq!(params.delay.delay_length(), 4800);
    }

    #[test]
    fn gate_threshold_only() {
        let params = SharedParams::new();
        let r = reply("GATE:0.05", &params).unwrap();
        assert_eq!(r.as_str(), "ACK:GATE=0.050,0.0010,0.10\n");
    }

    #[test]
    fn status_reports_and_does_not_blink() {
        let params = SharedParams::new();
        let r = reply("STATUS", &params).unwrap();
        assert_eq!(r.as_str(), "VOL:0.80,OVR:0,DLY:0,GATE:1\n");
        assert_eq!(params.blink_counter(), 0);
    }

    #[test]
    fn garbage_is_silent() {
        let params = SharedParams::new();
        assert_eq!(reply("HELLO", &params), None);
        assert_eq!(dispatch_line(&[0xff, 0xfe], &params), Ok(None));
        assert_eq!(params.blink_counter(), 0);
    }

    struct Link {
        submit_result: Result<(), LinkError>,
        submitted: usize,
        blocking: usize,
        last_timeout: u32,
    }

    impl ControlLink for Link {
        fn submit(&mut self, _bytes: &[u8]) -> Result<(), LinkError> {
            self.submitted += 1;
            self.submit_result
        }

        fn transmit_blocking(&mut self, _bytes: &[u8], timeout_ms: u32) -> Result<(), LinkError> {
            self.blocking += 1;
            self.last_timeout = timeout_ms;
            Ok(())
        }
    }

    #[test]
    fn send_prefers_submit() {
        let mut link = Link {
            submit_result: Ok(()),
            submitted: 0,
            blocking: 0,
            last_timeout: 0,
        };
        send_response(&mut link, b"ACK:VOL=0.50\n").unwrap();
        assert_eq!((link.submitted, link.blocking), (1, 0));
    }

    #[test]
    fn send_falls_back_to_blocking() {
        let mut link = Link {
            submit_result: Err(LinkError::Busy),
            submitted: 0,
            blocking: 0,
            last_timeout: 0,
        };
        send_response(&mut link, b"ACK:VOL=0.50\n").unwrap();
        assert_eq!((link.submitted, link.blocking), (1, 1));
        assert_eq!(link.last_timeout, BLOCKING_TX_TIMEOUT_MS);
    }
}
