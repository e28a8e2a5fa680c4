//! Command grammar.
//!
//! One command per line, ASCII:
//!
//! ```text
//! VOL:<f>
//! OVR:ON | OVR:OFF | OVR:<gain>,<threshold>,<tone>[,<mix>[,<mode>]]
//! DLY:ON | DLY:OFF | DLY:<time_ms>,<feedback>,<mix>[,<tone>]
//! GATE:ON | GATE:OFF | GATE:<threshold>[,<attack>[,<release>]]
//! STATUS
//! ```
//!
//! Verbs and `ON`/`OFF` are matched as prefixes. Parsing only checks shape;
//! range checks happen when the command is applied.

use core::str::Split;

/// Effect addressed by an `ON`/`OFF` toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Target {
    Overdrive,
    Delay,
    Gate,
}

impl Target {
    /// Verb as it appears on the wire, without the colon.
    pub const fn verb(self) -> &'static str {
        match self {
            Target::Overdrive => "OVR",
            Target::Delay => "DLY",
            Target::Gate => "GATE",
        }
    }
}

/// `OVR:` parameter list. The first three fields are mandatory.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct OverdriveUpdate {
    pub gain: f32,
    pub threshold: f32,
    pub tone: f32,
    pub mix: Option<f32>,
    pub mode: Option<i32>,
}

/// `DLY:` parameter list. The first three fields are mandatory.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DelayUpdate {
    pub time_ms: f32,
    pub feedback: f32,
    pub mix: f32,
    pub tone: Option<f32>,
}

/// `GATE:` parameter list. Only the threshold is mandatory.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct GateUpdate {
    pub threshold: f32,
    pub attack_time: Option<f32>,
    pub release_time: Option<f32>,
}

/// A recognised command line.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Command {
    Volume(f32),
    Toggle(Target, bool),
    Overdrive(OverdriveUpdate),
    Delay(DelayUpdate),
    Gate(GateUpdate),
    Status,
}

impl Command {
    /// Parse one line (terminator already stripped).
    ///
    /// Returns `None` for unknown verbs and for parameter lists shorter than
    /// the verb's minimum.
    pub fn parse(line: &str) -> Option<Command> {
        if let Some(args) = line.strip_prefix("VOL:") {
            return args.trim().parse().ok().map(Command::Volume);
        }
        if let Some(args) = line.strip_prefix("OVR:") {
            return toggle(Target::Overdrive, args).or_else(|| overdrive(args));
        }
        if let Some(args) = line.strip_prefix("DLY:") {
            return toggle(Target::Delay, args).or_else(|| delay(args));
        }
        if let Some(args) = line.strip_prefix("GATE:") {
            return toggle(Target::Gate, args).or_else(|| gate(args));
        }
        if line.starts_with("STATUS") {
            return Some(Command::Status);
        }
        None
    }

    /// Whether the command changes state (and so earns an indicator blink).
    pub fn is_edit(&self) -> bool {
        !matches!(self, Command::Status)
    }
}

fn toggle(target: Target, args: &str) -> Option<Command> {
    if args.starts_with("ON") {
        Some(Command::Toggle(target, true))
    } else if args.starts_with("OFF") {
        Some(Command::Toggle(target, false))
    } else {
        None
    }
}

fn overdrive(args: &str) -> Option<Command> {
    let mut fields = Fields::new(args);
    let gain = fields.number()?;
    let threshold = fields.number()?;
    let tone = fields.number()?;
    let mix = fields.number();
    let mode = fields.integer();
    Some(Command::Overdrive(OverdriveUpdate {
        gain,
        threshold,
        tone,
        mix,
        mode,
    }))
}

fn delay(args: &str) -> Option<Command> {
    let mut fields = Fields::new(args);
    let time_ms = fields.number()?;
    let feedback = fields.number()?;
    let mix = fields.number()?;
    let tone = fields.number();
    Some(Command::Delay(DelayUpdate {
        time_ms,
        feedback,
        mix,
        tone,
    }))
}

fn gate(args: &str) -> Option<Command> {
    let mut fields = Fields::new(args);
    let threshold = fields.number()?;
    let attack_time = fields.number();
    let release_time = fields.number();
    Some(Command::Gate(GateUpdate {
        threshold,
        attack_time,
        release_time,
    }))
}

/// Positional comma-separated fields.
///
/// Whitespace around a field is trimmed and empty fields are skipped. The
/// first field that fails to parse ends the list: it and everything after
/// it read as absent.
struct Fields<'a> {
    tokens: Split<'a, char>,
    ended: bool,
}

impl<'a> Fields<'a> {
    fn new(args: &'a str) -> Self {
        Fields {
            tokens: args.split(','),
            ended: false,
        }
    }

    fn next_token(&mut self) -> Option<&'a str> {
        if self.ended {
            return None;
        }
        let token = self.tokens.by_ref().map(str::trim).find(|t| !t.is_empty());
        if token.is_none() {
            self.ended = true;
        }
        token
    }

    fn number(&mut self) -> Option<f32> {
        let value = self.next_token()?.parse().ok();
        self.ended |= value.is_none();
        value
    }

    fn integer(&mut self) -> Option<i32> {
        let value = self.next_token()?.parse().ok();
        self.ended |= value.is_none();
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn volume() {
        assert_eq!(Command::parse("VOL:0.5"), Some(Command::Volume(0.5)));
        assert_eq!(Command::parse("VOL: 1"), Some(Command::Volume(1.0)));
        // Range is checked on apply, not here.
        assert_eq!(Command::parse("VOL:7"), Some(Command::Volume(7.0)));
        assert_eq!(Command::parse("VOL:loud"), None);
        assert_eq!(Command::parse("VOL:"), None);
    }

    #[test]
    fn toggles_match_by_prefix() {
        assert_eq!(
            Command::parse("OVR:ON"),
            Some(Command::Toggle(Target::Overdrive, true))
        );
        assert_eq!(
            Command::parse("DLY:OFF"),
            Some(Command::Toggle(Target::Delay, false))
        );
        assert_eq!(
            Command::parse("GATE:ONWARD"),
            Some(Command::Toggle(Target::Gate, true))
        );
        assert_eq!(
            Command::parse("GATE:OFFSET"),
            Some(Command::Toggle(Target::Gate, false))
        );
    }

    #[test]
    fn overdrive_full_and_partial() {
        let full = Command::parse("OVR:20,0.6,0.5,0.8,2");
        assert_eq!(
            full,
            Some(Command::Overdrive(OverdriveUpdate {
                gain: 20.0,
                threshold: 0.6,
                tone: 0.5,
                mix: Some(0.8),
                mode: Some(2),
            }))
        );

        let partial = Command::parse("OVR:10, 0.5, 0.3");
        assert_eq!(
            partial,
            Some(Command::Overdrive(OverdriveUpdate {
                gain: 10.0,
                threshold: 0.5,
                tone: 0.3,
                mix: None,
                mode: None,
            }))
        );
    }

    #[test]
    fn below_minimum_field_count_is_rejected() {
        assert_eq!(Command::parse("OVR:5"), None);
        assert_eq!(Command::parse("OVR:5,0.5"), None);
        assert_eq!(Command::parse("DLY:250,0.5"), None);
        assert_eq!(Command::parse("GATE:"), None);
    }

    #[test]
    fn malformed_field_ends_the_list() {
        // "x" stops the list after two fields: below the minimum of three.
        assert_eq!(Command::parse("OVR:5,0.5,x,0.2"), None);

        // Fourth field malformed: the fifth is not counted either.
        let cmd = Command::parse("OVR:5,0.5,0.3,x,1");
        assert_eq!(
            cmd,
            Some(Command::Overdrive(OverdriveUpdate {
                gain: 5.0,
                threshold: 0.5,
                tone: 0.3,
                mix: None,
                mode: None,
            }))
        );
    }

    #[test]
    fn overdrive_mode_must_be_an_integer() {
        match Command::parse("OVR:5,0.5,0.3,0.4,1.5") {
            Some(Command::Overdrive(u)) => {
                assert_eq!(u.mix, Some(0.4));
                assert_eq!(u.mode, None);
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn empty_fields_are_skipped() {
        assert_eq!(
            Command::parse("DLY:250,,0.5,0.6"),
            Some(Command::Delay(DelayUpdate {
                time_ms: 250.0,
                feedback: 0.5,
                mix: 0.6,
                tone: None,
            }))
        );
    }

    #[test]
    fn gate_optional_fields() {
        assert_eq!(
            Command::parse("GATE:0.05"),
            Some(Command::Gate(GateUpdate {
                threshold: 0.05,
                attack_time: None,
                release_time: None,
            }))
        );
        assert_eq!(
            Command::parse("GATE:0.02,0.001,0.1"),
            Some(Command::Gate(GateUpdate {
                threshold: 0.02,
                attack_time: Some(0.001),
                release_time: Some(0.1),
            }))
        );
    }

    #[test]
    fn status_and_garbage() {
        assert_eq!(Command::parse("STATUS"), Some(Command::Status));
        assert_eq!(Command::parse("STATUS?"), Some(Command::Status));
        assert!(!Command::Status.is_edit());
        assert_eq!(Command::parse("status"), None);
        assert_eq!(Command::parse("HELLO"), None);
        assert_eq!(Command::parse(""), None);
        assert_eq!(Command::parse("OVR"), None);
    }
}
