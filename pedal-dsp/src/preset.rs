//! Named presets, as sent by the companion controller.
//!
//! A preset is applied over the serial protocol like any other edit, so the
//! pedal needs no preset storage of its own. [`Preset::commands`] renders
//! the lines the controller sends, in order.

use core::fmt::Write;

use heapless::{String, Vec};

use crate::error::LinkError;

/// Longest preset command line, terminator included.
pub const PRESET_LINE_SIZE: usize = 32;

/// One rendered preset command.
pub type PresetLine = String<PRESET_LINE_SIZE>;

/// Lines per preset: volume, overdrive values and toggle, delay values and
/// toggle.
pub const PRESET_LINES: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct OverdriveSetting {
    pub enabled: bool,
    pub gain: f32,
    pub threshold: f32,
    pub tone: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DelaySetting {
    pub enabled: bool,
    pub time_ms: f32,
    pub feedback: f32,
    pub mix: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Preset {
    pub name: &'static str,
    pub description: &'static str,
    pub volume: f32,
    pub overdrive: OverdriveSetting,
    pub delay: DelaySetting,
}

pub const CLEAN: Preset = Preset {
    name: "clean",
    description: "Crystal clear tone with minimal processing",
    volume: 0.75,
    overdrive: OverdriveSetting {
        enabled: false,
        gain: 1.0,
        threshold: 0.9,
        tone: 0.5,
    },
    delay: DelaySetting {
        enabled: false,
        time_ms: 50.0,
        feedback: 0.25,
        mix: 0.25,
    },
};

pub const CRUNCH: Preset = Preset {
    name: "crunch",
    description: "Classic rock crunch with medium gain",
    volume: 0.6,
    overdrive: OverdriveSetting {
        enabled: true,
        gain: 8.0,
        threshold: 0.65,
        tone: 0.5,
    },
    delay: DelaySetting {
        enabled: false,
        time_ms: 60.0,
        feedback: 0.3,
        mix: 0.3,
    },
};

pub const LEAD: Preset = Preset {
    name: "lead",
    description: "High gain lead tone with delay",
    volume: 0.55,
    overdrive: OverdriveSetting {
        enabled: true,
        gain: 15.0,
        threshold: 0.5,
        tone: 0.6,
    },
    delay: DelaySetting {
        enabled: true,
        time_ms: 80.0,
        feedback: 0.4,
        mix: 0.4,
    },
};

pub const AMBIENT: Preset = Preset {
    name: "ambient",
    description: "Spacey atmospheric sound with heavy delay",
    volume: 0.65,
    overdrive: OverdriveSetting {
        enabled: true,
        gain: 4.0,
        threshold: 0.75,
        tone: 0.7,
    },
    delay: DelaySetting {
        enabled: true,
        time_ms: 100.0,
        feedback: 0.55,
        mix: 0.6,
    },
};

pub const METAL: Preset = Preset {
    name: "metal",
    description: "Heavy distortion for metal riffs",
    volume: 0.5,
    overdrive: OverdriveSetting {
        enabled: true,
        gain: 20.0,
        threshold: 0.4,
        tone: 0.3,
    },
    delay: DelaySetting {
        enabled: false,
        time_ms: 50.0,
        feedback: 0.2,
        mix: 0.2,
    },
};

/// Every preset, in menu order.
pub static PRESETS: [Preset; 5] = [CLEAN, CRUNCH, LEAD, AMBIENT, METAL];

impl Preset {
    /// Look a preset up by its exact name.
    pub fn by_name(name: &str) -> Option<&'static Preset> {
        PRESETS.iter().find(|p| p.name == name)
    }

    /// The protocol lines that apply this preset, each `\n`-terminated.
    ///
    /// Parameter lines come before the matching toggle, so an effect is
    /// never switched on with the previous preset's values.
    pub fn commands(&self) -> Result<Vec<PresetLine, PRESET_LINES>, LinkError> {
        let od = &self.overdrive;
        let dl = &self.delay;

        let mut lines = Vec::new();
        push_line(&mut lines, format_args!("VOL:{}\n", self.volume))?;
        push_line(
            &mut lines,
            format_args!("OVR:{},{},{}\n", od.gain, od.threshold, od.tone),
        )?;
        push_line(&mut lines, format_args!("OVR:{}\n", on_off(od.enabled)))?;
        push_line(
            &mut lines,
            format_args!("DLY:{},{},{}\n", dl.time_ms, dl.feedback, dl.mix),
        )?;
        push_line(&mut lines, format_args!("DLY:{}\n", on_off(dl.enabled)))?;
        Ok(lines)
    }
}

fn on_off(enabled: bool) -> &'static str {
    if enabled {
        "ON"
    } else {
        "OFF"
    }
}

fn push_line(
    lines: &mut Vec<PresetLine, PRESET_LINES>,
    args: core::fmt::Arguments<'_>,
) -> Result<(), LinkError> {
    let mut line = PresetLine::new();
    line.write_fmt(args).map_err(|_| LinkError::Overflow)?;
    lines.push(line).map_err(|_| LinkError::Overflow)
}
