use std::fmt;

use serde::{Deserialize, Serialize};

pub const SOUND_OFFSET: usize = 0x00;
pub const TARGETING_OFFSET: usize = 0x01;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SoundMode {
    Stereo,
    Mono,
    Headset,
    Surround,
    Unknown(u8),
}

impl SoundMode {
    pub const STEREO_RAW: u8 = 0;
    pub const MONO_RAW: u8 = 1;
    pub const HEADSET_RAW: u8 = 2;
    pub const SURROUND_RAW: u8 = 3;

    pub fn from_raw(raw: u8) -> Self {
        match raw {
            Self::STEREO_RAW => Self::Stereo,
            Self::MONO_RAW => Self::Mono,
            Self::HEADSET_RAW => Self::Headset,
            Self::SURROUND_RAW => Self::Surround,
            other => Self::Unknown(other),
        }
    }

    pub fn raw(&self) -> u8 {
        match *self {
            Self::Stereo => Self::STEREO_RAW,
            Self::Mono => Self::MONO_RAW,
            Self::Headset => Self::HEADSET_RAW,
            Self::Surround => Self::SURROUND_RAW,
            Self::Unknown(other) => other,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match *self {
            Self::Stereo => "Stereo",
            Self::Mono => "Mono",
            Self::Headset => "Headset",
            Self::Surround => "Surround",
            Self::Unknown(_) => "Unknown",
        }
    }
}

impl fmt::Display for SoundMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::Unknown(v) => write!(f, "Unknown ({})", v),
            _ => f.write_str(self.as_str()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TargetingMode {
    Switch,
    Hold,
    Unknown(u8),
}

impl TargetingMode {
    pub const SWITCH_RAW: u8 = 0;
    pub const HOLD_RAW: u8 = 1;

    pub fn from_raw(raw: u8) -> Self {
        match raw {
            Self::SWITCH_RAW => Self::Switch,
            Self::HOLD_RAW => Self::Hold,
            other => Self::Unknown(other),
        }
    }

    pub fn raw(&self) -> u8 {
        match *self {
            Self::Switch => Self::SWITCH_RAW,
            Self::Hold => Self::HOLD_RAW,
            Self::Unknown(other) => other,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match *self {
            Self::Switch => "Switch",
            Self::Hold => "Hold",
            Self::Unknown(_) => "Unknown",
        }
    }
}

impl fmt::Display for TargetingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::Unknown(v) => write!(f, "Unknown ({})", v),
            _ => f.write_str(self.as_str()),
        }
    }
}

/// Options stored in the file header, shared by all three slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    pub sound: SoundMode,
    pub targeting: TargetingMode,
}
