use anyhow::{Result, anyhow};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Runtime family the alerts are delivered on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Ios,
    Android,
    Desktop,
    Generic,
}

impl Platform {
    /// Platform of the compile target.
    pub fn detect() -> Self {
        if cfg!(target_os = "ios") {
            Self::Ios
        } else if cfg!(target_os = "android") {
            Self::Android
        } else if cfg!(any(target_os = "linux", target_os = "macos", target_os = "windows")) {
            Self::Desktop
        } else {
            Self::Generic
        }
    }

    pub fn is_handheld(self) -> bool {
        matches!(self, Self::Ios | Self::Android)
    }

    pub fn capabilities(self) -> Capabilities {
        match self {
            Self::Ios => Capabilities {
                supports_vibration: false,
                suppress_system_sound: true,
                requires_unlock: true,
            },
            Self::Android => Capabilities {
                supports_vibration: true,
                suppress_system_sound: true,
                requires_unlock: false,
            },
            Self::Desktop => Capabilities {
                supports_vibration: false,
                suppress_system_sound: false,
                requires_unlock: false,
            },
            Self::Generic => Capabilities {
                supports_vibration: false,
                suppress_system_sound: false,
                requires_unlock: true,
            },
        }
    }
}

impl FromStr for Platform {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ios" => Ok(Self::Ios),
            "android" => Ok(Self::Android),
            "desktop" => Ok(Self::Desktop),
            "generic" => Ok(Self::Generic),
            other => Err(anyhow!(
                "unknown platform {other:?} (expected ios, android, desktop or generic)"
            )),
        }
    }
}

/// What the platform lets the alert pipeline do. Resolved once at startup and
/// handed to the notifier and the playback ladder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capabilities {
    pub supports_vibration: bool,
    /// Notifications are created silent so the ladder is the only audible cue.
    pub suppress_system_sound: bool,
    /// Audio must be unlocked with a silent buffer before the first real play.
    pub requires_unlock: bool,
}

impl Capabilities {
    pub fn resolve(override_platform: Option<Platform>) -> (Platform, Self) {
        let platform = override_platform.unwrap_or_else(Platform::detect);
        (platform, platform.capabilities())
    }
}
