use serde::{Deserialize, Serialize};
use std::fmt;

/// Built-in sound shipped in the static sounds directory.
pub const DEFAULT_SOUND: &str = "bell-notification-337658.mp3";

const CUSTOM_PREFIX: &str = "custom:";

/// Which emails are allowed to raise an alert.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EmailFilter {
    /// Empty means any sender.
    pub senders: Vec<String>,
    pub subjects: Vec<String>,
    pub high_priority_only: bool,
}

impl Default for EmailFilter {
    fn default() -> Self {
        Self {
            senders: Vec::new(),
            subjects: vec!["URGENT".into(), "CRITICAL".into(), "DOWNTIME".into()],
            high_priority_only: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct NotificationSetting {
    pub enable_notifications: bool,
    /// "HH:MM", local time
    pub start_time: String,
    /// "HH:MM", local time; may be earlier than `start_time`
    pub end_time: String,
    /// 0-100, clamped before use
    pub volume: i32,
    pub override_silent_mode: bool,
    /// Built-in filename or `custom:<id>`
    pub custom_sound: String,
    pub custom_sounds: Vec<CustomSound>,
}

impl Default for NotificationSetting {
    fn default() -> Self {
        Self {
            enable_notifications: false,
            start_time: "22:00".into(),
            end_time: "06:00".into(),
            volume: 80,
            override_silent_mode: true,
            custom_sound: DEFAULT_SOUND.into(),
            custom_sounds: Vec::new(),
        }
    }
}

impl NotificationSetting {
    pub fn selected_sound(&self) -> SoundRef {
        SoundRef::parse(&self.custom_sound)
    }

    pub fn has_custom_sound(&self, id: &str) -> bool {
        self.custom_sounds.iter().any(|s| s.id == id)
    }
}

/// A user-uploaded sound. `data` only travels with the upload; the audio
/// itself lives in the sound store keyed by `id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomSound {
    pub id: String,
    pub name: String,
    pub filename: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<String>,
}

impl CustomSound {
    /// Copy without the transient payload, as kept in settings.
    pub fn metadata(&self) -> Self {
        Self {
            data: None,
            ..self.clone()
        }
    }
}

/// Reference to a playable sound, as stored in `NotificationSetting::custom_sound`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SoundRef {
    Builtin(String),
    Custom(String),
}

impl SoundRef {
    pub fn parse(raw: &str) -> Self {
        match raw.strip_prefix(CUSTOM_PREFIX) {
            Some(id) => Self::Custom(id.to_string()),
            None => Self::Builtin(raw.to_string()),
        }
    }

    pub fn custom(id: impl Into<String>) -> Self {
        Self::Custom(id.into())
    }

    pub fn default_builtin() -> Self {
        Self::Builtin(DEFAULT_SOUND.to_string())
    }

    pub fn is_builtin(&self) -> bool {
        matches!(self, Self::Builtin(_))
    }
}

impl fmt::Display for SoundRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Builtin(name) => f.write_str(name),
            Self::Custom(id) => write!(f, "{CUSTOM_PREFIX}{id}"),
        }
    }
}
