use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveTime;
use notifyit::domain::email::{Email, Priority};
use notifyit::domain::settings::{DEFAULT_SOUND, EmailFilter, NotificationSetting, SoundRef};
use notifyit::platform::Platform;
use notifyit::rules::{in_window, select_alerts, should_notify};
use notifyit::sound::backend::AudioBackend;
use notifyit::sound::{PlaybackError, PlaybackLadder, PlaybackOutcome, SoundResolver};
use notifyit::store::sqlite::SqliteSoundStore;

fn urgent_filter() -> EmailFilter {
    EmailFilter {
        senders: vec![],
        subjects: vec!["URGENT".to_string()],
        high_priority_only: true,
    }
}

fn enabled() -> NotificationSetting {
    NotificationSetting {
        enable_notifications: true,
        ..NotificationSetting::default()
    }
}

#[test]
fn keyword_override_scenario() {
    let email = Email::new("e1", "alerts@company.com", "URGENT: outage", Priority::Normal);
    assert!(should_notify(&email, &urgent_filter(), &enabled()));
}

#[test]
fn routine_update_scenario() {
    let email = Email::new("e2", "alerts@company.com", "Routine update", Priority::Normal);
    assert!(!should_notify(&email, &urgent_filter(), &enabled()));
}

#[test]
fn disabled_notifications_block_everything() {
    let settings = NotificationSetting::default();
    for priority in [Priority::Low, Priority::Normal, Priority::High] {
        let email = Email::new("e", "alerts@company.com", "URGENT: outage", priority);
        assert!(!should_notify(&email, &urgent_filter(), &settings));
        assert!(!should_notify(&email, &EmailFilter::default(), &settings));
    }
}

#[test]
fn window_gate_examples() {
    let h = |hour| NaiveTime::from_hms_opt(hour, 0, 0).unwrap();
    assert!(in_window(&h(23), "22:00", "06:00"));
    assert!(in_window(&h(3), "22:00", "06:00"));
    assert!(!in_window(&h(10), "22:00", "06:00"));
    assert!(in_window(&h(9), "08:00", "22:00"));
    assert!(!in_window(&h(22), "08:00", "22:00"));
    assert!(!in_window(&h(7), "08:00", "22:00"));
}

#[test]
fn default_settings_alert_only_overnight() {
    let emails = vec![Email::new("e", "ops@company.com", "CRITICAL: disk", Priority::High)];
    let settings = enabled();
    let h = |hour| NaiveTime::from_hms_opt(hour, 15, 0).unwrap();
    assert_eq!(
        select_alerts(&emails, &EmailFilter::default(), &settings, &h(2), false).len(),
        1
    );
    assert!(select_alerts(&emails, &EmailFilter::default(), &settings, &h(14), false).is_empty());
}

/// Nothing can be played from disk or memory; only a tone may work.
struct Unreachable {
    tones: u32,
}

impl AudioBackend for Unreachable {
    fn unlock(&mut self) -> Result<(), PlaybackError> {
        Err(PlaybackError::Device("autoplay blocked".into()))
    }

    fn play_file(&mut self, _path: &Path, _gain: f32) -> Result<(), PlaybackError> {
        Err(PlaybackError::Device("autoplay blocked".into()))
    }

    fn play_bytes(&mut self, _data: Arc<[u8]>, _gain: f32) -> Result<(), PlaybackError> {
        Err(PlaybackError::Device("autoplay blocked".into()))
    }

    fn play_tone(&mut self, _hz: f32, _d: Duration, _gain: f32) -> Result<(), PlaybackError> {
        self.tones += 1;
        Ok(())
    }
}

#[test]
fn unreachable_audio_ends_in_tone() {
    let resolver = SoundResolver::new(
        "/nowhere/sounds",
        DEFAULT_SOUND,
        vec![],
        Arc::new(SqliteSoundStore::open_in_memory().unwrap()),
    );
    let mut ladder = PlaybackLadder::new(
        Unreachable { tones: 0 },
        resolver,
        Platform::Generic.capabilities(),
    );

    assert_eq!(ladder.play(&SoundRef::custom("missing-id"), 150), PlaybackOutcome::Tone);
    assert_eq!(ladder.play(&SoundRef::default_builtin(), -5), PlaybackOutcome::Tone);
    assert_eq!(ladder.backend().tones, 2);
    assert!(!ladder.context().is_unlocked());
}
