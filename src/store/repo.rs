use anyhow::Result;

use crate::domain::settings::{EmailFilter, NotificationSetting};

/// Persisted user preferences. Loads never fail: absent or unreadable state
/// yields the defaults.
pub trait SettingsRepository {
    fn load_settings(&self) -> NotificationSetting;
    fn save_settings(&self, settings: &NotificationSetting) -> Result<()>;

    fn load_filters(&self) -> EmailFilter;
    fn save_filters(&self, filters: &EmailFilter) -> Result<()>;
}

/// Audio payloads of custom sounds, keyed by sound id.
pub trait SoundStore: Send + Sync {
    fn get(&self, id: &str) -> Result<Option<Vec<u8>>>;
    fn put(&self, id: &str, data: &[u8]) -> Result<()>;
    fn delete(&self, id: &str) -> Result<()>;
}
