use anyhow::Result;
use log::{info, warn};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::fs;
use std::path::{Path, PathBuf};

use crate::domain::settings::{EmailFilter, NotificationSetting};
use crate::store::repo::SettingsRepository;

const SETTINGS_FILE: &str = "settings.json";
const FILTERS_FILE: &str = "filters.json";

/// Settings and filters as pretty JSON next to the config file.
pub struct JsonSettingsStore {
    dir: PathBuf,
}

impl JsonSettingsStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn load_or_default<T: DeserializeOwned + Default>(&self, name: &str) -> T {
        let path = self.dir.join(name);
        if !path.exists() {
            return T::default();
        }
        match fs::read_to_string(&path).map(|s| serde_json::from_str(&s)) {
            Ok(Ok(value)) => value,
            Ok(Err(e)) => {
                warn!("Ignoring unreadable {}: {e}", path.display());
                T::default()
            }
            Err(e) => {
                warn!("Could not read {}: {e}", path.display());
                T::default()
            }
        }
    }

    fn save<T: Serialize>(&self, name: &str, value: &T) -> Result<()> {
        fs::create_dir_all(&self.dir)?;
        let path = self.dir.join(name);
        fs::write(&path, serde_json::to_string_pretty(value)?)?;
        info!("Saved {}", path.display());
        Ok(())
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl SettingsRepository for JsonSettingsStore {
    fn load_settings(&self) -> NotificationSetting {
        self.load_or_default(SETTINGS_FILE)
    }

    fn save_settings(&self, settings: &NotificationSetting) -> Result<()> {
        self.save(SETTINGS_FILE, settings)
    }

    fn load_filters(&self) -> EmailFilter {
        self.load_or_default(FILTERS_FILE)
    }

    fn save_filters(&self, filters: &EmailFilter) -> Result<()> {
        self.save(FILTERS_FILE, filters)
    }
}
