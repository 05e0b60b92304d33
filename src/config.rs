use anyhow::{Context, Result};
use log::info;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::domain::settings::DEFAULT_SOUND;
use crate::platform::Platform;

const APP_DIR: &str = "notifyit";

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Seconds between mailbox checks
    pub check_interval_secs: u64,
    pub max_emails: usize,
    /// Directory holding the built-in sounds
    pub sounds_dir: PathBuf,
    pub default_sound: String,
    /// Other built-in filenames users may select
    pub builtin_sounds: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub db_path: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    /// Chance per check that the demo mailbox receives an alert
    pub new_mail_probability: f64,
    /// Deliver alerts outside the active hours too
    pub bypass_time_window: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub platform: Option<Platform>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            check_interval_secs: 30,
            max_emails: 50,
            sounds_dir: PathBuf::from("sounds"),
            default_sound: DEFAULT_SOUND.to_string(),
            builtin_sounds: vec![DEFAULT_SOUND.to_string()],
            db_path: None,
            icon: None,
            new_mail_probability: 0.2,
            bypass_time_window: false,
            platform: None,
        }
    }
}

pub fn config_dir() -> Result<PathBuf> {
    Ok(dirs::config_dir()
        .ok_or_else(|| anyhow::anyhow!("no config dir available"))?
        .join(APP_DIR))
}

pub fn config_path() -> Result<PathBuf> {
    let mut p = config_dir()?;
    fs::create_dir_all(&p)?;
    p.push("config.toml");
    Ok(p)
}

/// Load `config.toml`, writing a template with the defaults on first run.
pub fn load_config() -> Result<Config> {
    load_config_from(&config_path()?)
}

pub fn load_config_from(path: &Path) -> Result<Config> {
    if !path.exists() {
        let cfg = Config::default();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, toml::to_string_pretty(&cfg)?)?;
        info!("Created default config at {}", path.display());
        return Ok(cfg);
    }
    let s = fs::read_to_string(path)?;
    let cfg: Config =
        toml::from_str(&s).with_context(|| format!("invalid config at {}", path.display()))?;
    Ok(cfg)
}

pub fn resolve_db_path(cfg: &Config) -> Result<PathBuf> {
    match &cfg.db_path {
        Some(p) => Ok(p.clone()),
        None => Ok(config_dir()?.join("sounds.db")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn first_run_writes_template() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("notifyit").join("config.toml");

        let cfg = load_config_from(&path).unwrap();
        assert_eq!(cfg, Config::default());
        assert!(path.exists());

        let again = load_config_from(&path).unwrap();
        assert_eq!(again.check_interval_secs, 30);
    }

    #[test]
    fn partial_file_keeps_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(
            &path,
            "check_interval_secs = 5\nplatform = \"android\"\nbypass_time_window = true\n",
        )
        .unwrap();

        let cfg = load_config_from(&path).unwrap();
        assert_eq!(cfg.check_interval_secs, 5);
        assert_eq!(cfg.platform, Some(Platform::Android));
        assert!(cfg.bypass_time_window);
        assert_eq!(cfg.default_sound, DEFAULT_SOUND);
    }

    #[test]
    fn malformed_file_is_an_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "check_interval_secs = \"soon\"").unwrap();
        assert!(load_config_from(&path).is_err());
    }
}
