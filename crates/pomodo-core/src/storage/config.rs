//! TOML-based application configuration.
//!
//! Stores user preferences:
//! - Initial timer durations
//! - Notification preferences
//! - Dark mode flag
//! - The opaque account identifier used to scope preset sync
//!
//! Configuration is stored at `~/.config/pomodo/config.toml`.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::data_dir;
use crate::error::ConfigError;

const CONFIG_FILE: &str = "config.toml";

/// Timer duration configuration (minutes).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimerConfig {
    #[serde(default = "default_focus_minutes")]
    pub focus_minutes: u32,
    #[serde(default = "default_short_break_minutes")]
    pub short_break_minutes: u32,
}

/// Notification configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationsConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
}

/// UI configuration. Dark mode is storage only; theming happens in the
/// presentation layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    #[serde(default = "default_true")]
    pub dark_mode: bool,
}

/// Account identity for preset sync.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AccountConfig {
    /// Opaque user identifier. Absent means not signed in.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
}

/// Application configuration.
///
/// Serialized to/from TOML at `~/.config/pomodo/config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub timer: TimerConfig,
    #[serde(default)]
    pub notifications: NotificationsConfig,
    #[serde(default)]
    pub ui: UiConfig,
    #[serde(default)]
    pub account: AccountConfig,
}

fn default_focus_minutes() -> u32 {
    25
}
fn default_short_break_minutes() -> u32 {
    5
}
fn default_true() -> bool {
    true
}

impl Default for TimerConfig {
    fn default() -> Self {
        Self {
            focus_minutes: default_focus_minutes(),
            short_break_minutes: default_short_break_minutes(),
        }
    }
}

impl Default for NotificationsConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

impl Default for UiConfig {
    fn default() -> Self {
        Self { dark_mode: true }
    }
}

impl Config {
    /// Load from the default location, falling back to defaults on any
    /// failure.
    pub fn load() -> Self {
        match Self::path().and_then(|p| Self::load_from(&p)) {
            Ok(config) => config,
            Err(err) => {
                tracing::warn!(error = %err, "using default configuration");
                Self::default()
            }
        }
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::LoadFailed {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        toml::from_str(&content).map_err(|e| ConfigError::LoadFailed {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&Self::path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let content = toml::to_string_pretty(self).map_err(|e| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        std::fs::write(path, content).map_err(|e| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    pub fn path() -> Result<PathBuf, ConfigError> {
        data_dir()
            .map(|dir| dir.join(CONFIG_FILE))
            .map_err(|e| ConfigError::Dir(e.to_string()))
    }

    /// String-keyed read access for the CLI.
    pub fn get(&self, key: &str) -> Option<String> {
        match key {
            "timer.focus_minutes" => Some(self.timer.focus_minutes.to_string()),
            "timer.short_break_minutes" => Some(self.timer.short_break_minutes.to_string()),
            "notifications.enabled" => Some(self.notifications.enabled.to_string()),
            "ui.dark_mode" => Some(self.ui.dark_mode.to_string()),
            "account.user_id" => self.account.user_id.clone(),
            _ => None,
        }
    }

    /// String-keyed write access for the CLI.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        match key {
            "timer.focus_minutes" => self.timer.focus_minutes = parse_minutes(key, value)?,
            "timer.short_break_minutes" => {
                self.timer.short_break_minutes = parse_minutes(key, value)?
            }
            "notifications.enabled" => self.notifications.enabled = parse_bool(key, value)?,
            "ui.dark_mode" => self.ui.dark_mode = parse_bool(key, value)?,
            "account.user_id" => {
                self.account.user_id = (!value.is_empty()).then(|| value.to_string())
            }
            _ => return Err(ConfigError::UnknownKey(key.to_string())),
        }
        Ok(())
    }
}

fn parse_minutes(key: &str, value: &str) -> Result<u32, ConfigError> {
    match value.parse::<u32>() {
        Ok(minutes) if minutes >= 1 => Ok(minutes),
        _ => Err(ConfigError::InvalidValue {
            key: key.to_string(),
            message: format!("expected a positive number of minutes, got '{value}'"),
        }),
    }
}

fn parse_bool(key: &str, value: &str) -> Result<bool, ConfigError> {
    value.parse::<bool>().map_err(|_| ConfigError::InvalidValue {
        key: key.to_string(),
        message: format!("expected 'true' or 'false', got '{value}'"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_hard_coded_durations() {
        let config = Config::default();
        assert_eq!(config.timer.focus_minutes, 25);
        assert_eq!(config.timer.short_break_minutes, 5);
        assert!(config.notifications.enabled);
        assert!(config.ui.dark_mode);
        assert_eq!(config.account.user_id, None);
    }

    #[test]
    fn missing_file_loads_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_from(&dir.path().join("config.toml")).unwrap();
        assert_eq!(config.timer.focus_minutes, 25);
    }

    #[test]
    fn round_trips_through_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        let mut config = Config::default();
        config.timer.focus_minutes = 50;
        config.notifications.enabled = false;
        config.account.user_id = Some("user-1".into());
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.timer.focus_minutes, 50);
        assert!(!loaded.notifications.enabled);
        assert_eq!(loaded.account.user_id.as_deref(), Some("user-1"));
    }

    #[test]
    fn partial_files_fill_in_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[timer]\nfocus_minutes = 45\n").unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.timer.focus_minutes, 45);
        assert_eq!(loaded.timer.short_break_minutes, 5);
        assert!(loaded.ui.dark_mode);
    }

    #[test]
    fn string_keyed_get_and_set() {
        let mut config = Config::default();
        config.set("timer.focus_minutes", "30").unwrap();
        assert_eq!(config.get("timer.focus_minutes").as_deref(), Some("30"));

        config.set("ui.dark_mode", "false").unwrap();
        assert_eq!(config.get("ui.dark_mode").as_deref(), Some("false"));

        assert!(config.set("timer.focus_minutes", "0").is_err());
        assert!(config.set("timer.focus_minutes", "abc").is_err());
        assert!(matches!(
            config.set("nope", "1"),
            Err(ConfigError::UnknownKey(_))
        ));
        assert_eq!(config.get("nope"), None);
    }
}
