use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::app::infrastructure::error::AppError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Key of the durable slot the document is saved under.
    #[serde(default = "default_storage_key")]
    pub storage_key: String,

    #[serde(default = "default_autosave_interval_secs")]
    pub autosave_interval_secs: u64,

    /// Maximum number of history snapshots kept.
    #[serde(default = "default_history_capacity")]
    pub history_capacity: usize,

    /// Minimum time between two history snapshots.
    #[serde(default = "default_history_throttle_secs")]
    pub history_throttle_secs: u64,

    #[serde(default = "default_notification_ttl_ms")]
    pub notification_ttl_ms: u64,

    /// Block export when the title or every page is empty.
    #[serde(default)]
    pub strict_export: bool,
}

fn default_storage_key() -> String {
    "page_forge_state".to_string()
}

fn default_autosave_interval_secs() -> u64 {
    30
}

fn default_history_capacity() -> usize {
    10
}

fn default_history_throttle_secs() -> u64 {
    60
}

fn default_notification_ttl_ms() -> u64 {
    3000
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            storage_key: default_storage_key(),
            autosave_interval_secs: default_autosave_interval_secs(),
            history_capacity: default_history_capacity(),
            history_throttle_secs: default_history_throttle_secs(),
            notification_ttl_ms: default_notification_ttl_ms(),
            strict_export: false,
        }
    }
}

impl AppConfig {
    pub fn autosave_interval(&self) -> Duration {
        Duration::from_secs(self.autosave_interval_secs)
    }

    pub fn history_throttle(&self) -> Duration {
        Duration::from_secs(self.history_throttle_secs)
    }

    pub fn notification_ttl(&self) -> Duration {
        Duration::from_millis(self.notification_ttl_ms)
    }

    /// Load config from the default location, or create it with defaults.
    pub fn load() -> Self {
        Self::load_from(&Self::get_config_path())
    }

    /// Load config from `path`. A missing file yields defaults, which are
    /// written back for next time; an unreadable one yields defaults only.
    pub fn load_from(path: &Path) -> Self {
        match fs::read_to_string(path) {
            Ok(contents) => match serde_json::from_str::<Self>(&contents) {
                Ok(config) => config.sanitized(),
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "failed to parse config, using defaults");
                    Self::default()
                }
            },
            Err(_) => {
                let default = Self::default();
                if let Err(e) = default.save_to(path) {
                    tracing::debug!(path = %path.display(), error = %e, "could not write default config");
                }
                default
            }
        }
    }

    pub fn save(&self) -> Result<(), AppError> {
        self.save_to(&Self::get_config_path())
    }

    pub fn save_to(&self, path: &Path) -> Result<(), AppError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                AppError::Config(format!("cannot create {}: {}", parent.display(), e))
            })?;
        }

        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)
            .map_err(|e| AppError::Config(format!("cannot write {}: {}", path.display(), e)))?;

        Ok(())
    }

    /// Get config file path (cross-platform)
    pub fn get_config_path() -> PathBuf {
        let mut path = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
        path.push("page-forge");
        path.push("config.json");
        path
    }

    /// Zero capacities or intervals would make history or autosave useless.
    fn sanitized(mut self) -> Self {
        if self.history_capacity == 0 {
            self.history_capacity = default_history_capacity();
        }
        if self.autosave_interval_secs == 0 {
            self.autosave_interval_secs = default_autosave_interval_secs();
        }
        if self.storage_key.trim().is_empty() {
            self.storage_key = default_storage_key();
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.storage_key, "page_forge_state");
        assert_eq!(config.autosave_interval(), Duration::from_secs(30));
        assert_eq!(config.history_capacity, 10);
        assert_eq!(config.history_throttle(), Duration::from_secs(60));
        assert_eq!(config.notification_ttl(), Duration::from_millis(3000));
        assert!(!config.strict_export);
    }

    #[test]
    fn test_partial_config() {
        let json = r#"{"strict_export": true, "history_capacity": 3}"#;
        let config: AppConfig = serde_json::from_str(json).unwrap();
        assert!(config.strict_export);
        assert_eq!(config.history_capacity, 3);
        assert_eq!(config.autosave_interval_secs, 30);
    }

    #[test]
    fn test_load_missing_writes_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.json");
        let config = AppConfig::load_from(&path);
        assert_eq!(config, AppConfig::default());
        assert!(path.exists());
    }

    #[test]
    fn test_load_corrupt_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, "{not json").unwrap();
        assert_eq!(AppConfig::load_from(&path), AppConfig::default());
    }

    #[test]
    fn test_load_sanitizes_zero_values() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{"history_capacity": 0, "autosave_interval_secs": 0}"#).unwrap();
        let config = AppConfig::load_from(&path);
        assert_eq!(config.history_capacity, 10);
        assert_eq!(config.autosave_interval_secs, 30);
    }

    #[test]
    fn test_save_to_unwritable_path_is_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("not_a_dir");
        fs::write(&blocker, "x").unwrap();
        let path = blocker.join("config.json");

        let err = AppConfig::default().save_to(&path).unwrap_err();
        assert!(matches!(err, AppError::Config(_)));
        assert!(err.to_string().starts_with("Config error: cannot create"));

        // Loading still falls back to defaults when the write-back fails.
        assert_eq!(AppConfig::load_from(&path), AppConfig::default());
    }

    #[test]
    fn test_save_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        let config = AppConfig {
            storage_key: "custom".to_string(),
            strict_export: true,
            ..Default::default()
        };
        config.save_to(&path).unwrap();
        assert_eq!(AppConfig::load_from(&path), config);
    }
}
