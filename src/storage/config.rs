//! User profile and application configuration.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use uuid::Uuid;

use crate::actions::categories::ConditionTag;
use crate::subscription::gating::FreeTier;
use crate::subscription::types::FeatureUsage;

/// User profile with health conditions and free-tier usage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    /// Unique identifier
    pub id: Uuid,
    /// Display name
    pub name: String,
    /// Chronic conditions used to weight suggestions
    pub conditions: Vec<ConditionTag>,
    /// Free-tier usage counters
    pub usage: FeatureUsage,
    /// Whether onboarding has been completed
    pub onboarding_complete: bool,
    /// Profile creation timestamp
    pub created_at: DateTime<Utc>,
    /// Last modification timestamp
    pub updated_at: DateTime<Utc>,
}

impl Default for UserProfile {
    fn default() -> Self {
        let now = Utc::now();

        Self {
            id: Uuid::new_v4(),
            name: "Friend".to_string(),
            conditions: Vec::new(),
            usage: FeatureUsage::default(),
            onboarding_complete: false,
            created_at: now,
            updated_at: now,
        }
    }
}

impl UserProfile {
    /// Create a new user profile with the given name.
    pub fn new(name: String) -> Self {
        Self {
            name,
            ..Default::default()
        }
    }

    /// Replace the condition list. Duplicates are dropped, order is kept.
    pub fn set_conditions(&mut self, conditions: &[ConditionTag]) {
        let mut unique = Vec::with_capacity(conditions.len());
        for condition in conditions {
            if !unique.contains(condition) {
                unique.push(*condition);
            }
        }
        self.conditions = unique;
        self.updated_at = Utc::now();
    }

    pub fn has_condition(&self, condition: ConditionTag) -> bool {
        self.conditions.contains(&condition)
    }

    /// Validate a display name (1-60 characters after trimming).
    pub fn validate_name(name: &str) -> bool {
        let len = name.trim().chars().count();
        (1..=60).contains(&len)
    }
}

/// Application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Application version
    pub version: String,
    /// Data directory path
    #[serde(skip)]
    pub data_dir: PathBuf,
    /// Database settings
    pub database: DatabaseSettings,
    /// Logging settings
    pub logging: LoggingSettings,
    /// Check-in settings
    pub checkin: CheckinSettings,
    /// Free-tier allowances
    pub free_tier: FreeTier,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            version: env!("CARGO_PKG_VERSION").to_string(),
            data_dir: PathBuf::new(),
            database: DatabaseSettings::default(),
            logging: LoggingSettings::default(),
            checkin: CheckinSettings::default(),
            free_tier: FreeTier::default(),
        }
    }
}

impl AppConfig {
    /// Full path of the SQLite database file.
    pub fn database_path(&self) -> PathBuf {
        self.data_dir.join(&self.database.file_name)
    }
}

/// Database settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseSettings {
    /// File name inside the data directory
    pub file_name: String,
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        Self {
            file_name: "microreset.db".to_string(),
        }
    }
}

/// Logging settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// Filter directive used when RUST_LOG is not set
    pub filter: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            filter: "info".to_string(),
        }
    }
}

/// Check-in settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CheckinSettings {
    /// Actions suggested within this many hours are not suggested again
    pub recent_action_window_hours: u32,
}

impl Default for CheckinSettings {
    fn default() -> Self {
        Self {
            recent_action_window_hours: 24,
        }
    }
}

/// Get the application data directory.
pub fn get_data_dir() -> PathBuf {
    directories::ProjectDirs::from("com", "microreset", "MicroReset")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Get the configuration file path.
pub fn get_config_path() -> PathBuf {
    get_data_dir().join("config.toml")
}

/// Load application configuration from the default location.
pub fn load_config() -> Result<AppConfig, ConfigError> {
    let mut config = load_config_from(&get_config_path())?;
    config.data_dir = get_data_dir();
    Ok(config)
}

/// Load configuration from a specific file. A missing file yields defaults.
///
/// `data_dir` is set to the file's parent directory.
pub fn load_config_from(path: &Path) -> Result<AppConfig, ConfigError> {
    let data_dir = path
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."));

    if !path.exists() {
        tracing::debug!("No config at {}, using defaults", path.display());
        return Ok(AppConfig {
            data_dir,
            ..Default::default()
        });
    }

    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::IoError(e.to_string()))?;

    let mut config: AppConfig =
        toml::from_str(&content).map_err(|e| ConfigError::ParseError(e.to_string()))?;

    config.data_dir = data_dir;

    Ok(config)
}

/// Save application configuration to the default location.
pub fn save_config(config: &AppConfig) -> Result<(), ConfigError> {
    save_config_to(config, &get_config_path())
}

/// Save application configuration to a specific file.
pub fn save_config_to(config: &AppConfig, path: &Path) -> Result<(), ConfigError> {
    // Ensure parent directory exists
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| ConfigError::IoError(e.to_string()))?;
    }

    let content =
        toml::to_string_pretty(config).map_err(|e| ConfigError::SerializeError(e.to_string()))?;

    std::fs::write(path, content).map_err(|e| ConfigError::IoError(e.to_string()))?;

    Ok(())
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    IoError(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Serialize error: {0}")]
    SerializeError(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_config_uses_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        let config = load_config_from(&path).unwrap();

        assert_eq!(config.checkin.recent_action_window_hours, 24);
        assert_eq!(config.free_tier, FreeTier::default());
        assert_eq!(config.database_path(), dir.path().join("microreset.db"));
    }

    #[test]
    fn test_partial_config_fills_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[logging]\nfilter = \"debug\"\n").unwrap();

        let config = load_config_from(&path).unwrap();
        assert_eq!(config.logging.filter, "debug");
        assert_eq!(config.database.file_name, "microreset.db");
    }

    #[test]
    fn test_save_and_reload() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut config = AppConfig::default();
        config.checkin.recent_action_window_hours = 6;
        config.free_tier.post_event_checkins = 5;
        save_config_to(&config, &path).unwrap();

        let loaded = load_config_from(&path).unwrap();
        assert_eq!(loaded.checkin.recent_action_window_hours, 6);
        assert_eq!(loaded.free_tier.post_event_checkins, 5);
    }

    #[test]
    fn test_invalid_config_is_parse_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "checkin = 12").unwrap();

        assert!(matches!(
            load_config_from(&path),
            Err(ConfigError::ParseError(_))
        ));
    }

    #[test]
    fn test_set_conditions_dedupes() {
        let mut profile = UserProfile::new("Sam".to_string());
        profile.set_conditions(&[ConditionTag::Gout, ConditionTag::BackPain, ConditionTag::Gout]);
        assert_eq!(profile.conditions, vec![ConditionTag::Gout, ConditionTag::BackPain]);
        assert!(profile.has_condition(ConditionTag::BackPain));
        assert!(!profile.has_condition(ConditionTag::Cholesterol));
    }

    #[test]
    fn test_validate_name() {
        assert!(UserProfile::validate_name("Ana"));
        assert!(!UserProfile::validate_name("   "));
        assert!(!UserProfile::validate_name(&"x".repeat(61)));
    }
}
