//! User settings for Tally
//!
//! Manages preferences such as the currency symbol, backup retention and
//! which optional features are switched on.

use serde::{Deserialize, Serialize};

use super::paths::TallyPaths;
use crate::error::TallyError;

/// Backup retention settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackupRetention {
    /// Number of backup archives to keep (newest first)
    pub max_backups: u32,
}

impl Default for BackupRetention {
    fn default() -> Self {
        Self { max_backups: 5 }
    }
}

/// Feature toggles for the advanced menu
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Features {
    #[serde(default = "enabled")]
    pub enable_recurring: bool,
    #[serde(default = "enabled")]
    pub enable_budgets: bool,
    #[serde(default = "enabled")]
    pub enable_goals: bool,
}

impl Default for Features {
    fn default() -> Self {
        Self {
            enable_recurring: true,
            enable_budgets: true,
            enable_goals: true,
        }
    }
}

/// User settings for Tally
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Schema version of the settings file
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,

    /// Symbol used when printing money amounts
    #[serde(default = "default_currency_symbol")]
    pub currency_symbol: String,

    /// Currency code recorded on newly registered users
    #[serde(default = "default_currency")]
    pub default_currency: String,

    /// Backup retention policy
    #[serde(default)]
    pub backup_retention: BackupRetention,

    /// Take a backup before destructive commands (delete, restore)
    #[serde(default = "enabled")]
    pub auto_backup: bool,

    #[serde(default)]
    pub features: Features,
}

fn default_schema_version() -> u32 {
    1
}

fn default_currency_symbol() -> String {
    "$".to_string()
}

fn default_currency() -> String {
    "EGP".to_string()
}

fn enabled() -> bool {
    true
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            currency_symbol: default_currency_symbol(),
            default_currency: default_currency(),
            backup_retention: BackupRetention::default(),
            auto_backup: true,
            features: Features::default(),
        }
    }
}

impl Settings {
    /// Load settings from disk, or create default settings if file doesn't exist
    pub fn load_or_create(paths: &TallyPaths) -> Result<Self, TallyError> {
        let settings_path = paths.settings_file();

        if settings_path.exists() {
            let contents = std::fs::read_to_string(&settings_path)
                .map_err(|e| TallyError::Io(format!("Failed to read settings file: {}", e)))?;

            let settings: Settings = serde_json::from_str(&contents).map_err(|e| {
                TallyError::Config(format!("Failed to parse settings file: {}", e))
            })?;

            Ok(settings)
        } else {
            // Don't save yet - let caller decide when to persist
            Ok(Settings::default())
        }
    }

    /// Save settings to disk
    pub fn save(&self, paths: &TallyPaths) -> Result<(), TallyError> {
        paths.ensure_directories()?;

        let contents = serde_json::to_string_pretty(self)
            .map_err(|e| TallyError::Config(format!("Failed to serialize settings: {}", e)))?;

        std::fs::write(paths.settings_file(), contents)
            .map_err(|e| TallyError::Io(format!("Failed to write settings file: {}", e)))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.currency_symbol, "$");
        assert_eq!(settings.default_currency, "EGP");
        assert_eq!(settings.backup_retention.max_backups, 5);
        assert!(settings.auto_backup);
        assert!(settings.features.enable_recurring);
    }

    #[test]
    fn test_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let paths = TallyPaths::with_base_dir(temp_dir.path().to_path_buf());

        let mut settings = Settings::default();
        settings.currency_symbol = "E£".to_string();
        settings.features.enable_goals = false;

        settings.save(&paths).unwrap();

        let loaded = Settings::load_or_create(&paths).unwrap();
        assert_eq!(loaded.currency_symbol, "E£");
        assert!(!loaded.features.enable_goals);
        assert!(paths.is_initialized());
    }

    #[test]
    fn test_missing_fields_take_defaults() {
        let settings: Settings = serde_json::from_str(r#"{"currency_symbol": "€"}"#).unwrap();
        assert_eq!(settings.currency_symbol, "€");
        assert_eq!(settings.backup_retention.max_backups, 5);
        assert!(settings.features.enable_budgets);
    }
}
