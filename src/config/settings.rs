//! User settings for the finance tracker
//!
//! Manages user preferences including the currency symbol, cache lifetime,
//! backup retention and the windows used by the dashboard metrics.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::paths::TrackerPaths;
use crate::error::TrackerError;

/// User settings for the finance tracker
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Schema version for migration support
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,

    /// Currency symbol shown in front of amounts
    #[serde(default = "default_currency")]
    pub currency_symbol: String,

    /// Date format preference (strftime format)
    #[serde(default = "default_date_format")]
    pub date_format: String,

    /// How long a cached ledger read stays valid, in seconds
    #[serde(default = "default_cache_ttl_secs")]
    pub cache_ttl_secs: u64,

    /// Backups older than this many days are removed by `backup prune`
    #[serde(default = "default_backup_retention_days")]
    pub backup_retention_days: u32,

    /// Categories offered when adding a transaction
    #[serde(default = "default_categories")]
    pub default_categories: Vec<String>,

    /// Trailing window, in months, for the top spending category metric
    #[serde(default = "default_top_category_months")]
    pub top_category_months: u32,

    /// Trailing window, in days, for the average daily spending metric
    #[serde(default = "default_average_window_days")]
    pub average_window_days: u32,
}

fn default_schema_version() -> u32 {
    1
}

fn default_currency() -> String {
    "₹".to_string()
}

fn default_date_format() -> String {
    "%Y-%m-%d".to_string()
}

fn default_cache_ttl_secs() -> u64 {
    3600
}

fn default_backup_retention_days() -> u32 {
    30
}

fn default_categories() -> Vec<String> {
    ["Salary", "Food", "Transport", "Shopping", "Bills", "Others"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

fn default_top_category_months() -> u32 {
    1
}

fn default_average_window_days() -> u32 {
    30
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            currency_symbol: default_currency(),
            date_format: default_date_format(),
            cache_ttl_secs: default_cache_ttl_secs(),
            backup_retention_days: default_backup_retention_days(),
            default_categories: default_categories(),
            top_category_months: default_top_category_months(),
            average_window_days: default_average_window_days(),
        }
    }
}

impl Settings {
    /// Cache lifetime as a Duration
    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }

    /// Load settings from disk, or create default settings if file doesn't exist
    pub fn load_or_create(paths: &TrackerPaths) -> Result<Self, TrackerError> {
        let settings_path = paths.settings_file();

        if settings_path.exists() {
            let contents = std::fs::read_to_string(&settings_path).map_err(|e| {
                TrackerError::Io(format!("Failed to read settings file: {}", e))
            })?;

            let settings: Settings = serde_json::from_str(&contents).map_err(|e| {
                TrackerError::Config(format!("Failed to parse settings file: {}", e))
            })?;

            Ok(settings)
        } else {
            // Don't save yet - let caller decide when to persist
            Ok(Settings::default())
        }
    }

    /// Save settings to disk
    pub fn save(&self, paths: &TrackerPaths) -> Result<(), TrackerError> {
        paths.ensure_directories()?;

        let contents = serde_json::to_string_pretty(self).map_err(|e| {
            TrackerError::Config(format!("Failed to serialize settings: {}", e))
        })?;

        std::fs::write(paths.settings_file(), contents).map_err(|e| {
            TrackerError::Io(format!("Failed to write settings file: {}", e))
        })?;

        Ok(())
    }
}
