//! Restore functionality for the finance tracker
//!
//! Copies a backup set back over the data files. Callers holding a
//! `Storage` must call `reload_all` afterwards so cached state is dropped.

use std::fs;
use std::path::PathBuf;

use chrono::NaiveDateTime;
use tracing::{info, warn};

use super::manager::{BackupManager, BACKUP_TIMESTAMP_FORMAT};
use crate::config::TrackerPaths;
use crate::error::{TrackerError, TrackerResult};
use crate::storage::write_atomic;

/// Handles restoring data from backups
pub struct RestoreManager {
    paths: TrackerPaths,
}

/// Result of a restore operation
#[derive(Debug, Default)]
pub struct RestoreResult {
    pub timestamp: String,
    /// Data files overwritten from the backup set
    pub restored: Vec<PathBuf>,
    /// Data files with no copy in the set; left as they were
    pub missing: Vec<PathBuf>,
}

impl RestoreResult {
    pub fn summary(&self) -> String {
        let mut summary = format!(
            "Restored {} file(s) from backup {}",
            self.restored.len(),
            self.timestamp
        );
        if !self.missing.is_empty() {
            summary.push_str(&format!(
                " ({} not present in the backup and left unchanged)",
                self.missing.len()
            ));
        }
        summary
    }
}

impl RestoreManager {
    pub fn new(paths: TrackerPaths) -> Self {
        Self { paths }
    }

    /// Restore every data file saved under `timestamp`
    pub fn restore(&self, timestamp: &str) -> TrackerResult<RestoreResult> {
        NaiveDateTime::parse_from_str(timestamp, BACKUP_TIMESTAMP_FORMAT).map_err(|_| {
            TrackerError::Backup(format!(
                "Invalid backup timestamp '{}' (expected YYYYmmdd_HHMMSS)",
                timestamp
            ))
        })?;

        let manager = BackupManager::new(self.paths.clone());
        if manager.get_backup(timestamp)?.is_none() {
            return Err(TrackerError::Backup(format!(
                "No backup found with timestamp {}",
                timestamp
            )));
        }

        let mut result = RestoreResult {
            timestamp: timestamp.to_string(),
            ..Default::default()
        };

        for data_file in self.paths.data_files() {
            let source = manager.backup_path(&data_file, timestamp)?;
            if !source.exists() {
                warn!(file = %data_file.display(), "no copy in backup set");
                result.missing.push(data_file);
                continue;
            }

            let bytes = fs::read(&source).map_err(|e| {
                TrackerError::Backup(format!("Failed to read {}: {}", source.display(), e))
            })?;
            write_atomic(&data_file, &bytes)?;
            result.restored.push(data_file);
        }

        info!(timestamp = %timestamp, files = result.restored.len(), "restored backup");
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn setup() -> (TempDir, TrackerPaths) {
        let temp_dir = TempDir::new().unwrap();
        let paths = TrackerPaths::with_base_dir(temp_dir.path().to_path_buf());
        paths.ensure_directories().unwrap();
        (temp_dir, paths)
    }

    #[test]
    fn test_restore_overwrites_data_files() {
        let (_temp, paths) = setup();
        let original = "Date,Type,Amount,Category,Description\n2025-01-01,Income,100.00,Salary,\n";
        fs::write(paths.transactions_file(), original).unwrap();

        let timestamp = BackupManager::new(paths.clone()).create_backup().unwrap();
        fs::write(paths.transactions_file(), "Date,Type,Amount,Category,Description\n").unwrap();

        let result = RestoreManager::new(paths.clone()).restore(&timestamp).unwrap();

        assert_eq!(result.restored, vec![paths.transactions_file()]);
        assert_eq!(result.missing.len(), 2);
        assert_eq!(fs::read_to_string(paths.transactions_file()).unwrap(), original);
        assert!(result.summary().starts_with("Restored 1 file(s)"));
    }

    #[test]
    fn test_restore_unknown_timestamp() {
        let (_temp, paths) = setup();
        let restore = RestoreManager::new(paths);

        let err = restore.restore("20200101_000000").unwrap_err();
        assert!(err.to_string().contains("No backup found"));

        let err = restore.restore("yesterday").unwrap_err();
        assert!(err.to_string().contains("Invalid backup timestamp"));
    }
}
