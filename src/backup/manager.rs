//! Backup manager for the finance tracker
//!
//! Copies each data file into the backup directory as
//! `<stem>_backup_<YYYYmmdd_HHMMSS>.csv`. Files copied together share a
//! timestamp and form one backup set.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::{Days, Duration, Local, NaiveDateTime};
use serde::Serialize;
use tracing::{debug, info};

use crate::config::TrackerPaths;
use crate::error::{TrackerError, TrackerResult};

/// Timestamp format embedded in backup filenames
pub const BACKUP_TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

const BACKUP_MARKER: &str = "_backup_";

/// Backup files that share one timestamp
#[derive(Debug, Clone, Serialize)]
pub struct BackupSet {
    /// Timestamp as it appears in the filenames
    pub timestamp: String,
    pub created_at: NaiveDateTime,
    pub files: Vec<PathBuf>,
    /// Combined size in bytes
    pub size_bytes: u64,
}

/// Manages backup creation and retention
pub struct BackupManager {
    backup_dir: PathBuf,
    paths: TrackerPaths,
}

impl BackupManager {
    pub fn new(paths: TrackerPaths) -> Self {
        Self {
            backup_dir: paths.backup_dir(),
            paths,
        }
    }

    /// Copy every existing data file into the backup directory
    ///
    /// Returns the timestamp that identifies the new set.
    pub fn create_backup(&self) -> TrackerResult<String> {
        fs::create_dir_all(&self.backup_dir).map_err(|e| {
            TrackerError::Backup(format!("Failed to create backup directory: {}", e))
        })?;

        let timestamp = self.free_timestamp(Local::now().naive_local())?;
        let mut copied = 0;

        for source in self.paths.data_files() {
            if !source.exists() {
                continue;
            }
            let target = self.backup_path(&source, &timestamp)?;
            fs::copy(&source, &target).map_err(|e| {
                TrackerError::Backup(format!("Failed to copy {}: {}", source.display(), e))
            })?;
            debug!(from = %source.display(), to = %target.display(), "backed up file");
            copied += 1;
        }

        info!(timestamp = %timestamp, files = copied, "created backup");
        Ok(timestamp)
    }

    /// First timestamp at or after `at` that no existing set uses
    fn free_timestamp(&self, mut at: NaiveDateTime) -> TrackerResult<String> {
        loop {
            let timestamp = at.format(BACKUP_TIMESTAMP_FORMAT).to_string();
            let mut taken = false;
            for data_file in self.paths.data_files() {
                if self.backup_path(&data_file, &timestamp)?.exists() {
                    taken = true;
                    break;
                }
            }
            if !taken {
                return Ok(timestamp);
            }
            at += Duration::seconds(1);
        }
    }

    /// Backup file name for a data file at `timestamp`
    pub fn backup_path(&self, data_file: &Path, timestamp: &str) -> TrackerResult<PathBuf> {
        let stem = data_file
            .file_stem()
            .and_then(|s| s.to_str())
            .ok_or_else(|| {
                TrackerError::Backup(format!("Invalid data file name: {}", data_file.display()))
            })?;
        Ok(self
            .backup_dir
            .join(format!("{}{}{}.csv", stem, BACKUP_MARKER, timestamp)))
    }

    /// All backup sets, newest first
    pub fn list_backups(&self) -> TrackerResult<Vec<BackupSet>> {
        let mut sets: BTreeMap<String, BackupSet> = BTreeMap::new();

        for (path, timestamp, created_at) in self.backup_files()? {
            let size = fs::metadata(&path).map(|m| m.len()).unwrap_or(0);
            let set = sets.entry(timestamp.clone()).or_insert_with(|| BackupSet {
                timestamp,
                created_at,
                files: Vec::new(),
                size_bytes: 0,
            });
            set.files.push(path);
            set.size_bytes += size;
        }

        let mut sets: Vec<BackupSet> = sets.into_values().collect();
        for set in &mut sets {
            set.files.sort();
        }
        sets.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(sets)
    }

    /// Find a backup set by timestamp
    pub fn get_backup(&self, timestamp: &str) -> TrackerResult<Option<BackupSet>> {
        Ok(self
            .list_backups()?
            .into_iter()
            .find(|set| set.timestamp == timestamp))
    }

    /// Get the most recent backup
    pub fn get_latest_backup(&self) -> TrackerResult<Option<BackupSet>> {
        Ok(self.list_backups()?.into_iter().next())
    }

    /// Delete backup files older than `keep_days`, returning the deleted paths
    pub fn cleanup_old_backups(&self, keep_days: u32) -> TrackerResult<Vec<PathBuf>> {
        // A retention period reaching past the earliest date keeps every file
        match Local::now()
            .naive_local()
            .checked_sub_days(Days::new(u64::from(keep_days)))
        {
            Some(cutoff) => self.cleanup_before(cutoff),
            None => Ok(Vec::new()),
        }
    }

    /// Delete backup files whose timestamp is before `cutoff`
    pub fn cleanup_before(&self, cutoff: NaiveDateTime) -> TrackerResult<Vec<PathBuf>> {
        let mut deleted = Vec::new();

        for (path, _, created_at) in self.backup_files()? {
            if created_at < cutoff {
                fs::remove_file(&path).map_err(|e| {
                    TrackerError::Backup(format!("Failed to delete old backup: {}", e))
                })?;
                deleted.push(path);
            }
        }

        if !deleted.is_empty() {
            info!(deleted = deleted.len(), "removed old backups");
        }
        Ok(deleted)
    }

    /// Get backup directory path
    pub fn backup_dir(&self) -> &PathBuf {
        &self.backup_dir
    }

    /// Backup files with their parsed timestamps; other files are ignored
    fn backup_files(&self) -> TrackerResult<Vec<(PathBuf, String, NaiveDateTime)>> {
        if !self.backup_dir.exists() {
            return Ok(Vec::new());
        }

        let mut files = Vec::new();
        for entry in fs::read_dir(&self.backup_dir).map_err(|e| {
            TrackerError::Backup(format!("Failed to read backup directory: {}", e))
        })? {
            let path = entry
                .map_err(|e| TrackerError::Backup(format!("Failed to read directory entry: {}", e)))?
                .path();

            if !path.is_file() {
                continue;
            }
            if let Some((timestamp, created_at)) = parse_backup_name(&path) {
                files.push((path, timestamp, created_at));
            }
        }

        Ok(files)
    }
}

/// Extract the timestamp from `<stem>_backup_<timestamp>.csv`
fn parse_backup_name(path: &Path) -> Option<(String, NaiveDateTime)> {
    let name = path.file_name()?.to_str()?.strip_suffix(".csv")?;
    let (_, timestamp) = name.rsplit_once(BACKUP_MARKER)?;
    let created_at = NaiveDateTime::parse_from_str(timestamp, BACKUP_TIMESTAMP_FORMAT).ok()?;
    Some((timestamp.to_string(), created_at))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn create_test_manager() -> (BackupManager, TrackerPaths, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let paths = TrackerPaths::with_base_dir(temp_dir.path().to_path_buf());
        paths.ensure_directories().unwrap();

        let manager = BackupManager::new(paths.clone());
        (manager, paths, temp_dir)
    }

    #[test]
    fn test_create_backup_copies_existing_files() {
        let (manager, paths, _temp) = create_test_manager();
        fs::write(paths.transactions_file(), "Date,Type,Amount,Category,Description\n").unwrap();
        fs::write(paths.goals_file(), "Goal,Target Amount,Amount Saved,Deadline\n").unwrap();

        let timestamp = manager.create_backup().unwrap();

        let set = manager.get_backup(&timestamp).unwrap().unwrap();
        assert_eq!(set.files.len(), 2);
        assert!(manager
            .backup_dir()
            .join(format!("transactions_backup_{}.csv", timestamp))
            .exists());
        assert!(manager
            .backup_dir()
            .join(format!("financial_goals_backup_{}.csv", timestamp))
            .exists());
    }

    #[test]
    fn test_back_to_back_backups_get_distinct_timestamps() {
        let (manager, paths, _temp) = create_test_manager();
        fs::write(paths.budgets_file(), "Category,Budget\n").unwrap();

        let first = manager.create_backup().unwrap();
        let second = manager.create_backup().unwrap();

        assert_ne!(first, second);
        assert_eq!(manager.list_backups().unwrap().len(), 2);
    }

    #[test]
    fn test_empty_backup_dir() {
        let (manager, _paths, _temp) = create_test_manager();
        assert!(manager.list_backups().unwrap().is_empty());
        assert!(manager.get_latest_backup().unwrap().is_none());
    }

    #[test]
    fn test_list_groups_sets_newest_first() {
        let (manager, _paths, _temp) = create_test_manager();
        let dir = manager.backup_dir().clone();
        fs::write(dir.join("transactions_backup_20240101_120000.csv"), "a").unwrap();
        fs::write(dir.join("budgets_backup_20240101_120000.csv"), "bb").unwrap();
        fs::write(dir.join("transactions_backup_20240301_080000.csv"), "c").unwrap();
        fs::write(dir.join("notes.txt"), "ignored").unwrap();

        let sets = manager.list_backups().unwrap();
        assert_eq!(sets.len(), 2);
        assert_eq!(sets[0].timestamp, "20240301_080000");
        assert_eq!(sets[1].files.len(), 2);
        assert_eq!(sets[1].size_bytes, 3);
    }

    #[test]
    fn test_cleanup_old_backups() {
        let (manager, paths, _temp) = create_test_manager();
        fs::write(paths.transactions_file(), "Date,Type,Amount,Category,Description\n").unwrap();

        let old = manager.backup_dir().join("transactions_backup_20000101_000000.csv");
        fs::write(&old, "old").unwrap();
        let fresh = manager.create_backup().unwrap();

        let deleted = manager.cleanup_old_backups(30).unwrap();
        assert_eq!(deleted, vec![old.clone()]);
        assert!(!old.exists());
        assert!(manager.get_backup(&fresh).unwrap().is_some());
    }

    #[test]
    fn test_cleanup_with_unbounded_retention_keeps_everything() {
        let (manager, _paths, _temp) = create_test_manager();
        let old = manager.backup_dir().join("transactions_backup_19700101_000000.csv");
        fs::write(&old, "old").unwrap();

        assert!(manager.cleanup_old_backups(u32::MAX).unwrap().is_empty());
        assert!(old.exists());

        assert_eq!(manager.cleanup_old_backups(0).unwrap(), vec![old]);
    }

    #[test]
    fn test_parse_backup_name() {
        let (timestamp, created_at) =
            parse_backup_name(Path::new("financial_goals_backup_20251127_143022.csv")).unwrap();
        assert_eq!(timestamp, "20251127_143022");
        assert_eq!(created_at.format("%Y-%m-%d %H:%M:%S").to_string(), "2025-11-27 14:30:22");

        assert!(parse_backup_name(Path::new("transactions.csv")).is_none());
        assert!(parse_backup_name(Path::new("x_backup_notadate.csv")).is_none());
    }
}
