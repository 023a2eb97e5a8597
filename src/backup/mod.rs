//! Backup system for the finance tracker
//!
//! Backups are plain copies of the CSV data files, named
//! `<stem>_backup_<YYYYmmdd_HHMMSS>.csv`. Files written by one
//! `create_backup` call share a timestamp and are restored together.
//!
//! - `BackupManager`: creates, lists and prunes backups
//! - `RestoreManager`: copies a backup set back over the data files

mod manager;
mod restore;

pub use manager::{BackupManager, BackupSet, BACKUP_TIMESTAMP_FORMAT};
pub use restore::{RestoreManager, RestoreResult};
