//! Storage layer for the finance tracker
//!
//! CSV file storage with atomic writes, a read-through cache for the ledger
//! and automatic directory creation.

pub mod budgets;
pub mod cache;
pub mod file_io;
pub mod goals;
pub mod init;
pub mod ledger;

pub use budgets::{BudgetStore, BUDGET_COLUMNS};
pub use cache::TtlCache;
pub use file_io::{read_csv, read_csv_file, write_atomic, write_csv, write_csv_atomic, CsvTable};
pub use goals::{GoalStore, GOAL_COLUMNS};
pub use init::initialize_storage;
pub use ledger::{filter_range, LedgerStore, LEDGER_COLUMNS};

use tracing::warn;

use crate::audit::{AuditJournal, Change};
use crate::config::{Settings, TrackerPaths};
use crate::error::TrackerResult;

/// Main storage coordinator that provides access to all stores
pub struct Storage {
    paths: TrackerPaths,
    pub ledger: LedgerStore,
    pub goals: GoalStore,
    pub budgets: BudgetStore,
    audit: AuditJournal,
}

impl Storage {
    /// Create a new Storage instance
    pub fn new(paths: TrackerPaths, settings: &Settings) -> TrackerResult<Self> {
        paths.ensure_directories()?;

        Ok(Self {
            ledger: LedgerStore::new(paths.transactions_file(), settings.cache_ttl()),
            goals: GoalStore::new(paths.goals_file()),
            budgets: BudgetStore::new(paths.budgets_file()),
            audit: AuditJournal::new(paths.audit_log()),
            paths,
        })
    }

    pub fn paths(&self) -> &TrackerPaths {
        &self.paths
    }

    /// Drop cached state and re-read every file (after a restore, for example)
    pub fn reload_all(&self) -> TrackerResult<()> {
        self.ledger.reload()?;
        self.goals.load()?;
        self.budgets.reload();
        Ok(())
    }

    /// Check if storage has been initialized
    pub fn is_initialized(&self) -> bool {
        self.paths.is_initialized()
    }

    pub fn audit(&self) -> &AuditJournal {
        &self.audit
    }

    /// Append a change to the audit journal
    ///
    /// Called after the change is on disk. A failed journal write is logged
    /// and does not fail the caller.
    pub fn record(&self, change: Change) {
        if let Err(e) = self.audit.record(change) {
            warn!(path = %self.audit.path().display(), error = %e, "could not write audit record");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Money;
    use std::fs;
    use tempfile::TempDir;

    fn create_test_storage() -> (TempDir, Storage) {
        let temp_dir = TempDir::new().unwrap();
        let paths = TrackerPaths::with_base_dir(temp_dir.path().to_path_buf());
        let storage = Storage::new(paths, &Settings::default()).unwrap();
        (temp_dir, storage)
    }

    #[test]
    fn test_storage_creation() {
        let (temp_dir, storage) = create_test_storage();

        assert!(temp_dir.path().join("data").exists());
        assert!(temp_dir.path().join("backups").exists());
        assert!(!storage.is_initialized());
        assert!(storage.ledger.load().unwrap().is_empty());
    }

    #[test]
    fn test_record_appends_to_journal() {
        let (_temp_dir, storage) = create_test_storage();

        let change = Change::BudgetSet {
            category: "Food".into(),
            previous: Some(Money::from_units(3000)),
            amount: Money::from_units(3500),
        };
        storage.record(change.clone());

        let records = storage.audit().read_all().unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].change, change);
    }

    #[test]
    fn test_record_swallows_write_failure() {
        let (_temp_dir, storage) = create_test_storage();
        fs::create_dir_all(storage.audit().path()).unwrap();

        storage.record(Change::BudgetsImported { applied: 1 });

        assert!(storage.audit().path().is_dir());
    }
}
