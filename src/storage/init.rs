//! Storage initialization
//!
//! Handles first-run setup: directories, settings and empty data files.

use tracing::info;

use crate::config::{Settings, TrackerPaths};
use crate::error::TrackerResult;

use super::budgets::BUDGET_COLUMNS;
use super::file_io::write_csv_atomic;
use super::goals::GOAL_COLUMNS;
use super::ledger::LEDGER_COLUMNS;

/// Initialize storage for a fresh installation
///
/// Creates the directory layout, writes default settings if none exist and
/// creates each data file with only its header row. Existing files are left alone.
/// Returns the number of files created.
pub fn initialize_storage(paths: &TrackerPaths) -> TrackerResult<usize> {
    paths.ensure_directories()?;

    let mut created = 0;

    if !paths.settings_file().exists() {
        Settings::default().save(paths)?;
        created += 1;
    }

    let files: [(_, &[&str]); 3] = [
        (paths.transactions_file(), &LEDGER_COLUMNS),
        (paths.goals_file(), &GOAL_COLUMNS),
        (paths.budgets_file(), &BUDGET_COLUMNS),
    ];

    for (path, header) in files {
        if !path.exists() {
            write_csv_atomic(&path, header, Vec::new())?;
            info!(path = %path.display(), "created data file");
            created += 1;
        }
    }

    Ok(created)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_initialize_creates_headers_once() {
        let temp_dir = TempDir::new().unwrap();
        let paths = TrackerPaths::with_base_dir(temp_dir.path().to_path_buf());

        assert_eq!(initialize_storage(&paths).unwrap(), 4);
        assert_eq!(
            fs::read_to_string(paths.transactions_file()).unwrap(),
            "Date,Type,Amount,Category,Description\n"
        );
        assert_eq!(
            fs::read_to_string(paths.goals_file()).unwrap(),
            "Goal,Target Amount,Amount Saved,Deadline\n"
        );
        assert!(paths.settings_file().exists());

        fs::write(paths.budgets_file(), "Category,Budget\nFood,10.00\n").unwrap();
        assert_eq!(initialize_storage(&paths).unwrap(), 0);
        assert!(fs::read_to_string(paths.budgets_file()).unwrap().contains("Food"));
    }
}
