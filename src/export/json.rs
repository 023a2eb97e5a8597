//! JSON Export functionality
//!
//! Exports every store to a single JSON document with schema versioning.

use std::collections::BTreeMap;
use std::io::Write;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{TrackerError, TrackerResult};
use crate::models::{Goal, Money, Transaction};
use crate::storage::Storage;

/// Current export schema version
pub const EXPORT_SCHEMA_VERSION: &str = "1.0.0";

/// Full snapshot of the tracker's data
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FullExport {
    /// Schema version for compatibility checking
    pub schema_version: String,

    pub exported_at: DateTime<Utc>,

    /// Application version that created the export
    pub app_version: String,

    pub transactions: Vec<Transaction>,

    pub goals: Vec<Goal>,

    /// Monthly limit per category
    pub budgets: BTreeMap<String, Money>,

    pub metadata: ExportMetadata,
}

/// Export metadata for reference
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportMetadata {
    pub transaction_count: usize,
    pub goal_count: usize,
    pub budget_count: usize,
    /// Date range of transactions (earliest)
    pub earliest_transaction: Option<String>,
    /// Date range of transactions (latest)
    pub latest_transaction: Option<String>,
}

impl FullExport {
    /// Create a new full export from storage
    pub fn from_storage(storage: &Storage) -> TrackerResult<Self> {
        let transactions = storage.ledger.load()?;
        let goals = storage.goals.load()?;
        let budgets = storage.budgets.all();

        let metadata = ExportMetadata {
            transaction_count: transactions.len(),
            goal_count: goals.len(),
            budget_count: budgets.len(),
            earliest_transaction: transactions.iter().map(|t| t.date).min().map(|d| d.to_string()),
            latest_transaction: transactions.iter().map(|t| t.date).max().map(|d| d.to_string()),
        };

        Ok(Self {
            schema_version: EXPORT_SCHEMA_VERSION.to_string(),
            exported_at: Utc::now(),
            app_version: env!("CARGO_PKG_VERSION").to_string(),
            transactions,
            goals,
            budgets,
            metadata,
        })
    }

    /// Validate the export structure
    pub fn validate(&self) -> Result<(), String> {
        if self.schema_version != EXPORT_SCHEMA_VERSION {
            return Err(format!(
                "Schema version mismatch: expected {}, got {}",
                EXPORT_SCHEMA_VERSION, self.schema_version
            ));
        }

        if self.metadata.transaction_count != self.transactions.len() {
            return Err(format!(
                "Metadata lists {} transactions but export contains {}",
                self.metadata.transaction_count,
                self.transactions.len()
            ));
        }

        if let Some((category, _)) = self.budgets.iter().find(|(_, amount)| amount.is_negative()) {
            return Err(format!("Budget for {} is negative", category));
        }

        Ok(())
    }
}

/// Export the full snapshot to JSON
pub fn export_full_json<W: Write>(storage: &Storage, writer: W, pretty: bool) -> TrackerResult<()> {
    let export = FullExport::from_storage(storage)?;

    if pretty {
        serde_json::to_writer_pretty(writer, &export)
    } else {
        serde_json::to_writer(writer, &export)
    }
    .map_err(|e| TrackerError::Export(e.to_string()))?;

    Ok(())
}

/// Parse and validate a JSON export
pub fn import_from_json(json_str: &str) -> TrackerResult<FullExport> {
    let export: FullExport =
        serde_json::from_str(json_str).map_err(|e| TrackerError::Import(e.to_string()))?;

    export.validate().map_err(TrackerError::Import)?;

    Ok(export)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Settings, TrackerPaths};
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn create_test_storage() -> (TempDir, Storage) {
        let temp_dir = TempDir::new().unwrap();
        let paths = TrackerPaths::with_base_dir(temp_dir.path().to_path_buf());
        let storage = Storage::new(paths, &Settings::default()).unwrap();
        (temp_dir, storage)
    }

    #[test]
    fn test_full_export_round_trip() {
        let (_temp_dir, storage) = create_test_storage();

        let date = NaiveDate::from_ymd_opt(2025, 1, 15).unwrap();
        storage
            .ledger
            .append(Transaction::expense(date, Money::from_cents(5000), "Food"))
            .unwrap();
        storage
            .goals
            .add(Goal::new("Car", Money::from_units(900), Money::zero(), date))
            .unwrap();
        storage.budgets.set("Food", Money::from_units(3000)).unwrap();

        let mut json_data = Vec::new();
        export_full_json(&storage, &mut json_data, true).unwrap();

        let json_string = String::from_utf8(json_data).unwrap();
        assert!(json_string.contains("\"schema_version\": \"1.0.0\""));
        assert!(json_string.contains("\"type\": \"Expense\""));

        let imported = import_from_json(&json_string).unwrap();
        assert_eq!(imported.transactions.len(), 1);
        assert_eq!(imported.transactions[0].amount, Money::from_cents(5000));
        assert_eq!(imported.goals[0].name, "Car");
        assert_eq!(imported.budgets["Food"], Money::from_units(3000));
        assert_eq!(imported.metadata.earliest_transaction.as_deref(), Some("2025-01-15"));
    }

    #[test]
    fn test_schema_mismatch_rejected() {
        let (_temp_dir, storage) = create_test_storage();
        let mut export = FullExport::from_storage(&storage).unwrap();
        export.schema_version = "0.1.0".into();

        let json = serde_json::to_string(&export).unwrap();
        assert!(import_from_json(&json).is_err());
    }
}
