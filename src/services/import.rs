//! CSV Import service
//!
//! Imports a user-supplied transaction CSV into the ledger. The batch goes
//! through a schema check, per-row cleaning and a merge that removes exact
//! duplicates. A batch either merges completely or is rejected without
//! touching the ledger.

use std::collections::HashSet;
use std::fmt;
use std::io::Read;

use serde::Serialize;
use tracing::{info, warn};

use crate::audit::Change;
use crate::error::{TrackerError, TrackerResult};
use crate::models::{parse_date, sanitize_input, Money, Transaction, TransactionType, MAX_AMOUNT};
use crate::storage::{read_csv, CsvTable, Storage};

/// Columns an import file must contain; Description is optional
pub const REQUIRED_COLUMNS: [&str; 4] = ["Date", "Type", "Category", "Amount"];

/// Per-reason counts of rows dropped while cleaning a batch
///
/// Each row is counted once, under the first check it fails, in field order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CleanStats {
    pub total_rows: usize,
    pub invalid_dates: usize,
    /// Unparseable, negative, or above the maximum amount
    pub invalid_amounts: usize,
    pub zero_amounts: usize,
    pub invalid_types: usize,
    pub empty_categories: usize,
    pub kept: usize,
}

impl CleanStats {
    pub fn skipped(&self) -> usize {
        self.total_rows - self.kept
    }
}

/// A cleaned batch ready to merge
#[derive(Debug, Clone)]
pub struct CleanedBatch {
    pub rows: Vec<Transaction>,
    pub stats: CleanStats,
}

/// Why a batch was rejected
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rejection {
    /// Required columns absent from the header
    MissingColumns(Vec<String>),
    /// Cleaning dropped every row
    NoValidRecords(CleanStats),
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingColumns(columns) => {
                write!(f, "Missing required columns: {}", columns.join(", "))
            }
            Self::NoValidRecords(_) => write!(f, "No valid records found in file"),
        }
    }
}

/// Result of a completed merge
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImportReport {
    pub stats: CleanStats,
    pub duplicates_removed: usize,
    /// Ledger rows before the merge
    pub before: usize,
    /// Ledger rows after the merge, as re-read from disk
    pub after: usize,
}

impl ImportReport {
    /// Net number of rows the merge added
    pub fn added(&self) -> usize {
        self.after.saturating_sub(self.before)
    }

    /// Report lines in presentation order
    pub fn lines(&self) -> Vec<String> {
        vec![
            format!("Skipped {} rows with invalid dates", self.stats.invalid_dates),
            format!("Skipped {} rows with invalid amounts", self.stats.invalid_amounts),
            format!("Skipped {} rows with zero amount", self.stats.zero_amounts),
            format!("Skipped {} rows with invalid type", self.stats.invalid_types),
            format!("Skipped {} rows with empty category", self.stats.empty_categories),
            format!("Removed {} duplicate rows", self.duplicates_removed),
            format!("Records before: {}, after: {}", self.before, self.after),
        ]
    }
}

/// Terminal state of an import
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImportOutcome {
    Merged(ImportReport),
    Rejected(Rejection),
}

/// Service for importing transaction files
pub struct ImportService<'a> {
    storage: &'a Storage,
}

impl<'a> ImportService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Run a full import from a CSV reader
    pub fn import_reader<R: Read>(&self, reader: R) -> TrackerResult<ImportOutcome> {
        let batch = match clean(reader)? {
            Ok(batch) => batch,
            Err(rejection) => {
                warn!(reason = %rejection, "import rejected");
                return Ok(ImportOutcome::Rejected(rejection));
            }
        };

        let report = self.merge(batch)?;
        Ok(ImportOutcome::Merged(report))
    }

    /// Merge a cleaned batch into the ledger
    pub fn merge(&self, batch: CleanedBatch) -> TrackerResult<ImportReport> {
        let existing = self.storage.ledger.load()?;
        let before = existing.len();

        let combined_len = before + batch.rows.len();
        let merged = dedup_keep_first(existing.into_iter().chain(batch.rows));
        let duplicates_removed = combined_len - merged.len();
        let expected = merged.len();

        self.storage.ledger.save(&merged)?;

        let after = self.storage.ledger.reload()?.len();
        if after != expected {
            return Err(TrackerError::Storage(format!(
                "Ledger has {} rows after import, expected {}",
                after, expected
            )));
        }

        let report = ImportReport {
            stats: batch.stats,
            duplicates_removed,
            before,
            after,
        };

        self.storage.record(Change::TransactionsImported {
            kept: batch.stats.kept,
            duplicates_removed,
            before,
            after,
        });

        info!(
            kept = batch.stats.kept,
            skipped = batch.stats.skipped(),
            duplicates_removed,
            before,
            after,
            "merged import batch"
        );

        Ok(report)
    }
}

/// Schema-check and clean a CSV batch without merging it
///
/// Read failures are errors; a rejected batch is `Ok(Err(rejection))`.
pub fn clean<R: Read>(reader: R) -> TrackerResult<Result<CleanedBatch, Rejection>> {
    let table = read_csv(reader).map_err(|e| TrackerError::Import(e.to_string()))?;
    Ok(clean_table(&table))
}

/// Schema-check and clean an already parsed table
pub fn clean_table(table: &CsvTable) -> Result<CleanedBatch, Rejection> {
    let missing = table.missing_columns(&REQUIRED_COLUMNS);
    if !missing.is_empty() {
        return Err(Rejection::MissingColumns(missing));
    }

    let date_col = table.column("Date");
    let type_col = table.column("Type");
    let amount_col = table.column("Amount");
    let category_col = table.column("Category");
    let description_col = table.column("Description");

    let mut stats = CleanStats {
        total_rows: table.records.len(),
        ..CleanStats::default()
    };
    let mut rows = Vec::with_capacity(table.records.len());

    for record in &table.records {
        let Some(date) = parse_date(CsvTable::field(record, date_col)) else {
            stats.invalid_dates += 1;
            continue;
        };

        let amount = match Money::parse(CsvTable::field(record, amount_col)) {
            Ok(amount) if amount.is_negative() || amount > MAX_AMOUNT => {
                stats.invalid_amounts += 1;
                continue;
            }
            Ok(amount) if amount.is_zero() => {
                stats.zero_amounts += 1;
                continue;
            }
            Ok(amount) => amount,
            Err(_) => {
                stats.invalid_amounts += 1;
                continue;
            }
        };

        let Ok(kind) = CsvTable::field(record, type_col).parse::<TransactionType>() else {
            stats.invalid_types += 1;
            continue;
        };

        let category = sanitize_input(CsvTable::field(record, category_col))
            .trim()
            .to_string();
        if category.is_empty() {
            stats.empty_categories += 1;
            continue;
        }

        let description = sanitize_input(CsvTable::field(record, description_col));
        rows.push(Transaction::new(date, kind, amount, category, description));
    }

    stats.kept = rows.len();
    if rows.is_empty() {
        return Err(Rejection::NoValidRecords(stats));
    }

    Ok(CleanedBatch { rows, stats })
}

/// Remove exact duplicate rows, keeping the first occurrence of each
pub fn dedup_keep_first(rows: impl IntoIterator<Item = Transaction>) -> Vec<Transaction> {
    let mut seen = HashSet::new();
    rows.into_iter()
        .filter(|t| seen.insert(t.clone()))
        .collect()
}

/// Example import file with the required header
pub fn sample_csv() -> &'static str {
    "Date,Type,Amount,Category,Description\n\
     2025-01-01,Income,50000,Salary,Monthly salary\n\
     2025-01-03,Expense,1200,Food,Groceries\n\
     2025-01-05,Expense,450,Transport,Metro card\n\
     2025-01-10,Expense,3200,Bills,Electricity\n"
}
