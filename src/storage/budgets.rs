//! Budget store for monthly category limits
//!
//! Holds the category → limit mapping in memory and persists it to a
//! `Category,Budget` CSV file after every change.

use std::collections::BTreeMap;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use tracing::{debug, info, warn};

use crate::error::{TrackerError, TrackerResult};
use crate::export::export_budgets_csv;
use crate::models::{sanitize_input, BudgetTemplate, Money};

use super::file_io::{read_csv, read_csv_file, write_csv_atomic, CsvTable};

/// Column order of the budgets file
pub const BUDGET_COLUMNS: [&str; 2] = ["Category", "Budget"];

/// Store for per-category monthly budgets
pub struct BudgetStore {
    path: PathBuf,
    budgets: RwLock<BTreeMap<String, Money>>,
}

impl BudgetStore {
    /// Create a store and read the current mapping from disk
    pub fn new(path: PathBuf) -> Self {
        let store = Self {
            path,
            budgets: RwLock::new(BTreeMap::new()),
        };
        store.reload();
        store
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the mapping from disk; any read error yields an empty mapping
    pub fn load(&self) -> BTreeMap<String, Money> {
        match read_budget_file(&self.path) {
            Ok(budgets) => budgets,
            Err(e) => {
                warn!(error = %e, path = %self.path.display(), "could not read budgets, starting empty");
                BTreeMap::new()
            }
        }
    }

    /// Replace the in-memory mapping with the file contents
    pub fn reload(&self) {
        let loaded = self.load();
        debug!(budgets = loaded.len(), "loaded budgets");
        *self.write_lock() = loaded;
    }

    /// Persist the in-memory mapping
    pub fn flush(&self) -> TrackerResult<()> {
        let budgets = self
            .budgets
            .read()
            .map_err(|e| TrackerError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        write_csv_atomic(&self.path, &BUDGET_COLUMNS, budget_records(&budgets))
    }

    /// Limit for a category, or zero when none is set
    pub fn get(&self, category: &str) -> Money {
        self.budgets
            .read()
            .ok()
            .and_then(|b| b.get(category).copied())
            .unwrap_or_default()
    }

    /// Every budget, sorted by category
    pub fn all(&self) -> BTreeMap<String, Money> {
        self.budgets.read().map(|b| b.clone()).unwrap_or_default()
    }

    /// Insert or replace a limit and persist, returning the previous value
    pub fn set(&self, category: &str, amount: Money) -> TrackerResult<Option<Money>> {
        let category = sanitize_input(category).trim().to_string();
        if category.is_empty() {
            return Err(TrackerError::validation("Category is required"));
        }
        if amount.is_negative() {
            return Err(TrackerError::validation("Budget amount cannot be negative"));
        }

        let previous = self.write_lock().insert(category.clone(), amount);
        self.flush()?;

        info!(category = %category, amount = %amount, "set budget");
        Ok(previous)
    }

    /// Apply each template entry as an individual `set`
    pub fn apply_template(&self, template: &BudgetTemplate) -> TrackerResult<usize> {
        let entries = template.entries();
        for (category, amount) in &entries {
            self.set(category, *amount)?;
        }
        info!(template = %template, entries = entries.len(), "applied budget template");
        Ok(entries.len())
    }

    /// Delete a category's limit and persist
    pub fn remove(&self, category: &str) -> TrackerResult<Money> {
        let removed = self
            .write_lock()
            .remove(category)
            .ok_or_else(|| TrackerError::budget_not_found(category))?;
        self.flush()?;

        info!(category = %category, "removed budget");
        Ok(removed)
    }

    /// Upsert every row of a `Category,Budget` CSV, returning how many were applied
    ///
    /// Rows with an empty category or an unusable amount are skipped.
    pub fn import_csv<R: Read>(&self, reader: R) -> TrackerResult<usize> {
        let table = read_csv(reader)?;
        let missing = table.missing_columns(&BUDGET_COLUMNS);
        if !missing.is_empty() {
            return Err(TrackerError::Import(format!(
                "Budget file is missing columns: {}",
                missing.join(", ")
            )));
        }

        let parsed = parse_budget_rows(&table);
        let applied = parsed.len();
        {
            let mut budgets = self.write_lock();
            budgets.extend(parsed);
        }
        self.flush()?;

        info!(applied, skipped = table.records.len() - applied, "imported budgets");
        Ok(applied)
    }

    /// Write the mapping as a `Category,Budget` CSV
    pub fn export_csv<W: Write>(&self, writer: W) -> TrackerResult<()> {
        export_budgets_csv(writer, &self.all())
    }

    fn write_lock(&self) -> std::sync::RwLockWriteGuard<'_, BTreeMap<String, Money>> {
        // The map holds plain values; a panicked writer cannot leave it half-updated
        match self.budgets.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

fn read_budget_file(path: &Path) -> TrackerResult<BTreeMap<String, Money>> {
    let table = match read_csv_file(path)? {
        Some(table) => table,
        None => return Ok(BTreeMap::new()),
    };

    let missing = table.missing_columns(&BUDGET_COLUMNS);
    if !missing.is_empty() {
        return Err(TrackerError::Storage(format!(
            "missing columns: {}",
            missing.join(", ")
        )));
    }

    Ok(parse_budget_rows(&table).into_iter().collect())
}

fn parse_budget_rows(table: &CsvTable) -> Vec<(String, Money)> {
    let category_col = table.column("Category");
    let budget_col = table.column("Budget");

    table
        .records
        .iter()
        .filter_map(|record| {
            let category = sanitize_input(CsvTable::field(record, category_col))
                .trim()
                .to_string();
            let amount = Money::parse(CsvTable::field(record, budget_col)).ok()?;
            if category.is_empty() || amount.is_negative() {
                return None;
            }
            Some((category, amount))
        })
        .collect()
}

fn budget_records(budgets: &BTreeMap<String, Money>) -> Vec<Vec<String>> {
    budgets
        .iter()
        .map(|(category, amount)| vec![category.clone(), amount.to_string()])
        .collect()
}
