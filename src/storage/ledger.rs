//! Ledger store for the transaction CSV file
//!
//! The ledger is an ordered table of transactions. A row's id is its 0-based
//! position in file order, so deleting a row shifts every later id down by one.

use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::NaiveDate;
use csv::StringRecord;
use tracing::{debug, info, warn};

use crate::error::{TrackerError, TrackerResult};
use crate::models::{parse_date, validate_amount, Money, Transaction, TransactionType, DATE_FORMAT};

use super::cache::TtlCache;
use super::file_io::{file_mtime, read_csv_file, write_csv_atomic, CsvTable};

/// Column order of the transaction file
pub const LEDGER_COLUMNS: [&str; 5] = ["Date", "Type", "Amount", "Category", "Description"];

/// Store for the transaction ledger with a read-through cache
pub struct LedgerStore {
    path: PathBuf,
    cache: TtlCache<Vec<Transaction>>,
}

impl LedgerStore {
    pub fn new(path: PathBuf, ttl: Duration) -> Self {
        Self {
            path,
            cache: TtlCache::new(ttl),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the full ledger, served from cache while fresh
    pub fn load(&self) -> TrackerResult<Vec<Transaction>> {
        self.cache
            .get_or_load(file_mtime(&self.path), || read_ledger(&self.path))
    }

    /// Drop the cache and read from disk
    pub fn reload(&self) -> TrackerResult<Vec<Transaction>> {
        self.cache.invalidate();
        self.load()
    }

    /// Replace the whole file with `rows`
    pub fn save(&self, rows: &[Transaction]) -> TrackerResult<()> {
        let result = write_csv_atomic(
            &self.path,
            &LEDGER_COLUMNS,
            rows.iter().map(transaction_to_record),
        );
        // Invalidate even on failure; the file may or may not have changed
        self.cache.invalidate();
        result?;

        debug!(rows = rows.len(), path = %self.path.display(), "saved ledger");
        Ok(())
    }

    /// Validate and append one entry, returning its row id and stored (sanitized) form
    pub fn append(&self, entry: Transaction) -> TrackerResult<(usize, Transaction)> {
        let entry = entry.sanitized();
        entry.validate().map_err(TrackerError::Validation)?;

        let mut rows = self.load()?;
        let row_id = rows.len();
        rows.push(entry.clone());
        self.save(&rows)?;

        info!(
            row_id,
            kind = %entry.kind,
            category = %entry.category,
            amount = %entry.amount,
            "appended transaction"
        );
        Ok((row_id, entry))
    }

    /// Remove the row at `row_id`, returning it
    pub fn delete(&self, row_id: usize) -> TrackerResult<Transaction> {
        let mut rows = self.load()?;
        if row_id >= rows.len() {
            return Err(TrackerError::transaction_not_found(row_id));
        }

        let removed = rows.remove(row_id);
        self.save(&rows)?;

        info!(row_id, category = %removed.category, "deleted transaction");
        Ok(removed)
    }

    /// Rows dated within `start..=end`, in ledger order
    pub fn filter_range(&self, start: NaiveDate, end: NaiveDate) -> TrackerResult<Vec<Transaction>> {
        check_range(start, end)?;
        let rows = self.load()?;
        Ok(filter_range(&rows, start, end))
    }

    pub fn count(&self) -> TrackerResult<usize> {
        Ok(self.load()?.len())
    }
}

/// Reject an inverted date range
pub fn check_range(start: NaiveDate, end: NaiveDate) -> TrackerResult<()> {
    if start > end {
        return Err(TrackerError::validation("Start date cannot be after end date"));
    }
    Ok(())
}

/// Rows dated within `start..=end`, in their original order
pub fn filter_range(rows: &[Transaction], start: NaiveDate, end: NaiveDate) -> Vec<Transaction> {
    rows.iter()
        .filter(|t| t.date >= start && t.date <= end)
        .cloned()
        .collect()
}

/// Read the ledger file, dropping rows that cannot be represented
///
/// A row is dropped when its date, type or amount does not parse, or when its
/// amount lies outside `MIN_AMOUNT..=MAX_AMOUNT`.
fn read_ledger(path: &Path) -> TrackerResult<Vec<Transaction>> {
    let table = match read_csv_file(path)? {
        Some(table) => table,
        None => return Ok(Vec::new()),
    };

    let missing = table.missing_columns(&["Date", "Type", "Amount", "Category"]);
    if !missing.is_empty() {
        return Err(TrackerError::Storage(format!(
            "{} is missing columns: {}",
            path.display(),
            missing.join(", ")
        )));
    }

    let columns = LedgerColumns::locate(&table);
    let mut rows = Vec::with_capacity(table.records.len());
    let mut dropped = 0usize;

    for record in &table.records {
        match columns.parse(record) {
            Some(transaction) => rows.push(transaction),
            None => dropped += 1,
        }
    }

    if dropped > 0 {
        warn!(dropped, path = %path.display(), "dropped malformed ledger rows");
    }
    debug!(rows = rows.len(), path = %path.display(), "loaded ledger");

    Ok(rows)
}

struct LedgerColumns {
    date: Option<usize>,
    kind: Option<usize>,
    amount: Option<usize>,
    category: Option<usize>,
    description: Option<usize>,
}

impl LedgerColumns {
    fn locate(table: &CsvTable) -> Self {
        Self {
            date: table.column("Date"),
            kind: table.column("Type"),
            amount: table.column("Amount"),
            category: table.column("Category"),
            description: table.column("Description"),
        }
    }

    fn parse(&self, record: &StringRecord) -> Option<Transaction> {
        let date = parse_date(CsvTable::field(record, self.date))?;
        let kind: TransactionType = CsvTable::field(record, self.kind).parse().ok()?;
        let amount = Money::parse(CsvTable::field(record, self.amount)).ok()?;
        if !validate_amount(amount) {
            return None;
        }

        Some(Transaction::new(
            date,
            kind,
            amount,
            CsvTable::field(record, self.category),
            CsvTable::field(record, self.description),
        ))
    }
}

/// Serialize a transaction in ledger column order
pub fn transaction_to_record(t: &Transaction) -> Vec<String> {
    vec![
        t.date.format(DATE_FORMAT).to_string(),
        t.kind.to_string(),
        t.amount.to_string(),
        t.category.clone(),
        t.description.clone(),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn create_test_store() -> (LedgerStore, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let store = LedgerStore::new(
            temp_dir.path().join("transactions.csv"),
            Duration::from_secs(3600),
        );
        (store, temp_dir)
    }

    #[test]
    fn test_load_missing_file_is_empty() {
        let (store, _temp) = create_test_store();
        assert!(store.load().unwrap().is_empty());
    }

    #[test]
    fn test_append_and_load() {
        let (store, _temp) = create_test_store();

        store
            .append(Transaction::income(date(2024, 1, 5), Money::from_units(1000), "Salary"))
            .unwrap();
        let mut lunch = Transaction::expense(date(2024, 1, 6), Money::from_cents(12_550), "Food");
        lunch.description = "Lunch".into();
        store.append(lunch).unwrap();

        let rows = store.reload().unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].category, "Salary");
        assert_eq!(rows[1].amount, Money::from_cents(12_550));
        assert_eq!(rows[1].description, "Lunch");

        let contents = fs::read_to_string(store.path()).unwrap();
        assert!(contents.starts_with("Date,Type,Amount,Category,Description"));
        assert!(contents.contains("2024-01-06,Expense,125.50,Food,Lunch"));
    }

    #[test]
    fn test_append_invalid_writes_nothing() {
        let (store, _temp) = create_test_store();

        let err = store
            .append(Transaction::expense(date(2024, 1, 1), Money::zero(), "  "))
            .unwrap_err();

        match err {
            TrackerError::Validation(messages) => assert_eq!(messages.len(), 2),
            other => panic!("unexpected error: {other}"),
        }
        assert!(!store.path().exists());
    }

    #[test]
    fn test_append_sanitizes_text() {
        let (store, _temp) = create_test_store();
        let mut entry = Transaction::expense(date(2024, 1, 1), Money::from_units(5), "<Food>");
        entry.description = "it's \"fine\"".into();

        let (_, stored) = store.append(entry).unwrap();
        assert_eq!(stored.category, "Food");
        assert_eq!(stored.description, "its fine");
    }

    #[test]
    fn test_delete_shifts_later_rows() {
        let (store, _temp) = create_test_store();
        for (i, category) in ["A", "B", "C"].iter().enumerate() {
            store
                .append(Transaction::expense(date(2024, 1, 1 + i as u32), Money::from_units(10), *category))
                .unwrap();
        }

        let before = store.load().unwrap();
        let removed = store.delete(1).unwrap();
        assert_eq!(removed, before[1]);

        assert_eq!(store.reload().unwrap(), vec![before[0].clone(), before[2].clone()]);
        assert_eq!(store.count().unwrap(), 2);
    }

    #[test]
    fn test_delete_out_of_range() {
        let (store, _temp) = create_test_store();
        let err = store.delete(0).unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_filter_range_inclusive() {
        let (store, _temp) = create_test_store();
        for day in [1, 10, 20, 31] {
            store
                .append(Transaction::expense(date(2024, 1, day), Money::from_units(1), "Food"))
                .unwrap();
        }

        let rows = store.filter_range(date(2024, 1, 10), date(2024, 1, 20)).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].date, date(2024, 1, 10));
        assert_eq!(rows[1].date, date(2024, 1, 20));

        let err = store
            .filter_range(date(2024, 2, 1), date(2024, 1, 1))
            .unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn test_load_drops_malformed_rows() {
        let (store, _temp) = create_test_store();
        fs::write(
            store.path(),
            "Date,Type,Amount,Category,Description\n\
             2024-01-01,Income,100,Salary,\n\
             not-a-date,Expense,5,Food,\n\
             2024-01-02,Transfer,5,Food,\n\
             2024-01-03,Expense,abc,Food,\n\
             2024-01-04 10:30:00,expense,\"1,250.00\",Bills\n",
        )
        .unwrap();

        let rows = store.load().unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1].date, date(2024, 1, 4));
        assert_eq!(rows[1].kind, TransactionType::Expense);
        assert_eq!(rows[1].amount, Money::from_units(1250));
        assert_eq!(rows[1].description, "");
    }

    #[test]
    fn test_load_drops_out_of_range_amounts() {
        let (store, _temp) = create_test_store();
        fs::write(
            store.path(),
            "Date,Type,Amount,Category,Description\n\
             2024-01-01,Income,92233720368547758.07,Salary,\n\
             2024-01-02,Income,1,Gift,\n\
             2024-01-03,Expense,(5.00),Food,\n\
             2024-01-04,Expense,0,Food,\n\
             2024-01-05,Expense,1000000.01,Car,\n",
        )
        .unwrap();

        let rows = store.load().unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].category, "Gift");
        assert_eq!(crate::reports::total_balance(&rows), Money::from_units(1));
    }

    #[test]
    fn test_append_returns_row_id() {
        let (store, _temp) = create_test_store();
        for expected in 0..3 {
            let (row_id, _) = store
                .append(Transaction::expense(date(2024, 2, 1), Money::from_units(1 + expected as i64), "Food"))
                .unwrap();
            assert_eq!(row_id, expected);
        }
    }

    #[test]
    fn test_load_rejects_missing_columns() {
        let (store, _temp) = create_test_store();
        fs::write(store.path(), "Date,Amount\n2024-01-01,5\n").unwrap();
        assert!(matches!(store.load(), Err(TrackerError::Storage(_))));
    }

    #[test]
    fn test_write_invalidates_cache() {
        let (store, _temp) = create_test_store();
        assert_eq!(store.count().unwrap(), 0);

        store
            .append(Transaction::income(date(2024, 3, 1), Money::from_units(1), "Salary"))
            .unwrap();
        assert_eq!(store.count().unwrap(), 1);

        store.save(&[]).unwrap();
        assert_eq!(store.count().unwrap(), 0);
    }
}
