//! Transaction service
//!
//! Business logic for ledger entries: adding, deleting and listing
//! transactions, with every change recorded in the audit log.

use chrono::NaiveDate;

use crate::audit::Change;
use crate::error::TrackerResult;
use crate::models::{Money, Transaction, TransactionType};
use crate::storage::ledger::check_range;
use crate::storage::Storage;

/// Service for transaction management
pub struct TransactionService<'a> {
    storage: &'a Storage,
}

/// Options for filtering transactions
#[derive(Debug, Clone, Default)]
pub struct TransactionFilter {
    /// Filter by date range start (inclusive)
    pub start_date: Option<NaiveDate>,
    /// Filter by date range end (inclusive)
    pub end_date: Option<NaiveDate>,
    pub kind: Option<TransactionType>,
    /// Exact category name
    pub category: Option<String>,
    /// Maximum number of transactions to return
    pub limit: Option<usize>,
}

impl TransactionFilter {
    /// Create a new empty filter
    pub fn new() -> Self {
        Self::default()
    }

    /// Filter by date range
    pub fn date_range(mut self, start: NaiveDate, end: NaiveDate) -> Self {
        self.start_date = Some(start);
        self.end_date = Some(end);
        self
    }

    pub fn kind(mut self, kind: TransactionType) -> Self {
        self.kind = Some(kind);
        self
    }

    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// Limit results
    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    fn matches(&self, txn: &Transaction) -> bool {
        self.start_date.map_or(true, |start| txn.date >= start)
            && self.end_date.map_or(true, |end| txn.date <= end)
            && self.kind.map_or(true, |kind| txn.kind == kind)
            && self
                .category
                .as_deref()
                .map_or(true, |category| txn.category == category)
    }
}

/// Input for creating a new transaction
#[derive(Debug, Clone)]
pub struct CreateTransactionInput {
    pub date: NaiveDate,
    pub kind: TransactionType,
    pub amount: Money,
    pub category: String,
    pub description: Option<String>,
}

impl<'a> TransactionService<'a> {
    /// Create a new transaction service
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Validate and append a transaction, returning its id and stored form
    pub fn create(&self, input: CreateTransactionInput) -> TrackerResult<(usize, Transaction)> {
        let txn = Transaction::new(
            input.date,
            input.kind,
            input.amount,
            input.category,
            input.description.unwrap_or_default(),
        );

        let (row_id, txn) = self.storage.ledger.append(txn)?;
        self.storage.record(Change::TransactionAdded {
            row_id,
            transaction: txn.clone(),
        });

        Ok((row_id, txn))
    }

    /// List transactions with their ids, in ledger order
    pub fn list(&self, filter: &TransactionFilter) -> TrackerResult<Vec<(usize, Transaction)>> {
        if let (Some(start), Some(end)) = (filter.start_date, filter.end_date) {
            check_range(start, end)?;
        }

        let mut rows: Vec<(usize, Transaction)> = self
            .storage
            .ledger
            .load()?
            .into_iter()
            .enumerate()
            .filter(|(_, t)| filter.matches(t))
            .collect();

        if let Some(limit) = filter.limit {
            rows.truncate(limit);
        }

        Ok(rows)
    }

    /// The full ledger
    pub fn all(&self) -> TrackerResult<Vec<Transaction>> {
        self.storage.ledger.load()
    }

    /// Delete the transaction with positional id `row_id`
    pub fn delete(&self, row_id: usize) -> TrackerResult<Transaction> {
        let removed = self.storage.ledger.delete(row_id)?;

        self.storage.record(Change::TransactionDeleted {
            row_id,
            transaction: removed.clone(),
        });

        Ok(removed)
    }

    /// Count all transactions
    pub fn count(&self) -> TrackerResult<usize> {
        self.storage.ledger.count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use crate::config::{Settings, TrackerPaths};
    use tempfile::TempDir;

    fn create_test_storage() -> (TempDir, Storage) {
        let temp_dir = TempDir::new().unwrap();
        let paths = TrackerPaths::with_base_dir(temp_dir.path().to_path_buf());
        let storage = Storage::new(paths, &Settings::default()).unwrap();
        (temp_dir, storage)
    }

    fn input(day: u32, kind: TransactionType, units: i64, category: &str) -> CreateTransactionInput {
        CreateTransactionInput {
            date: NaiveDate::from_ymd_opt(2025, 1, day).unwrap(),
            kind,
            amount: Money::from_units(units),
            category: category.to_string(),
            description: None,
        }
    }

    #[test]
    fn test_create_transaction() {
        let (_temp_dir, storage) = create_test_storage();
        let service = TransactionService::new(&storage);

        let (id, txn) = service
            .create(input(15, TransactionType::Expense, 50, "Groceries"))
            .unwrap();

        assert_eq!(id, 0);
        assert_eq!(txn.amount, Money::from_units(50));
        assert_eq!(txn.description, "");
        assert_eq!(service.count().unwrap(), 1);

        let records = storage.audit().read_all().unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(
            records[0].change,
            Change::TransactionAdded {
                row_id: 0,
                transaction: txn,
            }
        );
    }

    #[test]
    fn test_create_succeeds_when_audit_log_is_unwritable() {
        let (_temp_dir, storage) = create_test_storage();
        let service = TransactionService::new(&storage);
        service.create(input(1, TransactionType::Income, 1000, "Salary")).unwrap();

        fs::remove_file(storage.audit().path()).unwrap();
        fs::create_dir(storage.audit().path()).unwrap();

        let (id, txn) = service
            .create(input(2, TransactionType::Expense, 40, "Food"))
            .unwrap();
        assert_eq!(id, 1);
        assert_eq!(storage.ledger.reload().unwrap()[1], txn);

        let removed = service.delete(0).unwrap();
        assert_eq!(removed.category, "Salary");
        assert_eq!(storage.ledger.reload().unwrap(), vec![txn]);
    }

    #[test]
    fn test_create_invalid_is_not_audited() {
        let (_temp_dir, storage) = create_test_storage();
        let service = TransactionService::new(&storage);

        let err = service
            .create(input(15, TransactionType::Expense, 2_000_000, "Car"))
            .unwrap_err();
        assert!(err.is_validation());
        assert!(storage.audit().read_all().unwrap().is_empty());
    }

    #[test]
    fn test_list_with_filter_keeps_ids() {
        let (_temp_dir, storage) = create_test_storage();
        let service = TransactionService::new(&storage);

        service.create(input(1, TransactionType::Income, 1000, "Salary")).unwrap();
        service.create(input(5, TransactionType::Expense, 20, "Food")).unwrap();
        service.create(input(9, TransactionType::Expense, 30, "Food")).unwrap();

        let food = service
            .list(&TransactionFilter::new().category("Food"))
            .unwrap();
        assert_eq!(food.iter().map(|(id, _)| *id).collect::<Vec<_>>(), vec![1, 2]);

        let ranged = service
            .list(&TransactionFilter::new().date_range(
                NaiveDate::from_ymd_opt(2025, 1, 2).unwrap(),
                NaiveDate::from_ymd_opt(2025, 1, 5).unwrap(),
            ))
            .unwrap();
        assert_eq!(ranged.len(), 1);
        assert_eq!(ranged[0].0, 1);

        let income = service
            .list(&TransactionFilter::new().kind(TransactionType::Income).limit(5))
            .unwrap();
        assert_eq!(income.len(), 1);

        let inverted = service.list(&TransactionFilter::new().date_range(
            NaiveDate::from_ymd_opt(2025, 2, 1).unwrap(),
            NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
        ));
        assert!(inverted.unwrap_err().is_validation());
    }

    #[test]
    fn test_delete_transaction() {
        let (_temp_dir, storage) = create_test_storage();
        let service = TransactionService::new(&storage);

        service.create(input(1, TransactionType::Income, 1000, "Salary")).unwrap();
        service.create(input(5, TransactionType::Expense, 20, "Food")).unwrap();

        let removed = service.delete(0).unwrap();
        assert_eq!(removed.category, "Salary");

        let remaining = service.all().unwrap();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].category, "Food");

        assert!(service.delete(7).unwrap_err().is_not_found());

        let records = storage.audit().read_all().unwrap();
        assert_eq!(records.len(), 3);
        assert!(matches!(
            &records[2].change,
            Change::TransactionDeleted { row_id: 0, transaction } if transaction.category == "Salary"
        ));
    }
}
