//! CSV Export functionality
//!
//! Writes transactions, goals and budgets with the same column order as the
//! files they are stored in, so any filtered view can be re-imported.

use std::collections::BTreeMap;
use std::io::Write;

use crate::error::{TrackerError, TrackerResult};
use crate::models::{Goal, Money, Transaction};
use crate::storage::goals::goal_to_record;
use crate::storage::ledger::transaction_to_record;
use crate::storage::{write_csv, BUDGET_COLUMNS, GOAL_COLUMNS, LEDGER_COLUMNS};

/// Export transactions (any filtered view of the ledger) to CSV
pub fn export_transactions_csv<W: Write>(writer: W, rows: &[Transaction]) -> TrackerResult<()> {
    write_csv(writer, &LEDGER_COLUMNS, rows.iter().map(transaction_to_record))
        .map_err(|e| TrackerError::Export(e.to_string()))
}

/// Export savings goals to CSV
pub fn export_goals_csv<W: Write>(writer: W, goals: &[Goal]) -> TrackerResult<()> {
    write_csv(writer, &GOAL_COLUMNS, goals.iter().map(goal_to_record))
        .map_err(|e| TrackerError::Export(e.to_string()))
}

/// Export budgets to CSV
pub fn export_budgets_csv<W: Write>(
    writer: W,
    budgets: &BTreeMap<String, Money>,
) -> TrackerResult<()> {
    write_csv(
        writer,
        &BUDGET_COLUMNS,
        budgets
            .iter()
            .map(|(category, amount)| vec![category.clone(), amount.to_string()]),
    )
    .map_err(|e| TrackerError::Export(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::import::clean;
    use chrono::NaiveDate;

    #[test]
    fn test_export_transactions_reimportable() {
        let date = NaiveDate::from_ymd_opt(2025, 1, 15).unwrap();
        let mut txn = Transaction::expense(date, Money::from_cents(5050), "Food");
        txn.description = "Lunch, with team".into();

        let mut csv_data = Vec::new();
        export_transactions_csv(&mut csv_data, &[txn.clone()]).unwrap();

        let csv_string = String::from_utf8(csv_data.clone()).unwrap();
        assert!(csv_string.starts_with("Date,Type,Amount,Category,Description\n"));
        assert!(csv_string.contains("2025-01-15,Expense,50.50,Food,\"Lunch, with team\""));

        let batch = clean(csv_data.as_slice()).unwrap().unwrap();
        assert_eq!(batch.rows, vec![txn]);
    }

    #[test]
    fn test_export_goals_and_budgets() {
        let goal = Goal::new(
            "Car",
            Money::from_units(100),
            Money::from_units(10),
            NaiveDate::from_ymd_opt(2026, 1, 1).unwrap(),
        );
        let mut out = Vec::new();
        export_goals_csv(&mut out, &[goal]).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "Goal,Target Amount,Amount Saved,Deadline\nCar,100.00,10.00,2026-01-01\n"
        );

        let budgets: BTreeMap<_, _> = [("Food".to_string(), Money::from_units(3000))].into();
        let mut out = Vec::new();
        export_budgets_csv(&mut out, &budgets).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "Category,Budget\nFood,3000.00\n");
    }
}
