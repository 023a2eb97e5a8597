//! Transaction display formatting
//!
//! Register views of the ledger. Rows are shown with their positional id so
//! the id can be passed straight to `fintrack delete`.

use crate::models::{Transaction, TransactionType};

use super::report::truncate;

/// Format a single transaction for display (register row)
pub fn format_transaction_row(id: usize, txn: &Transaction, symbol: &str) -> String {
    let sign = match txn.kind {
        TransactionType::Income => "+",
        TransactionType::Expense => "-",
    };

    format!(
        "{:>5} {} {:<8} {:<20} {:>16} {}",
        id,
        txn.date.format("%Y-%m-%d"),
        txn.kind,
        truncate(&txn.category, 20),
        format!("{}{}", sign, txn.amount.format_with_symbol(symbol)),
        truncate(&txn.description, 40)
    )
}

/// Format a list of transactions as a register
pub fn format_transaction_register(rows: &[(usize, Transaction)], symbol: &str) -> String {
    if rows.is_empty() {
        return "No transactions found.\n".to_string();
    }

    let mut output = String::new();
    output.push_str(&format!(
        "{:>5} {:10} {:<8} {:<20} {:>16} {}\n",
        "ID", "Date", "Type", "Category", "Amount", "Description"
    ));
    output.push_str(&"-".repeat(90));
    output.push('\n');

    for (id, txn) in rows {
        output.push_str(&format_transaction_row(*id, txn, symbol));
        output.push('\n');
    }

    output.push_str(&format!("\n{} transaction(s)\n", rows.len()));
    output
}
