//! Transaction CLI commands
//!
//! Implements `add`, `list` and `delete` for ledger entries.

use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;

use chrono::{Local, NaiveDate};
use clap::Args;

use crate::config::Settings;
use crate::display::format_transaction_register;
use crate::error::{TrackerError, TrackerResult};
use crate::export::export_transactions_csv;
use crate::models::{Money, TransactionType};
use crate::services::{CreateTransactionInput, TransactionFilter, TransactionService};
use crate::storage::Storage;

/// Arguments for `add`
#[derive(Args, Debug)]
pub struct AddArgs {
    /// Income or Expense
    pub kind: TransactionType,
    /// Amount (e.g., "250" or "250.50")
    pub amount: String,
    /// Category name
    #[arg(short, long)]
    pub category: String,
    /// Transaction date (YYYY-MM-DD, defaults to today)
    #[arg(short, long)]
    pub date: Option<NaiveDate>,
    /// Free-text description
    #[arg(short = 'm', long)]
    pub description: Option<String>,
}

/// Arguments for `list`
#[derive(Args, Debug)]
pub struct ListArgs {
    /// First date to include (YYYY-MM-DD)
    #[arg(long)]
    pub from: Option<NaiveDate>,
    /// Last date to include (YYYY-MM-DD)
    #[arg(long)]
    pub to: Option<NaiveDate>,
    /// Only Income or only Expense
    #[arg(short = 't', long = "type")]
    pub kind: Option<TransactionType>,
    /// Exact category name
    #[arg(short, long)]
    pub category: Option<String>,
    /// Number of transactions to show
    #[arg(short, long)]
    pub limit: Option<usize>,
    /// Write the listed rows to a CSV file instead of printing them
    #[arg(long, value_name = "FILE")]
    pub export: Option<PathBuf>,
}

/// Parse a user-entered amount into a validation error on failure
pub(crate) fn parse_amount(input: &str) -> TrackerResult<Money> {
    Money::parse(input).map_err(|e| TrackerError::validation(e.to_string()))
}

/// Handle `add`
pub fn handle_add_command(storage: &Storage, settings: &Settings, args: AddArgs) -> TrackerResult<()> {
    let service = TransactionService::new(storage);

    let input = CreateTransactionInput {
        date: args.date.unwrap_or_else(|| Local::now().date_naive()),
        kind: args.kind,
        amount: parse_amount(&args.amount)?,
        category: args.category,
        description: args.description,
    };

    let (id, txn) = service.create(input)?;
    println!(
        "Added {} [{}]: {} {} on {}",
        txn.kind,
        id,
        txn.amount.format_with_symbol(&settings.currency_symbol),
        txn.category,
        txn.date.format(&settings.date_format)
    );

    Ok(())
}

/// Handle `list`
pub fn handle_list_command(storage: &Storage, settings: &Settings, args: ListArgs) -> TrackerResult<()> {
    let service = TransactionService::new(storage);

    let mut filter = TransactionFilter::new();
    filter.start_date = args.from;
    filter.end_date = args.to;
    filter.kind = args.kind;
    filter.category = args.category;
    filter.limit = args.limit;

    let rows = service.list(&filter)?;

    if let Some(output) = args.export {
        let file = File::create(&output).map_err(|e| {
            TrackerError::Export(format!("Failed to create file {}: {}", output.display(), e))
        })?;
        let txns: Vec<_> = rows.into_iter().map(|(_, txn)| txn).collect();
        export_transactions_csv(BufWriter::new(file), &txns)?;
        println!("Exported {} transaction(s) to: {}", txns.len(), output.display());
        return Ok(());
    }

    print!(
        "{}",
        format_transaction_register(&rows, &settings.currency_symbol)
    );

    Ok(())
}

/// Handle `delete`
pub fn handle_delete_command(storage: &Storage, settings: &Settings, id: usize) -> TrackerResult<()> {
    let removed = TransactionService::new(storage).delete(id)?;
    println!(
        "Deleted transaction {}: {} {} {} on {}",
        id,
        removed.kind,
        removed.amount.format_with_symbol(&settings.currency_symbol),
        removed.category,
        removed.date.format(&settings.date_format)
    );
    Ok(())
}
