//! Report CLI commands
//!
//! `summary` prints the dashboard metrics and the month's totals;
//! `yearly` prints a month-by-month table.

use chrono::{Datelike, Local, NaiveDate};
use clap::Args;

use crate::config::Settings;
use crate::display::{format_money_colored, separator, truncate};
use crate::error::{TrackerError, TrackerResult};
use crate::models::{Transaction, TransactionType};
use crate::reports::{
    average_daily_spending_as_of, category_totals, monthly_summary, top_spending_category_as_of,
    total_balance, total_by_type, yearly_summary, years_available,
};
use crate::storage::Storage;

/// Arguments for `summary`
#[derive(Args, Debug)]
pub struct SummaryArgs {
    /// Year (defaults to the current year)
    #[arg(short, long)]
    pub year: Option<i32>,
    /// Month 1-12 (defaults to the current month)
    #[arg(short, long, value_parser = clap::value_parser!(u32).range(1..=12))]
    pub month: Option<u32>,
}

/// Handle `summary`
pub fn handle_summary_command(
    storage: &Storage,
    settings: &Settings,
    args: SummaryArgs,
) -> TrackerResult<()> {
    let today = Local::now().date_naive();
    let year = args.year.unwrap_or(today.year());
    let month = args.month.unwrap_or(today.month());
    let heading = NaiveDate::from_ymd_opt(year, month, 1)
        .map(|d| d.format("%B %Y").to_string())
        .ok_or_else(|| TrackerError::validation(format!("Invalid month {}-{}", year, month)))?;

    let rows = storage.ledger.load()?;
    let symbol = &settings.currency_symbol;

    println!("Financial Summary");
    println!("{}", "=".repeat(60));
    println!(
        "{:<32} {:>27}",
        "Total balance:",
        format_money_colored(total_balance(&rows), symbol)
    );
    println!(
        "{:<32} {:>18}",
        "Total income:",
        total_by_type(&rows, TransactionType::Income).format_with_symbol(symbol)
    );
    println!(
        "{:<32} {:>18}",
        "Total expenses:",
        total_by_type(&rows, TransactionType::Expense).format_with_symbol(symbol)
    );
    println!(
        "{:<32} {:>18}",
        format!("Top category ({} month):", settings.top_category_months),
        top_spending_category_as_of(&rows, settings.top_category_months, today)
    );
    println!(
        "{:<32} {:>18}",
        format!("Avg daily spending ({} days):", settings.average_window_days),
        average_daily_spending_as_of(&rows, settings.average_window_days, today)
            .format_with_symbol(symbol)
    );

    let period = monthly_summary(&rows, year, month);
    println!();
    println!("{}", heading);
    println!("{}", separator(60));
    println!("{:<32} {:>18}", "Income:", period.income.format_with_symbol(symbol));
    println!("{:<32} {:>18}", "Expenses:", period.expense.format_with_symbol(symbol));
    println!("{:<32} {:>18}", "Net:", period.net.format_with_symbol(symbol));
    println!("{:<32} {:>18}", "Transactions:", period.transactions);

    let month_rows: Vec<Transaction> = rows
        .into_iter()
        .filter(|t| t.date.year() == year && t.date.month() == month)
        .collect();
    let breakdown = category_totals(&month_rows, TransactionType::Expense);
    if !breakdown.is_empty() {
        println!();
        println!("Spending by category");
        println!("{}", separator(60));
        for (category, amount) in breakdown {
            println!(
                "  {:<30} {:>18}",
                truncate(&category, 30),
                amount.format_with_symbol(symbol)
            );
        }
    }

    Ok(())
}

/// Handle `yearly`
///
/// Without `--year`, shows the latest year that has transactions.
pub fn handle_yearly_command(
    storage: &Storage,
    settings: &Settings,
    year: Option<i32>,
) -> TrackerResult<()> {
    let rows = storage.ledger.load()?;

    let year = match year {
        Some(year) => year,
        None => match years_available(&rows).into_iter().max() {
            Some(year) => year,
            None => {
                println!("No transactions recorded yet.");
                return Ok(());
            }
        },
    };

    print!(
        "{}",
        yearly_summary(&rows, year).format_terminal(&settings.currency_symbol)
    );
    Ok(())
}
