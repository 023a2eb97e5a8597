//! Ledger aggregations
//!
//! Pure functions over a loaded ledger. Functions with a trailing window take
//! today's date from the local clock; the `_as_of` variants take it explicitly.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{Datelike, Days, Local, NaiveDate};
use serde::Serialize;

use crate::models::{Money, Transaction, TransactionType};

/// Returned by `top_spending_category` when the window holds no expenses
pub const NO_EXPENSES: &str = "No expenses";

/// Length of a "month" in trailing windows
const DAYS_PER_MONTH: u64 = 30;

/// Income and expense totals for one period
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PeriodSummary {
    pub income: Money,
    pub expense: Money,
    /// income − expense
    pub net: Money,
    /// Number of rows in the period
    pub transactions: usize,
}

impl PeriodSummary {
    fn add(&mut self, t: &Transaction) {
        match t.kind {
            TransactionType::Income => self.income += t.amount,
            TransactionType::Expense => self.expense += t.amount,
        }
        self.net = self.income - self.expense;
        self.transactions += 1;
    }

    fn of<'a>(rows: impl IntoIterator<Item = &'a Transaction>) -> Self {
        let mut summary = Self::default();
        for t in rows {
            summary.add(t);
        }
        summary
    }
}

/// Totals for a calendar year with a per-month breakdown
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct YearlySummary {
    pub year: i32,
    pub totals: PeriodSummary,
    /// January through December
    pub months: Vec<PeriodSummary>,
}

impl YearlySummary {
    /// Render as a month-by-month table
    pub fn format_terminal(&self, currency: &str) -> String {
        let mut output = String::new();

        output.push_str(&format!("Yearly Summary: {}\n", self.year));
        output.push_str(&"=".repeat(64));
        output.push('\n');
        output.push_str(&format!(
            "{:<10} {:>16} {:>16} {:>16}\n",
            "Month", "Income", "Expense", "Net"
        ));
        output.push_str(&"-".repeat(64));
        output.push('\n');

        for (i, month) in self.months.iter().enumerate() {
            let name = NaiveDate::from_ymd_opt(self.year, i as u32 + 1, 1)
                .map(|d| d.format("%B").to_string())
                .unwrap_or_default();
            output.push_str(&format!(
                "{:<10} {:>16} {:>16} {:>16}\n",
                name,
                month.income.format_with_symbol(currency),
                month.expense.format_with_symbol(currency),
                month.net.format_with_symbol(currency)
            ));
        }

        output.push_str(&"-".repeat(64));
        output.push('\n');
        output.push_str(&format!(
            "{:<10} {:>16} {:>16} {:>16}\n",
            "Total",
            self.totals.income.format_with_symbol(currency),
            self.totals.expense.format_with_symbol(currency),
            self.totals.net.format_with_symbol(currency)
        ));

        output
    }
}

/// Sum of amounts for one transaction type
pub fn total_by_type(rows: &[Transaction], kind: TransactionType) -> Money {
    rows.iter()
        .filter(|t| t.kind == kind)
        .map(|t| t.amount)
        .sum()
}

/// Income, expense, net and row count for one calendar month
pub fn monthly_summary(rows: &[Transaction], year: i32, month: u32) -> PeriodSummary {
    PeriodSummary::of(
        rows.iter()
            .filter(|t| t.date.year() == year && t.date.month() == month),
    )
}

pub fn yearly_summary(rows: &[Transaction], year: i32) -> YearlySummary {
    let mut months = vec![PeriodSummary::default(); 12];
    for t in rows.iter().filter(|t| t.date.year() == year) {
        months[t.date.month0() as usize].add(t);
    }

    YearlySummary {
        year,
        totals: PeriodSummary::of(rows.iter().filter(|t| t.date.year() == year)),
        months,
    }
}

/// All income minus all expenses
pub fn total_balance(rows: &[Transaction]) -> Money {
    total_by_type(rows, TransactionType::Income) - total_by_type(rows, TransactionType::Expense)
}

/// Exclusive start of a trailing window of `days` ending at `today`
///
/// `None` when the start would fall before the earliest representable date;
/// such a window covers every row.
fn window_start(today: NaiveDate, days: u64) -> Option<NaiveDate> {
    today.checked_sub_days(Days::new(days))
}

fn in_window(t: &Transaction, cutoff: Option<NaiveDate>) -> bool {
    cutoff.map_or(true, |cutoff| t.date > cutoff)
}

/// Category with the largest expense total in the trailing `months * 30` days
pub fn top_spending_category(rows: &[Transaction], months: u32) -> String {
    top_spending_category_as_of(rows, months, Local::now().date_naive())
}

/// `top_spending_category` relative to a given day
///
/// Ties go to the alphabetically first category.
pub fn top_spending_category_as_of(rows: &[Transaction], months: u32, today: NaiveDate) -> String {
    let cutoff = window_start(today, DAYS_PER_MONTH * u64::from(months));

    let mut totals: BTreeMap<&str, Money> = BTreeMap::new();
    for t in rows.iter().filter(|t| t.is_expense() && in_window(t, cutoff)) {
        *totals.entry(t.category.as_str()).or_default() += t.amount;
    }

    // max_by keeps the last maximum, so walk the categories in reverse order
    totals
        .into_iter()
        .rev()
        .max_by(|a, b| a.1.cmp(&b.1))
        .map(|(category, _)| category.to_string())
        .unwrap_or_else(|| NO_EXPENSES.to_string())
}

/// Expense total in the trailing `days` divided by `days`
///
/// The denominator is the window length, not the number of days with data.
pub fn average_daily_spending(rows: &[Transaction], days: u32) -> Money {
    average_daily_spending_as_of(rows, days, Local::now().date_naive())
}

pub fn average_daily_spending_as_of(rows: &[Transaction], days: u32, today: NaiveDate) -> Money {
    if days == 0 {
        return Money::zero();
    }

    let cutoff = window_start(today, u64::from(days));
    let spent: Money = rows
        .iter()
        .filter(|t| t.is_expense() && in_window(t, cutoff))
        .map(|t| t.amount)
        .sum();

    spent.div_round(days)
}

/// Percentage of a budget spent, capped at 100; 0 when there is no budget
pub fn budget_progress(budget: Money, spent: Money) -> f64 {
    if budget.is_zero() {
        return 0.0;
    }
    (spent.as_f64() / budget.as_f64() * 100.0).min(100.0)
}

/// Expense total for one category in one calendar month
pub fn spent_in_category(rows: &[Transaction], category: &str, year: i32, month: u32) -> Money {
    rows.iter()
        .filter(|t| {
            t.is_expense()
                && t.category == category
                && t.date.year() == year
                && t.date.month() == month
        })
        .map(|t| t.amount)
        .sum()
}

/// Per-category totals for one transaction type, sorted by category
pub fn category_totals(rows: &[Transaction], kind: TransactionType) -> Vec<(String, Money)> {
    let mut totals: BTreeMap<&str, Money> = BTreeMap::new();
    for t in rows.iter().filter(|t| t.kind == kind) {
        *totals.entry(t.category.as_str()).or_default() += t.amount;
    }
    totals
        .into_iter()
        .map(|(category, total)| (category.to_string(), total))
        .collect()
}

/// Distinct years present in the ledger, newest first
pub fn years_available(rows: &[Transaction]) -> Vec<i32> {
    let years: BTreeSet<i32> = rows.iter().map(|t| t.date.year()).collect();
    years.into_iter().rev().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn expense(d: NaiveDate, units: i64, category: &str) -> Transaction {
        Transaction::expense(d, Money::from_units(units), category)
    }

    fn income(d: NaiveDate, units: i64, category: &str) -> Transaction {
        Transaction::income(d, Money::from_units(units), category)
    }

    #[test]
    fn test_totals_and_balance() {
        let rows = vec![
            income(date(2025, 1, 1), 1000, "Salary"),
            expense(date(2025, 1, 5), 200, "Food"),
        ];

        assert_eq!(total_by_type(&rows, TransactionType::Income), Money::from_units(1000));
        assert_eq!(total_by_type(&[], TransactionType::Expense), Money::zero());
        assert_eq!(total_balance(&rows), Money::from_units(800));
        assert_eq!(
            total_balance(&rows),
            total_by_type(&rows, TransactionType::Income)
                - total_by_type(&rows, TransactionType::Expense)
        );
    }

    #[test]
    fn test_monthly_summary() {
        let rows = vec![
            income(date(2025, 1, 1), 1000, "Salary"),
            expense(date(2025, 1, 31), 300, "Bills"),
            expense(date(2025, 2, 1), 50, "Food"),
            expense(date(2024, 1, 15), 70, "Food"),
        ];

        let jan = monthly_summary(&rows, 2025, 1);
        assert_eq!(jan.income, Money::from_units(1000));
        assert_eq!(jan.expense, Money::from_units(300));
        assert_eq!(jan.net, Money::from_units(700));
        assert_eq!(jan.transactions, 2);

        let empty = monthly_summary(&rows, 2025, 3);
        assert_eq!(empty, PeriodSummary::default());
    }

    #[test]
    fn test_yearly_summary() {
        let rows = vec![
            income(date(2025, 1, 1), 1000, "Salary"),
            expense(date(2025, 3, 2), 400, "Food"),
            expense(date(2024, 3, 2), 999, "Food"),
        ];

        let summary = yearly_summary(&rows, 2025);
        assert_eq!(summary.months.len(), 12);
        assert_eq!(summary.months[2].expense, Money::from_units(400));
        assert_eq!(summary.totals.net, Money::from_units(600));
        assert_eq!(summary.totals.transactions, 2);

        let text = summary.format_terminal("₹");
        assert!(text.contains("March"));
        assert!(text.contains("₹ 600.00"));
    }

    #[test]
    fn test_top_spending_category_window() {
        let today = date(2025, 3, 31);
        let rows = vec![
            expense(date(2025, 3, 20), 100, "Food"),
            expense(date(2025, 3, 25), 150, "Transport"),
            expense(date(2025, 3, 1), 50, "Food"),
            // 30 days before today is outside the window
            expense(date(2025, 3, 1), 1, "Food"),
            expense(date(2025, 1, 1), 9999, "Rent"),
            income(date(2025, 3, 30), 5000, "Salary"),
        ];

        assert_eq!(top_spending_category_as_of(&rows, 1, today), "Transport");
        assert_eq!(top_spending_category_as_of(&rows, 3, today), "Rent");
        assert_eq!(top_spending_category_as_of(&[], 1, today), NO_EXPENSES);
    }

    #[test]
    fn test_top_spending_category_tie_is_alphabetical() {
        let today = date(2025, 3, 31);
        let rows = vec![
            expense(date(2025, 3, 20), 100, "Zoo"),
            expense(date(2025, 3, 21), 100, "Books"),
        ];
        assert_eq!(top_spending_category_as_of(&rows, 1, today), "Books");
    }

    #[test]
    fn test_average_daily_spending_fixed_denominator() {
        let today = date(2025, 3, 31);
        let rows = vec![
            expense(date(2025, 3, 30), 300, "Food"),
            expense(date(2025, 3, 1), 1000, "Rent"),
            income(date(2025, 3, 30), 5000, "Salary"),
        ];

        assert_eq!(average_daily_spending_as_of(&rows, 30, today), Money::from_units(10));
        assert_eq!(average_daily_spending_as_of(&rows, 0, today), Money::zero());
        assert_eq!(average_daily_spending_as_of(&[], 30, today), Money::zero());
    }

    #[test]
    fn test_windows_longer_than_the_calendar_cover_every_row() {
        let today = date(2025, 3, 31);
        let rows = vec![
            expense(date(1900, 1, 1), 9999, "Rent"),
            expense(date(2025, 3, 30), 300, "Food"),
        ];

        assert_eq!(top_spending_category_as_of(&rows, 10_000_000, today), "Rent");
        assert_eq!(top_spending_category_as_of(&rows, u32::MAX, today), "Rent");

        // 10,299.00 spread over u32::MAX days rounds to the nearest cent
        assert_eq!(average_daily_spending_as_of(&rows, u32::MAX, today), Money::zero());
        assert_eq!(average_daily_spending_as_of(&rows, 100_000_000, today), Money::zero());
    }

    #[test]
    fn test_budget_progress() {
        assert_eq!(budget_progress(Money::zero(), Money::from_units(50)), 0.0);
        assert_eq!(budget_progress(Money::from_units(200), Money::from_units(50)), 25.0);
        assert_eq!(budget_progress(Money::from_units(100), Money::from_units(250)), 100.0);
        assert_eq!(budget_progress(Money::from_units(100), Money::zero()), 0.0);
    }

    #[test]
    fn test_spent_in_category_and_totals() {
        let rows = vec![
            expense(date(2025, 3, 2), 40, "Food"),
            expense(date(2025, 3, 9), 60, "Food"),
            expense(date(2025, 4, 1), 500, "Food"),
            expense(date(2025, 3, 5), 30, "Bills"),
            income(date(2025, 3, 1), 100, "Food"),
        ];

        assert_eq!(spent_in_category(&rows, "Food", 2025, 3), Money::from_units(100));
        assert_eq!(
            category_totals(&rows, TransactionType::Expense),
            vec![
                ("Bills".to_string(), Money::from_units(30)),
                ("Food".to_string(), Money::from_units(600)),
            ]
        );
    }

    #[test]
    fn test_years_available() {
        let rows = vec![
            expense(date(2023, 3, 2), 1, "Food"),
            expense(date(2025, 3, 2), 1, "Food"),
            expense(date(2023, 5, 2), 1, "Food"),
        ];
        assert_eq!(years_available(&rows), vec![2025, 2023]);
    }
}
