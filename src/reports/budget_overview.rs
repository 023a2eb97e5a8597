//! Budget Overview Report
//!
//! Compares a month's spending with the configured category budgets.

use std::collections::BTreeMap;

use chrono::{Duration, NaiveDate};
use serde::Serialize;

use crate::display::report::format_bar;
use crate::models::{BudgetStatus, Money, Transaction};

use super::summary::{budget_progress, monthly_summary, spent_in_category};

/// Trailing window used for budget recommendations
pub const RECOMMENDATION_WINDOW_DAYS: i64 = 90;

/// Headroom added on top of average spending when recommending a budget
pub const RECOMMENDATION_BUFFER: f64 = 1.2;

/// A row in the budget report for a single category
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryBudgetRow {
    pub category: String,
    pub budget: Money,
    pub spent: Money,
    /// budget − spent; negative when overspent
    pub remaining: Money,
    /// Percentage spent, capped at 100
    pub progress: f64,
    pub status: BudgetStatus,
}

/// Budget overview for one calendar month
#[derive(Debug, Clone, Serialize)]
pub struct BudgetOverview {
    pub year: i32,
    pub month: u32,
    pub total_income: Money,
    /// All expenses in the month, budgeted or not
    pub total_spent: Money,
    pub total_budget: Money,
    pub remaining: Money,
    pub progress: f64,
    pub status: BudgetStatus,
    pub categories: Vec<CategoryBudgetRow>,
}

impl BudgetOverview {
    /// Generate the overview for `year`/`month`
    pub fn generate(
        rows: &[Transaction],
        budgets: &BTreeMap<String, Money>,
        year: i32,
        month: u32,
    ) -> Self {
        let summary = monthly_summary(rows, year, month);
        let total_budget: Money = budgets.values().sum();

        let categories = budgets
            .iter()
            .map(|(category, budget)| {
                let spent = spent_in_category(rows, category, year, month);
                CategoryBudgetRow {
                    category: category.clone(),
                    budget: *budget,
                    spent,
                    remaining: *budget - spent,
                    progress: budget_progress(*budget, spent),
                    status: BudgetStatus::classify(*budget, spent),
                }
            })
            .collect();

        Self {
            year,
            month,
            total_income: summary.income,
            total_spent: summary.expense,
            total_budget,
            remaining: total_budget - summary.expense,
            progress: budget_progress(total_budget, summary.expense),
            status: BudgetStatus::classify(total_budget, summary.expense),
            categories,
        }
    }

    /// Categories whose spending has passed their budget
    pub fn exceeded(&self) -> impl Iterator<Item = &CategoryBudgetRow> {
        self.categories
            .iter()
            .filter(|row| row.status == BudgetStatus::Exceeded)
    }

    /// Format the overview for terminal display
    pub fn format_terminal(&self, currency: &str) -> String {
        let mut output = String::new();
        let period = NaiveDate::from_ymd_opt(self.year, self.month, 1)
            .map(|d| d.format("%B %Y").to_string())
            .unwrap_or_else(|| format!("{}-{:02}", self.year, self.month));

        output.push_str(&format!("Budget Overview - {}\n", period));
        output.push_str(&"=".repeat(80));
        output.push('\n');
        output.push_str(&format!(
            "Total Income: {}\n",
            self.total_income.format_with_symbol(currency)
        ));
        output.push_str(&format!(
            "Total Spent:  {}\n",
            self.total_spent.format_with_symbol(currency)
        ));
        output.push_str(&format!(
            "Total Budget: {}\n",
            self.total_budget.format_with_symbol(currency)
        ));
        output.push_str(&format!(
            "Remaining:    {}\n",
            self.remaining.format_with_symbol(currency)
        ));

        if self.total_budget.is_positive() {
            output.push_str(&format!(
                "Budget Usage: {} {:.1}%\n",
                format_bar(self.progress, 20),
                self.progress
            ));
            output.push_str(match self.status {
                BudgetStatus::Exceeded => "You've exceeded your monthly budget!\n",
                BudgetStatus::Approaching => "You're approaching your budget limit.\n",
                _ => "Great job staying within budget!\n",
            });
        }

        if self.categories.is_empty() {
            output.push_str("\nNo budgets set. Use `fintrack budget set` or `fintrack budget template`.\n");
            return output;
        }

        output.push('\n');
        output.push_str(&format!(
            "{:<20} {:>15} {:>15} {:>15} {:>8}\n",
            "Category", "Budget", "Spent", "Remaining", "%"
        ));
        output.push_str(&"-".repeat(80));
        output.push('\n');

        for row in &self.categories {
            let marker = if row.status == BudgetStatus::Exceeded { " *" } else { "" };
            output.push_str(&format!(
                "{:<20} {:>15} {:>15} {:>15} {:>7.1}%{}\n",
                row.category,
                row.budget.format_with_symbol(currency),
                row.spent.format_with_symbol(currency),
                row.remaining.format_with_symbol(currency),
                row.progress,
                marker
            ));
        }

        output.push_str("\n* = Over budget\n");
        output
    }
}

/// Recommended budget for a category
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BudgetRecommendation {
    pub category: String,
    /// Mean expense per transaction in the window
    pub average: Money,
    /// Average with a 20% buffer
    pub recommended: Money,
}

/// Suggest budgets from the last 90 days of expenses, sorted by category
pub fn recommend_budgets(rows: &[Transaction], today: NaiveDate) -> Vec<BudgetRecommendation> {
    let cutoff = today - Duration::days(RECOMMENDATION_WINDOW_DAYS);

    let mut by_category: BTreeMap<&str, (Money, u32)> = BTreeMap::new();
    for t in rows.iter().filter(|t| t.is_expense() && t.date > cutoff) {
        let entry = by_category.entry(t.category.as_str()).or_default();
        entry.0 += t.amount;
        entry.1 += 1;
    }

    by_category
        .into_iter()
        .map(|(category, (total, count))| {
            let average = total.div_round(count);
            BudgetRecommendation {
                category: category.to_string(),
                average,
                recommended: average.scale(RECOMMENDATION_BUFFER),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn sample_rows() -> Vec<Transaction> {
        vec![
            Transaction::income(date(2025, 3, 1), Money::from_units(10_000), "Salary"),
            Transaction::expense(date(2025, 3, 3), Money::from_units(2_500), "Food"),
            Transaction::expense(date(2025, 3, 10), Money::from_units(1_600), "Transport"),
            Transaction::expense(date(2025, 3, 12), Money::from_units(700), "Gifts"),
            Transaction::expense(date(2025, 2, 12), Money::from_units(9_000), "Food"),
        ]
    }

    #[test]
    fn test_generate_overview() {
        let budgets: BTreeMap<String, Money> = [
            ("Food".to_string(), Money::from_units(3_000)),
            ("Transport".to_string(), Money::from_units(1_500)),
            ("Salary".to_string(), Money::zero()),
        ]
        .into_iter()
        .collect();

        let overview = BudgetOverview::generate(&sample_rows(), &budgets, 2025, 3);

        assert_eq!(overview.total_income, Money::from_units(10_000));
        assert_eq!(overview.total_spent, Money::from_units(4_800));
        assert_eq!(overview.total_budget, Money::from_units(4_500));
        assert_eq!(overview.remaining, Money::from_units(-300));
        assert_eq!(overview.progress, 100.0);
        assert_eq!(overview.status, BudgetStatus::Exceeded);

        let food = &overview.categories[0];
        assert_eq!(food.category, "Food");
        assert_eq!(food.spent, Money::from_units(2_500));
        assert_eq!(food.status, BudgetStatus::Approaching);

        let salary = &overview.categories[1];
        assert_eq!(salary.progress, 0.0);
        assert_eq!(salary.status, BudgetStatus::Unbudgeted);

        let exceeded: Vec<_> = overview.exceeded().map(|r| r.category.as_str()).collect();
        assert_eq!(exceeded, vec!["Transport"]);

        let text = overview.format_terminal("₹");
        assert!(text.contains("Budget Overview - March 2025"));
        assert!(text.contains("exceeded your monthly budget"));
    }

    #[test]
    fn test_overview_without_budgets() {
        let overview = BudgetOverview::generate(&sample_rows(), &BTreeMap::new(), 2025, 3);
        assert_eq!(overview.progress, 0.0);
        assert_eq!(overview.status, BudgetStatus::Unbudgeted);
        assert!(overview.format_terminal("$").contains("No budgets set"));
    }

    #[test]
    fn test_recommend_budgets() {
        let today = date(2025, 3, 31);
        let mut rows = sample_rows();
        rows.push(Transaction::expense(date(2025, 3, 20), Money::from_units(3_500), "Food"));
        rows.push(Transaction::expense(date(2024, 11, 1), Money::from_units(50_000), "Rent"));

        let recs = recommend_budgets(&rows, today);
        let categories: Vec<_> = recs.iter().map(|r| r.category.as_str()).collect();
        assert_eq!(categories, vec!["Food", "Gifts", "Transport"]);

        // (9000 + 2500 + 3500) / 3 = 5000, plus 20%
        assert_eq!(recs[0].average, Money::from_units(5_000));
        assert_eq!(recs[0].recommended, Money::from_units(6_000));
    }
}
