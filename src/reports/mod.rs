//! Reports module for the finance tracker
//!
//! Pure aggregations over the ledger plus the monthly budget overview and
//! budget recommendations.

pub mod budget_overview;
pub mod summary;

pub use budget_overview::{
    recommend_budgets, BudgetOverview, BudgetRecommendation, CategoryBudgetRow,
};
pub use summary::{
    average_daily_spending, average_daily_spending_as_of, budget_progress, category_totals,
    monthly_summary, spent_in_category, top_spending_category, top_spending_category_as_of,
    total_balance, total_by_type, years_available, yearly_summary, PeriodSummary, YearlySummary,
    NO_EXPENSES,
};
