//! Transaction model
//!
//! A ledger row: an income or expense on a given day, tagged with a free-text
//! category and an optional description.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::money::Money;

/// Smallest amount accepted for a manual entry (0.01)
pub const MIN_AMOUNT: Money = Money::from_cents(1);

/// Largest amount accepted for a single transaction
pub const MAX_AMOUNT: Money = Money::from_units(1_000_000);

pub const MAX_CATEGORY_LENGTH: usize = 50;

pub const MAX_DESCRIPTION_LENGTH: usize = 200;

/// Date format used for every date written to disk
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Direction of a transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TransactionType {
    Income,
    Expense,
}

impl TransactionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Income => "Income",
            Self::Expense => "Expense",
        }
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransactionType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "income" => Ok(Self::Income),
            "expense" => Ok(Self::Expense),
            other => Err(format!("Unknown transaction type: '{}'", other)),
        }
    }
}

/// A single income or expense entry
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Transaction {
    /// Calendar date of the transaction
    pub date: NaiveDate,

    /// Income or expense
    #[serde(rename = "type")]
    pub kind: TransactionType,

    /// Non-negative amount; direction comes from `kind`
    pub amount: Money,

    /// Free-text category, linked to budgets by name only
    pub category: String,

    /// Optional free-text description (empty when absent)
    #[serde(default)]
    pub description: String,
}

impl Transaction {
    /// Create a new transaction
    pub fn new(
        date: NaiveDate,
        kind: TransactionType,
        amount: Money,
        category: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            date,
            kind,
            amount,
            category: category.into(),
            description: description.into(),
        }
    }

    /// Shorthand for an income entry
    pub fn income(date: NaiveDate, amount: Money, category: impl Into<String>) -> Self {
        Self::new(date, TransactionType::Income, amount, category, "")
    }

    /// Shorthand for an expense entry
    pub fn expense(date: NaiveDate, amount: Money, category: impl Into<String>) -> Self {
        Self::new(date, TransactionType::Expense, amount, category, "")
    }

    pub fn is_income(&self) -> bool {
        self.kind == TransactionType::Income
    }

    pub fn is_expense(&self) -> bool {
        self.kind == TransactionType::Expense
    }

    /// Strip unsafe characters from the free-text fields
    pub fn sanitized(mut self) -> Self {
        self.category = sanitize_input(&self.category).trim().to_string();
        self.description = sanitize_input(&self.description);
        self
    }

    /// Validate this transaction for manual entry
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let errors = validate_entry(self.amount, &self.category, &self.description);
        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

impl fmt::Display for Transaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} {}",
            self.date.format(DATE_FORMAT),
            self.kind,
            self.amount,
            self.category
        )
    }
}

/// Check an amount against [MIN_AMOUNT, MAX_AMOUNT]
pub fn validate_amount(amount: Money) -> bool {
    amount >= MIN_AMOUNT && amount <= MAX_AMOUNT
}

/// Category is required and limited to 50 characters after trimming
pub fn validate_category(category: &str) -> bool {
    let trimmed = category.trim();
    !trimmed.is_empty() && trimmed.chars().count() <= MAX_CATEGORY_LENGTH
}

pub fn validate_description(description: &str) -> bool {
    description.chars().count() <= MAX_DESCRIPTION_LENGTH
}

/// Validate a complete manual entry, collecting every failure message
pub fn validate_entry(amount: Money, category: &str, description: &str) -> Vec<String> {
    let mut errors = Vec::new();

    if !validate_amount(amount) {
        errors.push(format!(
            "Amount must be between {} and {}",
            MIN_AMOUNT, MAX_AMOUNT
        ));
    }

    if !validate_category(category) {
        errors.push(format!(
            "Category is required and must be at most {} characters",
            MAX_CATEGORY_LENGTH
        ));
    }

    if !validate_description(description) {
        errors.push(format!(
            "Description must be at most {} characters",
            MAX_DESCRIPTION_LENGTH
        ));
    }

    errors
}

/// Remove characters that could be interpreted as markup or quoting
pub fn sanitize_input(text: &str) -> String {
    text.chars()
        .filter(|c| !matches!(c, '<' | '>' | '"' | '\''))
        .collect()
}

/// Parse a date leniently, discarding any time of day
///
/// Accepts ISO dates with or without a time component plus the common
/// slash/dash layouts found in bank exports.
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }

    const DATE_FORMATS: [&str; 6] = [
        "%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y", "%d-%m-%Y", "%d.%m.%Y", "%m/%d/%y",
    ];
    const DATETIME_FORMATS: [&str; 3] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M"];

    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(s, format) {
            return Some(date);
        }
    }

    for format in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, format) {
            return Some(dt.date());
        }
    }

    // Fractional seconds or offsets: fall back to the leading date part
    s.get(..10)
        .and_then(|head| NaiveDate::parse_from_str(head, "%Y-%m-%d").ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_type_parse_and_display() {
        assert_eq!("Income".parse::<TransactionType>(), Ok(TransactionType::Income));
        assert_eq!(" expense ".parse::<TransactionType>(), Ok(TransactionType::Expense));
        assert!("Transfer".parse::<TransactionType>().is_err());
        assert_eq!(TransactionType::Expense.to_string(), "Expense");
    }

    #[test]
    fn test_validate_entry_collects_all_errors() {
        let long_description = "x".repeat(201);
        let errors = validate_entry(Money::zero(), "  ", &long_description);
        assert_eq!(errors.len(), 3);
        assert!(errors[0].starts_with("Amount must be between 0.01 and 1000000.00"));
    }

    #[test]
    fn test_validate_entry_bounds() {
        assert!(validate_entry(MIN_AMOUNT, "Food", "").is_empty());
        assert!(validate_entry(MAX_AMOUNT, "Food", "").is_empty());
        assert_eq!(
            validate_entry(MAX_AMOUNT + Money::from_cents(1), "Food", "").len(),
            1
        );
        assert_eq!(validate_entry(Money::from_units(5), &"c".repeat(51), "").len(), 1);
        assert!(validate_entry(Money::from_units(5), &"c".repeat(50), &"d".repeat(200)).is_empty());
    }

    #[test]
    fn test_sanitize_input() {
        assert_eq!(sanitize_input("<b>Tom's \"cafe\"</b>"), "bToms cafe/b");
        assert_eq!(sanitize_input("Groceries"), "Groceries");
    }

    #[test]
    fn test_sanitized_trims_category() {
        let txn = Transaction::new(
            date(2025, 1, 1),
            TransactionType::Expense,
            Money::from_units(5),
            "  Food<> ",
            "lunch's",
        )
        .sanitized();
        assert_eq!(txn.category, "Food");
        assert_eq!(txn.description, "lunchs");
    }

    #[test]
    fn test_parse_date_formats() {
        assert_eq!(parse_date("2025-01-15"), Some(date(2025, 1, 15)));
        assert_eq!(parse_date("2025-01-15 13:45:00"), Some(date(2025, 1, 15)));
        assert_eq!(parse_date("2025-01-15T08:00:00"), Some(date(2025, 1, 15)));
        assert_eq!(parse_date("2025-01-15 08:00:00.000"), Some(date(2025, 1, 15)));
        assert_eq!(parse_date("01/15/2025"), Some(date(2025, 1, 15)));
        assert_eq!(parse_date("2025/01/15"), Some(date(2025, 1, 15)));
        assert_eq!(parse_date("not a date"), None);
        assert_eq!(parse_date("2025-02-30"), None);
        assert_eq!(parse_date(""), None);
    }

    #[test]
    fn test_full_row_equality() {
        let a = Transaction::expense(date(2025, 1, 1), Money::from_units(10), "Food");
        let mut b = a.clone();
        assert_eq!(a, b);
        b.description = "different".into();
        assert_ne!(a, b);
    }
}
