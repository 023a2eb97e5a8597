//! Budget model
//!
//! Monthly spending limits keyed by category name, plus the quick-start
//! templates that bulk-assign limits.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use super::money::Money;

/// A predefined or user-supplied set of category limits
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BudgetTemplate {
    Conservative,
    Moderate,
    Custom(Vec<(String, Money)>),
}

const CONSERVATIVE: [(&str, i64); 5] = [
    ("Food", 3000),
    ("Transport", 1500),
    ("Shopping", 2000),
    ("Bills", 5000),
    ("Others", 1000),
];

const MODERATE: [(&str, i64); 5] = [
    ("Food", 5000),
    ("Transport", 2500),
    ("Shopping", 4000),
    ("Bills", 7000),
    ("Others", 2000),
];

impl BudgetTemplate {
    /// The category limits this template assigns, in application order
    pub fn entries(&self) -> Vec<(String, Money)> {
        fn fixed(table: &[(&str, i64)]) -> Vec<(String, Money)> {
            table
                .iter()
                .map(|(category, units)| (category.to_string(), Money::from_units(*units)))
                .collect()
        }

        match self {
            Self::Conservative => fixed(&CONSERVATIVE[..]),
            Self::Moderate => fixed(&MODERATE[..]),
            Self::Custom(entries) => entries.clone(),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Conservative => "Conservative",
            Self::Moderate => "Moderate",
            Self::Custom(_) => "Custom",
        }
    }

    /// Parse a custom template from "Category=Amount" pairs
    pub fn parse_custom<S: AsRef<str>>(pairs: &[S]) -> Result<Self, String> {
        let mut entries = Vec::with_capacity(pairs.len());
        for pair in pairs {
            let pair = pair.as_ref();
            let (category, amount) = pair
                .split_once('=')
                .ok_or_else(|| format!("Expected Category=Amount, got '{}'", pair))?;
            let category = category.trim();
            if category.is_empty() {
                return Err(format!("Missing category in '{}'", pair));
            }
            let amount = Money::parse(amount).map_err(|e| e.to_string())?;
            if amount.is_negative() {
                return Err(format!("Budget for '{}' cannot be negative", category));
            }
            entries.push((category.to_string(), amount));
        }
        Ok(Self::Custom(entries))
    }
}

impl fmt::Display for BudgetTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for BudgetTemplate {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "conservative" => Ok(Self::Conservative),
            "moderate" => Ok(Self::Moderate),
            other => Err(format!(
                "Unknown budget template '{}'; expected conservative or moderate",
                other
            )),
        }
    }
}

/// How a month's spending compares to its budget
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BudgetStatus {
    /// No budget has been set
    Unbudgeted,
    WithinBudget,
    /// More than 80% of the budget has been spent
    Approaching,
    Exceeded,
}

impl BudgetStatus {
    /// Percentage of the budget above which spending counts as approaching the limit
    pub const WARNING_THRESHOLD: f64 = 80.0;

    /// Classify from raw amounts so that overspending is never hidden by the display cap
    pub fn classify(budget: Money, spent: Money) -> Self {
        if !budget.is_positive() {
            return Self::Unbudgeted;
        }
        if spent > budget {
            return Self::Exceeded;
        }
        let pct = spent.as_f64() / budget.as_f64() * 100.0;
        if pct > Self::WARNING_THRESHOLD {
            Self::Approaching
        } else {
            Self::WithinBudget
        }
    }
}

impl fmt::Display for BudgetStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unbudgeted => write!(f, "No budget"),
            Self::WithinBudget => write!(f, "Within budget"),
            Self::Approaching => write!(f, "Approaching limit"),
            Self::Exceeded => write!(f, "Exceeded"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_template_entries() {
        let conservative = BudgetTemplate::Conservative.entries();
        assert_eq!(conservative.len(), 5);
        assert_eq!(conservative[0], ("Food".to_string(), Money::from_units(3000)));

        let moderate = BudgetTemplate::Moderate.entries();
        assert_eq!(moderate[3], ("Bills".to_string(), Money::from_units(7000)));
    }

    #[test]
    fn test_parse_template_name() {
        assert_eq!("Moderate".parse::<BudgetTemplate>(), Ok(BudgetTemplate::Moderate));
        assert!("lavish".parse::<BudgetTemplate>().is_err());
    }

    #[test]
    fn test_parse_custom() {
        let template = BudgetTemplate::parse_custom(&["Food=4500", "Rent = 12000.50"]).unwrap();
        assert_eq!(
            template.entries(),
            vec![
                ("Food".to_string(), Money::from_units(4500)),
                ("Rent".to_string(), Money::from_cents(1_200_050)),
            ]
        );
        assert!(BudgetTemplate::parse_custom(&["Food"]).is_err());
        assert!(BudgetTemplate::parse_custom(&["Food=-5"]).is_err());
    }

    #[test]
    fn test_status_classification() {
        let budget = Money::from_units(1000);
        assert_eq!(BudgetStatus::classify(Money::zero(), budget), BudgetStatus::Unbudgeted);
        assert_eq!(BudgetStatus::classify(budget, Money::from_units(500)), BudgetStatus::WithinBudget);
        assert_eq!(BudgetStatus::classify(budget, Money::from_units(800)), BudgetStatus::WithinBudget);
        assert_eq!(BudgetStatus::classify(budget, Money::from_units(850)), BudgetStatus::Approaching);
        assert_eq!(BudgetStatus::classify(budget, Money::from_units(1000)), BudgetStatus::Approaching);
        assert_eq!(BudgetStatus::classify(budget, Money::from_units(1001)), BudgetStatus::Exceeded);
    }
}
