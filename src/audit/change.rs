//! Changes recorded in the audit journal

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::{Goal, Money, Transaction};

/// One persisted mutation of the ledger, the goals or the budgets
///
/// Row and goal ids are positions at the time of the change; later deletes
/// shift them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Change {
    TransactionAdded {
        row_id: usize,
        transaction: Transaction,
    },
    TransactionDeleted {
        row_id: usize,
        transaction: Transaction,
    },
    TransactionsImported {
        kept: usize,
        duplicates_removed: usize,
        before: usize,
        after: usize,
    },
    GoalAdded {
        goal_id: usize,
        goal: Goal,
    },
    GoalSavingsUpdated {
        goal_id: usize,
        name: String,
        before: Money,
        after: Money,
    },
    GoalDeleted {
        goal_id: usize,
        goal: Goal,
    },
    BudgetSet {
        category: String,
        /// `None` when the category had no limit
        previous: Option<Money>,
        amount: Money,
    },
    BudgetRemoved {
        category: String,
        amount: Money,
    },
    BudgetsImported {
        applied: usize,
    },
}

impl fmt::Display for Change {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TransactionAdded { row_id, transaction } => {
                write!(f, "added transaction [{}] {}", row_id, transaction)
            }
            Self::TransactionDeleted { row_id, transaction } => {
                write!(f, "deleted transaction [{}] {}", row_id, transaction)
            }
            Self::TransactionsImported {
                kept,
                duplicates_removed,
                before,
                after,
            } => write!(
                f,
                "imported {} rows ({} duplicates removed), ledger {} -> {}",
                kept, duplicates_removed, before, after
            ),
            Self::GoalAdded { goal_id, goal } => {
                write!(f, "added goal [{}] '{}' target {}", goal_id, goal.name, goal.target)
            }
            Self::GoalSavingsUpdated {
                goal_id,
                name,
                before,
                after,
            } => write!(f, "goal [{}] '{}' saved {} -> {}", goal_id, name, before, after),
            Self::GoalDeleted { goal_id, goal } => {
                write!(f, "deleted goal [{}] '{}'", goal_id, goal.name)
            }
            Self::BudgetSet {
                category,
                previous: Some(previous),
                amount,
            } => write!(f, "budget '{}' {} -> {}", category, previous, amount),
            Self::BudgetSet {
                category,
                previous: None,
                amount,
            } => write!(f, "budget '{}' set to {}", category, amount),
            Self::BudgetRemoved { category, amount } => {
                write!(f, "removed budget '{}' (was {})", category, amount)
            }
            Self::BudgetsImported { applied } => write!(f, "imported {} budgets", applied),
        }
    }
}

/// A change with the time it was recorded
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditRecord {
    pub at: DateTime<Utc>,
    pub change: Change,
}

impl AuditRecord {
    pub fn now(change: Change) -> Self {
        Self {
            at: Utc::now(),
            change,
        }
    }
}
