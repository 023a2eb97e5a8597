//! Savings goal model
//!
//! A named savings target with a deadline. Progress is tracked by updating the
//! amount saved so far.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::money::Money;
use super::transaction::sanitize_input;

pub const MAX_GOAL_NAME_LENGTH: usize = 50;

/// Name shown for goals whose name cell is empty on disk
pub const UNTITLED_GOAL: &str = "Untitled Goal";

/// A savings goal
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Goal {
    pub name: String,
    pub target: Money,
    pub saved: Money,
    pub deadline: NaiveDate,
}

impl Goal {
    pub fn new(name: impl Into<String>, target: Money, saved: Money, deadline: NaiveDate) -> Self {
        Self {
            name: name.into(),
            target,
            saved,
            deadline,
        }
    }

    /// Fraction of the target reached, in [0, 1]; 0 when the target is not positive
    pub fn progress(&self) -> f64 {
        if !self.target.is_positive() {
            return 0.0;
        }
        (self.saved.as_f64() / self.target.as_f64()).clamp(0.0, 1.0)
    }

    /// Amount still to save, never negative
    pub fn remaining(&self) -> Money {
        let remaining = self.target - self.saved;
        if remaining.is_negative() {
            Money::zero()
        } else {
            remaining
        }
    }

    pub fn is_complete(&self) -> bool {
        self.target.is_positive() && self.saved >= self.target
    }

    /// Days from `today` until the deadline (negative once it has passed)
    pub fn days_left(&self, today: NaiveDate) -> i64 {
        (self.deadline - today).num_days()
    }

    /// Strip unsafe characters from the goal name
    pub fn sanitized(mut self) -> Self {
        self.name = sanitize_input(&self.name).trim().to_string();
        self
    }

    /// Validate a goal at entry time
    ///
    /// The saved amount may not exceed the target when the goal is created;
    /// later updates of the saved amount are not capped.
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        let name = self.name.trim();
        if name.is_empty() {
            errors.push("Please enter a goal name".to_string());
        } else if name.chars().count() > MAX_GOAL_NAME_LENGTH {
            errors.push(format!(
                "Goal name must be at most {} characters",
                MAX_GOAL_NAME_LENGTH
            ));
        }

        if self.target.is_negative() {
            errors.push("Target amount cannot be negative".to_string());
        }

        if self.saved.is_negative() {
            errors.push("Amount saved cannot be negative".to_string());
        } else if self.saved > self.target {
            errors.push("Amount saved cannot be more than target amount".to_string());
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}
