//! Budget service
//!
//! Monthly category budgets: setting limits, applying templates, bulk
//! import/export and the monthly overview.

use std::collections::BTreeMap;
use std::io::{Read, Write};

use chrono::NaiveDate;

use crate::audit::Change;
use crate::error::TrackerResult;
use crate::models::{sanitize_input, BudgetTemplate, Money};
use crate::reports::{recommend_budgets, BudgetOverview, BudgetRecommendation};
use crate::storage::Storage;

/// Service for budget management
pub struct BudgetService<'a> {
    storage: &'a Storage,
}

impl<'a> BudgetService<'a> {
    /// Create a new budget service
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Set the monthly limit for a category
    pub fn set(&self, category: &str, amount: Money) -> TrackerResult<()> {
        let previous = self.storage.budgets.set(category, amount)?;
        self.storage.record(Change::BudgetSet {
            category: sanitize_input(category).trim().to_string(),
            previous,
            amount,
        });
        Ok(())
    }

    /// Remove a category's limit
    pub fn remove(&self, category: &str) -> TrackerResult<Money> {
        let removed = self.storage.budgets.remove(category)?;
        self.storage.record(Change::BudgetRemoved {
            category: category.to_string(),
            amount: removed,
        });
        Ok(removed)
    }

    /// Apply a template, entry by entry
    pub fn apply_template(&self, template: &BudgetTemplate) -> TrackerResult<usize> {
        let entries = template.entries();
        for (category, amount) in &entries {
            self.set(category, *amount)?;
        }
        Ok(entries.len())
    }

    /// Every budget, sorted by category
    pub fn all(&self) -> BTreeMap<String, Money> {
        self.storage.budgets.all()
    }

    pub fn import_csv<R: Read>(&self, reader: R) -> TrackerResult<usize> {
        let applied = self.storage.budgets.import_csv(reader)?;
        self.storage.record(Change::BudgetsImported { applied });

        Ok(applied)
    }

    pub fn export_csv<W: Write>(&self, writer: W) -> TrackerResult<()> {
        self.storage.budgets.export_csv(writer)
    }

    /// Budget overview for one month
    pub fn overview(&self, year: i32, month: u32) -> TrackerResult<BudgetOverview> {
        let rows = self.storage.ledger.load()?;
        Ok(BudgetOverview::generate(&rows, &self.all(), year, month))
    }

    /// Suggested budgets from recent spending
    pub fn recommend(&self, today: NaiveDate) -> TrackerResult<Vec<BudgetRecommendation>> {
        let rows = self.storage.ledger.load()?;
        Ok(recommend_budgets(&rows, today))
    }
}
