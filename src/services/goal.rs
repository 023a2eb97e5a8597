//! Goal service
//!
//! Savings goal management with audit logging.

use chrono::NaiveDate;

use crate::audit::Change;
use crate::error::TrackerResult;
use crate::models::{Goal, Money};
use crate::storage::Storage;

/// Service for savings goals
pub struct GoalService<'a> {
    storage: &'a Storage,
}

impl<'a> GoalService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Create a goal, returning its id and stored form
    pub fn create(
        &self,
        name: &str,
        target: Money,
        saved: Money,
        deadline: NaiveDate,
    ) -> TrackerResult<(usize, Goal)> {
        let (id, goal) = self
            .storage
            .goals
            .add(Goal::new(name, target, saved, deadline))?;

        self.storage.record(Change::GoalAdded {
            goal_id: id,
            goal: goal.clone(),
        });

        Ok((id, goal))
    }

    /// Goals with their ids, nearest deadline first
    pub fn list(&self) -> TrackerResult<Vec<(usize, Goal)>> {
        self.storage.goals.list_by_deadline()
    }

    /// Set how much has been saved toward goal `id`
    pub fn update_saved(&self, id: usize, saved: Money) -> TrackerResult<Goal> {
        let (before, after) = self.storage.goals.update_saved(id, saved)?;

        self.storage.record(Change::GoalSavingsUpdated {
            goal_id: id,
            name: after.name.clone(),
            before: before.saved,
            after: after.saved,
        });

        Ok(after)
    }

    pub fn delete(&self, id: usize) -> TrackerResult<Goal> {
        let removed = self.storage.goals.delete(id)?;

        self.storage.record(Change::GoalDeleted {
            goal_id: id,
            goal: removed.clone(),
        });

        Ok(removed)
    }
}
