//! Goal store for the savings goals CSV file

use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::error::{TrackerError, TrackerResult};
use crate::models::{parse_date, Goal, Money, DATE_FORMAT, UNTITLED_GOAL};

use super::file_io::{read_csv_file, write_csv_atomic, CsvTable};

/// Column order of the goals file
pub const GOAL_COLUMNS: [&str; 4] = ["Goal", "Target Amount", "Amount Saved", "Deadline"];

/// Store for savings goals
///
/// Goals are identified by their position in the file.
pub struct GoalStore {
    path: PathBuf,
}

impl GoalStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load every goal in file order
    pub fn load(&self) -> TrackerResult<Vec<Goal>> {
        let table = match read_csv_file(&self.path)? {
            Some(table) => table,
            None => return Ok(Vec::new()),
        };

        let name_col = table.column("Goal");
        let target_col = table.column("Target Amount");
        let saved_col = table.column("Amount Saved");
        let deadline_col = table.column("Deadline");

        let mut goals = Vec::with_capacity(table.records.len());
        let mut dropped = 0usize;

        for record in &table.records {
            let target = Money::parse(CsvTable::field(record, target_col));
            let saved = Money::parse(CsvTable::field(record, saved_col));
            let deadline = parse_date(CsvTable::field(record, deadline_col));

            match (target, saved, deadline) {
                (Ok(target), Ok(saved), Some(deadline)) => {
                    let name = match CsvTable::field(record, name_col) {
                        "" => UNTITLED_GOAL,
                        name => name,
                    };
                    goals.push(Goal::new(name, target, saved, deadline));
                }
                _ => dropped += 1,
            }
        }

        if dropped > 0 {
            warn!(dropped, path = %self.path.display(), "dropped malformed goal rows");
        }
        debug!(goals = goals.len(), "loaded goals");

        Ok(goals)
    }

    /// Replace the whole file with `goals`
    pub fn save(&self, goals: &[Goal]) -> TrackerResult<()> {
        write_csv_atomic(&self.path, &GOAL_COLUMNS, goals.iter().map(goal_to_record))?;
        debug!(goals = goals.len(), "saved goals");
        Ok(())
    }

    /// Validate and append a goal, returning the stored goal and its index
    pub fn add(&self, goal: Goal) -> TrackerResult<(usize, Goal)> {
        let goal = goal.sanitized();
        goal.validate().map_err(TrackerError::Validation)?;

        let mut goals = self.load()?;
        goals.push(goal.clone());
        self.save(&goals)?;

        info!(name = %goal.name, target = %goal.target, "added goal");
        Ok((goals.len() - 1, goal))
    }

    /// Set the saved amount of the goal at `index`, returning (before, after)
    pub fn update_saved(&self, index: usize, saved: Money) -> TrackerResult<(Goal, Goal)> {
        if saved.is_negative() {
            return Err(TrackerError::validation("Amount saved cannot be negative"));
        }

        let mut goals = self.load()?;
        let goal = goals
            .get_mut(index)
            .ok_or_else(|| TrackerError::goal_not_found(index.to_string()))?;

        let before = goal.clone();
        goal.saved = saved;
        let after = goal.clone();
        self.save(&goals)?;

        info!(index, name = %after.name, saved = %saved, "updated goal progress");
        Ok((before, after))
    }

    /// Remove the goal at `index`, returning it
    pub fn delete(&self, index: usize) -> TrackerResult<Goal> {
        let mut goals = self.load()?;
        if index >= goals.len() {
            return Err(TrackerError::goal_not_found(index.to_string()));
        }

        let removed = goals.remove(index);
        self.save(&goals)?;

        info!(index, name = %removed.name, "deleted goal");
        Ok(removed)
    }

    /// Goals with their file index, nearest deadline first
    pub fn list_by_deadline(&self) -> TrackerResult<Vec<(usize, Goal)>> {
        let mut goals: Vec<_> = self.load()?.into_iter().enumerate().collect();
        goals.sort_by_key(|(_, g)| g.deadline);
        Ok(goals)
    }
}

/// Serialize a goal in goal column order
pub fn goal_to_record(goal: &Goal) -> Vec<String> {
    vec![
        goal.name.clone(),
        goal.target.to_string(),
        goal.saved.to_string(),
        goal.deadline.format(DATE_FORMAT).to_string(),
    ]
}
