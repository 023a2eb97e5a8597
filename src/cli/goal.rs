//! Goal CLI commands

use std::fs::File;
use std::io::{self, BufWriter};
use std::path::PathBuf;

use chrono::{Local, NaiveDate};
use clap::Subcommand;

use crate::config::Settings;
use crate::display::format_goal_list;
use crate::error::{TrackerError, TrackerResult};
use crate::export::export_goals_csv;
use crate::models::Money;
use crate::services::GoalService;
use crate::storage::Storage;

use super::transaction::parse_amount;

/// Goal subcommands
#[derive(Subcommand, Debug)]
pub enum GoalCommands {
    /// Add a savings goal
    Add {
        /// Goal name
        name: String,
        /// Target amount
        target: String,
        /// Deadline (YYYY-MM-DD)
        #[arg(short, long)]
        deadline: NaiveDate,
        /// Amount already saved
        #[arg(short, long)]
        saved: Option<String>,
    },

    /// List goals with progress, nearest deadline first
    List,

    /// Record how much has been saved toward a goal
    Update {
        /// Goal ID (as shown by `goal list`)
        id: usize,
        /// New saved amount
        saved: String,
    },

    /// Delete a goal
    Delete {
        /// Goal ID (as shown by `goal list`)
        id: usize,
    },

    /// Write goals as CSV
    Export {
        /// Output file path (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

/// Handle a goal command
pub fn handle_goal_command(
    storage: &Storage,
    settings: &Settings,
    cmd: GoalCommands,
) -> TrackerResult<()> {
    let service = GoalService::new(storage);
    let symbol = &settings.currency_symbol;

    match cmd {
        GoalCommands::Add {
            name,
            target,
            deadline,
            saved,
        } => {
            let target = parse_amount(&target)?;
            let saved = match saved {
                Some(saved) => parse_amount(&saved)?,
                None => Money::zero(),
            };

            let (id, goal) = service.create(&name, target, saved, deadline)?;
            println!(
                "Created goal [{}] '{}': {} by {}",
                id,
                goal.name,
                goal.target.format_with_symbol(symbol),
                goal.deadline.format(&settings.date_format)
            );
        }

        GoalCommands::List => {
            let goals = service.list()?;
            print!(
                "{}",
                format_goal_list(&goals, Local::now().date_naive(), symbol)
            );
        }

        GoalCommands::Update { id, saved } => {
            let goal = service.update_saved(id, parse_amount(&saved)?)?;
            println!(
                "Updated '{}': saved {} of {} ({:.0}%)",
                goal.name,
                goal.saved.format_with_symbol(symbol),
                goal.target.format_with_symbol(symbol),
                goal.progress() * 100.0
            );
            if goal.is_complete() {
                println!("Goal reached!");
            }
        }

        GoalCommands::Delete { id } => {
            let goal = service.delete(id)?;
            println!("Deleted goal '{}'", goal.name);
        }

        GoalCommands::Export { output } => {
            let goals: Vec<_> = service.list()?.into_iter().map(|(_, g)| g).collect();
            match output {
                Some(path) => {
                    let file = File::create(&path).map_err(|e| {
                        TrackerError::Export(format!(
                            "Failed to create file {}: {}",
                            path.display(),
                            e
                        ))
                    })?;
                    export_goals_csv(BufWriter::new(file), &goals)?;
                    println!("Goals exported to: {}", path.display());
                }
                None => export_goals_csv(io::stdout().lock(), &goals)?,
            }
        }
    }

    Ok(())
}
