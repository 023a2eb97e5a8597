//! CLI command handlers
//!
//! This module contains the implementation of CLI commands,
//! bridging the clap argument parsing with the service layer.

pub mod backup;
pub mod budget;
pub mod export;
pub mod goal;
pub mod history;
pub mod import;
pub mod report;
pub mod transaction;

pub use backup::{handle_backup_command, BackupCommands};
pub use budget::{handle_budget_command, BudgetCommands};
pub use export::{handle_export_command, ExportCommands};
pub use goal::{handle_goal_command, GoalCommands};
pub use history::handle_history_command;
pub use import::{handle_import_command, handle_sample_csv_command};
pub use report::{handle_summary_command, handle_yearly_command, SummaryArgs};
pub use transaction::{
    handle_add_command, handle_delete_command, handle_list_command, AddArgs, ListArgs,
};
