//! Display formatting for terminal output
//!
//! Provides utilities for formatting ledger rows, goals and report pieces
//! for terminal display.

pub mod goal;
pub mod report;
pub mod transaction;

pub use goal::format_goal_list;
pub use report::{format_bar, format_money_colored, format_percentage, separator, truncate};
pub use transaction::{format_transaction_register, format_transaction_row};
