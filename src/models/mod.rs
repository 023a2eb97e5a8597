//! Core data models for the finance tracker
//!
//! This module contains the data structures of the tracking domain:
//! ledger transactions, savings goals, budget templates and money.

pub mod budget;
pub mod goal;
pub mod money;
pub mod transaction;

pub use budget::{BudgetStatus, BudgetTemplate};
pub use goal::{Goal, MAX_GOAL_NAME_LENGTH, UNTITLED_GOAL};
pub use money::{Money, MoneyParseError};
pub use transaction::{
    parse_date, sanitize_input, validate_amount, validate_entry, Transaction, TransactionType,
    DATE_FORMAT, MAX_AMOUNT, MAX_CATEGORY_LENGTH, MAX_DESCRIPTION_LENGTH, MIN_AMOUNT,
};
