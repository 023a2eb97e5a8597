//! Service layer for the finance tracker
//!
//! The service layer provides business logic on top of the storage layer,
//! handling validation, cross-store operations and the audit journal.

pub mod budget;
pub mod goal;
pub mod import;
pub mod transaction;

pub use budget::BudgetService;
pub use goal::GoalService;
pub use import::{
    clean, sample_csv, CleanStats, CleanedBatch, ImportOutcome, ImportReport, ImportService,
    Rejection,
};
pub use transaction::{CreateTransactionInput, TransactionFilter, TransactionService};
