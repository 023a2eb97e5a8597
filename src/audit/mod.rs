//! Audit trail for the finance tracker
//!
//! Every persisted mutation of the ledger, the goals or the budgets is
//! appended to `audit.log` as one JSON line.

mod change;
mod journal;

pub use change::{AuditRecord, Change};
pub use journal::AuditJournal;
