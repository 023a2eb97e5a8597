//! History CLI command
//!
//! Prints recent entries from the audit journal.

use chrono::Local;

use crate::error::TrackerResult;
use crate::storage::Storage;

/// Handle the history command
pub fn handle_history_command(storage: &Storage, limit: usize) -> TrackerResult<()> {
    let records = storage.audit().recent(limit)?;

    if records.is_empty() {
        println!("No changes recorded yet.");
        return Ok(());
    }

    println!("Recent Changes");
    println!("==============");
    for record in &records {
        println!(
            "  {}  {}",
            record.at.with_timezone(&Local).format("%Y-%m-%d %H:%M:%S"),
            record.change
        );
    }
    Ok(())
}
