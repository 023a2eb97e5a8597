//! CLI command handlers for CSV import
//!
//! Cleans an uploaded transaction file, merges it into the ledger and
//! prints the merge report.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::error::{TrackerError, TrackerResult};
use crate::services::{sample_csv, ImportOutcome, ImportService, Rejection};
use crate::storage::Storage;

/// Handle the import command
pub fn handle_import_command(storage: &Storage, file: &Path) -> TrackerResult<()> {
    if !file.exists() {
        return Err(TrackerError::Import(format!(
            "File not found: {}",
            file.display()
        )));
    }

    let reader = File::open(file)
        .map(BufReader::new)
        .map_err(|e| TrackerError::Import(format!("Failed to read file: {}", e)))?;

    match ImportService::new(storage).import_reader(reader)? {
        ImportOutcome::Merged(report) => {
            println!("Import of {}", file.display());
            println!("{}", "=".repeat(40));
            for line in report.lines() {
                println!("  {}", line);
            }
            println!();
            println!("Successfully added {} new transaction(s).", report.added());
            Ok(())
        }
        ImportOutcome::Rejected(rejection) => {
            if let Rejection::NoValidRecords(stats) = &rejection {
                println!("All {} row(s) were rejected:", stats.total_rows);
                println!("  Invalid dates:    {}", stats.invalid_dates);
                println!("  Invalid amounts:  {}", stats.invalid_amounts);
                println!("  Zero amounts:     {}", stats.zero_amounts);
                println!("  Invalid types:    {}", stats.invalid_types);
                println!("  Empty categories: {}", stats.empty_categories);
            }
            Err(TrackerError::Import(rejection.to_string()))
        }
    }
}

/// Print the sample import file to stdout
pub fn handle_sample_csv_command() {
    print!("{}", sample_csv());
}
