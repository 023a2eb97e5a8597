//! CLI commands for data export
//!
//! Writes the full snapshot as JSON or YAML, and checks existing JSON exports.

use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use clap::Subcommand;

use crate::error::{TrackerError, TrackerResult};
use crate::export::{export_full_json, export_full_yaml, import_from_json};
use crate::storage::Storage;

/// Export subcommands
#[derive(Subcommand, Debug)]
pub enum ExportCommands {
    /// Export everything as JSON
    Json {
        /// Output file path (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Pretty-print the output
        #[arg(long)]
        pretty: bool,
    },

    /// Export everything as YAML
    Yaml {
        /// Output file path (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Check that a JSON export is readable and consistent
    Verify {
        /// Path to a JSON export
        file: PathBuf,
    },
}

/// Handle export commands
pub fn handle_export_command(storage: &Storage, cmd: ExportCommands) -> TrackerResult<()> {
    match cmd {
        ExportCommands::Json { output, pretty } => {
            write_to(output.as_deref(), |w| export_full_json(storage, w, pretty))
        }
        ExportCommands::Yaml { output } => {
            write_to(output.as_deref(), |w| export_full_yaml(storage, w))
        }
        ExportCommands::Verify { file } => {
            let contents = fs::read_to_string(&file).map_err(|e| {
                TrackerError::Import(format!("Failed to read {}: {}", file.display(), e))
            })?;
            let export = import_from_json(&contents)?;

            println!("Export is valid");
            println!("  Schema version: {}", export.schema_version);
            println!("  Exported at:    {}", export.exported_at);
            println!("  Transactions:   {}", export.metadata.transaction_count);
            println!("  Goals:          {}", export.metadata.goal_count);
            println!("  Budgets:        {}", export.metadata.budget_count);
            Ok(())
        }
    }
}

/// Run `export` against a file, or stdout when no path is given
fn write_to<F>(output: Option<&Path>, export: F) -> TrackerResult<()>
where
    F: FnOnce(&mut dyn Write) -> TrackerResult<()>,
{
    match output {
        Some(path) => {
            let file = File::create(path).map_err(|e| {
                TrackerError::Export(format!("Failed to create file {}: {}", path.display(), e))
            })?;
            let mut writer = BufWriter::new(file);
            export(&mut writer)?;
            writer
                .flush()
                .map_err(|e| TrackerError::Export(e.to_string()))?;
            eprintln!("Full database exported to: {}", path.display());
        }
        None => {
            let mut stdout = io::stdout().lock();
            export(&mut stdout)?;
            writeln!(stdout).map_err(|e| TrackerError::Export(e.to_string()))?;
        }
    }
    Ok(())
}
