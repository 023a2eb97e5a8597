//! Backup CLI commands
//!
//! Implements CLI commands for backup management.

use chrono::Local;
use clap::Subcommand;

use crate::backup::{BackupManager, RestoreManager};
use crate::config::Settings;
use crate::error::{TrackerError, TrackerResult};
use crate::storage::Storage;

/// Backup subcommands
#[derive(Subcommand, Debug)]
pub enum BackupCommands {
    /// Copy the data files into the backup directory
    Create,

    /// List backup sets, newest first
    List {
        /// Show each file in a set
        #[arg(short, long)]
        verbose: bool,
    },

    /// Delete backups older than the retention period
    Prune {
        /// Days to keep (defaults to the configured retention)
        #[arg(short, long)]
        days: Option<u32>,
    },

    /// Restore the data files from a backup set
    Restore {
        /// Backup timestamp (YYYYmmdd_HHMMSS) or 'latest'
        timestamp: String,

        /// Skip confirmation prompt
        #[arg(short, long)]
        force: bool,
    },
}

/// Handle a backup command
pub fn handle_backup_command(
    storage: &Storage,
    settings: &Settings,
    cmd: BackupCommands,
) -> TrackerResult<()> {
    let paths = storage.paths().clone();
    let manager = BackupManager::new(paths.clone());

    match cmd {
        BackupCommands::Create => {
            let timestamp = manager.create_backup()?;
            println!("Backup created: {}", timestamp);
            println!("Location: {}", manager.backup_dir().display());
        }

        BackupCommands::List { verbose } => {
            let backups = manager.list_backups()?;

            if backups.is_empty() {
                println!("No backups found.");
                println!("Create one with: fintrack backup create");
                return Ok(());
            }

            println!("Available Backups");
            println!("=================");
            println!();

            let now = Local::now().naive_local();
            for (i, backup) in backups.iter().enumerate() {
                println!(
                    "  {}. {} ({} ago, {} file(s), {})",
                    i + 1,
                    backup.timestamp,
                    format_duration(now.signed_duration_since(backup.created_at)),
                    backup.files.len(),
                    format_size(backup.size_bytes),
                );
                if verbose {
                    for file in &backup.files {
                        println!("       {}", file.display());
                    }
                }
            }

            println!();
            println!("Total: {} backup(s)", backups.len());
        }

        BackupCommands::Prune { days } => {
            let days = days.unwrap_or(settings.backup_retention_days);
            let deleted = manager.cleanup_old_backups(days)?;
            if deleted.is_empty() {
                println!("No backups older than {} days.", days);
            } else {
                println!("Deleted {} backup file(s) older than {} days.", deleted.len(), days);
            }
        }

        BackupCommands::Restore { timestamp, force } => {
            let set = if timestamp.eq_ignore_ascii_case("latest") {
                manager.get_latest_backup()?
            } else {
                manager.get_backup(&timestamp)?
            }
            .ok_or_else(|| TrackerError::NotFound {
                entity_type: "Backup",
                identifier: timestamp.clone(),
            })?;

            println!("Backup {} ({} file(s))", set.timestamp, set.files.len());

            if !force {
                println!("WARNING: This will overwrite the current data files!");
                println!("To proceed, run again with --force flag:");
                println!("  fintrack backup restore {} --force", timestamp);
                return Ok(());
            }

            println!("Creating backup of current data before restore...");
            let pre_restore = manager.create_backup()?;
            println!("Pre-restore backup saved: {}", pre_restore);

            let result = RestoreManager::new(paths).restore(&set.timestamp)?;
            storage.reload_all()?;

            println!("Restore complete!");
            println!("{}", result.summary());
        }
    }

    Ok(())
}

/// Format a duration in human-readable form
fn format_duration(duration: chrono::Duration) -> String {
    let days = duration.num_days();
    if days > 0 {
        return format!("{} day{}", days, if days == 1 { "" } else { "s" });
    }

    let hours = duration.num_hours();
    if hours > 0 {
        return format!("{} hour{}", hours, if hours == 1 { "" } else { "s" });
    }

    let minutes = duration.num_minutes();
    if minutes > 0 {
        return format!("{} minute{}", minutes, if minutes == 1 { "" } else { "s" });
    }

    "just now".to_string()
}

/// Format file size in human-readable form
fn format_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;

    if bytes >= MB {
        format!("{:.1} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.1} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}
