//! Budget CLI commands
//!
//! Implements CLI commands for monthly category budgets: limits, templates,
//! recommendations, bulk import/export and the monthly overview.

use std::fs::File;
use std::io::{self, BufReader, BufWriter};
use std::path::PathBuf;

use chrono::{Datelike, Local};
use clap::Subcommand;

use crate::config::Settings;
use crate::error::{TrackerError, TrackerResult};
use crate::models::BudgetTemplate;
use crate::services::BudgetService;
use crate::storage::Storage;

use super::transaction::parse_amount;

/// Budget subcommands
#[derive(Subcommand, Debug)]
pub enum BudgetCommands {
    /// Show spending against budgets for a month
    Overview {
        /// Year (defaults to the current year)
        #[arg(short, long)]
        year: Option<i32>,
        /// Month 1-12 (defaults to the current month)
        #[arg(short, long, value_parser = clap::value_parser!(u32).range(1..=12))]
        month: Option<u32>,
    },

    /// Set the monthly limit for a category
    Set {
        /// Category name
        category: String,
        /// Amount (e.g., "3000" or "3000.00")
        amount: String,
    },

    /// Remove a category's limit
    Remove {
        /// Category name
        category: String,
    },

    /// Apply a predefined or custom template
    Template {
        /// conservative or moderate
        name: Option<String>,
        /// Custom limits instead of a named template
        #[arg(long = "set", value_name = "CATEGORY=AMOUNT", num_args = 1..)]
        custom: Vec<String>,
    },

    /// Suggest limits from the last 90 days of spending
    Recommend {
        /// Apply the suggested limits
        #[arg(long)]
        apply: bool,
    },

    /// List all category limits
    List,

    /// Load limits from a CSV file with Category and Budget columns
    Import {
        /// Path to CSV file
        file: PathBuf,
    },

    /// Write limits as CSV
    Export {
        /// Output file path (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

/// Handle a budget command
pub fn handle_budget_command(
    storage: &Storage,
    settings: &Settings,
    cmd: BudgetCommands,
) -> TrackerResult<()> {
    let service = BudgetService::new(storage);
    let symbol = &settings.currency_symbol;

    match cmd {
        BudgetCommands::Overview { year, month } => {
            let today = Local::now().date_naive();
            let overview = service.overview(
                year.unwrap_or(today.year()),
                month.unwrap_or(today.month()),
            )?;

            print!("{}", overview.format_terminal(symbol));

            for row in overview.exceeded() {
                println!(
                    "Warning: {} is over budget by {}",
                    row.category,
                    row.remaining.abs().format_with_symbol(symbol)
                );
            }
        }

        BudgetCommands::Set { category, amount } => {
            let amount = parse_amount(&amount)?;
            service.set(&category, amount)?;
            println!(
                "Budget for '{}' set to {}",
                category.trim(),
                amount.format_with_symbol(symbol)
            );
        }

        BudgetCommands::Remove { category } => {
            let removed = service.remove(&category)?;
            println!(
                "Removed budget for '{}' (was {})",
                category.trim(),
                removed.format_with_symbol(symbol)
            );
        }

        BudgetCommands::Template { name, custom } => {
            let template = if !custom.is_empty() {
                BudgetTemplate::parse_custom(&custom).map_err(TrackerError::validation)?
            } else {
                let name = name.ok_or_else(|| {
                    TrackerError::validation("Give a template name or --set CATEGORY=AMOUNT")
                })?;
                name.parse::<BudgetTemplate>()
                    .map_err(TrackerError::validation)?
            };

            let applied = service.apply_template(&template)?;
            println!("Applied {} template ({} categories)", template, applied);
        }

        BudgetCommands::Recommend { apply } => {
            let recommendations = service.recommend(Local::now().date_naive())?;

            if recommendations.is_empty() {
                println!("No expenses in the last 90 days to base recommendations on.");
                return Ok(());
            }

            println!("{:<24} {:>16} {:>16}", "Category", "Avg expense", "Recommended");
            println!("{}", "-".repeat(58));
            for rec in &recommendations {
                println!(
                    "{:<24} {:>16} {:>16}",
                    rec.category,
                    rec.average.format_with_symbol(symbol),
                    rec.recommended.format_with_symbol(symbol)
                );
            }

            if apply {
                let template = BudgetTemplate::Custom(
                    recommendations
                        .into_iter()
                        .map(|rec| (rec.category, rec.recommended))
                        .collect(),
                );
                let applied = service.apply_template(&template)?;
                println!("\nApplied {} recommended budget(s).", applied);
            }
        }

        BudgetCommands::List => {
            let budgets = service.all();
            if budgets.is_empty() {
                println!("No budgets set.");
                println!("Set one with: fintrack budget set <CATEGORY> <AMOUNT>");
                return Ok(());
            }

            println!("{:<30} {:>16}", "Category", "Monthly budget");
            println!("{}", "-".repeat(47));
            for (category, amount) in &budgets {
                println!("{:<30} {:>16}", category, amount.format_with_symbol(symbol));
            }
            println!("{}", "-".repeat(47));
            println!(
                "{:<30} {:>16}",
                "Total",
                budgets.values().sum::<crate::models::Money>().format_with_symbol(symbol)
            );
        }

        BudgetCommands::Import { file } => {
            let reader = File::open(&file).map(BufReader::new).map_err(|e| {
                TrackerError::Import(format!("Failed to read {}: {}", file.display(), e))
            })?;
            let applied = service.import_csv(reader)?;
            println!("Imported {} budget(s) from {}", applied, file.display());
        }

        BudgetCommands::Export { output } => match output {
            Some(path) => {
                let file = File::create(&path).map_err(|e| {
                    TrackerError::Export(format!("Failed to create file {}: {}", path.display(), e))
                })?;
                service.export_csv(BufWriter::new(file))?;
                println!("Budgets exported to: {}", path.display());
            }
            None => service.export_csv(io::stdout().lock())?,
        },
    }

    Ok(())
}
