use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::error;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::EnvFilter;

use finance_tracker::cli::{
    handle_add_command, handle_backup_command, handle_budget_command, handle_delete_command,
    handle_export_command, handle_goal_command, handle_history_command, handle_import_command,
    handle_list_command,
    handle_sample_csv_command, handle_summary_command, handle_yearly_command, AddArgs,
    BackupCommands, BudgetCommands, ExportCommands, GoalCommands, ListArgs, SummaryArgs,
};
use finance_tracker::config::{Settings, TrackerPaths};
use finance_tracker::storage::{initialize_storage, Storage};

#[derive(Parser)]
#[command(
    name = "fintrack",
    version,
    about = "Personal finance tracker",
    long_about = "Track income and expenses, monthly category budgets and savings \
                  goals. All data is kept in plain CSV files under the tracker's \
                  home directory."
)]
struct Cli {
    /// Use this directory instead of the default home
    #[arg(long, global = true, value_name = "DIR")]
    home: Option<PathBuf>,

    /// Log level when RUST_LOG is not set
    #[arg(long, global = true, default_value = "warn")]
    log_level: LevelFilter,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the data files and default settings
    Init,

    /// Show current configuration and paths
    Config,

    /// Record an income or expense
    Add(AddArgs),

    /// List transactions
    #[command(alias = "ls")]
    List(ListArgs),

    /// Delete a transaction by ID
    Delete {
        /// Transaction ID (as shown by `list`)
        id: usize,
    },

    /// Show balance, dashboard metrics and a month's totals
    Summary(SummaryArgs),

    /// Show a month-by-month table for one year
    Yearly {
        /// Year (defaults to the latest year with transactions)
        #[arg(short, long)]
        year: Option<i32>,
    },

    /// Import transactions from a CSV file
    Import {
        /// Path to CSV file
        file: PathBuf,
    },

    /// Print a sample import file
    SampleCsv,

    /// Budget management commands
    #[command(subcommand)]
    Budget(BudgetCommands),

    /// Savings goal commands
    #[command(subcommand)]
    Goal(GoalCommands),

    /// Backup management commands
    #[command(subcommand)]
    Backup(BackupCommands),

    /// Export all data
    #[command(subcommand)]
    Export(ExportCommands),

    /// Show recent changes from the audit log
    History {
        /// Number of entries to show
        #[arg(short = 'n', long, default_value_t = 20)]
        limit: usize,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logger(cli.log_level);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let paths = match cli.home {
        Some(home) => TrackerPaths::with_base_dir(home),
        None => TrackerPaths::new()?,
    };
    let settings = Settings::load_or_create(&paths)?;

    match cli.command {
        Commands::Init => {
            println!("Initializing finance tracker at: {}", paths.base_dir().display());
            let created = initialize_storage(&paths)?;
            if created == 0 {
                println!("Already initialized; nothing to do.");
            } else {
                println!("Initialization complete! Created {} file(s).", created);
                println!();
                println!("Add your first transaction with:");
                println!("  fintrack add income 50000 --category Salary");
            }
        }
        Commands::Config => {
            println!("Finance Tracker Configuration");
            println!("=============================");
            println!("Home directory:   {}", paths.base_dir().display());
            println!("Data directory:   {}", paths.data_dir().display());
            println!("Backup directory: {}", paths.backup_dir().display());
            println!("Audit log:        {}", paths.audit_log().display());
            println!();
            println!("Settings:");
            println!("  Currency symbol:     {}", settings.currency_symbol);
            println!("  Date format:         {}", settings.date_format);
            println!("  Cache TTL:           {}s", settings.cache_ttl_secs);
            println!("  Backup retention:    {} days", settings.backup_retention_days);
            println!("  Top category window: {} month(s)", settings.top_category_months);
            println!("  Average window:      {} days", settings.average_window_days);
            println!("  Categories:          {}", settings.default_categories.join(", "));
            if !paths.is_initialized() {
                println!();
                println!("Not initialized yet. Run 'fintrack init' to save these settings.");
            }
        }
        Commands::SampleCsv => handle_sample_csv_command(),
        command => {
            let storage = Storage::new(paths, &settings)?;
            dispatch(&storage, &settings, command)?;
        }
    }

    Ok(())
}

fn dispatch(storage: &Storage, settings: &Settings, command: Commands) -> Result<()> {
    match command {
        Commands::Add(args) => handle_add_command(storage, settings, args)?,
        Commands::List(args) => handle_list_command(storage, settings, args)?,
        Commands::Delete { id } => handle_delete_command(storage, settings, id)?,
        Commands::Summary(args) => handle_summary_command(storage, settings, args)?,
        Commands::Yearly { year } => handle_yearly_command(storage, settings, year)?,
        Commands::Import { file } => handle_import_command(storage, &file)?,
        Commands::Budget(cmd) => handle_budget_command(storage, settings, cmd)?,
        Commands::Goal(cmd) => handle_goal_command(storage, settings, cmd)?,
        Commands::Backup(cmd) => handle_backup_command(storage, settings, cmd)?,
        Commands::Export(cmd) => handle_export_command(storage, cmd)?,
        Commands::History { limit } => handle_history_command(storage, limit)?,
        Commands::Init | Commands::Config | Commands::SampleCsv => {}
    }
    Ok(())
}

pub fn init_logger(level: LevelFilter) {
    let filter = match std::env::var("RUST_LOG").ok() {
        Some(_) => EnvFilter::from_default_env(),
        None => {
            // Scope the default level to the library and this binary.
            EnvFilter::new(format!(
                "{}={},{}={}",
                env!("CARGO_PKG_NAME").replace('-', "_"),
                level,
                env!("CARGO_BIN_NAME"),
                level
            ))
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
