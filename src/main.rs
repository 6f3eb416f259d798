use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use tally_cli::cli::{
    handle_backup_command, handle_budget_command, handle_export_command, handle_goal_command,
    handle_health_command, handle_recurring_command, handle_report_command,
    handle_transaction_command, handle_user_command, require_session, run_menu,
};
use tally_cli::config::{paths::TallyPaths, settings::Settings};
use tally_cli::storage::Storage;

/// Environment variable holding the log filter, e.g. `TALLY_LOG=debug`
const LOG_ENV: &str = "TALLY_LOG";

#[derive(Parser)]
#[command(
    name = "tally",
    author = "Kaylee Beyene",
    version,
    about = "Terminal-based personal finance tracker",
    long_about = "Tally tracks income and expenses per user, with search, \
                  monthly reports, budget limits, savings goals and recurring \
                  transactions. Run without a command for the interactive menu."
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Launch the interactive menu
    Menu,

    /// User registration and login
    #[command(subcommand)]
    User(tally_cli::cli::UserCommands),

    /// Transaction management commands
    #[command(subcommand, alias = "transaction")]
    Txn(tally_cli::cli::TransactionCommands),

    /// Reports over your transactions
    #[command(subcommand)]
    Report(tally_cli::cli::ReportCommands),

    /// Per-category spending limits
    #[command(subcommand)]
    Budget(tally_cli::cli::BudgetCommands),

    /// Savings goals
    #[command(subcommand)]
    Goal(tally_cli::cli::GoalCommands),

    /// Recurring transactions
    #[command(subcommand)]
    Recurring(tally_cli::cli::RecurringCommands),

    /// Financial health score
    Health,

    /// Backup management commands
    #[command(subcommand)]
    Backup(tally_cli::cli::BackupCommands),

    /// Export your data as CSV, JSON or YAML
    Export(tally_cli::cli::ExportArgs),

    /// Show recent audit log entries
    Audit {
        /// Number of entries to show
        #[arg(short, long, default_value = "20")]
        limit: usize,
    },

    /// Create the data directories and default settings
    Init,

    /// Show current configuration and paths
    Config,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    // Initialize paths and settings
    let paths = TallyPaths::new()?;
    let settings = Settings::load_or_create(&paths)?;

    // Initialize storage
    let storage = Storage::new(paths.clone())?;
    storage.load_all()?;

    match cli.command {
        None | Some(Commands::Menu) => {
            run_menu(&storage, &settings)?;
        }
        Some(Commands::User(cmd)) => {
            handle_user_command(&storage, &settings, cmd)?;
        }
        Some(Commands::Txn(cmd)) => {
            let session = require_session(&storage)?;
            handle_transaction_command(&storage, &settings, &session, cmd)?;
        }
        Some(Commands::Report(cmd)) => {
            let session = require_session(&storage)?;
            handle_report_command(&storage, &settings, &session, cmd)?;
        }
        Some(Commands::Budget(cmd)) => {
            let session = require_session(&storage)?;
            handle_budget_command(&storage, &settings, &session, cmd)?;
        }
        Some(Commands::Goal(cmd)) => {
            let session = require_session(&storage)?;
            handle_goal_command(&storage, &settings, &session, cmd)?;
        }
        Some(Commands::Recurring(cmd)) => {
            let session = require_session(&storage)?;
            handle_recurring_command(&storage, &settings, &session, cmd)?;
        }
        Some(Commands::Health) => {
            let session = require_session(&storage)?;
            handle_health_command(&storage, &settings, &session)?;
        }
        Some(Commands::Backup(cmd)) => {
            handle_backup_command(&paths, &settings, cmd)?;
        }
        Some(Commands::Export(args)) => {
            let session = require_session(&storage)?;
            handle_export_command(&storage, &session, args)?;
        }
        Some(Commands::Audit { limit }) => {
            let entries = storage.audit().read_recent(limit)?;
            if entries.is_empty() {
                println!("No audit entries yet.");
            }
            for entry in entries {
                println!("{}", entry.format_human_readable());
            }
        }
        Some(Commands::Init) => {
            if paths.is_initialized() {
                println!("Tally is already initialized at: {}", paths.base_dir().display());
                return Ok(());
            }
            println!("Initializing Tally at: {}", paths.base_dir().display());
            paths.ensure_directories()?;
            settings.save(&paths)?;
            println!("Initialization complete!");
            println!();
            println!("Next: register a user with 'tally user register <name>'");
            println!("or run 'tally' for the interactive menu.");
        }
        Some(Commands::Config) => {
            println!("Tally Configuration");
            println!("===================");
            println!("Base directory:   {}", paths.base_dir().display());
            println!("Data directory:   {}", paths.data_dir().display());
            println!("Backup directory: {}", paths.backup_dir().display());
            println!("Audit log:        {}", paths.audit_log().display());
            println!();
            println!("Settings:");
            println!("  Currency symbol:  {}", settings.currency_symbol);
            println!("  Default currency: {}", settings.default_currency);
            println!("  Auto backup:      {}", settings.auto_backup);
            println!(
                "  Backups kept:     {}",
                settings.backup_retention.max_backups
            );
            println!("  Recurring:        {}", settings.features.enable_recurring);
            println!("  Budgets:          {}", settings.features.enable_budgets);
            println!("  Goals:            {}", settings.features.enable_goals);
        }
    }

    Ok(())
}
