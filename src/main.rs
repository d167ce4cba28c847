use anyhow::Result;
use clap::{Parser, Subcommand};

use money_manager::cli::{
    handle_audit_command, handle_auth_command, handle_budget_command, handle_profile_command,
    handle_report_command, handle_settings_command, handle_transaction_command, AuthCommands,
    BudgetCommands, CommandContext, ProfileCommands, ReportCommands, SettingsCommands,
    TransactionCommands,
};
use money_manager::config::{MoneyPaths, Settings};
use money_manager::events::ChangeBus;
use money_manager::logging::init_tracing;
use money_manager::session::{IdentityProvider, SessionIdentity};
use money_manager::storage::Storage;

#[derive(Parser)]
#[command(
    name = "moneyman",
    version,
    about = "Track income and expenses against weekly and monthly budgets",
    long_about = "moneyman records income and expenses, keeps weekly and monthly \
                  spending limits, blocks expenses that would break them, and \
                  summarizes where the money went."
)]
struct Cli {
    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Sign in and out
    #[command(subcommand)]
    Auth(AuthCommands),

    /// Record and browse transactions
    #[command(subcommand, alias = "txn")]
    Transaction(TransactionCommands),

    /// Weekly and monthly budgets
    #[command(subcommand)]
    Budget(BudgetCommands),

    /// Dashboard and analytics
    #[command(subcommand)]
    Report(ReportCommands),

    /// Profile and currency
    #[command(subcommand)]
    Profile(ProfileCommands),

    /// Preferences
    #[command(subcommand)]
    Settings(SettingsCommands),

    /// Show recent changes from the audit log
    Audit {
        /// Number of entries to show
        #[arg(short = 'n', long, default_value = "20")]
        count: usize,
    },

    /// Show current configuration and paths
    Config,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let paths = MoneyPaths::new()?;
    let mut settings = Settings::load_or_create(&paths)?;
    let bus = ChangeBus::new();

    let command = match cli.command {
        Some(Commands::Auth(cmd)) => {
            handle_auth_command(&paths, &mut settings, cmd)?;
            return Ok(());
        }
        Some(Commands::Settings(cmd)) => {
            handle_settings_command(&paths, &mut settings, &bus, cmd)?;
            return Ok(());
        }
        Some(Commands::Config) => {
            println!("money-manager Configuration");
            println!("===========================");
            println!("Base directory:  {}", paths.base_dir().display());
            println!("Database:        {}", paths.database_file().display());
            println!("Settings file:   {}", paths.settings_file().display());
            println!("Audit log:       {}", paths.audit_log().display());
            return Ok(());
        }
        None => {
            println!("moneyman - income, expenses and budgets");
            println!();
            println!("Run 'moneyman auth login <email>' to get started.");
            println!("Run 'moneyman --help' for usage information.");
            return Ok(());
        }
        Some(other) => other,
    };

    let user = SessionIdentity::new(paths.session_file()).require_user()?;
    let storage = Storage::new(&paths)?;
    let ctx = CommandContext::new(&paths, &storage, &settings, &bus, user);

    match command {
        Commands::Transaction(cmd) => handle_transaction_command(&ctx, cmd)?,
        Commands::Budget(cmd) => handle_budget_command(&ctx, cmd)?,
        Commands::Report(cmd) => handle_report_command(&ctx, cmd)?,
        Commands::Profile(cmd) => handle_profile_command(&ctx, cmd)?,
        Commands::Audit { count } => handle_audit_command(&ctx, count)?,
        Commands::Auth(_) | Commands::Settings(_) | Commands::Config => {}
    }

    Ok(())
}
