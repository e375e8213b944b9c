use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use ledger::cli::{
    committer_for, handle_account_command, handle_report_command, handle_verification_command,
    handle_year_command, open_ledger,
};
use ledger::config::{LedgerPaths, Settings};
use ledger::services::YearManager;

#[derive(Parser)]
#[command(
    name = "ledger",
    author = "Kaylee Beyene",
    version,
    about = "Terminal-based double-entry bookkeeping",
    long_about = "Ledger keeps a chart of accounts and a journal of verifications per \
                  fiscal year, computes balances and carries closing balances into \
                  the next year. All data is stored as JSON under version control."
)]
struct Cli {
    /// Fiscal year to work in (defaults to the latest)
    #[arg(short, long, global = true)]
    year: Option<i32>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Fiscal year commands
    #[command(subcommand)]
    Year(ledger::cli::YearCommands),

    /// Account management commands
    #[command(subcommand)]
    Account(ledger::cli::AccountCommands),

    /// Verification management commands
    #[command(subcommand, alias = "ver")]
    Verification(ledger::cli::VerificationCommands),

    /// Balance and result reports
    #[command(subcommand)]
    Report(ledger::cli::ReportCommands),

    /// Initialize a new ledger
    Init,

    /// Show current configuration and paths
    Config,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("ledger=warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    // Initialize paths and settings
    let paths = LedgerPaths::new()?;
    let settings = Settings::load_or_create(&paths)?;
    let paths = settings.apply_to(paths);

    match cli.command {
        Some(Commands::Year(cmd)) => {
            let mut years = open_ledger(&paths, &settings, cli.year)?;
            handle_year_command(&mut years, cmd)?;
        }
        Some(Commands::Account(cmd)) => {
            let mut years = open_ledger(&paths, &settings, cli.year)?;
            handle_account_command(&mut years, cmd)?;
        }
        Some(Commands::Verification(cmd)) => {
            let mut years = open_ledger(&paths, &settings, cli.year)?;
            handle_verification_command(&mut years, cmd)?;
        }
        Some(Commands::Report(cmd)) => {
            let years = open_ledger(&paths, &settings, cli.year)?;
            handle_report_command(&years, &settings, cmd)?;
        }
        Some(Commands::Init) => {
            println!("Initializing ledger at: {}", paths.base_dir().display());
            paths.ensure_directories()?;
            settings.save(&paths)?;

            let committer = committer_for(&paths, &settings);
            let years = match cli.year {
                Some(year) => YearManager::open_with_bootstrap_year(
                    paths.clone(),
                    &settings,
                    committer,
                    year,
                )?,
                None => YearManager::open(paths.clone(), &settings, committer)?,
            };
            println!("Initialization complete!");
            println!("Fiscal years: {:?}", years.years());
            println!();
            println!("Run 'ledger account create 1920 Bank' to add your first account.");
        }
        Some(Commands::Config) => {
            println!("Ledger Configuration");
            println!("====================");
            println!("Base directory:  {}", paths.base_dir().display());
            println!("Settings file:   {}", paths.settings_file().display());
            println!("Data directory:  {}", paths.data_dir().display());
            println!();
            println!("Settings:");
            println!("  Company name:        {}", settings.company_name);
            println!("  Company number:      {}", settings.company_number);
            println!("  Accounts file:       {}", settings.accounts_filename);
            println!("  Verifications dir:   {}", settings.verifications_dirname);
            println!("  Auto commit:         {}", settings.auto_commit);
            println!("  Include discarded:   {}", settings.include_discarded);
            println!(
                "  Skip malformed:      {}",
                settings.skip_malformed_verifications
            );
        }
        None => {
            println!("Ledger - Terminal-based double-entry bookkeeping");
            println!();
            println!("Run 'ledger --help' for usage information.");
        }
    }

    Ok(())
}
