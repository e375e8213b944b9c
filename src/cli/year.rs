//! Fiscal year CLI commands

use clap::Subcommand;

use crate::error::LedgerResult;
use crate::services::YearManager;

/// Year subcommands
#[derive(Subcommand)]
pub enum YearCommands {
    /// List fiscal years
    List,
    /// Create the year after the last one, carrying balances forward
    New,
    /// Recompute the selected year's incoming balances from the year before
    Recalc,
}

/// Handle a year command
pub fn handle_year_command(years: &mut YearManager, cmd: YearCommands) -> LedgerResult<()> {
    match cmd {
        YearCommands::List => {
            for year in years.years() {
                let store = years.store(year)?;
                let marker = if year == years.current_year() { "*" } else { " " };
                println!(
                    "{} {}  {:>4} accounts  {:>5} verifications",
                    marker,
                    year,
                    store.accounts.len(),
                    store.verifications.len()
                );
            }
        }

        YearCommands::New => {
            let year = years.create_new_year()?;
            println!("Created fiscal year {}", year);
            println!("Incoming balances carried from {}", year - 1);
        }

        YearCommands::Recalc => {
            years.recalc_incoming_balances()?;
            let accounts = years.accounts()?;
            accounts.save_with_message(&format!(
                "{}: recalculate incoming balances",
                accounts.year()
            ))?;
            println!("Recalculated incoming balances for {}", accounts.year());
        }
    }

    Ok(())
}
