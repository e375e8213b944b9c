//! Account CLI commands
//!
//! Implements CLI commands for the chart of accounts.

use clap::Subcommand;

use super::parse_money;
use crate::display::account::{format_account_details, format_account_list};
use crate::error::LedgerResult;
use crate::models::Money;
use crate::services::{AccountService, YearManager};

/// Account subcommands
#[derive(Subcommand)]
pub enum AccountCommands {
    /// Create a new account
    Create {
        /// Account number (1000-9999)
        number: u32,
        /// Description
        description: String,
        /// Incoming balance (e.g., "1000.00" or "1000")
        #[arg(short, long, default_value = "0")]
        incoming: String,
    },
    /// List all accounts with balances
    List,
    /// Show account details and postings
    Show {
        /// Account number
        number: u32,
    },
    /// Edit an account
    Edit {
        /// Account number
        number: u32,
        /// New description
        #[arg(short, long)]
        description: Option<String>,
        /// New incoming balance
        #[arg(short, long)]
        incoming: Option<String>,
    },
    /// Remove an account without postings
    Remove {
        /// Account number
        number: u32,
    },
}

/// Handle an account command
pub fn handle_account_command(years: &mut YearManager, cmd: AccountCommands) -> LedgerResult<()> {
    let year = years.current_year();

    match cmd {
        AccountCommands::Create {
            number,
            description,
            incoming,
        } => {
            let incoming = parse_money(&incoming)?;
            let account = AccountService::new(years).create(number, &description, incoming)?;

            println!("Created account: {}", account);
            if let Some(class) = account.class() {
                println!("  Class: {}", class);
            }
            if !account.incoming_balance.is_zero() {
                println!("  Incoming Balance: {}", account.incoming_balance);
            }
        }

        AccountCommands::List => {
            let summaries = AccountService::new(years).list_with_balances()?;
            println!("Accounts {}\n", year);
            print!("{}", format_account_list(&summaries));
        }

        AccountCommands::Show { number } => {
            let summary = AccountService::new(years).summary(number)?;
            let engine = years.current_balance_engine()?;
            let postings = engine.transactions_for(number);
            print!("{}", format_account_details(&summary, &postings));
        }

        AccountCommands::Edit {
            number,
            description,
            incoming,
        } => {
            if description.is_none() && incoming.is_none() {
                println!("No changes specified. Use --description or --incoming.");
                return Ok(());
            }

            let incoming: Option<Money> = incoming.as_deref().map(parse_money).transpose()?;
            let mut service = AccountService::new(years);
            let mut updated = service.get(number)?.clone();
            if let Some(description) = description {
                updated = service.update_description(number, &description)?;
            }
            if let Some(incoming) = incoming {
                updated = service.set_incoming_balance(number, incoming)?;
            }
            println!("Updated account: {}", updated);
        }

        AccountCommands::Remove { number } => {
            let removed = AccountService::new(years).remove(number)?;
            println!("Removed account: {}", removed);
        }
    }

    Ok(())
}
