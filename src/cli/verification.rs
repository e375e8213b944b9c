//! Verification CLI commands
//!
//! Implements CLI commands for booking and managing journal entries.

use chrono::Datelike;
use clap::Subcommand;

use super::{parse_date, parse_money};
use crate::display::verification::{format_verification_details, format_verification_list};
use crate::error::{LedgerError, LedgerResult};
use crate::models::Transaction;
use crate::services::{CreateVerificationInput, VerificationService, YearManager};

/// Verification subcommands
#[derive(Subcommand)]
pub enum VerificationCommands {
    /// Book a new verification
    Add {
        /// Booking date (YYYY-MM-DD), defaults to today
        #[arg(short, long)]
        date: Option<String>,
        /// Notes
        #[arg(short, long, default_value = "")]
        notes: String,
        /// Debit posting as ACCOUNT:AMOUNT (repeatable)
        #[arg(long = "debit", value_name = "ACCOUNT:AMOUNT")]
        debits: Vec<String>,
        /// Credit posting as ACCOUNT:AMOUNT (repeatable)
        #[arg(long = "credit", value_name = "ACCOUNT:AMOUNT")]
        credits: Vec<String>,
    },
    /// List verifications
    List {
        /// Include discarded verifications
        #[arg(short, long)]
        all: bool,
    },
    /// Show a verification
    Show {
        /// Verification id
        id: u32,
    },
    /// Mark a verification as discarded
    Discard {
        /// Verification id
        id: u32,
    },
    /// Undo a discard
    Restore {
        /// Verification id
        id: u32,
    },
    /// Delete a verification
    Remove {
        /// Verification id
        id: u32,
    },
}

/// Handle a verification command
pub fn handle_verification_command(
    years: &mut YearManager,
    cmd: VerificationCommands,
) -> LedgerResult<()> {
    match cmd {
        VerificationCommands::Add {
            date,
            notes,
            debits,
            credits,
        } => {
            let date = match date {
                Some(value) => parse_date(&value)?,
                None => chrono::Local::now().date_naive(),
            };
            if date.year() != years.current_year() {
                return Err(LedgerError::OutOfRange(format!(
                    "date {} is not in {}; use --year to select another year",
                    date,
                    years.current_year()
                )));
            }

            let mut transactions = Vec::with_capacity(debits.len() + credits.len());
            for posting in &debits {
                let (account, amount) = parse_posting(posting)?;
                transactions.push(Transaction::debit(account, parse_money(amount)?));
            }
            for posting in &credits {
                let (account, amount) = parse_posting(posting)?;
                transactions.push(Transaction::credit(account, parse_money(amount)?));
            }
            if transactions.is_empty() {
                return Err(LedgerError::Validation(
                    "At least one --debit or --credit posting is required".into(),
                ));
            }

            let verification = VerificationService::new(years).create(CreateVerificationInput {
                date,
                notes,
                transactions,
            })?;

            println!(
                "Created verification {} on {}",
                verification.id, verification.date
            );
            if !verification.is_balanced() {
                println!(
                    "Warning: debit {} and credit {} differ",
                    verification.total_debit(),
                    verification.total_credit()
                );
            }
        }

        VerificationCommands::List { all } => {
            let service = VerificationService::new(years);
            let verifications = service.list(all)?;
            print!("{}", format_verification_list(&verifications));
        }

        VerificationCommands::Show { id } => {
            let verification = VerificationService::new(years).get(id)?.clone();
            print!(
                "{}",
                format_verification_details(&verification, Some(years.accounts()?))
            );
        }

        VerificationCommands::Discard { id } => {
            VerificationService::new(years).set_discarded(id, true)?;
            println!("Discarded verification {}", id);
        }

        VerificationCommands::Restore { id } => {
            VerificationService::new(years).set_discarded(id, false)?;
            println!("Restored verification {}", id);
        }

        VerificationCommands::Remove { id } => {
            let removed = VerificationService::new(years).remove(id)?;
            println!("Removed verification {} ({})", removed.id, removed.date);
        }
    }

    Ok(())
}

/// Split "1920:100.00" into account number and amount text
fn parse_posting(value: &str) -> LedgerResult<(u32, &str)> {
    let invalid = || {
        LedgerError::Validation(format!(
            "Invalid posting: '{}'. Use ACCOUNT:AMOUNT, e.g. 1920:100.00",
            value
        ))
    };

    let (account, amount) = value.split_once(':').ok_or_else(invalid)?;
    let account = account.trim().parse().map_err(|_| invalid())?;
    Ok((account, amount.trim()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_posting() {
        assert_eq!(parse_posting("1920:100.00").unwrap(), (1920, "100.00"));
        assert_eq!(parse_posting(" 3000 : 5 ").unwrap(), (3000, "5"));
        assert!(parse_posting("1920").unwrap_err().is_validation());
        assert!(parse_posting("bank:5").unwrap_err().is_validation());
    }
}
