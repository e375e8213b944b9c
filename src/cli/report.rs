//! CLI commands for reports
//!
//! Provides commands for printing and exporting the balance and result
//! reports.

use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use clap::Subcommand;

use super::parse_optional_date;
use crate::config::Settings;
use crate::error::{LedgerError, LedgerResult};
use crate::reports::{report_period, BalanceReport, ResultReport};
use crate::services::YearManager;

/// Report subcommands
#[derive(Subcommand, Debug)]
pub enum ReportCommands {
    /// Balance report for assets and debts
    Balance {
        /// Start date (YYYY-MM-DD), defaults to the start of the year
        #[arg(short, long)]
        start: Option<String>,

        /// End date (YYYY-MM-DD), defaults to the end of the year
        #[arg(short, long)]
        end: Option<String>,

        /// Export to CSV file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Result report for incomes and costs
    #[command(alias = "income-statement")]
    Result {
        /// Start date (YYYY-MM-DD), defaults to the start of the year
        #[arg(short, long)]
        start: Option<String>,

        /// End date (YYYY-MM-DD), defaults to the end of the year
        #[arg(short, long)]
        end: Option<String>,

        /// Export to CSV file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

/// Handle report commands
pub fn handle_report_command(
    years: &YearManager,
    settings: &Settings,
    cmd: ReportCommands,
) -> LedgerResult<()> {
    match cmd {
        ReportCommands::Balance { start, end, output } => {
            let period =
                report_period(years, parse_optional_date(start)?, parse_optional_date(end)?)?;
            let report = BalanceReport::generate(years, settings, period)?;
            match output {
                Some(path) => {
                    report.export_csv(create_output(&path)?)?;
                    println!("Balance report exported to: {}", path.display());
                }
                None => println!("{}", report.format_terminal()),
            }
        }

        ReportCommands::Result { start, end, output } => {
            let period =
                report_period(years, parse_optional_date(start)?, parse_optional_date(end)?)?;
            let report = ResultReport::generate(years, settings, period)?;
            match output {
                Some(path) => {
                    report.export_csv(create_output(&path)?)?;
                    println!("Result report exported to: {}", path.display());
                }
                None => println!("{}", report.format_terminal()),
            }
        }
    }

    Ok(())
}

fn create_output(path: &Path) -> LedgerResult<BufWriter<File>> {
    let file = File::create(path).map_err(|e| {
        LedgerError::Export(format!("Failed to create file {}: {}", path.display(), e))
    })?;
    Ok(BufWriter::new(file))
}
