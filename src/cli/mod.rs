//! CLI command handlers
//!
//! This module contains the implementation of CLI commands,
//! bridging the clap argument parsing with the service layer.

pub mod account;
pub mod report;
pub mod verification;
pub mod year;

pub use account::{handle_account_command, AccountCommands};
pub use report::{handle_report_command, ReportCommands};
pub use verification::{handle_verification_command, VerificationCommands};
pub use year::{handle_year_command, YearCommands};

use std::rc::Rc;

use chrono::NaiveDate;

use crate::config::{LedgerPaths, Settings};
use crate::error::{LedgerError, LedgerResult};
use crate::models::Money;
use crate::services::YearManager;
use crate::storage::{Committer, GitCommitter, NoopCommitter};

/// Commit hook selected by the `auto_commit` setting
///
/// The git repository is created by the first commit, so commands that
/// only read the ledger leave the data directory untouched.
pub fn committer_for(paths: &LedgerPaths, settings: &Settings) -> Rc<dyn Committer> {
    if settings.auto_commit {
        Rc::new(GitCommitter::new(paths.data_dir()))
    } else {
        Rc::new(NoopCommitter)
    }
}

/// Open the ledger and optionally switch to `year`
pub fn open_ledger(
    paths: &LedgerPaths,
    settings: &Settings,
    year: Option<i32>,
) -> LedgerResult<YearManager> {
    let committer = committer_for(paths, settings);
    let mut years = YearManager::open(paths.clone(), settings, committer)?;
    if let Some(year) = year {
        years.goto_year(year)?;
    }
    Ok(years)
}

/// Parse an amount such as "1000", "99.50" or "1 234,50"
pub fn parse_money(value: &str) -> LedgerResult<Money> {
    Money::parse(value).map_err(|e| {
        LedgerError::Validation(format!(
            "Invalid amount: '{}'. Use format like '1000.00' or '1000'. Error: {}",
            value, e
        ))
    })
}

/// Parse a date in YYYY-MM-DD format
pub fn parse_date(value: &str) -> LedgerResult<NaiveDate> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|_| {
        LedgerError::Validation(format!("Invalid date: '{}'. Use YYYY-MM-DD", value))
    })
}

fn parse_optional_date(value: Option<String>) -> LedgerResult<Option<NaiveDate>> {
    value.as_deref().map(parse_date).transpose()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_money() {
        assert_eq!(parse_money("99.50").unwrap(), Money::from_cents(9950));
        assert!(parse_money("abc").unwrap_err().is_validation());
    }

    #[test]
    fn test_parse_date() {
        assert_eq!(
            parse_date("2024-02-29").unwrap(),
            NaiveDate::from_ymd_opt(2024, 2, 29).unwrap()
        );
        assert!(parse_date("2023-02-29").is_err());
        assert!(parse_optional_date(None).unwrap().is_none());
    }

    #[test]
    fn test_committer_for_disabled() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let paths = LedgerPaths::with_base_dir(temp_dir.path().to_path_buf());
        let settings = Settings {
            auto_commit: false,
            ..Settings::default()
        };

        let committer = committer_for(&paths, &settings);
        assert_eq!(committer.commit("x"), crate::storage::CommitStatus::Clean);
        assert!(!paths.data_dir().join(".git").exists());
    }

    #[test]
    fn test_opening_for_reads_creates_no_repository() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let paths = LedgerPaths::with_base_dir(temp_dir.path().to_path_buf());
        YearManager::open_with_bootstrap_year(
            paths.clone(),
            &Settings::default(),
            Rc::new(NoopCommitter),
            2024,
        )
        .unwrap();

        let settings = Settings {
            auto_commit: true,
            ..Settings::default()
        };
        let years = open_ledger(&paths, &settings, Some(2024)).unwrap();
        handle_report_command(
            &years,
            &settings,
            ReportCommands::Result {
                start: None,
                end: None,
                output: None,
            },
        )
        .unwrap();

        assert!(!paths.data_dir().join(".git").exists());
    }
}
