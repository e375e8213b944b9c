//! Reports module for the ledger
//!
//! Balance and result reports for a period of one fiscal year, formatted
//! for the terminal or exported as CSV.

pub mod balance;
pub mod result;

pub use balance::{BalanceReport, BalanceRow, BalanceSection};
pub use result::{ResultReport, ResultRow, ResultSection};

use chrono::NaiveDate;

use crate::config::Settings;
use crate::error::LedgerResult;
use crate::models::Period;
use crate::services::YearManager;

const REPORT_WIDTH: usize = 86;

/// Heading shared by all reports
#[derive(Debug, Clone)]
pub struct ReportHeader {
    pub title: &'static str,
    pub company_name: String,
    pub company_number: String,
    /// The whole fiscal year
    pub fiscal_year: Period,
    /// The reported part of the fiscal year
    pub period: Period,
    /// Highest verification id of the year, if any
    pub last_verification: Option<u32>,
    pub printed: NaiveDate,
}

impl ReportHeader {
    fn new(
        title: &'static str,
        years: &YearManager,
        settings: &Settings,
        period: Period,
    ) -> LedgerResult<Self> {
        Ok(Self {
            title,
            company_name: settings.company_name.clone(),
            company_number: settings.company_number.clone(),
            fiscal_year: Period::fiscal_year(years.current_year())?,
            period,
            last_verification: years.verifications()?.last().map(|v| v.id),
            printed: chrono::Local::now().date_naive(),
        })
    }

    fn format_terminal(&self, output: &mut String) {
        output.push_str(self.title);
        output.push('\n');
        output.push_str(&"=".repeat(REPORT_WIDTH));
        output.push('\n');
        if !self.company_name.is_empty() {
            output.push_str(&format!("{}\n", self.company_name));
        }
        if !self.company_number.is_empty() {
            output.push_str(&format!("{}\n", self.company_number));
        }
        output.push_str(&format!("Accounting year: {}\n", self.fiscal_year));
        output.push_str(&format!("Period:          {}\n", self.period));
        output.push_str(&format!("Printed:         {}\n", self.printed));
        let last = self
            .last_verification
            .map_or_else(|| "-".to_string(), |id| id.to_string());
        output.push_str(&format!("Last ver. no.:   {}\n", last));
    }
}

/// Resolve optional report bounds against the current year
///
/// Missing bounds default to the start and end of the year.
pub fn report_period(
    years: &YearManager,
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
) -> LedgerResult<Period> {
    Ok(Period::within_year(years.current_year(), start, end)?)
}

fn separator(output: &mut String) {
    output.push_str(&"-".repeat(REPORT_WIDTH));
    output.push('\n');
}
