//! Result Report
//!
//! Income and cost accounts with their movement in the period, and the
//! calculated result.

use std::io::Write;

use super::{separator, ReportHeader};
use crate::config::Settings;
use crate::error::LedgerResult;
use crate::models::{AccountClass, Money, Period};
use crate::services::YearManager;

/// One account line
#[derive(Debug, Clone)]
pub struct ResultRow {
    pub account_number: u32,
    pub description: String,
    pub period: Money,
}

/// Accounts of one class with their sum
#[derive(Debug, Clone)]
pub struct ResultSection {
    pub class: AccountClass,
    pub rows: Vec<ResultRow>,
    pub total: Money,
}

impl ResultSection {
    fn new(class: AccountClass) -> Self {
        Self {
            class,
            rows: Vec::new(),
            total: Money::zero(),
        }
    }
}

/// Result report for the current year
#[derive(Debug, Clone)]
pub struct ResultReport {
    pub header: ReportHeader,
    pub incomes: ResultSection,
    pub costs: ResultSection,
}

impl ResultReport {
    /// Generate the report for `period`; only accounts with postings are listed
    pub fn generate(years: &YearManager, settings: &Settings, period: Period) -> LedgerResult<Self> {
        let header = ReportHeader::new("Result report", years, settings, period)?;
        let engine = years.current_balance_engine()?;

        let mut incomes = ResultSection::new(AccountClass::Income);
        let mut costs = ResultSection::new(AccountClass::Cost);

        for account in years.accounts()?.iter() {
            let section = match account.class() {
                Some(AccountClass::Income) => &mut incomes,
                Some(AccountClass::Cost) => &mut costs,
                _ => continue,
            };
            if !engine.has_transactions(account.account_number) {
                continue;
            }

            let change = engine.period_change(account.account_number, Some(&header.period))?;
            section.total += change;
            section.rows.push(ResultRow {
                account_number: account.account_number,
                description: account.description.clone(),
                period: change,
            });
        }

        Ok(Self {
            header,
            incomes,
            costs,
        })
    }

    /// Incomes minus costs
    pub fn result(&self) -> Money {
        self.incomes.total - self.costs.total
    }

    /// Format the report for terminal display
    pub fn format_terminal(&self) -> String {
        let mut output = String::new();
        self.header.format_terminal(&mut output);

        for (title, section) in [("Incomes", &self.incomes), ("Costs", &self.costs)] {
            output.push('\n');
            output.push_str(&format!("{:<38} {:>15}\n", title, "Period"));
            separator(&mut output);
            for row in &section.rows {
                output.push_str(&format!(
                    "{:<38} {:>15}\n",
                    format!("{}  {}", row.account_number, row.description),
                    row.period.format_grouped()
                ));
            }
            separator(&mut output);
            output.push_str(&format!(
                "{:<38} {:>15}\n",
                format!("Sum {}", title.to_lowercase()),
                section.total.format_grouped()
            ));
        }

        output.push('\n');
        output.push_str(&format!(
            "{:<38} {:>15}\n",
            "Calculated result",
            self.result().format_grouped()
        ));

        output
    }

    /// Export the report to CSV format
    pub fn export_csv<W: Write>(&self, writer: W) -> LedgerResult<()> {
        let mut csv = csv::Writer::from_writer(writer);
        csv.write_record(["Section", "Account", "Description", "Period"])?;

        for section in [&self.incomes, &self.costs] {
            let name = section.class.to_string();
            for row in &section.rows {
                csv.write_record([
                    name.clone(),
                    row.account_number.to_string(),
                    row.description.clone(),
                    row.period.to_string(),
                ])?;
            }
            csv.write_record([
                name.clone(),
                String::new(),
                "TOTAL".to_string(),
                section.total.to_string(),
            ])?;
        }

        csv.write_record([
            "Result".to_string(),
            String::new(),
            String::new(),
            self.result().to_string(),
        ])?;

        csv.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LedgerPaths;
    use crate::models::{Account, Transaction, Verification};
    use crate::storage::NoopCommitter;
    use chrono::NaiveDate;
    use std::rc::Rc;
    use tempfile::TempDir;

    fn date(m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, m, d).unwrap()
    }

    fn cents(value: i64) -> Money {
        Money::from_cents(value)
    }

    fn create_test_ledger() -> (TempDir, YearManager) {
        let temp_dir = TempDir::new().unwrap();
        let paths = LedgerPaths::with_base_dir(temp_dir.path().to_path_buf());
        let mut manager = YearManager::open_with_bootstrap_year(
            paths,
            &Settings::default(),
            Rc::new(NoopCommitter),
            2024,
        )
        .unwrap();

        let accounts = manager.accounts_mut().unwrap();
        for (number, description) in [
            (1920, "Bank"),
            (3000, "Sales"),
            (3740, "Rounding"),
            (5010, "Rent"),
        ] {
            accounts.add(Account::new(number, description)).unwrap();
        }

        let verifications = manager.verifications_mut().unwrap();
        let mut sale = Verification::new(0, date(2, 1));
        sale.add_transaction(Transaction::debit(1920, cents(10000)));
        sale.add_transaction(Transaction::credit(3000, cents(10000)));
        verifications.add(sale).unwrap();

        let mut rent = Verification::new(1, date(9, 1));
        rent.add_transaction(Transaction::debit(5010, cents(4000)));
        rent.add_transaction(Transaction::credit(1920, cents(4000)));
        verifications.add(rent).unwrap();

        (temp_dir, manager)
    }

    #[test]
    fn test_full_year_result() {
        let (_temp_dir, manager) = create_test_ledger();
        let period = Period::fiscal_year(2024).unwrap();
        let report = ResultReport::generate(&manager, &Settings::default(), period).unwrap();

        assert_eq!(report.incomes.rows.len(), 1);
        assert_eq!(report.incomes.total, cents(10000));
        assert_eq!(report.costs.total, cents(4000));
        assert_eq!(report.result(), cents(6000));
    }

    #[test]
    fn test_period_result() {
        let (_temp_dir, manager) = create_test_ledger();
        let period = Period::new(date(1, 1), date(6, 30)).unwrap();
        let report = ResultReport::generate(&manager, &Settings::default(), period).unwrap();

        // Rent is listed since it has postings, with nothing in this period
        assert_eq!(report.costs.rows.len(), 1);
        assert!(report.costs.total.is_zero());
        assert_eq!(report.result(), cents(10000));
    }

    #[test]
    fn test_format_and_export() {
        let (_temp_dir, manager) = create_test_ledger();
        let period = Period::fiscal_year(2024).unwrap();
        let report = ResultReport::generate(&manager, &Settings::default(), period).unwrap();

        let text = report.format_terminal();
        assert!(text.contains("3000  Sales"));
        assert!(text.contains("Calculated result"));
        assert!(text.contains("60.00"));
        assert!(!text.contains("Rounding"));

        let mut buffer = Vec::new();
        report.export_csv(&mut buffer).unwrap();
        let csv = String::from_utf8(buffer).unwrap();
        assert!(csv.contains("Cost,5010,Rent,40.00"));
        assert!(csv.contains("Result,,,60.00"));
    }
}
