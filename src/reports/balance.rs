//! Balance Report
//!
//! Asset and debt accounts with their balance at the start of the period,
//! the movement within it and the balance at its end.

use std::io::Write;

use chrono::Duration;

use super::{separator, ReportHeader};
use crate::config::Settings;
use crate::error::LedgerResult;
use crate::models::{Account, AccountClass, Money, Period};
use crate::services::{BalanceEngine, YearManager};

/// One account line
#[derive(Debug, Clone)]
pub struct BalanceRow {
    pub account_number: u32,
    pub description: String,
    /// Balance on the first day of the period
    pub incoming: Money,
    /// Movement within the period
    pub period: Money,
    /// Balance on the last day of the period
    pub outgoing: Money,
}

/// Accounts of one class with column sums
#[derive(Debug, Clone)]
pub struct BalanceSection {
    pub class: AccountClass,
    pub rows: Vec<BalanceRow>,
    pub incoming: Money,
    pub period: Money,
    pub outgoing: Money,
}

impl BalanceSection {
    fn new(class: AccountClass) -> Self {
        Self {
            class,
            rows: Vec::new(),
            incoming: Money::zero(),
            period: Money::zero(),
            outgoing: Money::zero(),
        }
    }

    fn add_row(&mut self, row: BalanceRow) {
        self.incoming += row.incoming;
        self.period += row.period;
        self.outgoing += row.outgoing;
        self.rows.push(row);
    }
}

/// Balance report for the current year
#[derive(Debug, Clone)]
pub struct BalanceReport {
    pub header: ReportHeader,
    pub assets: BalanceSection,
    pub debts: BalanceSection,
}

impl BalanceReport {
    /// Generate the report for `period`
    ///
    /// An account is listed when it has postings or a non-zero incoming
    /// balance.
    pub fn generate(years: &YearManager, settings: &Settings, period: Period) -> LedgerResult<Self> {
        let header = ReportHeader::new("Balance report", years, settings, period)?;
        let engine = years.current_balance_engine()?;

        let mut assets = BalanceSection::new(AccountClass::Asset);
        let mut debts = BalanceSection::new(AccountClass::Debt);

        for account in years.accounts()?.iter() {
            let section = match account.class() {
                Some(AccountClass::Asset) => &mut assets,
                Some(AccountClass::Debt) => &mut debts,
                _ => continue,
            };
            if !engine.has_transactions(account.account_number)
                && account.incoming_balance.is_zero()
            {
                continue;
            }
            section.add_row(balance_row(&engine, account, &header)?);
        }

        Ok(Self {
            header,
            assets,
            debts,
        })
    }

    /// Assets minus debts per column: incoming, period, outgoing
    pub fn difference(&self) -> (Money, Money, Money) {
        (
            self.assets.incoming - self.debts.incoming,
            self.assets.period - self.debts.period,
            self.assets.outgoing - self.debts.outgoing,
        )
    }

    /// Format the report for terminal display
    pub fn format_terminal(&self) -> String {
        let mut output = String::new();
        self.header.format_terminal(&mut output);

        for (title, section) in [("Assets", &self.assets), ("Debts", &self.debts)] {
            output.push('\n');
            output.push_str(&format!(
                "{:<38} {:>15} {:>15} {:>15}\n",
                title, "Incoming balance", "Period", "Outgoing balance"
            ));
            separator(&mut output);
            for row in &section.rows {
                output.push_str(&format!(
                    "{:<38} {:>15} {:>15} {:>15}\n",
                    format!("{}  {}", row.account_number, row.description),
                    row.incoming.format_grouped(),
                    row.period.format_grouped(),
                    row.outgoing.format_grouped()
                ));
            }
            separator(&mut output);
            output.push_str(&format!(
                "{:<38} {:>15} {:>15} {:>15}\n",
                format!("Sum {}", title.to_lowercase()),
                section.incoming.format_grouped(),
                section.period.format_grouped(),
                section.outgoing.format_grouped()
            ));
        }

        let (incoming, period, outgoing) = self.difference();
        output.push('\n');
        output.push_str(&format!(
            "{:<38} {:>15} {:>15} {:>15}\n",
            "Difference assets and debts",
            incoming.format_grouped(),
            period.format_grouped(),
            outgoing.format_grouped()
        ));

        output
    }

    /// Export the report to CSV format
    pub fn export_csv<W: Write>(&self, writer: W) -> LedgerResult<()> {
        let mut csv = csv::Writer::from_writer(writer);
        csv.write_record([
            "Section",
            "Account",
            "Description",
            "Incoming Balance",
            "Period",
            "Outgoing Balance",
        ])?;

        for section in [&self.assets, &self.debts] {
            let name = section.class.to_string();
            for row in &section.rows {
                csv.write_record([
                    name.clone(),
                    row.account_number.to_string(),
                    row.description.clone(),
                    row.incoming.to_string(),
                    row.period.to_string(),
                    row.outgoing.to_string(),
                ])?;
            }
            csv.write_record([
                name.clone(),
                String::new(),
                "TOTAL".to_string(),
                section.incoming.to_string(),
                section.period.to_string(),
                section.outgoing.to_string(),
            ])?;
        }

        let (incoming, period, outgoing) = self.difference();
        csv.write_record([
            "Difference".to_string(),
            String::new(),
            String::new(),
            incoming.to_string(),
            period.to_string(),
            outgoing.to_string(),
        ])?;

        csv.flush()?;
        Ok(())
    }
}

fn balance_row(
    engine: &BalanceEngine<'_>,
    account: &Account,
    header: &ReportHeader,
) -> LedgerResult<BalanceRow> {
    let number = account.account_number;
    let before = header.period.start - Duration::days(1);
    let incoming = if before < header.fiscal_year.start {
        account.incoming_balance
    } else {
        let earlier = Period::new(header.fiscal_year.start, before)?;
        engine.balance_for_period(number, Some(&earlier))?
    };
    let period = engine.period_change(number, Some(&header.period))?;

    Ok(BalanceRow {
        account_number: number,
        description: account.description.clone(),
        incoming,
        period,
        outgoing: incoming + period,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LedgerPaths;
    use crate::models::{Transaction, Verification};
    use crate::storage::NoopCommitter;
    use chrono::NaiveDate;
    use std::rc::Rc;
    use tempfile::TempDir;

    fn date(m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, m, d).unwrap()
    }

    fn units(value: i64) -> Money {
        Money::from_cents(value * 100)
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
        accounts
            .add(Account::with_incoming_balance(1920, "Bank", units(1000)))
            .unwrap();
        accounts.add(Account::new(1930, "Unused")).unwrap();
        accounts
            .add(Account::with_incoming_balance(2081, "Share capital", units(1000)))
            .unwrap();
        accounts.add(Account::new(2440, "Suppliers")).unwrap();
        accounts.add(Account::new(3000, "Sales")).unwrap();

        let verifications = manager.verifications_mut().unwrap();
        let mut jan = Verification::new(0, date(1, 10));
        jan.add_transaction(Transaction::debit(1920, units(300)));
        jan.add_transaction(Transaction::credit(3000, units(300)));
        verifications.add(jan).unwrap();

        let mut jun = Verification::new(1, date(6, 10));
        jun.add_transaction(Transaction::debit(1920, units(50)));
        jun.add_transaction(Transaction::credit(2440, units(50)));
        verifications.add(jun).unwrap();

        (temp_dir, manager)
    }

    #[test]
    fn test_full_year() {
        let (_temp_dir, manager) = create_test_ledger();
        let period = Period::fiscal_year(2024).unwrap();
        let report = BalanceReport::generate(&manager, &Settings::default(), period).unwrap();

        let numbers: Vec<_> = report.assets.rows.iter().map(|r| r.account_number).collect();
        assert_eq!(numbers, vec![1920]);
        assert_eq!(report.assets.rows[0].incoming, units(1000));
        assert_eq!(report.assets.rows[0].period, units(350));
        assert_eq!(report.assets.outgoing, units(1350));

        assert_eq!(report.debts.rows.len(), 2);
        assert_eq!(report.debts.outgoing, units(1050));
        assert_eq!(report.difference(), (units(0), units(300), units(300)));
        assert_eq!(report.header.last_verification, Some(1));
    }

    #[test]
    fn test_partial_period() {
        let (_temp_dir, manager) = create_test_ledger();
        let period = Period::new(date(3, 1), date(12, 31)).unwrap();
        let report = BalanceReport::generate(&manager, &Settings::default(), period).unwrap();

        let bank = &report.assets.rows[0];
        assert_eq!(bank.incoming, units(1300));
        assert_eq!(bank.period, units(50));
        assert_eq!(bank.outgoing, units(1350));
    }

    #[test]
    fn test_format_terminal() {
        let (_temp_dir, manager) = create_test_ledger();
        let settings = Settings {
            company_name: "ALOP AB".into(),
            ..Settings::default()
        };
        let period = Period::fiscal_year(2024).unwrap();
        let report = BalanceReport::generate(&manager, &settings, period).unwrap();

        let text = report.format_terminal();
        assert!(text.contains("Balance report"));
        assert!(text.contains("ALOP AB"));
        assert!(text.contains("1920  Bank"));
        assert!(text.contains("1 350.00"));
        assert!(text.contains("Difference assets and debts"));
        assert!(!text.contains("Unused"));
    }

    #[test]
    fn test_export_csv() {
        let (_temp_dir, manager) = create_test_ledger();
        let period = Period::fiscal_year(2024).unwrap();
        let report = BalanceReport::generate(&manager, &Settings::default(), period).unwrap();

        let mut buffer = Vec::new();
        report.export_csv(&mut buffer).unwrap();
        let csv = String::from_utf8(buffer).unwrap();

        assert!(csv.starts_with("Section,Account,Description"));
        assert!(csv.contains("Asset,1920,Bank,1000.00,350.00,1350.00"));
        assert!(csv.contains("Difference,,,0.00,300.00,300.00"));
    }
}
