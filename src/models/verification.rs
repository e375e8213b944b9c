//! Verification model
//!
//! A verification is a dated journal entry grouping one or more postings.
//! On disk each verification is its own JSON document whose name is derived
//! from its date and id.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::money::Money;
use super::transaction::{Transaction, TransactionValidationError};

const FILE_PREFIX: &str = "verification_";
const FILE_EXTENSION: &str = ".json";

/// A journal entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Verification {
    /// Unique within the owning year
    pub id: u32,

    /// Booking date, inside the owning fiscal year
    pub date: NaiveDate,

    /// Postings in display order
    #[serde(default)]
    pub transactions: Vec<Transaction>,

    /// Free text
    #[serde(default)]
    pub notes: String,

    /// Voided entry, still stored
    #[serde(default)]
    pub discarded: bool,
}

impl Verification {
    /// Create an empty verification
    pub fn new(id: u32, date: NaiveDate) -> Self {
        Self {
            id,
            date,
            transactions: Vec::new(),
            notes: String::new(),
            discarded: false,
        }
    }

    /// Attach notes to this verification
    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = notes.into();
        self
    }

    pub fn add_transaction(&mut self, transaction: Transaction) {
        self.transactions.push(transaction);
    }

    /// Remove placeholder rows where both debit and credit are zero
    pub fn drop_empty_rows(&mut self) -> usize {
        let before = self.transactions.len();
        self.transactions.retain(|t| !t.is_empty_row());
        before - self.transactions.len()
    }

    /// Postings referencing the given account
    pub fn transactions_for(&self, account_number: u32) -> impl Iterator<Item = &Transaction> {
        self.transactions
            .iter()
            .filter(move |t| t.account == account_number)
    }

    pub fn total_debit(&self) -> Money {
        self.transactions.iter().map(|t| t.debit).sum()
    }

    pub fn total_credit(&self) -> Money {
        self.transactions.iter().map(|t| t.credit).sum()
    }

    /// Debits equal credits
    pub fn is_balanced(&self) -> bool {
        self.total_debit() == self.total_credit()
    }

    /// Year the booking date falls in
    pub fn year(&self) -> i32 {
        self.date.year()
    }

    /// Validate postings and that the date lies in `fiscal_year`
    pub fn validate(&self, fiscal_year: i32) -> Result<(), VerificationValidationError> {
        if self.date.year() != fiscal_year {
            return Err(VerificationValidationError::DateOutsideYear {
                date: self.date,
                year: fiscal_year,
            });
        }

        for transaction in &self.transactions {
            transaction
                .validate()
                .map_err(VerificationValidationError::Transaction)?;
        }

        Ok(())
    }

    /// Deterministic file name, `verification_<date>_<id>.json`
    pub fn file_name(&self) -> String {
        format!("{}{}_{}{}", FILE_PREFIX, self.date, self.id, FILE_EXTENSION)
    }

    /// Parse a journal-entry file name back into `(date, id)`
    ///
    /// Returns `None` for anything that does not follow the naming
    /// convention; such files are ignored by the store.
    pub fn parse_file_name(name: &str) -> Option<(NaiveDate, u32)> {
        let stem = name.strip_prefix(FILE_PREFIX)?.strip_suffix(FILE_EXTENSION)?;
        let (date, id) = stem.rsplit_once('_')?;
        let date = NaiveDate::parse_from_str(date, "%Y-%m-%d").ok()?;
        let id = id.parse().ok()?;
        Some((date, id))
    }
}

impl fmt::Display for Verification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{} {}", self.id, self.date)?;
        if !self.notes.is_empty() {
            write!(f, " {}", self.notes)?;
        }
        if self.discarded {
            write!(f, " (discarded)")?;
        }
        Ok(())
    }
}

/// Validation errors for verifications
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VerificationValidationError {
    DateOutsideYear { date: NaiveDate, year: i32 },
    Transaction(TransactionValidationError),
}

impl fmt::Display for VerificationValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DateOutsideYear { date, year } => {
                write!(f, "Date {} is outside fiscal year {}", date, year)
            }
            Self::Transaction(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for VerificationValidationError {}
