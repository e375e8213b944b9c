//! Transaction (posting) model
//!
//! One debit-or-credit line of a verification, referencing a single account
//! by number.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::money::Money;

/// A single posting within a verification
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    /// Account number, resolved against the same year's chart of accounts
    pub account: u32,

    /// Debit amount (non-negative)
    #[serde(default)]
    pub debit: Money,

    /// Credit amount (non-negative)
    #[serde(default)]
    pub credit: Money,

    /// Free text
    #[serde(default)]
    pub notes: String,
}

impl Transaction {
    /// Create a debit posting
    pub fn debit(account: u32, amount: Money) -> Self {
        Self {
            account,
            debit: amount,
            credit: Money::zero(),
            notes: String::new(),
        }
    }

    /// Create a credit posting
    pub fn credit(account: u32, amount: Money) -> Self {
        Self {
            account,
            debit: Money::zero(),
            credit: amount,
            notes: String::new(),
        }
    }

    /// Attach notes to this posting
    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = notes.into();
        self
    }

    /// Both sides zero: a placeholder row that is never persisted
    pub fn is_empty_row(&self) -> bool {
        self.debit.is_zero() && self.credit.is_zero()
    }

    /// Debit minus credit, before any class sign policy is applied
    pub fn net(&self) -> Money {
        self.debit - self.credit
    }

    /// Validate the posting
    pub fn validate(&self) -> Result<(), TransactionValidationError> {
        if self.debit.is_negative() || self.credit.is_negative() {
            return Err(TransactionValidationError::NegativeAmount(self.account));
        }

        if !self.debit.is_zero() && !self.credit.is_zero() {
            return Err(TransactionValidationError::BothSides(self.account));
        }

        Ok(())
    }
}

impl fmt::Display for Transaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.credit.is_zero() {
            write!(f, "{} D {}", self.account, self.debit)
        } else {
            write!(f, "{} C {}", self.account, self.credit)
        }
    }
}

/// Validation errors for postings
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransactionValidationError {
    NegativeAmount(u32),
    BothSides(u32),
}

impl fmt::Display for TransactionValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NegativeAmount(account) => {
                write!(f, "Posting on account {} has a negative amount", account)
            }
            Self::BothSides(account) => write!(
                f,
                "Posting on account {} has both debit and credit set",
                account
            ),
        }
    }
}

impl std::error::Error for TransactionValidationError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constructors() {
        let d = Transaction::debit(1920, Money::from_cents(10000));
        assert_eq!(d.net(), Money::from_cents(10000));
        assert!(d.credit.is_zero());

        let c = Transaction::credit(3000, Money::from_cents(10000)).with_notes("Sale");
        assert_eq!(c.net(), Money::from_cents(-10000));
        assert_eq!(c.notes, "Sale");
    }

    #[test]
    fn test_empty_row() {
        let t = Transaction::debit(1920, Money::zero());
        assert!(t.is_empty_row());
        assert!(!Transaction::credit(1920, Money::from_cents(1)).is_empty_row());
    }

    #[test]
    fn test_validation() {
        assert!(Transaction::debit(1920, Money::from_cents(100)).validate().is_ok());

        let mut both = Transaction::debit(1920, Money::from_cents(100));
        both.credit = Money::from_cents(50);
        assert_eq!(
            both.validate(),
            Err(TransactionValidationError::BothSides(1920))
        );

        let negative = Transaction::credit(2440, Money::from_cents(-1));
        assert_eq!(
            negative.validate(),
            Err(TransactionValidationError::NegativeAmount(2440))
        );
    }

    #[test]
    fn test_missing_fields_default() {
        let t: Transaction = serde_json::from_str(r#"{"account": 1920, "debit": 500}"#).unwrap();
        assert_eq!(t.debit.cents(), 50000);
        assert!(t.credit.is_zero());
        assert!(t.notes.is_empty());
    }
}
