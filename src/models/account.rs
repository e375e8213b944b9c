//! Account model
//!
//! An account is a numbered bucket in the chart of accounts. Its class
//! (asset, debt, income, cost) is derived purely from the account number.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::money::Money;

/// Lowest account number that belongs to a class
pub const FIRST_CLASSIFIED_NUMBER: u32 = 1000;

/// Class of an account, derived from its number range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountClass {
    /// [1000, 2000)
    Asset,
    /// [2000, 3000)
    Debt,
    /// [3000, 4000)
    Income,
    /// [4000, ...)
    Cost,
}

/// Presentation sign per class. Postings are summed as `debit - credit`,
/// then multiplied by this value. Unclassified numbers use `+1`.
pub const SIGN_POLICY: [(AccountClass, i64); 4] = [
    (AccountClass::Asset, 1),
    (AccountClass::Debt, -1),
    (AccountClass::Income, -1),
    (AccountClass::Cost, 1),
];

impl AccountClass {
    /// Classify an account number. Numbers below 1000 have no class.
    pub fn of(account_number: u32) -> Option<Self> {
        match account_number {
            0..=999 => None,
            1000..=1999 => Some(Self::Asset),
            2000..=2999 => Some(Self::Debt),
            3000..=3999 => Some(Self::Income),
            _ => Some(Self::Cost),
        }
    }

    /// Multiplier applied to `debit - credit` sums for this class
    pub fn sign_multiplier(self) -> i64 {
        SIGN_POLICY
            .iter()
            .find(|(class, _)| *class == self)
            .map(|(_, sign)| *sign)
            .unwrap_or(1)
    }
}

impl fmt::Display for AccountClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Asset => write!(f, "Asset"),
            Self::Debt => write!(f, "Debt"),
            Self::Income => write!(f, "Income"),
            Self::Cost => write!(f, "Cost"),
        }
    }
}

/// An account in one fiscal year's chart of accounts
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    /// Primary key within a year, conventionally 1000-9999
    pub account_number: u32,

    /// Display text (e.g. "Bank")
    pub description: String,

    /// Opening balance for the year, in the same sign convention as the
    /// computed balance (credit-normal for debt and income accounts)
    #[serde(default)]
    pub incoming_balance: Money,
}

impl Account {
    /// Create a new account with a zero incoming balance
    pub fn new(account_number: u32, description: impl Into<String>) -> Self {
        Self {
            account_number,
            description: description.into(),
            incoming_balance: Money::zero(),
        }
    }

    /// Create a new account with an incoming balance
    pub fn with_incoming_balance(
        account_number: u32,
        description: impl Into<String>,
        incoming_balance: Money,
    ) -> Self {
        let mut account = Self::new(account_number, description);
        account.incoming_balance = incoming_balance;
        account
    }

    pub fn class(&self) -> Option<AccountClass> {
        AccountClass::of(self.account_number)
    }

    pub fn is_asset(&self) -> bool {
        self.class() == Some(AccountClass::Asset)
    }

    pub fn is_debt(&self) -> bool {
        self.class() == Some(AccountClass::Debt)
    }

    pub fn is_income(&self) -> bool {
        self.class() == Some(AccountClass::Income)
    }

    pub fn is_cost(&self) -> bool {
        self.class() == Some(AccountClass::Cost)
    }

    /// Sign applied to this account's posting sums
    pub fn sign_multiplier(&self) -> i64 {
        self.class().map_or(1, AccountClass::sign_multiplier)
    }

    /// Copy of this account for a new year, with the incoming balance reset
    pub fn carried_forward(&self) -> Self {
        Self::new(self.account_number, self.description.clone())
    }

    /// Validate the account
    pub fn validate(&self) -> Result<(), AccountValidationError> {
        if self.account_number < FIRST_CLASSIFIED_NUMBER {
            return Err(AccountValidationError::NumberOutOfRange(
                self.account_number,
            ));
        }

        if self.description.trim().is_empty() {
            return Err(AccountValidationError::EmptyDescription);
        }

        if self.description.len() > 100 {
            return Err(AccountValidationError::DescriptionTooLong(
                self.description.len(),
            ));
        }

        Ok(())
    }
}

impl fmt::Display for Account {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}  {}", self.account_number, self.description)
    }
}

/// Validation errors for accounts
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccountValidationError {
    NumberOutOfRange(u32),
    EmptyDescription,
    DescriptionTooLong(usize),
}

impl fmt::Display for AccountValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NumberOutOfRange(n) => {
                write!(f, "Account number {} is below {}", n, FIRST_CLASSIFIED_NUMBER)
            }
            Self::EmptyDescription => write!(f, "Account description cannot be empty"),
            Self::DescriptionTooLong(len) => {
                write!(f, "Account description too long ({} chars, max 100)", len)
            }
        }
    }
}

impl std::error::Error for AccountValidationError {}
