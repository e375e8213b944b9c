//! Core data models for the ledger
//!
//! This module contains the data structures of the bookkeeping domain:
//! accounts, postings, verifications and the money type they share.

pub mod account;
pub mod money;
pub mod period;
pub mod transaction;
pub mod verification;

pub use account::{Account, AccountClass, AccountValidationError, SIGN_POLICY};
pub use money::{Money, MoneyParseError};
pub use period::{Period, PeriodError};
pub use transaction::{Transaction, TransactionValidationError};
pub use verification::{Verification, VerificationValidationError};
