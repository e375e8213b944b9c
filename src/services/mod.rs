//! Service layer for the ledger
//!
//! The service layer provides business logic on top of the storage layer:
//! balance computation, fiscal year lifecycle and validated edits of the
//! current year's accounts and verifications.

pub mod account;
pub mod balance;
pub mod verification;
pub mod year;

pub use account::{AccountService, AccountSummary};
pub use balance::BalanceEngine;
pub use verification::{CreateVerificationInput, VerificationService};
pub use year::YearManager;
