//! Display formatting for terminal output
//!
//! Provides utilities for formatting accounts and verifications as tables
//! and detail views.

pub mod account;
pub mod verification;

pub use account::{format_account_details, format_account_list};
pub use verification::{format_verification_details, format_verification_list};
