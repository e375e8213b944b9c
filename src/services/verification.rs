//! Verification service
//!
//! Records journal entries in the current year: id assignment, date and
//! posting validation, voiding and removal.

use chrono::NaiveDate;
use tracing::{info, warn};

use crate::error::{LedgerError, LedgerResult};
use crate::models::{Transaction, Verification};

use super::year::YearManager;

/// Input for creating a new verification
#[derive(Debug, Clone)]
pub struct CreateVerificationInput {
    pub date: NaiveDate,
    pub notes: String,
    pub transactions: Vec<Transaction>,
}

/// Service for verification management
pub struct VerificationService<'a> {
    years: &'a mut YearManager,
}

impl<'a> VerificationService<'a> {
    /// Create a new verification service
    pub fn new(years: &'a mut YearManager) -> Self {
        Self { years }
    }

    /// Book a new verification in the current year
    ///
    /// Empty rows are dropped. An unbalanced entry is accepted with a warning.
    pub fn create(&mut self, input: CreateVerificationInput) -> LedgerResult<Verification> {
        let year = self.years.current_year();

        let mut verification = Verification::new(0, input.date).with_notes(input.notes.trim());
        verification.transactions = input.transactions;
        let dropped = verification.drop_empty_rows();
        if dropped > 0 {
            info!(dropped, "Dropped empty rows");
        }

        self.check(&verification, year)?;

        let store = self.years.verifications_mut()?;
        verification.id = store.next_id();
        store.add(verification.clone())?;
        store.save_with_message(&format!(
            "{}: add verification {}",
            year, verification.id
        ))?;

        info!(
            id = verification.id,
            date = %verification.date,
            postings = verification.transactions.len(),
            "Created verification"
        );
        Ok(verification)
    }

    fn check(&self, verification: &Verification, year: i32) -> LedgerResult<()> {
        if verification.year() != year {
            return Err(LedgerError::OutOfRange(format!(
                "date {} is not in {}",
                verification.date, year
            )));
        }

        verification
            .validate(year)
            .map_err(|e| LedgerError::Validation(e.to_string()))?;

        let accounts = self.years.accounts()?;
        for transaction in &verification.transactions {
            if !accounts.contains(transaction.account) {
                return Err(LedgerError::account_not_found(
                    transaction.account.to_string(),
                ));
            }
        }

        if !verification.is_balanced() {
            warn!(
                debit = %verification.total_debit(),
                credit = %verification.total_credit(),
                "Debit and credit totals differ"
            );
        }
        Ok(())
    }

    /// Get a verification by id
    pub fn get(&self, id: u32) -> LedgerResult<&Verification> {
        self.years
            .verifications()?
            .find(id)
            .ok_or_else(|| LedgerError::verification_not_found(id.to_string()))
    }

    /// Verifications of the current year, ascending by id
    pub fn list(&self, include_discarded: bool) -> LedgerResult<Vec<&Verification>> {
        Ok(self
            .years
            .verifications()?
            .iter()
            .filter(|v| include_discarded || !v.discarded)
            .collect())
    }

    /// Mark a verification as discarded, or restore it
    pub fn set_discarded(&mut self, id: u32, discarded: bool) -> LedgerResult<Verification> {
        let year = self.years.current_year();
        let store = self.years.verifications_mut()?;
        let verification = store
            .find_mut(id)
            .ok_or_else(|| LedgerError::verification_not_found(id.to_string()))?;
        verification.discarded = discarded;
        let updated = verification.clone();

        let action = if discarded { "discard" } else { "restore" };
        store.save_with_message(&format!("{}: {} verification {}", year, action, id))?;
        Ok(updated)
    }

    /// Delete a verification from the current year
    pub fn remove(&mut self, id: u32) -> LedgerResult<Verification> {
        let year = self.years.current_year();
        let store = self.years.verifications_mut()?;
        let removed = store.remove(id)?;
        store.save_with_message(&format!("{}: remove verification {}", year, id))?;

        info!(id, "Removed verification");
        Ok(removed)
    }
}
