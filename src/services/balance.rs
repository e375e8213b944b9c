//! Balance engine
//!
//! Computes account balances for one fiscal year from the incoming balance
//! and the postings in the year's verifications.
//!
//! A balance is `incoming + sign * sum(debit - credit)`, where `sign` comes
//! from [`SIGN_POLICY`](crate::models::SIGN_POLICY): debt and income
//! accounts are presented credit-normal.

use crate::error::{LedgerError, LedgerResult};
use crate::models::{Account, Money, Period, Transaction, Verification};
use crate::storage::{AccountStore, VerificationStore, YearStores};

/// Read-only balance queries over one year's stores
#[derive(Clone, Copy)]
pub struct BalanceEngine<'a> {
    accounts: &'a AccountStore,
    verifications: &'a VerificationStore,
    include_discarded: bool,
}

impl<'a> BalanceEngine<'a> {
    /// Engine over a year's stores; discarded verifications are counted
    pub fn new(stores: &'a YearStores) -> Self {
        Self::from_stores(&stores.accounts, &stores.verifications)
    }

    pub fn from_stores(accounts: &'a AccountStore, verifications: &'a VerificationStore) -> Self {
        Self {
            accounts,
            verifications,
            include_discarded: true,
        }
    }

    /// Whether discarded verifications contribute to balances
    pub fn include_discarded(mut self, include: bool) -> Self {
        self.include_discarded = include;
        self
    }

    pub fn year(&self) -> i32 {
        self.accounts.year()
    }

    fn counted(&self) -> impl Iterator<Item = &'a Verification> {
        let include_discarded = self.include_discarded;
        self.verifications
            .iter()
            .filter(move |v| include_discarded || !v.discarded)
    }

    fn account(&self, account_number: u32) -> LedgerResult<&'a Account> {
        self.accounts
            .find(account_number)
            .ok_or_else(|| LedgerError::account_not_found(account_number.to_string()))
    }

    /// Postings on an account paired with their verification, in id order
    pub fn transactions_for(&self, account_number: u32) -> Vec<(&'a Transaction, &'a Verification)> {
        self.counted()
            .flat_map(|v| v.transactions_for(account_number).map(move |t| (t, v)))
            .collect()
    }

    /// Whether [`transactions_for`](Self::transactions_for) is non-empty
    pub fn has_transactions(&self, account_number: u32) -> bool {
        self.counted()
            .any(|v| v.transactions_for(account_number).next().is_some())
    }

    /// Balance over the whole year
    pub fn balance(&self, account_number: u32) -> LedgerResult<Money> {
        self.balance_for_period(account_number, None)
    }

    /// Incoming balance plus the movement within `period` (whole year if `None`)
    pub fn balance_for_period(
        &self,
        account_number: u32,
        period: Option<&Period>,
    ) -> LedgerResult<Money> {
        let account = self.account(account_number)?;
        Ok(account.incoming_balance + self.signed_movement(account, period))
    }

    /// Movement within `period` only, in presentation sign
    pub fn period_change(
        &self,
        account_number: u32,
        period: Option<&Period>,
    ) -> LedgerResult<Money> {
        let account = self.account(account_number)?;
        Ok(self.signed_movement(account, period))
    }

    fn signed_movement(&self, account: &Account, period: Option<&Period>) -> Money {
        let net: Money = self
            .counted()
            .filter(|v| period.map_or(true, |p| p.contains(v.date)))
            .flat_map(|v| v.transactions_for(account.account_number))
            .map(Transaction::net)
            .sum();
        net * account.sign_multiplier()
    }
}
