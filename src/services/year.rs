//! Fiscal year management
//!
//! The [`YearManager`] is the ledger's root context. It owns every loaded
//! year, tracks which one is current and creates new years by carrying the
//! chart of accounts and closing balances forward.

use std::rc::Rc;

use chrono::{Datelike, Local};
use tracing::{info, warn};

use crate::config::{LedgerPaths, Settings};
use crate::error::{LedgerError, LedgerResult};
use crate::models::Money;
use crate::storage::{
    AccountStore, Committer, MalformedPolicy, Storage, VerificationStore, YearStores,
};

use super::balance::BalanceEngine;

/// All fiscal years of a ledger plus a pointer to the current one
pub struct YearManager {
    storage: Storage,
    current: i32,
    include_discarded: bool,
}

impl YearManager {
    /// Open the ledger described by `paths` and `settings`
    ///
    /// A ledger without any year gets the current calendar year, persisted
    /// immediately.
    pub fn open(
        paths: LedgerPaths,
        settings: &Settings,
        committer: Rc<dyn Committer>,
    ) -> LedgerResult<Self> {
        Self::open_with_bootstrap_year(paths, settings, committer, Local::now().year())
    }

    /// Like [`open`](Self::open), bootstrapping `bootstrap_year` if needed
    pub fn open_with_bootstrap_year(
        paths: LedgerPaths,
        settings: &Settings,
        committer: Rc<dyn Committer>,
        bootstrap_year: i32,
    ) -> LedgerResult<Self> {
        let policy = if settings.skip_malformed_verifications {
            MalformedPolicy::Skip
        } else {
            MalformedPolicy::Fail
        };
        let storage = Storage::open(settings.apply_to(paths), committer, policy)?;
        Self::from_storage(storage, settings.include_discarded, bootstrap_year)
    }

    /// Wrap an opened storage; the last year becomes current
    pub fn from_storage(
        mut storage: Storage,
        include_discarded: bool,
        bootstrap_year: i32,
    ) -> LedgerResult<Self> {
        let current = match storage.last_year() {
            Some(year) => year,
            None => {
                info!(year = bootstrap_year, "No fiscal years found, creating one");
                let stores = storage.empty_year(bootstrap_year);
                let message = format!("Create year {}", bootstrap_year);
                stores.accounts.save_with_message(&message)?;
                stores.verifications.save_with_message(&message)?;
                storage.insert_year(stores)?;
                bootstrap_year
            }
        };

        Ok(Self {
            storage,
            current,
            include_discarded,
        })
    }

    pub fn storage(&self) -> &Storage {
        &self.storage
    }

    pub fn current_year(&self) -> i32 {
        self.current
    }

    /// All years, ascending
    pub fn years(&self) -> Vec<i32> {
        self.storage.years()
    }

    pub fn account_years(&self) -> Vec<i32> {
        self.storage.account_years()
    }

    pub fn verification_years(&self) -> Vec<i32> {
        self.storage.verification_years()
    }

    /// Move to the following year; stays put with a warning at the last one
    pub fn next_year(&mut self) -> i32 {
        let current = self.current;
        match self.years().into_iter().find(|&y| y > current) {
            Some(year) => self.current = year,
            None => warn!(year = self.current, "Already at the last year"),
        }
        self.current
    }

    /// Move to the preceding year; stays put with a warning at the first one
    pub fn prev_year(&mut self) -> i32 {
        let current = self.current;
        match self.years().into_iter().rev().find(|&y| y < current) {
            Some(year) => self.current = year,
            None => warn!(year = self.current, "Already at the first year"),
        }
        self.current
    }

    /// Make `year` current
    pub fn goto_year(&mut self, year: i32) -> LedgerResult<()> {
        if !self.storage.contains(year) {
            return Err(LedgerError::year_not_found(year));
        }
        self.current = year;
        Ok(())
    }

    /// Stores of any loaded year
    pub fn store(&self, year: i32) -> LedgerResult<&YearStores> {
        self.storage.year(year)
    }

    /// Stores of the current year
    pub fn current(&self) -> LedgerResult<&YearStores> {
        self.storage.year(self.current)
    }

    pub fn current_mut(&mut self) -> LedgerResult<&mut YearStores> {
        self.storage.year_mut(self.current)
    }

    pub fn accounts(&self) -> LedgerResult<&AccountStore> {
        Ok(&self.current()?.accounts)
    }

    pub fn accounts_mut(&mut self) -> LedgerResult<&mut AccountStore> {
        Ok(&mut self.current_mut()?.accounts)
    }

    pub fn verifications(&self) -> LedgerResult<&VerificationStore> {
        Ok(&self.current()?.verifications)
    }

    pub fn verifications_mut(&mut self) -> LedgerResult<&mut VerificationStore> {
        Ok(&mut self.current_mut()?.verifications)
    }

    /// Balance queries for `year`, honouring the discarded-verification setting
    pub fn balance_engine(&self, year: i32) -> LedgerResult<BalanceEngine<'_>> {
        Ok(BalanceEngine::new(self.store(year)?).include_discarded(self.include_discarded))
    }

    pub fn current_balance_engine(&self) -> LedgerResult<BalanceEngine<'_>> {
        self.balance_engine(self.current)
    }

    /// Create the year after the last one and make it current
    ///
    /// The chart of accounts is copied from the last year with each incoming
    /// balance set to that account's closing balance. Both stores are saved
    /// right away.
    pub fn create_new_year(&mut self) -> LedgerResult<i32> {
        let last = self
            .storage
            .last_year()
            .ok_or_else(|| LedgerError::Precondition("ledger has no years".into()))?;
        let year = last + 1;

        let accounts = self
            .store(last)?
            .accounts
            .clone_for_year(year, self.storage.paths().accounts_file(year));
        let verifications = VerificationStore::empty(
            year,
            self.storage.paths().verifications_dir(year),
            self.storage.committer(),
        );
        self.storage
            .insert_year(YearStores::new(accounts, verifications)?)?;
        self.current = year;

        self.recalc_incoming_balances()?;

        let message = format!("Create year {}", year);
        let stores = self.current()?;
        stores.accounts.save_with_message(&message)?;
        stores.verifications.save_with_message(&message)?;

        info!(year, accounts = stores.accounts.len(), "Created fiscal year");
        Ok(year)
    }

    /// Set the current year's incoming balances from the previous year's
    /// closing balances
    ///
    /// Accounts missing from the previous year get zero. Without a previous
    /// year this does nothing. Nothing is saved.
    pub fn recalc_incoming_balances(&mut self) -> LedgerResult<()> {
        let current = self.current;
        let Some(previous) = self.years().into_iter().rev().find(|&y| y < current) else {
            warn!(year = current, "No previous year, incoming balances left unchanged");
            return Ok(());
        };

        let closing: Vec<(u32, Money)> = {
            let engine = self.balance_engine(previous)?;
            let current_accounts = &self.store(current)?.accounts;
            current_accounts
                .iter()
                .map(|account| {
                    let number = account.account_number;
                    let balance = engine.balance(number).unwrap_or_default();
                    (number, balance)
                })
                .collect()
        };

        let accounts = self.accounts_mut()?;
        for (number, balance) in closing {
            if let Some(account) = accounts.find_mut(number) {
                account.incoming_balance = balance;
            }
        }

        info!(year = current, from = previous, "Recalculated incoming balances");
        Ok(())
    }
}
