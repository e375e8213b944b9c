//! Storage layer for the ledger
//!
//! Per-year JSON documents with atomic writes, a commit hook invoked after
//! every save, and a coordinator that loads every fiscal year on disk.

pub mod accounts;
pub mod commit;
pub mod file_io;
pub mod verifications;

pub use accounts::AccountStore;
pub use commit::{CommitStatus, Committer, GitCommitter, NoopCommitter};
pub use file_io::{read_json, write_json_atomic};
pub use verifications::{MalformedPolicy, VerificationStore};

use std::collections::BTreeMap;
use std::rc::Rc;

use tracing::info;

use crate::config::paths::LedgerPaths;
use crate::error::{LedgerError, LedgerResult};

/// The account and verification stores of one fiscal year
pub struct YearStores {
    pub accounts: AccountStore,
    pub verifications: VerificationStore,
}

impl YearStores {
    /// Pair two stores, which must belong to the same year
    pub fn new(accounts: AccountStore, verifications: VerificationStore) -> LedgerResult<Self> {
        if accounts.year() != verifications.year() {
            return Err(LedgerError::Precondition(format!(
                "account store is for {} but verification store is for {}",
                accounts.year(),
                verifications.year()
            )));
        }
        Ok(Self {
            accounts,
            verifications,
        })
    }

    pub fn year(&self) -> i32 {
        self.accounts.year()
    }

    /// Save both stores, accounts first
    pub fn save(&self) -> LedgerResult<Vec<CommitStatus>> {
        Ok(vec![self.accounts.save()?, self.verifications.save()?])
    }
}

/// Main storage coordinator holding every loaded year
pub struct Storage {
    paths: LedgerPaths,
    committer: Rc<dyn Committer>,
    policy: MalformedPolicy,
    years: BTreeMap<i32, YearStores>,
}

impl Storage {
    /// Create a storage coordinator with no years loaded
    pub fn new(paths: LedgerPaths, committer: Rc<dyn Committer>, policy: MalformedPolicy) -> Self {
        Self {
            paths,
            committer,
            policy,
            years: BTreeMap::new(),
        }
    }

    /// Load every year found on disk
    ///
    /// The years holding an accounts file and the years holding a
    /// verifications directory must be the same set.
    pub fn open(
        paths: LedgerPaths,
        committer: Rc<dyn Committer>,
        policy: MalformedPolicy,
    ) -> LedgerResult<Self> {
        let account_years = paths.account_years()?;
        let verification_years = paths.verification_years()?;
        if account_years != verification_years {
            return Err(LedgerError::Precondition(format!(
                "years with accounts {:?} do not match years with verifications {:?}",
                account_years, verification_years
            )));
        }

        let mut storage = Self::new(paths, committer, policy);
        for year in account_years {
            let stores = storage.load_year(year)?;
            storage.years.insert(year, stores);
        }

        info!(
            data_dir = %storage.paths.data_dir().display(),
            years = ?storage.years(),
            "Opened ledger"
        );
        Ok(storage)
    }

    fn load_year(&self, year: i32) -> LedgerResult<YearStores> {
        let accounts = AccountStore::load(
            year,
            self.paths.accounts_file(year),
            Rc::clone(&self.committer),
        )?;
        let verifications = VerificationStore::load(
            year,
            self.paths.verifications_dir(year),
            &accounts,
            self.policy,
            Rc::clone(&self.committer),
        )?;
        YearStores::new(accounts, verifications)
    }

    /// Get the paths configuration
    pub fn paths(&self) -> &LedgerPaths {
        &self.paths
    }

    /// Shared commit hook handed to new stores
    pub fn committer(&self) -> Rc<dyn Committer> {
        Rc::clone(&self.committer)
    }

    /// Loaded years, ascending
    pub fn years(&self) -> Vec<i32> {
        self.years.keys().copied().collect()
    }

    /// Years that have an account store, ascending
    pub fn account_years(&self) -> Vec<i32> {
        self.years.values().map(|s| s.accounts.year()).collect()
    }

    /// Years that have a verification store, ascending
    pub fn verification_years(&self) -> Vec<i32> {
        self.years.values().map(|s| s.verifications.year()).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.years.is_empty()
    }

    pub fn contains(&self, year: i32) -> bool {
        self.years.contains_key(&year)
    }

    pub fn last_year(&self) -> Option<i32> {
        self.years.keys().next_back().copied()
    }

    /// Stores of one year
    pub fn year(&self, year: i32) -> LedgerResult<&YearStores> {
        self.years
            .get(&year)
            .ok_or_else(|| LedgerError::year_not_found(year))
    }

    /// Stores of one year, for editing
    pub fn year_mut(&mut self, year: i32) -> LedgerResult<&mut YearStores> {
        self.years
            .get_mut(&year)
            .ok_or_else(|| LedgerError::year_not_found(year))
    }

    /// Empty stores for `year` at their configured locations
    pub fn empty_year(&self, year: i32) -> YearStores {
        YearStores {
            accounts: AccountStore::new(
                year,
                self.paths.accounts_file(year),
                Rc::clone(&self.committer),
            ),
            verifications: VerificationStore::empty(
                year,
                self.paths.verifications_dir(year),
                Rc::clone(&self.committer),
            ),
        }
    }

    /// Register a year's stores
    pub fn insert_year(&mut self, stores: YearStores) -> LedgerResult<()> {
        let year = stores.year();
        if stores.verifications.year() != year {
            return Err(LedgerError::Precondition(format!(
                "store years disagree: {} and {}",
                year,
                stores.verifications.year()
            )));
        }
        if self.years.contains_key(&year) {
            return Err(LedgerError::Duplicate {
                entity_type: "Year",
                identifier: year.to_string(),
            });
        }
        self.years.insert(year, stores);
        Ok(())
    }
}
