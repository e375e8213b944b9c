//! Account store for one fiscal year
//!
//! Keeps the chart of accounts sorted by account number and persists it to
//! the year's accounts file.

use std::path::{Path, PathBuf};
use std::rc::Rc;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::{LedgerError, LedgerResult};
use crate::models::Account;

use super::commit::{CommitStatus, Committer};
use super::file_io::{read_json, write_json_atomic};

const ACCOUNTS_SCHEMA_VERSION: u32 = 1;

/// Serializable account file structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct AccountData {
    #[serde(default)]
    schema_version: u32,
    accounts: Vec<Account>,
}

/// Accepted on-disk shapes: the versioned document, or a bare array
#[derive(Deserialize)]
#[serde(untagged)]
enum AccountFile {
    Versioned(AccountData),
    Legacy(Vec<Account>),
}

impl AccountFile {
    fn into_accounts(self) -> Vec<Account> {
        match self {
            Self::Versioned(data) => data.accounts,
            Self::Legacy(accounts) => accounts,
        }
    }
}

/// Sorted, de-duplicated chart of accounts for one year
pub struct AccountStore {
    year: i32,
    path: PathBuf,
    accounts: Vec<Account>,
    committer: Rc<dyn Committer>,
}

impl AccountStore {
    /// Create an empty store backed by `path`
    pub fn new(year: i32, path: PathBuf, committer: Rc<dyn Committer>) -> Self {
        Self {
            year,
            path,
            accounts: Vec::new(),
            committer,
        }
    }

    /// Load accounts from disk
    ///
    /// Records are sorted by number; a record repeating the number of the
    /// previous (post-sort) record is dropped with a warning.
    pub fn load(year: i32, path: PathBuf, committer: Rc<dyn Committer>) -> LedgerResult<Self> {
        let file: AccountFile = read_json(&path)?;
        let loaded = file.into_accounts();
        let loaded_count = loaded.len();

        let accounts = sort_and_dedup(loaded);
        info!(
            year,
            path = %path.display(),
            loaded = loaded_count,
            kept = accounts.len(),
            "Loaded accounts"
        );

        Ok(Self {
            year,
            path,
            accounts,
            committer,
        })
    }

    /// Seed a store for `year` from this one
    ///
    /// Numbers and descriptions are copied; incoming balances start at zero
    /// and are expected to be recomputed from this year's closing balances.
    pub fn clone_for_year(&self, year: i32, path: PathBuf) -> Self {
        Self {
            year,
            path,
            accounts: self.accounts.iter().map(Account::carried_forward).collect(),
            committer: Rc::clone(&self.committer),
        }
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// All accounts, ascending by number
    pub fn accounts(&self) -> &[Account] {
        &self.accounts
    }

    pub fn iter(&self) -> impl Iterator<Item = &Account> {
        self.accounts.iter()
    }

    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }

    fn position(&self, account_number: u32) -> Result<usize, usize> {
        self.accounts
            .binary_search_by_key(&account_number, |a| a.account_number)
    }

    /// Get an account by number
    pub fn find(&self, account_number: u32) -> Option<&Account> {
        self.position(account_number)
            .ok()
            .map(|idx| &self.accounts[idx])
    }

    /// Get an account by number for editing; the number itself must not change
    pub fn find_mut(&mut self, account_number: u32) -> Option<&mut Account> {
        match self.position(account_number) {
            Ok(idx) => Some(&mut self.accounts[idx]),
            Err(_) => None,
        }
    }

    pub fn contains(&self, account_number: u32) -> bool {
        self.position(account_number).is_ok()
    }

    /// Insert an account, keeping the store sorted
    pub fn add(&mut self, account: Account) -> LedgerResult<()> {
        match self.position(account.account_number) {
            Ok(_) => Err(LedgerError::Duplicate {
                entity_type: "Account",
                identifier: account.account_number.to_string(),
            }),
            Err(idx) => {
                self.accounts.insert(idx, account);
                Ok(())
            }
        }
    }

    /// Remove an account by number
    pub fn remove(&mut self, account_number: u32) -> LedgerResult<Account> {
        match self.position(account_number) {
            Ok(idx) => Ok(self.accounts.remove(idx)),
            Err(_) => Err(LedgerError::account_not_found(account_number.to_string())),
        }
    }

    /// Save the full list and commit
    pub fn save(&self) -> LedgerResult<CommitStatus> {
        let message = format!("{}: save {} accounts", self.year, self.accounts.len());
        self.save_with_message(&message)
    }

    /// Save the full list and commit with the given message
    pub fn save_with_message(&self, message: &str) -> LedgerResult<CommitStatus> {
        let file_data = AccountData {
            schema_version: ACCOUNTS_SCHEMA_VERSION,
            accounts: self.accounts.clone(),
        };

        info!(year = self.year, path = %self.path.display(), "Storing accounts");
        write_json_atomic(&self.path, &file_data)?;

        let status = self.committer.commit(message);
        if let Some(warning) = status.warning() {
            warn!(year = self.year, "{}", warning);
        }
        Ok(status)
    }
}

/// Sort by number and keep the first record of each number
fn sort_and_dedup(mut accounts: Vec<Account>) -> Vec<Account> {
    // Stable sort: among duplicates, file order decides which one survives
    accounts.sort_by_key(|a| a.account_number);

    let mut kept: Vec<Account> = Vec::with_capacity(accounts.len());
    for (idx, account) in accounts.into_iter().enumerate() {
        if kept
            .last()
            .map_or(false, |prev| prev.account_number == account.account_number)
        {
            warn!(
                index = idx,
                account_number = account.account_number,
                description = %account.description,
                "Dropping account with duplicate account number"
            );
            continue;
        }
        kept.push(account);
    }
    kept
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Money;
    use crate::storage::commit::{NoopCommitter, RecordingCommitter};
    use tempfile::TempDir;

    fn create_test_store() -> (TempDir, AccountStore) {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("accounts.json");
        let store = AccountStore::new(2024, path, Rc::new(NoopCommitter));
        (temp_dir, store)
    }

    #[test]
    fn test_load_missing_file_is_not_found() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("accounts.json");
        let result = AccountStore::load(2024, path, Rc::new(NoopCommitter));
        assert!(matches!(result, Err(ref e) if e.is_not_found()));
    }

    #[test]
    fn test_add_keeps_sorted() {
        let (_temp_dir, mut store) = create_test_store();
        store.add(Account::new(3000, "Sales")).unwrap();
        store.add(Account::new(1920, "Bank")).unwrap();
        store.add(Account::new(2440, "Suppliers")).unwrap();

        let numbers: Vec<_> = store.iter().map(|a| a.account_number).collect();
        assert_eq!(numbers, vec![1920, 2440, 3000]);
    }

    #[test]
    fn test_add_duplicate() {
        let (_temp_dir, mut store) = create_test_store();
        store.add(Account::new(1920, "Bank")).unwrap();

        let result = store.add(Account::new(1920, "Other bank"));
        assert!(matches!(result, Err(LedgerError::Duplicate { .. })));
        assert_eq!(store.find(1920).unwrap().description, "Bank");
    }

    #[test]
    fn test_find_and_remove() {
        let (_temp_dir, mut store) = create_test_store();
        store.add(Account::new(1920, "Bank")).unwrap();

        assert!(store.find(1920).is_some());
        assert!(store.find(1930).is_none());

        let removed = store.remove(1920).unwrap();
        assert_eq!(removed.description, "Bank");
        assert!(store.is_empty());

        let result = store.remove(1920);
        assert!(matches!(result, Err(ref e) if e.is_not_found()));
    }

    #[test]
    fn test_save_and_reload() {
        let (temp_dir, mut store) = create_test_store();
        store
            .add(Account::with_incoming_balance(
                1920,
                "Bank",
                Money::from_cents(12345),
            ))
            .unwrap();
        store.add(Account::new(3000, "Sales")).unwrap();
        store.save().unwrap();

        let path = temp_dir.path().join("accounts.json");
        let reloaded = AccountStore::load(2024, path, Rc::new(NoopCommitter)).unwrap();
        assert_eq!(reloaded.accounts(), store.accounts());
    }

    #[test]
    fn test_load_sorts_and_drops_duplicates() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("accounts.json");
        std::fs::write(
            &path,
            r#"{"schema_version": 1, "accounts": [
                {"account_number": 3000, "description": "Sales"},
                {"account_number": 1920, "description": "Bank"},
                {"account_number": 3000, "description": "Sales again"},
                {"account_number": 1510, "description": "Receivables"},
                {"account_number": 1920, "description": "Bank again"}
            ]}"#,
        )
        .unwrap();

        let store = AccountStore::load(2024, path, Rc::new(NoopCommitter)).unwrap();
        let accounts: Vec<_> = store
            .iter()
            .map(|a| (a.account_number, a.description.as_str()))
            .collect();
        assert_eq!(
            accounts,
            vec![(1510, "Receivables"), (1920, "Bank"), (3000, "Sales")]
        );
    }

    #[test]
    fn test_load_legacy_array() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("accounts.json");
        std::fs::write(
            &path,
            r#"[
                {"account_number": 1920, "description": "Bank", "incoming_balance": 500},
                {"account_number": 2440, "description": "Suppliers", "incoming_balance": 123.45}
            ]"#,
        )
        .unwrap();

        let store = AccountStore::load(2024, path, Rc::new(NoopCommitter)).unwrap();
        assert_eq!(store.find(1920).unwrap().incoming_balance.to_string(), "500.00");
        assert_eq!(store.find(2440).unwrap().incoming_balance.to_string(), "123.45");
    }

    #[test]
    fn test_amounts_saved_as_decimals() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("accounts.json");
        let mut store = AccountStore::new(2024, path.clone(), Rc::new(NoopCommitter));
        store
            .add(Account::with_incoming_balance(1920, "Bank", Money::from_cents(12345)))
            .unwrap();
        store.save().unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        assert!(contents.contains("\"incoming_balance\": 123.45"));

        let reloaded = AccountStore::load(2024, path, Rc::new(NoopCommitter)).unwrap();
        assert_eq!(reloaded.find(1920).unwrap().incoming_balance.cents(), 12345);
    }

    #[test]
    fn test_load_malformed() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("accounts.json");
        std::fs::write(&path, r#"{"accounts": [{"description": "no number"}]}"#).unwrap();

        let result = AccountStore::load(2024, path, Rc::new(NoopCommitter));
        assert!(matches!(result, Err(LedgerError::Malformed(_))));
    }

    #[test]
    fn test_clone_for_year_resets_incoming() {
        let (temp_dir, mut store) = create_test_store();
        store
            .add(Account::with_incoming_balance(1920, "Bank", Money::from_cents(100)))
            .unwrap();

        let next = store.clone_for_year(2025, temp_dir.path().join("2025.json"));
        assert_eq!(next.year(), 2025);
        assert_eq!(next.len(), 1);
        assert!(next.find(1920).unwrap().incoming_balance.is_zero());
    }

    #[test]
    fn test_save_commits_and_reports_failure() {
        let temp_dir = TempDir::new().unwrap();
        let committer = Rc::new(RecordingCommitter::default());
        let store = AccountStore::new(
            2024,
            temp_dir.path().join("accounts.json"),
            committer.clone(),
        );
        assert_eq!(store.save().unwrap(), CommitStatus::Committed);
        assert_eq!(committer.messages(), vec!["2024: save 0 accounts".to_string()]);

        let failing = AccountStore::new(
            2024,
            temp_dir.path().join("other.json"),
            Rc::new(RecordingCommitter::failing()),
        );
        let status = failing.save().unwrap();
        assert!(status.is_failed());
        assert!(temp_dir.path().join("other.json").exists());
    }
}
