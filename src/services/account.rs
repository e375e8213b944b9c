//! Account service
//!
//! Business logic for the chart of accounts of the current year: creation
//! with validation, edits, guarded removal and balance summaries.

use tracing::info;

use crate::error::{LedgerError, LedgerResult};
use crate::models::{Account, Money};

use super::year::YearManager;

/// Service for account management
pub struct AccountService<'a> {
    years: &'a mut YearManager,
}

/// Summary of an account with computed fields
#[derive(Debug, Clone)]
pub struct AccountSummary {
    pub account: Account,
    /// Incoming balance plus all counted postings
    pub balance: Money,
    /// Number of counted postings on the account
    pub transaction_count: usize,
}

impl<'a> AccountService<'a> {
    /// Create a new account service
    pub fn new(years: &'a mut YearManager) -> Self {
        Self { years }
    }

    /// Create a new account in the current year
    pub fn create(
        &mut self,
        account_number: u32,
        description: &str,
        incoming_balance: Money,
    ) -> LedgerResult<Account> {
        let account =
            Account::with_incoming_balance(account_number, description.trim(), incoming_balance);
        account
            .validate()
            .map_err(|e| LedgerError::Validation(e.to_string()))?;

        let store = self.years.accounts_mut()?;
        store.add(account.clone())?;
        store.save_with_message(&format!(
            "{}: add account {}",
            store.year(),
            account_number
        ))?;

        info!(account_number, description = %account.description, "Created account");
        Ok(account)
    }

    /// Get an account by number
    pub fn get(&self, account_number: u32) -> LedgerResult<&Account> {
        self.years
            .accounts()?
            .find(account_number)
            .ok_or_else(|| LedgerError::account_not_found(account_number.to_string()))
    }

    /// Change an account's description
    pub fn update_description(
        &mut self,
        account_number: u32,
        description: &str,
    ) -> LedgerResult<Account> {
        self.edit(account_number, "rename", |account| {
            account.description = description.trim().to_string();
        })
    }

    /// Set an account's incoming balance by hand
    pub fn set_incoming_balance(
        &mut self,
        account_number: u32,
        incoming_balance: Money,
    ) -> LedgerResult<Account> {
        self.edit(account_number, "set incoming balance of", |account| {
            account.incoming_balance = incoming_balance;
        })
    }

    fn edit<F>(&mut self, account_number: u32, action: &str, apply: F) -> LedgerResult<Account>
    where
        F: FnOnce(&mut Account),
    {
        let store = self.years.accounts_mut()?;
        let account = store
            .find_mut(account_number)
            .ok_or_else(|| LedgerError::account_not_found(account_number.to_string()))?;

        let mut edited = account.clone();
        apply(&mut edited);
        edited
            .validate()
            .map_err(|e| LedgerError::Validation(e.to_string()))?;
        *account = edited.clone();

        store.save_with_message(&format!(
            "{}: {} account {}",
            store.year(),
            action,
            account_number
        ))?;
        Ok(edited)
    }

    /// Remove an account that no verification in the current year posts to
    ///
    /// Discarded verifications count, since their files still reference the
    /// account.
    pub fn remove(&mut self, account_number: u32) -> LedgerResult<Account> {
        if self
            .years
            .current_balance_engine()?
            .include_discarded(true)
            .has_transactions(account_number)
        {
            return Err(LedgerError::Precondition(format!(
                "account {} has transactions in {}",
                account_number,
                self.years.current_year()
            )));
        }

        let store = self.years.accounts_mut()?;
        let removed = store.remove(account_number)?;
        store.save_with_message(&format!(
            "{}: remove account {}",
            store.year(),
            account_number
        ))?;

        info!(account_number, "Removed account");
        Ok(removed)
    }

    /// Summary of one account
    pub fn summary(&self, account_number: u32) -> LedgerResult<AccountSummary> {
        let account = self.get(account_number)?.clone();
        let engine = self.years.current_balance_engine()?;
        Ok(AccountSummary {
            balance: engine.balance(account_number)?,
            transaction_count: engine.transactions_for(account_number).len(),
            account,
        })
    }

    /// All accounts of the current year with their balances
    pub fn list_with_balances(&self) -> LedgerResult<Vec<AccountSummary>> {
        let engine = self.years.current_balance_engine()?;
        self.years
            .accounts()?
            .iter()
            .map(|account| {
                Ok(AccountSummary {
                    account: account.clone(),
                    balance: engine.balance(account.account_number)?,
                    transaction_count: engine.transactions_for(account.account_number).len(),
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{LedgerPaths, Settings};
    use crate::models::{Transaction, Verification};
    use crate::storage::NoopCommitter;
    use chrono::NaiveDate;
    use std::rc::Rc;
    use tempfile::TempDir;

    fn create_test_manager() -> (TempDir, YearManager) {
        let temp_dir = TempDir::new().unwrap();
        let paths = LedgerPaths::with_base_dir(temp_dir.path().to_path_buf());
        let manager = YearManager::open_with_bootstrap_year(
            paths,
            &Settings::default(),
            Rc::new(NoopCommitter),
            2024,
        )
        .unwrap();
        (temp_dir, manager)
    }

    #[test]
    fn test_create_account() {
        let (_temp_dir, mut manager) = create_test_manager();
        let mut service = AccountService::new(&mut manager);

        let account = service.create(1920, "  Bank ", Money::zero()).unwrap();
        assert_eq!(account.description, "Bank");
        assert_eq!(service.get(1920).unwrap().description, "Bank");
    }

    #[test]
    fn test_create_persists() {
        let (temp_dir, mut manager) = create_test_manager();
        AccountService::new(&mut manager)
            .create(1920, "Bank", Money::from_cents(100))
            .unwrap();

        let paths = LedgerPaths::with_base_dir(temp_dir.path().to_path_buf());
        let contents = std::fs::read_to_string(paths.accounts_file(2024)).unwrap();
        assert!(contents.contains("\"account_number\": 1920"));
    }

    #[test]
    fn test_create_rejects_bad_input() {
        let (_temp_dir, mut manager) = create_test_manager();
        let mut service = AccountService::new(&mut manager);

        assert!(service
            .create(999, "Too low", Money::zero())
            .unwrap_err()
            .is_validation());
        assert!(service
            .create(1920, "   ", Money::zero())
            .unwrap_err()
            .is_validation());

        service.create(1920, "Bank", Money::zero()).unwrap();
        assert!(service
            .create(1920, "Bank again", Money::zero())
            .unwrap_err()
            .is_duplicate());
    }

    #[test]
    fn test_update_description_and_incoming() {
        let (_temp_dir, mut manager) = create_test_manager();
        let mut service = AccountService::new(&mut manager);
        service.create(1920, "Bank", Money::zero()).unwrap();

        service.update_description(1920, "Business account").unwrap();
        service
            .set_incoming_balance(1920, Money::from_cents(4200))
            .unwrap();

        let account = service.get(1920).unwrap();
        assert_eq!(account.description, "Business account");
        assert_eq!(account.incoming_balance, Money::from_cents(4200));

        assert!(service.update_description(1920, "").unwrap_err().is_validation());
        assert_eq!(service.get(1920).unwrap().description, "Business account");
        assert!(service
            .update_description(1930, "Missing")
            .unwrap_err()
            .is_not_found());
    }

    #[test]
    fn test_remove_refuses_used_account() {
        let (_temp_dir, mut manager) = create_test_manager();
        {
            let mut service = AccountService::new(&mut manager);
            service.create(1920, "Bank", Money::zero()).unwrap();
            service.create(3000, "Sales", Money::zero()).unwrap();
            service.create(5010, "Rent", Money::zero()).unwrap();
        }

        let mut sale = Verification::new(0, NaiveDate::from_ymd_opt(2024, 1, 5).unwrap());
        sale.add_transaction(Transaction::debit(1920, Money::from_cents(100)));
        sale.add_transaction(Transaction::credit(3000, Money::from_cents(100)));
        manager.verifications_mut().unwrap().add(sale).unwrap();

        let mut service = AccountService::new(&mut manager);
        let result = service.remove(1920);
        assert!(matches!(result, Err(LedgerError::Precondition(_))));

        let removed = service.remove(5010).unwrap();
        assert_eq!(removed.account_number, 5010);
        assert!(service.remove(5010).unwrap_err().is_not_found());
    }

    #[test]
    fn test_remove_refuses_account_used_only_by_discarded_entry() {
        let temp_dir = TempDir::new().unwrap();
        let paths = LedgerPaths::with_base_dir(temp_dir.path().to_path_buf());
        let settings = Settings {
            include_discarded: false,
            ..Settings::default()
        };
        let mut manager =
            YearManager::open_with_bootstrap_year(paths, &settings, Rc::new(NoopCommitter), 2024)
                .unwrap();
        {
            let mut service = AccountService::new(&mut manager);
            service.create(1920, "Bank", Money::zero()).unwrap();
            service.create(3000, "Sales", Money::zero()).unwrap();
        }

        let mut voided = Verification::new(0, NaiveDate::from_ymd_opt(2024, 2, 1).unwrap());
        voided.add_transaction(Transaction::debit(1920, Money::from_cents(100)));
        voided.add_transaction(Transaction::credit(3000, Money::from_cents(100)));
        voided.discarded = true;
        manager.verifications_mut().unwrap().add(voided).unwrap();

        let result = AccountService::new(&mut manager).remove(1920);
        assert!(matches!(result, Err(LedgerError::Precondition(_))));
    }

    #[test]
    fn test_list_with_balances() {
        let (_temp_dir, mut manager) = create_test_manager();
        {
            let mut service = AccountService::new(&mut manager);
            service
                .create(1920, "Bank", Money::from_cents(1000))
                .unwrap();
            service.create(3000, "Sales", Money::zero()).unwrap();
        }

        let mut sale = Verification::new(0, NaiveDate::from_ymd_opt(2024, 1, 5).unwrap());
        sale.add_transaction(Transaction::debit(1920, Money::from_cents(250)));
        sale.add_transaction(Transaction::credit(3000, Money::from_cents(250)));
        manager.verifications_mut().unwrap().add(sale).unwrap();

        let service = AccountService::new(&mut manager);
        let summaries = service.list_with_balances().unwrap();
        assert_eq!(summaries.len(), 2);
        assert_eq!(summaries[0].balance, Money::from_cents(1250));
        assert_eq!(summaries[1].balance, Money::from_cents(250));
        assert_eq!(summaries[1].transaction_count, 1);

        let summary = service.summary(3000).unwrap();
        assert_eq!(summary.account.description, "Sales");
    }
}
