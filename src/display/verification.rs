//! Verification display formatting
//!
//! Formats journal entries as a register table and a detail view.

use super::account::blank_if_zero;
use crate::models::Verification;
use crate::storage::AccountStore;

/// Format verifications as a register table
pub fn format_verification_list(verifications: &[&Verification]) -> String {
    if verifications.is_empty() {
        return "No verifications found.".to_string();
    }

    let mut output = String::new();
    output.push_str(&format!(
        "{:>5}  {:<10}  {:>15}  {:<4}  {}\n",
        "Id", "Date", "Amount", "", "Notes"
    ));
    output.push_str(&format!(
        "{:->5}  {:-<10}  {:->15}  {:-<4}  {:-<20}\n",
        "", "", "", "", ""
    ));

    for verification in verifications {
        let flag = if verification.discarded {
            "VOID"
        } else if !verification.is_balanced() {
            "!"
        } else {
            ""
        };
        output.push_str(&format!(
            "{:>5}  {:<10}  {:>15}  {:<4}  {}\n",
            verification.id,
            verification.date,
            verification.total_debit().format_grouped(),
            flag,
            verification.notes
        ));
    }

    output
}

/// Format one verification with its postings
///
/// Account descriptions are looked up in `accounts` when available.
pub fn format_verification_details(
    verification: &Verification,
    accounts: Option<&AccountStore>,
) -> String {
    let mut output = String::new();
    output.push_str(&format!(
        "Verification {}  {}\n",
        verification.id, verification.date
    ));
    if !verification.notes.is_empty() {
        output.push_str(&format!("  Notes:     {}\n", verification.notes));
    }
    if verification.discarded {
        output.push_str("  Status:    Discarded\n");
    }

    output.push_str(&format!(
        "\n{:<32}  {:>12}  {:>12}  {}\n",
        "Account", "Debit", "Credit", "Notes"
    ));
    for transaction in &verification.transactions {
        let label = accounts
            .and_then(|store| store.find(transaction.account))
            .map_or_else(|| transaction.account.to_string(), |a| a.to_string());
        output.push_str(&format!(
            "{:<32}  {:>12}  {:>12}  {}\n",
            label,
            blank_if_zero(transaction.debit),
            blank_if_zero(transaction.credit),
            transaction.notes
        ));
    }

    output.push_str(&format!(
        "{:<32}  {:>12}  {:>12}\n",
        "TOTAL",
        verification.total_debit().format_grouped(),
        verification.total_credit().format_grouped()
    ));
    if !verification.is_balanced() {
        output.push_str("\nWarning: debit and credit totals differ\n");
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Account, Money, Transaction};
    use crate::storage::NoopCommitter;
    use chrono::NaiveDate;
    use std::path::PathBuf;
    use std::rc::Rc;

    fn sale() -> Verification {
        let mut ver = Verification::new(7, NaiveDate::from_ymd_opt(2024, 4, 2).unwrap())
            .with_notes("Cash sale");
        ver.add_transaction(Transaction::debit(1920, Money::from_cents(12500)));
        ver.add_transaction(Transaction::credit(3000, Money::from_cents(12500)));
        ver
    }

    #[test]
    fn test_list() {
        let mut voided = sale();
        voided.id = 8;
        voided.discarded = true;
        let ver = sale();

        let text = format_verification_list(&[&ver, &voided]);
        assert!(text.contains("Cash sale"));
        assert!(text.contains("125.00"));
        assert!(text.contains("VOID"));
        assert_eq!(format_verification_list(&[]), "No verifications found.");
    }

    #[test]
    fn test_details_uses_account_names() {
        let mut accounts =
            AccountStore::new(2024, PathBuf::from("accounts.json"), Rc::new(NoopCommitter));
        accounts.add(Account::new(1920, "Bank")).unwrap();

        let text = format_verification_details(&sale(), Some(&accounts));
        assert!(text.contains("Verification 7  2024-04-02"));
        assert!(text.contains("1920  Bank"));
        assert!(text.contains("3000"));
        assert!(!text.contains("Warning"));
    }

    #[test]
    fn test_details_unbalanced_warning() {
        let mut ver = sale();
        ver.transactions.pop();
        let text = format_verification_details(&ver, None);
        assert!(text.contains("Warning: debit and credit totals differ"));
    }
}
