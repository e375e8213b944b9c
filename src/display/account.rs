//! Account display formatting
//!
//! Formats accounts for terminal output in table and detail views.

use crate::models::{Money, Transaction, Verification};
use crate::services::account::AccountSummary;

/// Format a list of accounts with balances as a table
pub fn format_account_list(summaries: &[AccountSummary]) -> String {
    if summaries.is_empty() {
        return "No accounts found.".to_string();
    }

    let desc_width = summaries
        .iter()
        .map(|s| s.account.description.len())
        .max()
        .unwrap_or(11)
        .max(11);

    let mut output = String::new();
    output.push_str(&format!(
        "{:<6}  {:<desc_width$}  {:<6}  {:>15}  {:>15}  {:>5}\n",
        "Number",
        "Description",
        "Class",
        "Incoming",
        "Balance",
        "Txns",
        desc_width = desc_width,
    ));

    output.push_str(&format!(
        "{:-<6}  {:-<desc_width$}  {:-<6}  {:->15}  {:->15}  {:->5}\n",
        "",
        "",
        "",
        "",
        "",
        "",
        desc_width = desc_width,
    ));

    for summary in summaries {
        let class = summary
            .account
            .class()
            .map_or_else(|| "-".to_string(), |c| c.to_string());

        output.push_str(&format!(
            "{:<6}  {:<desc_width$}  {:<6}  {:>15}  {:>15}  {:>5}\n",
            summary.account.account_number,
            summary.account.description,
            class,
            summary.account.incoming_balance.format_grouped(),
            summary.balance.format_grouped(),
            summary.transaction_count,
            desc_width = desc_width,
        ));
    }

    output
}

/// Format a single account's details with its postings
pub fn format_account_details(
    summary: &AccountSummary,
    postings: &[(&Transaction, &Verification)],
) -> String {
    let account = &summary.account;

    let mut output = String::new();
    output.push_str(&format!("Account: {}\n", account));
    output.push_str(&format!(
        "  Class:          {}\n",
        account
            .class()
            .map_or_else(|| "Unclassified".to_string(), |c| c.to_string())
    ));
    output.push_str(&format!(
        "  Incoming:       {}\n",
        account.incoming_balance.format_grouped()
    ));
    output.push_str(&format!(
        "  Balance:        {}\n",
        summary.balance.format_grouped()
    ));

    if postings.is_empty() {
        output.push_str("\nNo transactions.\n");
        return output;
    }

    output.push_str(&format!(
        "\n{:>5}  {:<10}  {:>12}  {:>12}  {}\n",
        "Ver", "Date", "Debit", "Credit", "Notes"
    ));
    for (transaction, verification) in postings {
        let notes = if transaction.notes.is_empty() {
            &verification.notes
        } else {
            &transaction.notes
        };
        let discarded = if verification.discarded { " (discarded)" } else { "" };
        output.push_str(&format!(
            "{:>5}  {:<10}  {:>12}  {:>12}  {}{}\n",
            verification.id,
            verification.date,
            blank_if_zero(transaction.debit),
            blank_if_zero(transaction.credit),
            notes,
            discarded
        ));
    }

    output
}

pub(crate) fn blank_if_zero(amount: Money) -> String {
    if amount.is_zero() {
        String::new()
    } else {
        amount.format_grouped()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Account;
    use chrono::NaiveDate;

    fn summary(number: u32, description: &str, balance: i64) -> AccountSummary {
        AccountSummary {
            account: Account::new(number, description),
            balance: Money::from_cents(balance),
            transaction_count: 1,
        }
    }

    #[test]
    fn test_empty_list() {
        assert_eq!(format_account_list(&[]), "No accounts found.");
    }

    #[test]
    fn test_list_columns() {
        let text = format_account_list(&[
            summary(1920, "Bank", 123456),
            summary(3000, "Sales", 100),
        ]);
        assert!(text.contains("1920"));
        assert!(text.contains("Asset"));
        assert!(text.contains("1 234.56"));
        assert!(text.contains("Income"));
    }

    #[test]
    fn test_details_with_postings() {
        let mut ver = Verification::new(3, NaiveDate::from_ymd_opt(2024, 5, 1).unwrap())
            .with_notes("Invoice 17");
        ver.add_transaction(Transaction::debit(1920, Money::from_cents(500)));
        let postings = vec![(&ver.transactions[0], &ver)];

        let text = format_account_details(&summary(1920, "Bank", 500), &postings);
        assert!(text.contains("Account: 1920  Bank"));
        assert!(text.contains("2024-05-01"));
        assert!(text.contains("Invoice 17"));
    }
}
