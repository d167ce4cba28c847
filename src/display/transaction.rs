//! Transaction display formatting
//!
//! Renders ledger rows as tables for the history and recent views.

use tabled::settings::Style;
use tabled::{Table, Tabled};

use crate::models::{Transaction, Zone};

#[derive(Tabled)]
struct TransactionRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Date")]
    date: String,
    #[tabled(rename = "Type")]
    kind: String,
    #[tabled(rename = "Category")]
    category: String,
    #[tabled(rename = "Amount")]
    amount: String,
    #[tabled(rename = "Method")]
    method: String,
    #[tabled(rename = "Note")]
    note: String,
}

/// Format transactions as a table, newest first as given
pub fn format_transaction_table(
    transactions: &[Transaction],
    zone: &Zone,
    date_format: &str,
    symbol: &str,
) -> String {
    if transactions.is_empty() {
        return "No transactions found.\n".to_string();
    }

    let rows = transactions.iter().map(|txn| {
        let sign = if txn.is_expense() { "-" } else { "+" };
        TransactionRow {
            id: txn.id.to_string(),
            date: txn.local_date(zone).format(date_format).to_string(),
            kind: txn.kind.to_string(),
            category: truncate(txn.display_category(), 24),
            amount: format!("{}{}", sign, txn.amount.format_with_symbol(symbol)),
            method: txn.payment_method.clone(),
            note: txn.note.as_deref().map(|n| truncate(n, 30)).unwrap_or_default(),
        }
    });

    let mut table = Table::new(rows);
    table.with(Style::psql());
    format!("{}\n", table)
}

/// Format transaction details for display
pub fn format_transaction_details(
    txn: &Transaction,
    zone: &Zone,
    date_format: &str,
    symbol: &str,
) -> String {
    let mut output = String::new();

    output.push_str(&format!("Transaction: {}\n", txn.id));
    output.push_str(&format!("Type:        {}\n", txn.kind));
    output.push_str(&format!(
        "Date:        {}\n",
        txn.local_date(zone).format(date_format)
    ));
    output.push_str(&format!("Amount:      {}\n", txn.amount.format_with_symbol(symbol)));
    output.push_str(&format!("Category:    {}\n", txn.display_category()));

    if !txn.payment_method.is_empty() {
        output.push_str(&format!("Paid with:   {}\n", txn.payment_method));
    }
    if let Some(note) = &txn.note {
        output.push_str(&format!("Note:        {}\n", note));
    }

    output
}

/// Truncate a string to a maximum length with ellipsis
fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Money, TransactionId, TransactionKind, UserId};

    fn txn(kind: TransactionKind, category: &str) -> Transaction {
        Transaction {
            id: TransactionId::from_raw(7),
            user_id: UserId::from("u1"),
            amount: Money::from_cents(125_050),
            category: category.into(),
            date: 1_760_832_000_000, // 2025-10-19T00:00:00Z
            payment_method: if kind == TransactionKind::Expense {
                "UPI".into()
            } else {
                String::new()
            },
            note: Some("rent".into()),
            kind,
        }
    }

    #[test]
    fn test_table_contains_rows() {
        let table = format_transaction_table(
            &[txn(TransactionKind::Expense, "Bills"), txn(TransactionKind::Income, "")],
            &Zone::utc(),
            "%d/%m/%Y",
            "₹",
        );
        assert!(table.contains("txn-7"));
        assert!(table.contains("19/10/2025"));
        assert!(table.contains("-₹1250.50"));
        assert!(table.contains("+₹1250.50"));
        assert!(table.contains("Others"));
    }

    #[test]
    fn test_empty_table() {
        assert_eq!(
            format_transaction_table(&[], &Zone::utc(), "%d/%m/%Y", "₹"),
            "No transactions found.\n"
        );
    }

    #[test]
    fn test_details() {
        let details =
            format_transaction_details(&txn(TransactionKind::Expense, "Bills"), &Zone::utc(), "%Y-%m-%d", "$");
        assert!(details.contains("Date:        2025-10-19"));
        assert!(details.contains("Paid with:   UPI"));
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("Hello", 10), "Hello");
        assert_eq!(truncate("Hello World", 8), "Hello...");
    }
}
