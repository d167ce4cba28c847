//! Transaction model
//!
//! Income and expense records. Transactions are immutable once stored; the
//! only write path is inserting a validated [`TransactionDraft`].

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::ids::{TransactionId, UserId};
use super::money::Money;
use super::period::Zone;

/// Whether money came in or went out
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TransactionKind {
    Expense,
    Income,
}

impl TransactionKind {
    /// Stored label, matching the `type` column
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Expense => "Expense",
            Self::Income => "Income",
        }
    }
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransactionKind {
    type Err = TransactionValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "expense" => Ok(Self::Expense),
            "income" => Ok(Self::Income),
            _ => Err(TransactionValidationError::UnknownKind(s.to_string())),
        }
    }
}

/// A stored financial transaction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    /// Row identifier
    pub id: TransactionId,

    /// Owner
    pub user_id: UserId,

    /// Always non-negative; direction comes from `kind`
    pub amount: Money,

    pub category: String,

    /// Occurrence time, epoch milliseconds
    pub date: i64,

    /// Empty for income
    #[serde(default)]
    pub payment_method: String,

    #[serde(default)]
    pub note: Option<String>,

    pub kind: TransactionKind,
}

impl Transaction {
    pub fn is_expense(&self) -> bool {
        self.kind == TransactionKind::Expense
    }

    pub fn is_income(&self) -> bool {
        self.kind == TransactionKind::Income
    }

    /// Calendar date of the transaction in `zone`
    pub fn local_date(&self, zone: &Zone) -> NaiveDate {
        zone.date_of(self.date)
    }

    /// Category with blanks folded into "Others"
    pub fn display_category(&self) -> &str {
        let trimmed = self.category.trim();
        if trimmed.is_empty() {
            super::category::OTHERS
        } else {
            trimmed
        }
    }
}

impl fmt::Display for Transaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.is_expense() { "-" } else { "+" };
        write!(f, "{} {}{}", self.display_category(), sign, self.amount)
    }
}

/// User-entered fields of a transaction before it is stored
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionDraft {
    pub amount: Money,
    pub category: String,
    pub date: i64,
    pub payment_method: String,
    pub note: Option<String>,
}

impl TransactionDraft {
    pub fn new(amount: Money, category: impl Into<String>, date: i64) -> Self {
        Self {
            amount,
            category: category.into(),
            date,
            payment_method: String::new(),
            note: None,
        }
    }

    pub fn with_payment_method(mut self, method: impl Into<String>) -> Self {
        self.payment_method = method.into();
        self
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        let note = note.into();
        self.note = if note.trim().is_empty() {
            None
        } else {
            Some(note)
        };
        self
    }

    /// Validate the draft for the given kind
    pub fn validate(&self, kind: TransactionKind) -> Result<(), TransactionValidationError> {
        if self.amount.is_negative() {
            return Err(TransactionValidationError::NegativeAmount(self.amount));
        }
        if self.amount.is_zero() {
            return Err(TransactionValidationError::ZeroAmount);
        }
        if self.category.trim().is_empty() {
            return Err(TransactionValidationError::MissingCategory);
        }
        if kind == TransactionKind::Expense && self.payment_method.trim().is_empty() {
            return Err(TransactionValidationError::MissingPaymentMethod);
        }
        Ok(())
    }
}

/// Validation errors for transactions
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransactionValidationError {
    NegativeAmount(Money),
    ZeroAmount,
    MissingCategory,
    MissingPaymentMethod,
    UnknownKind(String),
}

impl fmt::Display for TransactionValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NegativeAmount(amount) => write!(f, "Amount cannot be negative: {}", amount),
            Self::ZeroAmount => write!(f, "Amount must be greater than zero"),
            Self::MissingCategory => write!(f, "Category is required"),
            Self::MissingPaymentMethod => write!(f, "Payment method is required for expenses"),
            Self::UnknownKind(s) => {
                write!(f, "Unknown transaction type: {} (expected Expense or Income)", s)
            }
        }
    }
}

impl std::error::Error for TransactionValidationError {}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft(cents: i64) -> TransactionDraft {
        TransactionDraft::new(Money::from_cents(cents), "Food & Dining", 0)
            .with_payment_method("UPI")
    }

    #[test]
    fn test_valid_expense() {
        assert!(draft(1500).validate(TransactionKind::Expense).is_ok());
    }

    #[test]
    fn test_amount_validation() {
        assert_eq!(
            draft(0).validate(TransactionKind::Expense),
            Err(TransactionValidationError::ZeroAmount)
        );
        assert!(matches!(
            draft(-100).validate(TransactionKind::Expense),
            Err(TransactionValidationError::NegativeAmount(_))
        ));
    }

    #[test]
    fn test_expense_requires_payment_method() {
        let d = TransactionDraft::new(Money::from_cents(100), "Bills", 0);
        assert_eq!(
            d.validate(TransactionKind::Expense),
            Err(TransactionValidationError::MissingPaymentMethod)
        );
        assert!(d.validate(TransactionKind::Income).is_ok());
    }

    #[test]
    fn test_category_required() {
        let d = TransactionDraft::new(Money::from_cents(100), "   ", 0);
        assert_eq!(
            d.validate(TransactionKind::Income),
            Err(TransactionValidationError::MissingCategory)
        );
    }

    #[test]
    fn test_blank_note_is_none() {
        assert_eq!(draft(100).with_note("  ").note, None);
        assert_eq!(draft(100).with_note("lunch").note.as_deref(), Some("lunch"));
    }

    #[test]
    fn test_kind_parse() {
        assert_eq!("expense".parse::<TransactionKind>().unwrap(), TransactionKind::Expense);
        assert_eq!("Income".parse::<TransactionKind>().unwrap(), TransactionKind::Income);
        assert!("transfer".parse::<TransactionKind>().is_err());
    }

    #[test]
    fn test_display_category_defaults_to_others() {
        let txn = Transaction {
            id: TransactionId::from_raw(1),
            user_id: UserId::from("u1"),
            amount: Money::from_cents(100),
            category: " ".into(),
            date: 0,
            payment_method: "Cash".into(),
            note: None,
            kind: TransactionKind::Expense,
        };
        assert_eq!(txn.display_category(), "Others");
        assert_eq!(txn.to_string(), "Others -1.00");
    }
}
