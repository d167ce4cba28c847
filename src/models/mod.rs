//! Core data models for money-manager
//!
//! This module contains the data structures of the personal-finance domain:
//! money, periods, transactions, budget entries, categories and profiles.

pub mod budget;
pub mod category;
pub mod ids;
pub mod money;
pub mod period;
pub mod profile;
pub mod transaction;

pub use budget::{BudgetEntry, BudgetScope, BudgetStatus, WarningLevel};
pub use ids::{BudgetId, TransactionId, UserId};
pub use money::Money;
pub use period::{BudgetPeriod, PeriodType, PeriodWindow, Zone};
pub use profile::Profile;
pub use transaction::{Transaction, TransactionDraft, TransactionKind};
