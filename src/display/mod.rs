//! Display formatting for terminal output
//!
//! Provides utilities for formatting transactions and budgets as tables and
//! short summaries.

pub mod budget;
pub mod transaction;

pub use budget::{format_budget_table, format_category_table, format_evaluation, format_health};
pub use transaction::{format_transaction_details, format_transaction_table};
