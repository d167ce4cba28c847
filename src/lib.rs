//! money-manager - personal income/expense tracking with periodic budgets
//!
//! Records income and expense transactions for a signed-in user, keeps
//! weekly and monthly spending limits (overall and per category), and
//! evaluates spending against them within calendar-aligned period windows.
//!
//! # Architecture
//!
//! The crate is organized into the following modules:
//!
//! - `config`: Configuration and path management
//! - `error`: Custom error types
//! - `models`: Core data models (money, periods, transactions, budgets, profile)
//! - `storage`: SQLite ledger and budget stores, JSON file helpers
//! - `services`: Period windows, budget evaluation, validated write paths
//! - `reports`: Analytics and dashboard summaries
//! - `session`: Identity provider and profile sync
//! - `events`: Change notifications
//! - `audit`: Audit logging system
//! - `display`, `cli`: Terminal presentation
//!
//! # Example
//!
//! ```rust,ignore
//! use money_manager::config::{MoneyPaths, Settings};
//! use money_manager::services::{BudgetEvaluator, PeriodService};
//! use money_manager::storage::Storage;
//!
//! let paths = MoneyPaths::new()?;
//! let settings = Settings::load_or_create(&paths)?;
//! let storage = Storage::new(&paths)?;
//! let periods = PeriodService::new(&settings);
//! let health = BudgetEvaluator::new(&storage, &periods).budget_health(&user, PeriodType::Monthly)?;
//! ```

pub mod audit;
pub mod cli;
pub mod config;
pub mod display;
pub mod error;
pub mod events;
pub mod logging;
pub mod models;
pub mod reports;
pub mod services;
pub mod session;
pub mod storage;

pub use error::{MoneyError, MoneyResult};
