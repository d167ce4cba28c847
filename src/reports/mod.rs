//! Reports module for money-manager
//!
//! Read-only summaries built from the ledger and budget stores: period
//! analytics (category breakdown, top categories, trend) and the dashboard.

pub mod analytics;
pub mod dashboard;

pub use analytics::{AnalyticsReport, CategorySpending, TopCategory, TrendChange, TrendPoint};
pub use dashboard::DashboardReport;
