//! Service layer for money-manager
//!
//! The service layer provides business logic on top of the storage layer,
//! handling validation, period windows, budget evaluation and audit logging.

pub mod budget;
pub mod evaluation;
pub mod period;
pub mod transaction;

pub use budget::{BudgetService, IncomeWarning};
pub use evaluation::{
    safe_daily_spend, BudgetEvaluator, BudgetHealth, CategoryEvaluation, Evaluation,
    ExceededLimit,
};
pub use period::PeriodService;
pub use transaction::{
    BlockNotifier, BudgetAlert, ExpenseOutcome, HistoryFilter, TransactionService,
    ALL_CATEGORIES,
};
