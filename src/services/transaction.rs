//! Transaction service
//!
//! Validated write paths for the ledger store and the history queries the
//! views use. Expenses go through the budget gate first: an expense that
//! would take the weekly or monthly overall budget past its limit is not
//! stored.

use chrono::NaiveDate;
use tracing::{info, warn};

use crate::audit::EntityType;
use crate::error::{MoneyError, MoneyResult};
use crate::events::{ChangeBus, ChangeEvent};
use crate::models::category::{canonical_name, same_category, EXPENSE_CATEGORIES, INCOME_CATEGORIES, PAYMENT_METHODS};
use crate::models::{Money, Transaction, TransactionDraft, TransactionKind, UserId};
use crate::services::evaluation::{BudgetEvaluator, ExceededLimit};
use crate::services::period::PeriodService;
use crate::storage::Storage;

/// Category filter value that matches everything
pub const ALL_CATEGORIES: &str = "All Categories";

/// Alert raised the first time an expense is blocked
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BudgetAlert {
    pub title: String,
    pub message: String,
    pub exceeded: Vec<ExceededLimit>,
}

/// Hands out the block alert once per session
#[derive(Debug, Default)]
pub struct BlockNotifier {
    consumed: bool,
}

impl BlockNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the alert has been shown
    pub fn is_consumed(&self) -> bool {
        self.consumed
    }

    fn take(&mut self, exceeded: &[ExceededLimit]) -> Option<BudgetAlert> {
        if self.consumed {
            return None;
        }
        self.consumed = true;
        Some(BudgetAlert {
            title: "Budget Exceeded".into(),
            message: "Budget exceeded. Please review your budget.".into(),
            exceeded: exceeded.to_vec(),
        })
    }
}

/// Result of submitting an expense
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExpenseOutcome {
    Recorded(Transaction),
    /// Nothing was written; `alert` is present only on the first block
    Blocked {
        exceeded: Vec<ExceededLimit>,
        alert: Option<BudgetAlert>,
    },
}

impl ExpenseOutcome {
    pub fn is_blocked(&self) -> bool {
        matches!(self, Self::Blocked { .. })
    }
}

/// Options for filtering history
#[derive(Debug, Clone, Default)]
pub struct HistoryFilter {
    /// Exact category (trimmed, case-insensitive); `None` or "All Categories" matches all
    pub category: Option<String>,
    /// Calendar day of the transaction
    pub date: Option<NaiveDate>,
    /// Case-insensitive substring of the category
    pub search: Option<String>,
    pub kind: Option<TransactionKind>,
    pub limit: Option<usize>,
}

impl HistoryFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn date(mut self, date: NaiveDate) -> Self {
        self.date = Some(date);
        self
    }

    pub fn search(mut self, query: impl Into<String>) -> Self {
        self.search = Some(query.into());
        self
    }

    pub fn kind(mut self, kind: TransactionKind) -> Self {
        self.kind = Some(kind);
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    fn matches(&self, txn: &Transaction, periods: &PeriodService<'_>) -> bool {
        let matches_category = match self.category.as_deref().map(str::trim) {
            None | Some("") => true,
            Some(c) if same_category(c, ALL_CATEGORIES) => true,
            Some(c) => same_category(&txn.category, c),
        };

        let matches_date = self
            .date
            .map_or(true, |d| periods.date_of(txn.date) == d);

        let matches_search = match self.search.as_deref().map(str::trim) {
            None | Some("") => true,
            Some(q) => txn.category.to_lowercase().contains(&q.to_lowercase()),
        };

        let matches_kind = self.kind.map_or(true, |k| txn.kind == k);

        matches_category && matches_date && matches_search && matches_kind
    }
}

/// Service for transaction management
pub struct TransactionService<'a> {
    storage: &'a Storage,
    periods: &'a PeriodService<'a>,
    bus: Option<&'a ChangeBus>,
}

impl<'a> TransactionService<'a> {
    /// Create a new transaction service
    pub fn new(storage: &'a Storage, periods: &'a PeriodService<'a>) -> Self {
        Self {
            storage,
            periods,
            bus: None,
        }
    }

    /// Publish writes on `bus`
    pub fn with_bus(mut self, bus: &'a ChangeBus) -> Self {
        self.bus = Some(bus);
        self
    }

    /// Record income; income never goes through the budget gate
    pub fn add_income(&self, user: &UserId, draft: TransactionDraft) -> MoneyResult<Transaction> {
        let mut draft = draft;
        draft.category = canonical_name(&draft.category, INCOME_CATEGORIES);
        self.insert(user, TransactionKind::Income, &draft)
    }

    /// Record an expense unless it would break an overall budget
    pub fn submit_expense(
        &self,
        user: &UserId,
        draft: TransactionDraft,
        notifier: &mut BlockNotifier,
    ) -> MoneyResult<ExpenseOutcome> {
        let mut draft = draft;
        draft.category = canonical_name(&draft.category, EXPENSE_CATEGORIES);
        draft.payment_method = canonical_name(&draft.payment_method, PAYMENT_METHODS);
        draft
            .validate(TransactionKind::Expense)
            .map_err(|e| MoneyError::Validation(e.to_string()))?;

        let evaluator = BudgetEvaluator::new(self.storage, self.periods);
        let exceeded = evaluator.check_expense(user, draft.amount)?;
        if !exceeded.is_empty() {
            warn!(
                user = %user,
                amount = %draft.amount,
                limits = exceeded.len(),
                "expense blocked by budget"
            );
            let alert = notifier.take(&exceeded);
            return Ok(ExpenseOutcome::Blocked { exceeded, alert });
        }

        self.insert(user, TransactionKind::Expense, &draft)
            .map(ExpenseOutcome::Recorded)
    }

    fn insert(
        &self,
        user: &UserId,
        kind: TransactionKind,
        draft: &TransactionDraft,
    ) -> MoneyResult<Transaction> {
        draft
            .validate(kind)
            .map_err(|e| MoneyError::Validation(e.to_string()))?;

        let txn = self.storage.transactions.insert(user, kind, draft)?;

        self.storage.log_create(
            user,
            EntityType::Transaction,
            txn.id.to_string(),
            Some(txn.display_category().to_string()),
            &txn,
        )?;
        info!(id = %txn.id, user = %user, "recorded {}", txn);

        if let Some(bus) = self.bus {
            bus.publish(ChangeEvent::TransactionAdded {
                user: user.clone(),
                id: txn.id,
                kind,
            });
        }
        Ok(txn)
    }

    /// Transactions matching `filter`, newest first
    pub fn history(&self, user: &UserId, filter: &HistoryFilter) -> MoneyResult<Vec<Transaction>> {
        let matching = self
            .storage
            .transactions
            .list_for_user(user)?
            .into_iter()
            .filter(|t| filter.matches(t, self.periods));

        Ok(match filter.limit {
            Some(limit) => matching.take(limit).collect(),
            None => matching.collect(),
        })
    }

    /// The `count` most recent transactions
    pub fn recent(&self, user: &UserId, count: usize) -> MoneyResult<Vec<Transaction>> {
        self.storage.transactions.recent(user, count)
    }

    /// All-time (income, expense) totals
    pub fn totals(&self, user: &UserId) -> MoneyResult<(Money, Money)> {
        self.storage.transactions.totals(user)
    }
}
