//! Budget evaluation engine
//!
//! Combines the current period window, the ledger totals and the stored
//! limits into the numbers the views show: spent, remaining, percent used,
//! status, category warnings, the expense gate and the safe daily spend.
//! Everything here is read-only.

use serde::Serialize;
use tracing::debug;

use crate::error::MoneyResult;
use crate::models::{
    BudgetStatus, Money, PeriodType, PeriodWindow, TransactionKind, UserId, WarningLevel,
};
use crate::services::period::PeriodService;
use crate::storage::Storage;

/// Spending measured against one limit
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Evaluation {
    pub period_type: PeriodType,
    pub window: PeriodWindow,
    pub limit: Money,
    pub spent: Money,
    /// `max(0, limit - spent)`
    pub remaining: Money,
    /// `round(spent / limit * 100)`, 0 when the limit is 0
    pub percent_used: u32,
    pub status: BudgetStatus,
}

impl Evaluation {
    /// Derive the numbers for `spent` against `limit`
    pub fn compute(
        period_type: PeriodType,
        window: PeriodWindow,
        limit: Money,
        spent: Money,
    ) -> Self {
        let percent_used = spent.percent_of(limit);
        Self {
            period_type,
            window,
            limit,
            spent,
            remaining: limit.saturating_remaining(spent),
            percent_used,
            status: BudgetStatus::classify(percent_used, spent, limit),
        }
    }

    /// Whether adding `candidate` would take spending strictly past the limit
    pub fn exceeded_by(&self, candidate: Money) -> bool {
        self.spent + candidate > self.limit
    }
}

/// A category budget with its spending and warning level
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryEvaluation {
    pub category: String,
    pub evaluation: Evaluation,
    pub warning: WarningLevel,
    /// How far spending is past the limit (zero unless exceeded)
    pub overage: Money,
}

impl CategoryEvaluation {
    fn new(category: String, evaluation: Evaluation) -> Self {
        let warning = WarningLevel::classify(evaluation.spent, evaluation.limit);
        let overage = evaluation.spent.saturating_remaining(evaluation.limit);
        Self {
            category,
            evaluation,
            warning,
            overage,
        }
    }
}

/// A configured limit a candidate expense would break
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExceededLimit {
    pub period_type: PeriodType,
    pub limit: Money,
    pub spent: Money,
    pub candidate: Money,
}

impl ExceededLimit {
    /// Amount the limit would be overshot by
    pub fn overshoot(&self) -> Money {
        self.spent + self.candidate - self.limit
    }
}

/// Budget health summary for one period type
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BudgetHealth {
    pub period_type: PeriodType,
    /// Absent when no budget is set for the current window
    pub evaluation: Option<Evaluation>,
    pub remaining_days: i64,
    /// Absent when no budget is set
    pub safe_daily_spend: Option<Money>,
}

impl BudgetHealth {
    pub fn is_budget_set(&self) -> bool {
        self.evaluation.is_some()
    }
}

/// `max(0, limit - spent) / remaining_days`, with at least one day
pub fn safe_daily_spend(limit: Money, spent: Money, remaining_days: i64) -> Money {
    limit.saturating_remaining(spent).divide_by(remaining_days.max(1))
}

/// Reads budgets and spending for one user at a time
pub struct BudgetEvaluator<'a> {
    storage: &'a Storage,
    periods: &'a PeriodService<'a>,
}

impl<'a> BudgetEvaluator<'a> {
    pub fn new(storage: &'a Storage, periods: &'a PeriodService<'a>) -> Self {
        Self { storage, periods }
    }

    /// Overall budget for the current window
    ///
    /// The most recent overall entry applies only when its window is the
    /// current window; entries left over from an earlier period count as
    /// not set.
    pub fn evaluate_overall(
        &self,
        user: &UserId,
        period_type: PeriodType,
    ) -> MoneyResult<Option<Evaluation>> {
        let window = self.periods.current_window(period_type);

        let entry = self.storage.budgets.latest_overall(user, period_type)?;
        let Some(entry) = entry.filter(|e| e.covers(&window)) else {
            debug!(user = %user, %period_type, "no overall budget for current window");
            return Ok(None);
        };

        let spent = self
            .storage
            .transactions
            .sum_in_window(user, &window, TransactionKind::Expense, None)?;

        Ok(Some(Evaluation::compute(
            period_type,
            window,
            entry.limit(),
            spent,
        )))
    }

    /// One category budget for the current window
    pub fn evaluate_category(
        &self,
        user: &UserId,
        period_type: PeriodType,
        category: &str,
    ) -> MoneyResult<Option<CategoryEvaluation>> {
        let window = self.periods.current_window(period_type);

        let Some(entry) = self
            .storage
            .budgets
            .find_category(user, period_type, &window, category)?
        else {
            return Ok(None);
        };

        let spent = self.storage.transactions.sum_in_window(
            user,
            &window,
            TransactionKind::Expense,
            Some(category),
        )?;

        let name = entry.category().unwrap_or(category).to_string();
        Ok(Some(CategoryEvaluation::new(
            name,
            Evaluation::compute(period_type, window, entry.limit(), spent),
        )))
    }

    /// Every category budget of the current window with its warning level
    pub fn category_warnings(
        &self,
        user: &UserId,
        period_type: PeriodType,
    ) -> MoneyResult<Vec<CategoryEvaluation>> {
        let window = self.periods.current_window(period_type);
        let entries = self
            .storage
            .budgets
            .category_budgets_for_window(user, period_type, &window)?;

        let mut evaluations = Vec::with_capacity(entries.len());
        for entry in entries {
            let name = entry.category().unwrap_or_default().to_string();
            let spent = self.storage.transactions.sum_in_window(
                user,
                &window,
                TransactionKind::Expense,
                Some(&name),
            )?;
            evaluations.push(CategoryEvaluation::new(
                name,
                Evaluation::compute(period_type, window, entry.limit(), spent),
            ));
        }
        Ok(evaluations)
    }

    /// Limits that a new expense of `candidate` would break
    pub fn check_expense(
        &self,
        user: &UserId,
        candidate: Money,
    ) -> MoneyResult<Vec<ExceededLimit>> {
        let mut exceeded = Vec::new();
        for period_type in PeriodType::ALL {
            if let Some(evaluation) = self.evaluate_overall(user, period_type)? {
                if evaluation.exceeded_by(candidate) {
                    exceeded.push(ExceededLimit {
                        period_type,
                        limit: evaluation.limit,
                        spent: evaluation.spent,
                        candidate,
                    });
                }
            }
        }
        Ok(exceeded)
    }

    /// Whether a new expense of `candidate` would exceed the weekly or the
    /// monthly overall budget
    pub fn would_exceed(&self, user: &UserId, candidate: Money) -> MoneyResult<bool> {
        Ok(!self.check_expense(user, candidate)?.is_empty())
    }

    /// Health summary: status, usage, days left and safe daily spend
    pub fn budget_health(
        &self,
        user: &UserId,
        period_type: PeriodType,
    ) -> MoneyResult<BudgetHealth> {
        let evaluation = self.evaluate_overall(user, period_type)?;
        let remaining_days = self.periods.remaining_days(period_type);
        let safe_daily_spend = evaluation
            .as_ref()
            .map(|e| safe_daily_spend(e.limit, e.spent, remaining_days));

        Ok(BudgetHealth {
            period_type,
            evaluation,
            remaining_days,
            safe_daily_spend,
        })
    }
}
