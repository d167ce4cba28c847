//! Budget service
//!
//! Validated write paths for the budget store. Saving is replace-on-conflict
//! for the current window of a period type, so saving the same limit twice
//! leaves one entry. Every write is audited and published on the change bus.

use tracing::{debug, info};

use crate::audit::EntityType;
use crate::error::{MoneyError, MoneyResult};
use crate::events::{ChangeBus, ChangeEvent};
use crate::models::budget::validate_limit;
use crate::models::category::{canonical_name, EXPENSE_CATEGORIES};
use crate::models::{BudgetEntry, BudgetScope, Money, PeriodType, UserId};
use crate::services::period::PeriodService;
use crate::storage::Storage;

/// A budget larger than the user's recorded income
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IncomeWarning {
    pub income: Money,
    pub budget: Money,
}

/// Service for budget management
pub struct BudgetService<'a> {
    storage: &'a Storage,
    periods: &'a PeriodService<'a>,
    bus: Option<&'a ChangeBus>,
}

impl<'a> BudgetService<'a> {
    /// Create a new budget service
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

    /// Set the overall limit for the current window of `period_type`
    pub fn save_overall(
        &self,
        user: &UserId,
        period_type: PeriodType,
        amount: Money,
    ) -> MoneyResult<BudgetEntry> {
        validate_limit(amount).map_err(|e| MoneyError::Validation(e.to_string()))?;

        let window = self.periods.current_window(period_type);
        let existed = self
            .storage
            .budgets
            .find_overall(user, period_type, &window)?
            .is_some();

        let entry = self.storage.budgets.upsert(
            user,
            period_type,
            window,
            BudgetScope::Overall { amount },
        )?;

        self.record(user, &entry, existed, format!("{} overall", period_type))?;
        Ok(entry)
    }

    /// Set the limit of one category for the current window of `period_type`
    pub fn save_category(
        &self,
        user: &UserId,
        period_type: PeriodType,
        category: &str,
        amount: Money,
    ) -> MoneyResult<BudgetEntry> {
        let name = canonical_name(category, EXPENSE_CATEGORIES);
        if name.is_empty() {
            return Err(MoneyError::Validation(
                "Category budget needs a category name".into(),
            ));
        }
        validate_limit(amount).map_err(|e| MoneyError::Validation(e.to_string()))?;

        let window = self.periods.current_window(period_type);
        let existed = self
            .storage
            .budgets
            .find_category(user, period_type, &window, &name)?
            .is_some();

        let entry = self.storage.budgets.upsert(
            user,
            period_type,
            window,
            BudgetScope::Category {
                name: name.clone(),
                amount,
            },
        )?;

        self.record(user, &entry, existed, format!("{} {}", period_type, name))?;
        Ok(entry)
    }

    fn record(
        &self,
        user: &UserId,
        entry: &BudgetEntry,
        replaced: bool,
        label: String,
    ) -> MoneyResult<()> {
        if replaced {
            self.storage
                .log_replace(user, EntityType::Budget, entry.id.to_string(), Some(label), entry)?;
        } else {
            self.storage
                .log_create(user, EntityType::Budget, entry.id.to_string(), Some(label), entry)?;
        }
        info!(id = %entry.id, user = %user, replaced, "saved budget: {}", entry);

        self.publish(ChangeEvent::BudgetSaved {
            user: user.clone(),
            period_type: entry.period_type,
            id: entry.id,
        });
        Ok(())
    }

    /// Overall limit of the current window, if one is set
    pub fn overall_limit(
        &self,
        user: &UserId,
        period_type: PeriodType,
    ) -> MoneyResult<Option<Money>> {
        let window = self.periods.current_window(period_type);
        Ok(self
            .storage
            .budgets
            .find_overall(user, period_type, &window)?
            .map(|e| e.limit()))
    }

    /// Category entries of the current window
    pub fn category_limits(
        &self,
        user: &UserId,
        period_type: PeriodType,
    ) -> MoneyResult<Vec<BudgetEntry>> {
        let window = self.periods.current_window(period_type);
        self.storage
            .budgets
            .category_budgets_for_window(user, period_type, &window)
    }

    /// Warning when an overall limit is larger than all income recorded so far
    pub fn income_warning(
        &self,
        user: &UserId,
        amount: Money,
    ) -> MoneyResult<Option<IncomeWarning>> {
        let (income, _) = self.storage.transactions.totals(user)?;
        Ok((amount > income).then_some(IncomeWarning {
            income,
            budget: amount,
        }))
    }

    /// Every stored entry, newest window first
    pub fn list(&self, user: &UserId) -> MoneyResult<Vec<BudgetEntry>> {
        self.storage.budgets.list_for_user(user)
    }

    /// Delete every entry of `period_type`, in any window
    pub fn clear_type(&self, user: &UserId, period_type: PeriodType) -> MoneyResult<usize> {
        let removed = self.storage.budgets.delete_by_type(user, period_type)?;

        if removed > 0 {
            self.storage.log_delete(
                user,
                EntityType::Budget,
                format!("{} ({} entries)", period_type, removed),
                Some(format!("{} budgets", period_type)),
            )?;
        }
        debug!(user = %user, %period_type, removed, "cleared budgets");

        self.publish(ChangeEvent::BudgetsCleared {
            user: user.clone(),
            period_type,
            removed,
        });
        Ok(removed)
    }

    fn publish(&self, event: ChangeEvent) {
        if let Some(bus) = self.bus {
            bus.publish(event);
        }
    }
}
