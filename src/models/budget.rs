//! Budget entry model
//!
//! A budget entry is a spending limit for one concrete period window, either
//! for all spending (overall) or for a single category.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::category::same_category;
use super::ids::{BudgetId, UserId};
use super::money::Money;
use super::period::{PeriodType, PeriodWindow};

/// Percent used at which a budget stops being on track
pub const AT_RISK_PERCENT: u32 = 70;

/// Percent used at which a budget is reported as over budget
pub const OVER_BUDGET_PERCENT: u32 = 90;

/// Percent used at which a category budget raises a warning
pub const CATEGORY_WARNING_PERCENT: u32 = 90;

/// What a budget entry limits
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "scope", rename_all = "lowercase")]
pub enum BudgetScope {
    Overall { amount: Money },
    Category { name: String, amount: Money },
}

/// A stored budget entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BudgetEntry {
    pub id: BudgetId,
    pub user_id: UserId,
    pub period_type: PeriodType,
    pub window: PeriodWindow,
    pub scope: BudgetScope,
}

impl BudgetEntry {
    /// The limit regardless of scope
    pub fn limit(&self) -> Money {
        match &self.scope {
            BudgetScope::Overall { amount } | BudgetScope::Category { amount, .. } => *amount,
        }
    }

    /// Category name for category budgets
    pub fn category(&self) -> Option<&str> {
        match &self.scope {
            BudgetScope::Overall { .. } => None,
            BudgetScope::Category { name, .. } => Some(name),
        }
    }

    pub fn is_overall(&self) -> bool {
        matches!(self.scope, BudgetScope::Overall { .. })
    }

    /// Whether this entry applies to `window` (same start and end)
    pub fn covers(&self, window: &PeriodWindow) -> bool {
        self.window == *window
    }

    /// Whether this is the category budget for `name`
    pub fn is_for_category(&self, name: &str) -> bool {
        self.category().is_some_and(|c| same_category(c, name))
    }
}

impl fmt::Display for BudgetEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.scope {
            BudgetScope::Overall { amount } => {
                write!(f, "{} overall: {}", self.period_type, amount)
            }
            BudgetScope::Category { name, amount } => {
                write!(f, "{} {}: {}", self.period_type, name, amount)
            }
        }
    }
}

/// Health classification of spending against a limit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BudgetStatus {
    OnTrack,
    AtRisk,
    OverBudget,
}

impl BudgetStatus {
    /// Classify `spent` against `limit` given the rounded percent used
    pub fn classify(percent_used: u32, spent: Money, limit: Money) -> Self {
        if spent > limit || percent_used >= OVER_BUDGET_PERCENT {
            Self::OverBudget
        } else if percent_used >= AT_RISK_PERCENT {
            Self::AtRisk
        } else {
            Self::OnTrack
        }
    }
}

impl fmt::Display for BudgetStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OnTrack => write!(f, "On Track"),
            Self::AtRisk => write!(f, "At Risk"),
            Self::OverBudget => write!(f, "Over Budget"),
        }
    }
}

/// Per-category warning level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WarningLevel {
    Safe,
    Warning,
    Exceeded,
}

impl WarningLevel {
    pub fn classify(spent: Money, limit: Money) -> Self {
        if spent > limit {
            Self::Exceeded
        } else if limit.is_positive()
            && (spent.cents() as i128) * 100
                >= (limit.cents() as i128) * CATEGORY_WARNING_PERCENT as i128
        {
            Self::Warning
        } else {
            Self::Safe
        }
    }
}

impl fmt::Display for WarningLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Safe => write!(f, "Safe"),
            Self::Warning => write!(f, "Warning"),
            Self::Exceeded => write!(f, "Exceeded"),
        }
    }
}

/// Validation errors for budget amounts
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BudgetValidationError {
    NegativeBudget,
    EmptyCategory,
}

impl fmt::Display for BudgetValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NegativeBudget => write!(f, "Budget amount cannot be negative"),
            Self::EmptyCategory => write!(f, "Category budget needs a category name"),
        }
    }
}

impl std::error::Error for BudgetValidationError {}

/// Validate a limit before it is saved
pub fn validate_limit(amount: Money) -> Result<(), BudgetValidationError> {
    if amount.is_negative() {
        return Err(BudgetValidationError::NegativeBudget);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn units(n: i64) -> Money {
        Money::from_units(n, 0)
    }

    fn entry(scope: BudgetScope) -> BudgetEntry {
        BudgetEntry {
            id: BudgetId::from_raw(1),
            user_id: UserId::from("u1"),
            period_type: PeriodType::Monthly,
            window: PeriodWindow::new(0, 100),
            scope,
        }
    }

    #[test]
    fn test_status_thresholds() {
        let limit = units(1000);
        let classify = |spent: i64| {
            let spent = units(spent);
            BudgetStatus::classify(spent.percent_of(limit), spent, limit)
        };
        assert_eq!(classify(0), BudgetStatus::OnTrack);
        assert_eq!(classify(694), BudgetStatus::OnTrack);
        assert_eq!(classify(700), BudgetStatus::AtRisk);
        assert_eq!(classify(894), BudgetStatus::AtRisk);
        assert_eq!(classify(900), BudgetStatus::OverBudget);
        assert_eq!(classify(950), BudgetStatus::OverBudget);
        assert_eq!(classify(1200), BudgetStatus::OverBudget);
    }

    #[test]
    fn test_zero_limit_with_spending_is_over() {
        let spent = units(5);
        assert_eq!(
            BudgetStatus::classify(spent.percent_of(Money::zero()), spent, Money::zero()),
            BudgetStatus::OverBudget
        );
    }

    #[test]
    fn test_warning_levels() {
        let limit = units(1000);
        assert_eq!(WarningLevel::classify(units(899), limit), WarningLevel::Safe);
        assert_eq!(WarningLevel::classify(units(900), limit), WarningLevel::Warning);
        assert_eq!(WarningLevel::classify(units(1000), limit), WarningLevel::Warning);
        assert_eq!(WarningLevel::classify(units(1001), limit), WarningLevel::Exceeded);
    }

    #[test]
    fn test_entry_accessors() {
        let overall = entry(BudgetScope::Overall { amount: units(500) });
        assert!(overall.is_overall());
        assert_eq!(overall.limit(), units(500));
        assert_eq!(overall.category(), None);

        let category = entry(BudgetScope::Category {
            name: "Bills".into(),
            amount: units(250),
        });
        assert!(category.is_for_category(" bills"));
        assert_eq!(category.limit(), units(250));
        assert!(category.covers(&PeriodWindow::new(0, 100)));
        assert!(!category.covers(&PeriodWindow::new(0, 101)));
    }

    #[test]
    fn test_validate_limit() {
        assert!(validate_limit(units(0)).is_ok());
        assert_eq!(
            validate_limit(Money::from_cents(-1)),
            Err(BudgetValidationError::NegativeBudget)
        );
    }
}
