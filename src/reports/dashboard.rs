//! Dashboard Report
//!
//! The home screen summary: all-time totals, both overall budgets, the
//! category with the most spending, recent transactions and the monthly
//! category warnings.

use std::collections::HashMap;

use crate::error::MoneyResult;
use crate::models::category::category_key;
use crate::models::{Money, PeriodType, Transaction, TransactionKind, UserId, WarningLevel};
use crate::services::{BudgetEvaluator, CategoryEvaluation, Evaluation, PeriodService};
use crate::storage::Storage;

/// Number of recent transactions on the dashboard
pub const RECENT_COUNT: usize = 3;

/// Dashboard Report
#[derive(Debug, Clone)]
pub struct DashboardReport {
    pub total_income: Money,
    pub total_expense: Money,
    pub weekly: Option<Evaluation>,
    pub monthly: Option<Evaluation>,
    /// All-time category with the most spending
    pub most_spent: Option<(String, Money)>,
    pub recent: Vec<Transaction>,
    /// Monthly category budgets that are near or past their limit
    pub warnings: Vec<CategoryEvaluation>,
}

impl DashboardReport {
    /// Generate the dashboard for `user`
    pub fn generate(
        storage: &Storage,
        periods: &PeriodService<'_>,
        user: &UserId,
    ) -> MoneyResult<Self> {
        let evaluator = BudgetEvaluator::new(storage, periods);
        let (total_income, total_expense) = storage.transactions.totals(user)?;

        let mut by_category: HashMap<String, (String, Money)> = HashMap::new();
        for (label, amount) in storage
            .transactions
            .category_totals(user, TransactionKind::Expense)?
        {
            let entry = by_category
                .entry(category_key(&label))
                .or_insert_with(|| (label.trim().to_string(), Money::zero()));
            entry.1 += amount;
        }
        let most_spent = by_category
            .into_values()
            .max_by(|a, b| a.1.cmp(&b.1).then_with(|| b.0.cmp(&a.0)));

        let warnings = evaluator
            .category_warnings(user, PeriodType::Monthly)?
            .into_iter()
            .filter(|w| w.warning != WarningLevel::Safe)
            .collect();

        Ok(Self {
            total_income,
            total_expense,
            weekly: evaluator.evaluate_overall(user, PeriodType::Weekly)?,
            monthly: evaluator.evaluate_overall(user, PeriodType::Monthly)?,
            most_spent,
            recent: storage.transactions.recent(user, RECENT_COUNT)?,
            warnings,
        })
    }

    /// Income minus expense
    pub fn balance(&self) -> Money {
        self.total_income - self.total_expense
    }

    /// Format the report for terminal display
    pub fn format_terminal(&self, symbol: &str) -> String {
        let mut output = String::new();

        output.push_str("Dashboard\n");
        output.push_str(&"=".repeat(60));
        output.push('\n');
        output.push_str(&format!(
            "Income: {}   Expense: {}   Balance: {}\n\n",
            self.total_income.format_with_symbol(symbol),
            self.total_expense.format_with_symbol(symbol),
            self.balance().format_with_symbol(symbol)
        ));

        for (label, evaluation) in [("Weekly", &self.weekly), ("Monthly", &self.monthly)] {
            match evaluation {
                Some(e) => {
                    output.push_str(&format!(
                        "{:<8} budget {}  spent {}  left {}  ({}%, {})\n",
                        label,
                        e.limit.format_with_symbol(symbol),
                        e.spent.format_with_symbol(symbol),
                        e.remaining.format_with_symbol(symbol),
                        e.percent_used,
                        e.status
                    ));
                    if e.spent > e.limit {
                        output.push_str(&format!(
                            "         Exceeded by {}\n",
                            (e.spent - e.limit).format_with_symbol(symbol)
                        ));
                    }
                }
                None => output.push_str(&format!("{:<8} budget not set\n", label)),
            }
        }

        if let Some((category, amount)) = &self.most_spent {
            output.push_str(&format!(
                "\nMost spent: {} ({})\n",
                category,
                amount.format_with_symbol(symbol)
            ));
        }

        if !self.warnings.is_empty() {
            output.push_str("\nCategory warnings\n");
            for warning in &self.warnings {
                let detail = match warning.warning {
                    WarningLevel::Exceeded => {
                        format!("Exceeded by {}", warning.overage.format_with_symbol(symbol))
                    }
                    _ => "Near limit".to_string(),
                };
                output.push_str(&format!("  {:<24} {}\n", warning.category, detail));
            }
        }

        if !self.recent.is_empty() {
            output.push_str("\nRecent transactions\n");
            for txn in &self.recent {
                let sign = if txn.is_expense() { "-" } else { "+" };
                output.push_str(&format!(
                    "  {:<24} {}{}\n",
                    txn.display_category(),
                    sign,
                    txn.amount.format_with_symbol(symbol)
                ));
            }
        }

        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Settings;
    use crate::models::{BudgetScope, TransactionDraft, Zone};
    use chrono::NaiveDate;

    fn user() -> UserId {
        UserId::from("user-1")
    }

    fn units(n: i64) -> Money {
        Money::from_units(n, 0)
    }

    #[test]
    fn test_dashboard_summary() {
        let storage = Storage::in_memory().unwrap();
        let settings = Settings::default();
        let periods = PeriodService::new(&settings)
            .with_zone(Zone::utc())
            .with_today(NaiveDate::from_ymd_opt(2026, 10, 21).unwrap());
        let now = periods.now_millis();

        storage
            .budgets
            .upsert(
                &user(),
                PeriodType::Monthly,
                periods.current_window(PeriodType::Monthly),
                BudgetScope::Category {
                    name: "Bills".into(),
                    amount: units(100),
                },
            )
            .unwrap();
        storage
            .budgets
            .upsert(
                &user(),
                PeriodType::Weekly,
                periods.current_window(PeriodType::Weekly),
                BudgetScope::Overall { amount: units(500) },
            )
            .unwrap();

        for (amount, category) in [(120, "Bills"), (30, "Travel"), (40, "travel ")] {
            storage
                .transactions
                .insert(
                    &user(),
                    TransactionKind::Expense,
                    &TransactionDraft::new(units(amount), category, now).with_payment_method("UPI"),
                )
                .unwrap();
        }
        storage
            .transactions
            .insert(
                &user(),
                TransactionKind::Income,
                &TransactionDraft::new(units(1000), "Salary", now),
            )
            .unwrap();

        let report = DashboardReport::generate(&storage, &periods, &user()).unwrap();

        assert_eq!(report.total_income, units(1000));
        assert_eq!(report.total_expense, units(190));
        assert_eq!(report.balance(), units(810));
        assert_eq!(report.weekly.as_ref().unwrap().spent, units(190));
        assert!(report.monthly.is_none());
        assert_eq!(report.most_spent, Some(("Bills".to_string(), units(120))));
        assert_eq!(report.recent.len(), RECENT_COUNT);
        assert_eq!(report.warnings.len(), 1);
        assert_eq!(report.warnings[0].overage, units(20));

        let text = report.format_terminal("₹");
        assert!(text.contains("Monthly  budget not set"));
        assert!(text.contains("Exceeded by ₹20.00"));
    }
}
