//! Analytics Report
//!
//! Expense breakdown by category for the current period, the top three
//! categories, and a spending trend with the change between its last two
//! buckets.

use std::collections::HashMap;

use chrono::Duration;
use serde::Serialize;

use crate::error::MoneyResult;
use crate::models::category::{category_key, OTHERS};
use crate::models::{Money, PeriodType, PeriodWindow, TransactionKind, UserId};
use crate::services::PeriodService;
use crate::storage::Storage;

/// Number of monthly buckets in the monthly trend
pub const MONTHLY_TREND_LEN: usize = 6;

/// Number of categories in the top list
pub const TOP_CATEGORY_COUNT: usize = 3;

/// Spending in one category
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategorySpending {
    pub category: String,
    pub amount: Money,
    pub transaction_count: usize,
}

/// A top category with its share of total spending
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TopCategory {
    pub category: String,
    pub amount: Money,
    /// Truncated integer percent of total
    pub percent: u32,
}

/// One bucket of the spending trend
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TrendPoint {
    /// Weekday ("Mon") for weekly trends, month ("Jan") for monthly trends
    pub label: String,
    pub amount: Money,
}

/// Change between the last two trend buckets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TrendChange {
    pub previous: Money,
    pub current: Money,
    /// `current - previous`; negative when spending went down
    pub difference: Money,
}

/// Analytics Report
#[derive(Debug, Clone, Serialize)]
pub struct AnalyticsReport {
    pub period_type: PeriodType,
    pub period_label: String,
    pub window: PeriodWindow,
    /// Largest first
    pub categories: Vec<CategorySpending>,
    pub total_spending: Money,
    pub trend: Vec<TrendPoint>,
}

impl AnalyticsReport {
    /// Generate analytics for the current period of `period_type`
    pub fn generate(
        storage: &Storage,
        periods: &PeriodService<'_>,
        user: &UserId,
        period_type: PeriodType,
    ) -> MoneyResult<Self> {
        let window = periods.current_window(period_type);
        let expenses =
            storage
                .transactions
                .list_in_window(user, &window, Some(TransactionKind::Expense))?;

        // Group by trimmed, case-insensitive label; blank labels become Others
        let mut grouped: HashMap<String, CategorySpending> = HashMap::new();
        for txn in &expenses {
            let label = txn.display_category();
            let entry = grouped
                .entry(category_key(label))
                .or_insert_with(|| CategorySpending {
                    category: label.to_string(),
                    amount: Money::zero(),
                    transaction_count: 0,
                });
            entry.amount += txn.amount;
            entry.transaction_count += 1;
        }

        let mut categories: Vec<_> = grouped.into_values().collect();
        categories.sort_by(|a, b| {
            b.amount
                .cmp(&a.amount)
                .then_with(|| a.category.cmp(&b.category))
        });

        let total_spending = categories.iter().map(|c| c.amount).sum();

        let trend = match period_type {
            PeriodType::Weekly => {
                let start = periods.current_period(PeriodType::Weekly).start_date();
                let mut points: Vec<TrendPoint> = (0..7)
                    .map(|offset| TrendPoint {
                        label: (start + Duration::days(offset)).format("%a").to_string(),
                        amount: Money::zero(),
                    })
                    .collect();
                for txn in &expenses {
                    let offset = (periods.date_of(txn.date) - start).num_days();
                    if let Some(point) = usize::try_from(offset).ok().and_then(|i| points.get_mut(i)) {
                        point.amount += txn.amount;
                    }
                }
                points
            }
            PeriodType::Monthly => {
                let mut points = Vec::with_capacity(MONTHLY_TREND_LEN);
                for period in periods.recent_periods(PeriodType::Monthly, MONTHLY_TREND_LEN) {
                    let amount = storage.transactions.sum_in_window(
                        user,
                        &periods.window_of(&period),
                        TransactionKind::Expense,
                        None,
                    )?;
                    points.push(TrendPoint {
                        label: period.start_date().format("%b").to_string(),
                        amount,
                    });
                }
                points
            }
        };

        Ok(Self {
            period_type,
            period_label: periods.format_current(period_type),
            window,
            categories,
            total_spending,
            trend,
        })
    }

    /// Whether there is anything to show
    pub fn has_data(&self) -> bool {
        !self.categories.is_empty() || self.trend.iter().any(|p| !p.amount.is_zero())
    }

    /// The three largest categories with their truncated percent of total
    pub fn top_categories(&self) -> Vec<TopCategory> {
        if self.total_spending.is_zero() {
            return Vec::new();
        }

        let total = self.total_spending.cents() as i128;
        self.categories
            .iter()
            .take(TOP_CATEGORY_COUNT)
            .map(|c| TopCategory {
                category: c.category.clone(),
                amount: c.amount,
                percent: (c.amount.cents() as i128 * 100 / total) as u32,
            })
            .collect()
    }

    /// Change between the last two trend buckets
    pub fn trend_change(&self) -> TrendChange {
        let mut amounts = self.trend.iter().rev().map(|p| p.amount);
        let current = amounts.next().unwrap_or_default();
        let previous = amounts.next().unwrap_or_default();
        TrendChange {
            previous,
            current,
            difference: current - previous,
        }
    }

    /// Format the report for terminal display
    pub fn format_terminal(&self, symbol: &str) -> String {
        let mut output = String::new();

        output.push_str(&format!("Analytics: {}\n", self.period_label));
        output.push_str(&"=".repeat(60));
        output.push('\n');

        if !self.has_data() {
            output.push_str("No expenses recorded for this period.\n");
            return output;
        }

        output.push_str(&format!(
            "Total Spending: {}\n\n",
            self.total_spending.format_with_symbol(symbol)
        ));

        output.push_str(&format!("{:<30} {:>14} {:>8}\n", "Category", "Amount", "Count"));
        output.push_str(&"-".repeat(60));
        output.push('\n');
        for category in &self.categories {
            output.push_str(&format!(
                "{:<30} {:>14} {:>8}\n",
                category.category,
                category.amount.format_with_symbol(symbol),
                category.transaction_count
            ));
        }

        let top = self.top_categories();
        if !top.is_empty() {
            output.push_str("\nTop Categories\n");
            for (rank, category) in top.iter().enumerate() {
                output.push_str(&format!(
                    "  {}. {:<26} {:>3}%\n",
                    rank + 1,
                    category.category,
                    category.percent
                ));
            }
        }

        output.push_str("\nTrend\n");
        for point in &self.trend {
            output.push_str(&format!(
                "  {:<6} {:>14}\n",
                point.label,
                point.amount.format_with_symbol(symbol)
            ));
        }

        let change = self.trend_change();
        let direction = if change.difference.is_negative() {
            "less"
        } else {
            "more"
        };
        output.push_str(&format!(
            "\n{} {} than the previous {}\n",
            change.difference.abs().format_with_symbol(symbol),
            direction,
            match self.period_type {
                PeriodType::Weekly => "day",
                PeriodType::Monthly => "month",
            }
        ));

        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Settings;
    use crate::models::{TransactionDraft, Zone};
    use chrono::{NaiveDate, NaiveTime};

    fn user() -> UserId {
        UserId::from("user-1")
    }

    fn units(n: i64) -> Money {
        Money::from_units(n, 0)
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn periods(settings: &Settings) -> PeriodService<'_> {
        PeriodService::new(settings)
            .with_zone(Zone::utc())
            .with_today(date(2026, 10, 21))
    }

    fn spend(storage: &Storage, periods: &PeriodService<'_>, amount: Money, category: &str, on: NaiveDate) {
        let at = periods.millis_at(on, NaiveTime::from_hms_opt(9, 30, 0).unwrap());
        storage
            .transactions
            .insert(
                &user(),
                TransactionKind::Expense,
                &TransactionDraft::new(amount, category, at).with_payment_method("Cash"),
            )
            .unwrap();
    }

    #[test]
    fn test_category_breakdown_and_top() {
        let storage = Storage::in_memory().unwrap();
        let settings = Settings::default();
        let periods = periods(&settings);

        spend(&storage, &periods, units(50), "Bills", date(2026, 10, 2));
        spend(&storage, &periods, units(30), "Food & Dining", date(2026, 10, 5));
        spend(&storage, &periods, units(10), "food & dining ", date(2026, 10, 6));
        spend(&storage, &periods, units(7), "Travel", date(2026, 10, 7));
        spend(&storage, &periods, units(3), "Health", date(2026, 10, 8));
        spend(&storage, &periods, units(500), "Bills", date(2026, 9, 30));

        let report =
            AnalyticsReport::generate(&storage, &periods, &user(), PeriodType::Monthly).unwrap();

        assert_eq!(report.total_spending, units(100));
        assert_eq!(report.categories[0].category, "Bills");
        assert_eq!(report.categories[1].category, "Food & Dining");
        assert_eq!(report.categories[1].amount, units(40));
        assert_eq!(report.categories[1].transaction_count, 2);

        let top = report.top_categories();
        let shares: Vec<_> = top.iter().map(|t| (t.category.as_str(), t.percent)).collect();
        assert_eq!(shares, [("Bills", 50), ("Food & Dining", 40), ("Travel", 7)]);
    }

    #[test]
    fn test_top_percent_is_truncated() {
        let storage = Storage::in_memory().unwrap();
        let settings = Settings::default();
        let periods = periods(&settings);

        spend(&storage, &periods, units(2), "Bills", date(2026, 10, 2));
        spend(&storage, &periods, units(1), "Travel", date(2026, 10, 2));

        let report =
            AnalyticsReport::generate(&storage, &periods, &user(), PeriodType::Monthly).unwrap();
        let percents: Vec<_> = report.top_categories().iter().map(|t| t.percent).collect();
        assert_eq!(percents, [66, 33]);
    }

    #[test]
    fn test_empty_report() {
        let storage = Storage::in_memory().unwrap();
        let settings = Settings::default();
        let periods = periods(&settings);

        let report =
            AnalyticsReport::generate(&storage, &periods, &user(), PeriodType::Weekly).unwrap();
        assert!(!report.has_data());
        assert!(report.top_categories().is_empty());
        assert_eq!(report.trend.len(), 7);
        assert!(report.format_terminal("₹").contains("No expenses"));
    }

    #[test]
    fn test_weekly_trend_buckets_by_day() {
        let storage = Storage::in_memory().unwrap();
        let settings = Settings::default();
        let periods = periods(&settings);

        // Week of Sun Oct 18 .. Sat Oct 24
        spend(&storage, &periods, units(10), "Bills", date(2026, 10, 18));
        spend(&storage, &periods, units(25), "Bills", date(2026, 10, 20));
        spend(&storage, &periods, units(15), "Travel", date(2026, 10, 21));
        spend(&storage, &periods, units(99), "Travel", date(2026, 10, 17));

        let report =
            AnalyticsReport::generate(&storage, &periods, &user(), PeriodType::Weekly).unwrap();

        let labels: Vec<_> = report.trend.iter().map(|p| p.label.as_str()).collect();
        assert_eq!(labels, ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"]);
        assert_eq!(report.trend[0].amount, units(10));
        assert_eq!(report.trend[2].amount, units(25));
        assert_eq!(report.trend[3].amount, units(15));
        assert_eq!(report.total_spending, units(50));
    }

    #[test]
    fn test_monthly_trend_and_change() {
        let storage = Storage::in_memory().unwrap();
        let settings = Settings::default();
        let periods = periods(&settings);

        spend(&storage, &periods, units(80), "Bills", date(2026, 5, 3));
        spend(&storage, &periods, units(120), "Bills", date(2026, 9, 10));
        spend(&storage, &periods, units(70), "Bills", date(2026, 10, 1));
        spend(&storage, &periods, units(1000), "Bills", date(2026, 4, 30));

        let report =
            AnalyticsReport::generate(&storage, &periods, &user(), PeriodType::Monthly).unwrap();

        let labels: Vec<_> = report.trend.iter().map(|p| p.label.as_str()).collect();
        assert_eq!(labels, ["May", "Jun", "Jul", "Aug", "Sep", "Oct"]);
        assert_eq!(report.trend[0].amount, units(80));

        let change = report.trend_change();
        assert_eq!(change.previous, units(120));
        assert_eq!(change.current, units(70));
        assert_eq!(change.difference, Money::from_units(-50, 0));
    }
}
