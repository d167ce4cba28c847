//! Budget display formatting
//!
//! Stored entries, evaluations, category warnings and the health summary.

use tabled::settings::Style;
use tabled::{Table, Tabled};

use crate::models::{BudgetEntry, PeriodType, WarningLevel, Zone};
use crate::services::{BudgetHealth, CategoryEvaluation, Evaluation};

#[derive(Tabled)]
struct EntryRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Type")]
    period_type: String,
    #[tabled(rename = "From")]
    from: String,
    #[tabled(rename = "To")]
    to: String,
    #[tabled(rename = "Scope")]
    scope: String,
    #[tabled(rename = "Limit")]
    limit: String,
}

#[derive(Tabled)]
struct CategoryRow {
    #[tabled(rename = "Category")]
    category: String,
    #[tabled(rename = "Limit")]
    limit: String,
    #[tabled(rename = "Spent")]
    spent: String,
    #[tabled(rename = "Used")]
    used: String,
    #[tabled(rename = "Level")]
    level: String,
}

/// Format stored budget entries as a table
pub fn format_budget_table(entries: &[BudgetEntry], zone: &Zone, date_format: &str, symbol: &str) -> String {
    if entries.is_empty() {
        return "No budgets set.\n".to_string();
    }

    let rows = entries.iter().map(|e| EntryRow {
        id: e.id.to_string(),
        period_type: e.period_type.to_string(),
        from: zone.date_of(e.window.start).format(date_format).to_string(),
        to: zone.date_of(e.window.end).format(date_format).to_string(),
        scope: e.category().unwrap_or("Overall").to_string(),
        limit: e.limit().format_with_symbol(symbol),
    });

    let mut table = Table::new(rows);
    table.with(Style::psql());
    format!("{}\n", table)
}

/// Format an overall evaluation, or the not-set message
pub fn format_evaluation(period_type: PeriodType, evaluation: Option<&Evaluation>, symbol: &str) -> String {
    let Some(e) = evaluation else {
        return format!("{} budget: not set\n", period_type);
    };

    let mut output = String::new();
    output.push_str(&format!("{} budget: {}\n", period_type, e.limit.format_with_symbol(symbol)));
    output.push_str(&format!("  Spent:     {}\n", e.spent.format_with_symbol(symbol)));
    output.push_str(&format!("  Remaining: {}\n", e.remaining.format_with_symbol(symbol)));
    output.push_str(&format!("  Used:      {}%\n", e.percent_used));
    output.push_str(&format!("  Status:    {}\n", e.status));
    output
}

/// Format category budgets with their warning levels
pub fn format_category_table(evaluations: &[CategoryEvaluation], symbol: &str) -> String {
    if evaluations.is_empty() {
        return "No category budgets for this period.\n".to_string();
    }

    let rows = evaluations.iter().map(|c| CategoryRow {
        category: c.category.clone(),
        limit: c.evaluation.limit.format_with_symbol(symbol),
        spent: c.evaluation.spent.format_with_symbol(symbol),
        used: format!("{}%", c.evaluation.percent_used),
        level: match c.warning {
            WarningLevel::Exceeded => {
                format!("Exceeded by {}", c.overage.format_with_symbol(symbol))
            }
            WarningLevel::Warning => "Near limit".to_string(),
            WarningLevel::Safe => "Safe".to_string(),
        },
    });

    let mut table = Table::new(rows);
    table.with(Style::psql());
    format!("{}\n", table)
}

/// Format the budget health summary
pub fn format_health(health: &BudgetHealth, symbol: &str) -> String {
    let (Some(e), Some(daily)) = (&health.evaluation, health.safe_daily_spend) else {
        return format!(
            "{} budget not set. Set one with `moneyman budget set`.\n",
            health.period_type
        );
    };

    format!(
        "{} budget health: {}\n  {}% used\n  {} left, {} days remaining\n  Safe daily spend: {}\n",
        health.period_type,
        e.status,
        e.percent_used,
        e.remaining.format_with_symbol(symbol),
        health.remaining_days,
        daily.format_with_symbol(symbol)
    )
}
