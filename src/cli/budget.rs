//! Budget CLI commands
//!
//! Implements CLI commands for setting weekly and monthly limits and for
//! checking spending against them.

use clap::Subcommand;
use tracing::warn;

use super::{parse_amount, CommandContext};
use crate::display::{format_budget_table, format_category_table, format_evaluation, format_health};
use crate::error::MoneyResult;
use crate::models::category::BUDGET_DEFAULT_CATEGORIES;
use crate::services::{BudgetEvaluator, BudgetService};

/// Budget subcommands
#[derive(Subcommand)]
pub enum BudgetCommands {
    /// Set the overall limit, or a category limit with --category
    Set {
        /// Limit amount (e.g., "2000" or "250.50")
        amount: String,
        /// Category to limit instead of all spending
        #[arg(short, long)]
        category: Option<String>,
        /// "weekly" or "monthly" (defaults to the selected period type)
        #[arg(short = 't', long = "type")]
        period_type: Option<String>,
    },

    /// Show spending against the current limits
    Status {
        #[arg(short = 't', long = "type")]
        period_type: Option<String>,
    },

    /// Show budget health and safe daily spend
    Health {
        #[arg(short = 't', long = "type")]
        period_type: Option<String>,
    },

    /// Show information about the current period
    Period {
        #[arg(short = 't', long = "type")]
        period_type: Option<String>,
    },

    /// List recent periods
    Periods {
        #[arg(short = 't', long = "type")]
        period_type: Option<String>,
        /// Number of periods to show
        #[arg(short, long, default_value = "6")]
        count: usize,
    },

    /// List every stored budget entry
    List,

    /// Delete all budgets of a period type
    Clear {
        #[arg(short = 't', long = "type")]
        period_type: Option<String>,
    },
}

/// Handle a budget command
pub fn handle_budget_command(ctx: &CommandContext<'_>, cmd: BudgetCommands) -> MoneyResult<()> {
    let budget_service = BudgetService::new(ctx.storage, &ctx.periods).with_bus(ctx.bus);
    let evaluator = BudgetEvaluator::new(ctx.storage, &ctx.periods);

    match cmd {
        BudgetCommands::Set {
            amount,
            category,
            period_type,
        } => {
            let period_type = ctx.period_type(period_type.as_deref())?;
            let amount = parse_amount(&amount)?;

            let entry = match category {
                Some(category) => {
                    budget_service.save_category(&ctx.user, period_type, &category, amount)?
                }
                None => {
                    if let Some(warning) = budget_service.income_warning(&ctx.user, amount)? {
                        println!("Budget Warning: your budget exceeds your total income.");
                        println!("  Income: {}", warning.income.format_with_symbol(ctx.symbol()));
                        println!("  Budget: {}", warning.budget.format_with_symbol(ctx.symbol()));
                        println!("  Please reduce your budget.");
                    }
                    budget_service.save_overall(&ctx.user, period_type, amount)?
                }
            };

            mark_budget_changed(ctx);
            println!(
                "Saved {} budget for {}: {} = {}",
                entry.period_type,
                ctx.periods.format_current(period_type),
                entry.category().unwrap_or("Overall"),
                entry.limit().format_with_symbol(ctx.symbol())
            );
        }

        BudgetCommands::Status { period_type } => {
            let period_type = ctx.period_type(period_type.as_deref())?;

            println!("{}", ctx.periods.format_current(period_type));
            println!("{}", "=".repeat(60));
            let overall = evaluator.evaluate_overall(&ctx.user, period_type)?;
            print!("{}", format_evaluation(period_type, overall.as_ref(), ctx.symbol()));
            println!();

            let categories = evaluator.category_warnings(&ctx.user, period_type)?;
            print!("{}", format_category_table(&categories, ctx.symbol()));
            if categories.is_empty() {
                println!(
                    "Suggested categories: {}",
                    BUDGET_DEFAULT_CATEGORIES.join(", ")
                );
            }
        }

        BudgetCommands::Health { period_type } => {
            let period_type = ctx.period_type(period_type.as_deref())?;
            let health = evaluator.budget_health(&ctx.user, period_type)?;
            print!("{}", format_health(&health, ctx.symbol()));
        }

        BudgetCommands::Period { period_type } => {
            let period_type = ctx.period_type(period_type.as_deref())?;
            let period = ctx.periods.current_period(period_type);

            println!("Current Period: {}", period.friendly());
            println!("  Start: {}", period.start_date());
            println!("  End:   {}", period.end_date());
            println!(
                "  Day {} of {}, {} days remaining",
                ctx.periods.days_elapsed(period_type) + 1,
                ctx.periods.days_in_period(period_type),
                ctx.periods.remaining_days(period_type)
            );
        }

        BudgetCommands::Periods { period_type, count } => {
            let period_type = ctx.period_type(period_type.as_deref())?;
            let current = ctx.periods.current_period(period_type);

            println!("Recent Budget Periods:");
            for period in ctx.periods.recent_periods(period_type, count) {
                let marker = if period == current { " (current)" } else { "" };
                println!("  {} - {}{}", period, period.friendly(), marker);
            }
        }

        BudgetCommands::List => {
            let entries = budget_service.list(&ctx.user)?;
            print!(
                "{}",
                format_budget_table(
                    &entries,
                    ctx.periods.zone(),
                    &ctx.settings.date_format,
                    ctx.symbol()
                )
            );
        }

        BudgetCommands::Clear { period_type } => {
            let period_type = ctx.period_type(period_type.as_deref())?;
            let removed = budget_service.clear_type(&ctx.user, period_type)?;
            if removed > 0 {
                mark_budget_changed(ctx);
            }
            println!("Removed {} {} budget entries", removed, period_type);
        }
    }

    Ok(())
}

/// Flag the change for the next dashboard view; the write itself already succeeded
fn mark_budget_changed(ctx: &CommandContext<'_>) {
    let mut settings = ctx.settings.clone();
    settings.budget_changed = true;
    if let Err(e) = settings.save(ctx.paths) {
        warn!(error = %e, "could not record budget change in settings");
    }
}
