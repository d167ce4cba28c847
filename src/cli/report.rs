//! Report CLI commands

use clap::Subcommand;
use tracing::warn;

use super::CommandContext;
use crate::error::MoneyResult;
use crate::reports::{AnalyticsReport, DashboardReport};

/// Report subcommands
#[derive(Subcommand)]
pub enum ReportCommands {
    /// Totals, both budgets, most-spent category and recent activity
    Dashboard,

    /// Category breakdown, top categories and spending trend
    Analytics {
        /// "weekly" or "monthly" (defaults to the selected period type)
        #[arg(short = 't', long = "type")]
        period_type: Option<String>,
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
}

/// Handle a report command
pub fn handle_report_command(ctx: &CommandContext<'_>, cmd: ReportCommands) -> MoneyResult<()> {
    match cmd {
        ReportCommands::Dashboard => {
            let report = DashboardReport::generate(ctx.storage, &ctx.periods, &ctx.user)?;

            if ctx.settings.budget_changed {
                println!("(budgets were updated since your last visit)\n");
                let mut settings = ctx.settings.clone();
                settings.budget_changed = false;
                if let Err(e) = settings.save(ctx.paths) {
                    warn!(error = %e, "could not clear budget change flag");
                }
            }
            print!("{}", report.format_terminal(ctx.symbol()));
        }

        ReportCommands::Analytics { period_type, json } => {
            let period_type = ctx.period_type(period_type.as_deref())?;
            let report = AnalyticsReport::generate(ctx.storage, &ctx.periods, &ctx.user, period_type)?;

            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                print!("{}", report.format_terminal(ctx.symbol()));
            }
        }
    }

    Ok(())
}
