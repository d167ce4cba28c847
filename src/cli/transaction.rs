//! Transaction CLI commands
//!
//! Record income and expenses, and browse the history.

use chrono::NaiveDate;
use clap::Subcommand;

use super::{parse_amount, CommandContext};
use crate::display::{format_transaction_details, format_transaction_table};
use crate::error::{MoneyError, MoneyResult};
use crate::models::category::{EXPENSE_CATEGORIES, INCOME_CATEGORIES, PAYMENT_METHODS};
use crate::models::{TransactionDraft, TransactionId, TransactionKind};
use crate::services::{
    BlockNotifier, ExpenseOutcome, HistoryFilter, PeriodService, TransactionService,
};

/// Transaction subcommands
#[derive(Subcommand)]
pub enum TransactionCommands {
    /// Record an expense (blocked when it would exceed an overall budget)
    Expense {
        /// Amount (e.g., "250" or "250.50")
        amount: String,
        /// Category (e.g., "Food & Dining")
        category: String,
        /// Payment method (Cash, UPI, Credit Card, Debit Card, Net Banking)
        #[arg(short, long)]
        method: String,
        /// Date ("today", "yesterday", YYYY-MM-DD or DD/MM/YYYY)
        #[arg(short, long)]
        date: Option<String>,
        /// Optional note
        #[arg(short, long)]
        note: Option<String>,
    },

    /// Record income
    Income {
        /// Amount
        amount: String,
        /// Category (e.g., "Salary")
        category: String,
        /// Date ("today", "yesterday", YYYY-MM-DD or DD/MM/YYYY)
        #[arg(short, long)]
        date: Option<String>,
        /// Optional note
        #[arg(short, long)]
        note: Option<String>,
    },

    /// List transactions, newest first
    List {
        /// Exact category, or "All Categories"
        #[arg(short, long)]
        category: Option<String>,
        /// Only transactions on this day
        #[arg(short, long)]
        date: Option<String>,
        /// Case-insensitive category search
        #[arg(short, long)]
        search: Option<String>,
        /// Only "expense" or "income"
        #[arg(short = 't', long = "type")]
        kind: Option<String>,
        /// Number of transactions to show
        #[arg(short, long)]
        limit: Option<usize>,
    },

    /// Show one transaction
    Show {
        /// Transaction ID (e.g., "txn-12" or "12")
        id: String,
    },

    /// Show the most recent transactions
    Recent {
        #[arg(short = 'n', long, default_value = "3")]
        count: usize,
    },

    /// List the suggested categories and payment methods
    Categories,
}

/// Handle a transaction command
pub fn handle_transaction_command(ctx: &CommandContext<'_>, cmd: TransactionCommands) -> MoneyResult<()> {
    let service = TransactionService::new(ctx.storage, &ctx.periods).with_bus(ctx.bus);
    let zone = *ctx.periods.zone();
    let date_format = ctx.settings.date_format.as_str();

    match cmd {
        TransactionCommands::Expense {
            amount,
            category,
            method,
            date,
            note,
        } => {
            let draft = draft(&ctx.periods, &amount, category, date.as_deref(), note)?
                .with_payment_method(method);

            let mut notifier = BlockNotifier::new();
            match service.submit_expense(&ctx.user, draft, &mut notifier)? {
                ExpenseOutcome::Recorded(txn) => {
                    println!(
                        "Expense added: {} for {}",
                        txn.amount.format_with_symbol(ctx.symbol()),
                        txn.display_category()
                    );
                    println!("  ID: {}", txn.id);
                }
                ExpenseOutcome::Blocked { exceeded, alert } => {
                    if let Some(alert) = alert {
                        eprintln!("{}: {}", alert.title, alert.message);
                    }
                    for limit in &exceeded {
                        eprintln!(
                            "  {} budget {}: spent {}, this expense would go {} over",
                            limit.period_type,
                            limit.limit.format_with_symbol(ctx.symbol()),
                            limit.spent.format_with_symbol(ctx.symbol()),
                            limit.overshoot().format_with_symbol(ctx.symbol())
                        );
                    }
                    return Err(MoneyError::Validation(
                        "Update your budget to continue adding expenses".into(),
                    ));
                }
            }
        }

        TransactionCommands::Income {
            amount,
            category,
            date,
            note,
        } => {
            let draft = draft(&ctx.periods, &amount, category, date.as_deref(), note)?;
            let txn = service.add_income(&ctx.user, draft)?;
            println!(
                "Income added: {} from {}",
                txn.amount.format_with_symbol(ctx.symbol()),
                txn.display_category()
            );
            println!("  ID: {}", txn.id);
        }

        TransactionCommands::List {
            category,
            date,
            search,
            kind,
            limit,
        } => {
            let mut filter = HistoryFilter::new();
            if let Some(category) = category {
                filter = filter.category(category);
            }
            if let Some(date) = date {
                filter = filter.date(ctx.periods.parse_date(&date)?);
            }
            if let Some(search) = search {
                filter = filter.search(search);
            }
            if let Some(kind) = kind {
                let kind = kind
                    .parse::<TransactionKind>()
                    .map_err(|e| MoneyError::Validation(e.to_string()))?;
                filter = filter.kind(kind);
            }
            if let Some(limit) = limit {
                filter = filter.limit(limit);
            }

            let transactions = service.history(&ctx.user, &filter)?;
            print!(
                "{}",
                format_transaction_table(&transactions, &zone, date_format, ctx.symbol())
            );
        }

        TransactionCommands::Show { id } => {
            let id = id
                .parse::<TransactionId>()
                .map_err(|_| MoneyError::Validation(format!("Invalid transaction ID: {}", id)))?;
            let txn = ctx
                .storage
                .transactions
                .get(&ctx.user, id)?
                .ok_or_else(|| MoneyError::transaction_not_found(id.to_string()))?;
            print!(
                "{}",
                format_transaction_details(&txn, &zone, date_format, ctx.symbol())
            );
        }

        TransactionCommands::Recent { count } => {
            let transactions = service.recent(&ctx.user, count)?;
            print!(
                "{}",
                format_transaction_table(&transactions, &zone, date_format, ctx.symbol())
            );
        }

        TransactionCommands::Categories => {
            println!("Expense categories: {}", EXPENSE_CATEGORIES.join(", "));
            println!("Income categories:  {}", INCOME_CATEGORIES.join(", "));
            println!("Payment methods:    {}", PAYMENT_METHODS.join(", "));
        }
    }

    Ok(())
}

fn draft(
    periods: &PeriodService<'_>,
    amount: &str,
    category: String,
    date: Option<&str>,
    note: Option<String>,
) -> MoneyResult<TransactionDraft> {
    let amount = parse_amount(amount)?;
    let at = match date {
        Some(s) => occurred_at(periods, periods.parse_date(s)?),
        None => periods.now_millis(),
    };

    let draft = TransactionDraft::new(amount, category, at);
    Ok(match note {
        Some(note) => draft.with_note(note),
        None => draft,
    })
}

/// Now for today's entries, midday for back-dated ones
fn occurred_at(periods: &PeriodService<'_>, date: NaiveDate) -> i64 {
    if date == periods.today() {
        periods.now_millis()
    } else {
        periods.millis_at(date, chrono::NaiveTime::from_hms_opt(12, 0, 0).unwrap_or_default())
    }
}
