//! CLI command handlers
//!
//! This module contains the implementation of CLI commands,
//! bridging the clap argument parsing with the service layer.

pub mod audit;
pub mod auth;
pub mod budget;
pub mod profile;
pub mod report;
pub mod settings;
pub mod transaction;

pub use audit::handle_audit_command;
pub use auth::{handle_auth_command, AuthCommands};
pub use budget::{handle_budget_command, BudgetCommands};
pub use profile::{handle_profile_command, ProfileCommands};
pub use report::{handle_report_command, ReportCommands};
pub use settings::{handle_settings_command, SettingsCommands};
pub use transaction::{handle_transaction_command, TransactionCommands};

use crate::config::{MoneyPaths, Settings};
use crate::error::{MoneyError, MoneyResult};
use crate::events::ChangeBus;
use crate::models::{Money, PeriodType, UserId};
use crate::services::PeriodService;
use crate::storage::Storage;

/// Everything a signed-in command needs
pub struct CommandContext<'a> {
    pub paths: &'a MoneyPaths,
    pub storage: &'a Storage,
    pub settings: &'a Settings,
    pub periods: PeriodService<'a>,
    pub bus: &'a ChangeBus,
    pub user: UserId,
}

impl<'a> CommandContext<'a> {
    pub fn new(
        paths: &'a MoneyPaths,
        storage: &'a Storage,
        settings: &'a Settings,
        bus: &'a ChangeBus,
        user: UserId,
    ) -> Self {
        Self {
            paths,
            storage,
            settings,
            periods: PeriodService::new(settings),
            bus,
            user,
        }
    }

    /// Currency symbol of the cached profile
    pub fn symbol(&self) -> &str {
        self.settings.currency_symbol()
    }

    /// `--type` argument, or the period type selected in settings
    pub fn period_type(&self, arg: Option<&str>) -> MoneyResult<PeriodType> {
        match arg {
            Some(s) => parse_period_type(s),
            None => Ok(self.periods.selected_type()),
        }
    }
}

pub(crate) fn parse_period_type(s: &str) -> MoneyResult<PeriodType> {
    s.parse::<PeriodType>()
        .map_err(|e| MoneyError::Validation(e.to_string()))
}

pub(crate) fn parse_amount(s: &str) -> MoneyResult<Money> {
    Money::parse_amount(s).map_err(|e| MoneyError::Validation(e.to_string()))
}
