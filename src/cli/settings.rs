//! Preference CLI commands

use clap::Subcommand;
use tracing::info;

use super::parse_period_type;
use crate::config::{MoneyPaths, Settings};
use crate::error::{MoneyError, MoneyResult};
use crate::events::{ChangeBus, ChangeEvent};

/// Settings subcommands
#[derive(Subcommand)]
pub enum SettingsCommands {
    /// Show current preferences
    Show,

    /// Select the period type the budget and analytics views use
    Period {
        /// "weekly" or "monthly"
        period_type: String,
    },

    /// First day of the week (0 = Sunday ... 6 = Saturday, or a day name)
    FirstDay {
        day: String,
    },

    /// Date format for listings (strftime, e.g. "%d/%m/%Y")
    DateFormat {
        format: String,
    },

    /// "dark" or "light"
    Theme {
        theme: String,
    },
}

/// Handle a settings command
pub fn handle_settings_command(
    paths: &MoneyPaths,
    settings: &mut Settings,
    bus: &ChangeBus,
    cmd: SettingsCommands,
) -> MoneyResult<()> {
    match cmd {
        SettingsCommands::Show => {
            println!("Budget period type: {}", settings.budget_period_type);
            println!("First day of week:  {}", settings.first_weekday());
            println!("Date format:        {}", settings.date_format);
            println!("Currency:           {}", settings.profile.currency);
            println!(
                "Theme:              {}",
                if settings.dark_theme { "dark" } else { "light" }
            );
            return Ok(());
        }

        SettingsCommands::Period { period_type } => {
            let period_type = parse_period_type(&period_type)?;
            settings.budget_period_type = period_type;
            settings.save(paths)?;
            bus.publish(ChangeEvent::PeriodTypeChanged(period_type));
            println!("Budget period type set to {}", period_type);
        }

        SettingsCommands::FirstDay { day } => {
            settings.first_day_of_week = parse_weekday_index(&day)?;
            settings.save(paths)?;
            println!("Weeks now start on {}", settings.first_weekday());
        }

        SettingsCommands::DateFormat { format } => {
            if format.trim().is_empty() {
                return Err(MoneyError::Validation("Date format cannot be empty".into()));
            }
            settings.date_format = format;
            settings.save(paths)?;
            println!("Date format set to {}", settings.date_format);
        }

        SettingsCommands::Theme { theme } => {
            settings.dark_theme = match theme.trim().to_lowercase().as_str() {
                "dark" => true,
                "light" => false,
                other => {
                    return Err(MoneyError::Validation(format!(
                        "Unknown theme: {} (expected dark or light)",
                        other
                    )))
                }
            };
            settings.save(paths)?;
            println!("Theme set to {}", theme.trim().to_lowercase());
        }
    }

    info!(path = %paths.settings_file().display(), "settings saved");
    Ok(())
}

/// Parse "0".."6" or a weekday name into a Sunday-based index
fn parse_weekday_index(input: &str) -> MoneyResult<u8> {
    let input = input.trim();
    if let Ok(index) = input.parse::<u8>() {
        if index <= 6 {
            return Ok(index);
        }
    }
    input
        .parse::<chrono::Weekday>()
        .map(|day| day.num_days_from_sunday() as u8)
        .map_err(|_| {
            MoneyError::Validation(format!(
                "Invalid first day of week: {} (expected 0-6 or a day name)",
                input
            ))
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_parse_weekday_index() {
        assert_eq!(parse_weekday_index("0").unwrap(), 0);
        assert_eq!(parse_weekday_index("monday").unwrap(), 1);
        assert_eq!(parse_weekday_index("Sat").unwrap(), 6);
        assert!(parse_weekday_index("7").is_err());
    }

    #[test]
    fn test_period_change_is_saved_and_published() {
        let temp_dir = TempDir::new().unwrap();
        let paths = MoneyPaths::with_base_dir(temp_dir.path().to_path_buf());
        let mut settings = Settings::default();
        let bus = ChangeBus::new();
        let events = bus.subscribe();

        handle_settings_command(
            &paths,
            &mut settings,
            &bus,
            SettingsCommands::Period {
                period_type: "weekly".into(),
            },
        )
        .unwrap();

        let reloaded = Settings::load_or_create(&paths).unwrap();
        assert_eq!(reloaded.budget_period_type, crate::models::PeriodType::Weekly);
        assert_eq!(
            events.try_recv().unwrap(),
            ChangeEvent::PeriodTypeChanged(crate::models::PeriodType::Weekly)
        );
    }
}
