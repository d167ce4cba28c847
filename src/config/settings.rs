//! User settings for money-manager
//!
//! The preference store: selected budget period type, calendar settings,
//! theme, and the last-known profile fields.

use chrono::Weekday;
use serde::{Deserialize, Serialize};

use super::paths::MoneyPaths;
use crate::error::MoneyError;
use crate::models::period::weekday_from_index;
use crate::models::{PeriodType, Profile};
use crate::storage::file_io::write_json_atomic;

/// User settings for money-manager
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// Schema version for migration support
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,

    /// Period type the budget and analytics views show
    #[serde(default)]
    pub budget_period_type: PeriodType,

    /// Set when budgets were edited since the dashboard last looked
    #[serde(default)]
    pub budget_changed: bool,

    /// Date format preference (strftime format)
    #[serde(default = "default_date_format")]
    pub date_format: String,

    /// First day of week (0 = Sunday, 1 = Monday)
    #[serde(default = "default_first_day_of_week")]
    pub first_day_of_week: u8,

    #[serde(default)]
    pub dark_theme: bool,

    /// Last-known profile, cached from the document store
    #[serde(default)]
    pub profile: Profile,

    #[serde(default)]
    pub profile_completed: bool,
}

fn default_schema_version() -> u32 {
    1
}

fn default_date_format() -> String {
    "%d/%m/%Y".to_string()
}

fn default_first_day_of_week() -> u8 {
    0 // Sunday
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            budget_period_type: PeriodType::default(),
            budget_changed: false,
            date_format: default_date_format(),
            first_day_of_week: default_first_day_of_week(),
            dark_theme: false,
            profile: Profile::default(),
            profile_completed: false,
        }
    }
}

impl Settings {
    /// The configured first day of the week
    pub fn first_weekday(&self) -> Weekday {
        weekday_from_index(self.first_day_of_week)
    }

    /// Currency symbol of the cached profile
    pub fn currency_symbol(&self) -> &str {
        self.profile.currency_symbol()
    }

    /// Cache profile fields and mark the profile as completed
    pub fn cache_profile(&mut self, profile: Profile) {
        self.profile = profile;
        self.profile_completed = true;
    }

    /// Load settings from disk, or create default settings if file doesn't exist
    pub fn load_or_create(paths: &MoneyPaths) -> Result<Self, MoneyError> {
        let settings_path = paths.settings_file();

        if settings_path.exists() {
            let contents = std::fs::read_to_string(&settings_path)
                .map_err(|e| MoneyError::Io(format!("Failed to read settings file: {}", e)))?;

            let settings: Settings = serde_json::from_str(&contents).map_err(|e| {
                MoneyError::Config(format!("Failed to parse settings file: {}", e))
            })?;

            if settings.first_day_of_week > 6 {
                return Err(MoneyError::Config(format!(
                    "first_day_of_week must be 0-6, got {}",
                    settings.first_day_of_week
                )));
            }

            Ok(settings)
        } else {
            // Don't save yet - let caller decide when to persist
            Ok(Settings::default())
        }
    }

    /// Save settings to disk
    pub fn save(&self, paths: &MoneyPaths) -> Result<(), MoneyError> {
        paths.ensure_directories()?;
        write_json_atomic(paths.settings_file(), self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.budget_period_type, PeriodType::Monthly);
        assert_eq!(settings.first_weekday(), Weekday::Sun);
        assert_eq!(settings.currency_symbol(), "₹");
        assert!(!settings.profile_completed);
    }

    #[test]
    fn test_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let paths = MoneyPaths::with_base_dir(temp_dir.path().to_path_buf());

        let mut settings = Settings::default();
        settings.budget_period_type = PeriodType::Weekly;
        settings.first_day_of_week = 1;
        settings.dark_theme = true;
        settings.save(&paths).unwrap();

        let loaded = Settings::load_or_create(&paths).unwrap();
        assert_eq!(loaded, settings);
        assert_eq!(loaded.first_weekday(), Weekday::Mon);
    }

    #[test]
    fn test_missing_fields_take_defaults() {
        let settings: Settings = serde_json::from_str(r#"{"dark_theme": true}"#).unwrap();
        assert!(settings.dark_theme);
        assert_eq!(settings.budget_period_type, PeriodType::Monthly);
        assert_eq!(settings.first_day_of_week, 0);
    }

    #[test]
    fn test_rejects_bad_first_day() {
        let temp_dir = TempDir::new().unwrap();
        let paths = MoneyPaths::with_base_dir(temp_dir.path().to_path_buf());
        std::fs::write(paths.settings_file(), r#"{"first_day_of_week": 9}"#).unwrap();

        assert!(matches!(
            Settings::load_or_create(&paths),
            Err(MoneyError::Config(_))
        ));
    }
}
