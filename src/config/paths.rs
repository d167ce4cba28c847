//! Path management for money-manager
//!
//! ## Path Resolution Order
//!
//! 1. `MONEY_MANAGER_DATA_DIR` environment variable (if set)
//! 2. The platform data directory from `directories::ProjectDirs`
//!    (`~/.local/share/money-manager` on Linux)

use std::path::PathBuf;

use directories::ProjectDirs;

use crate::error::MoneyError;

/// Environment variable that overrides the base directory
pub const DATA_DIR_ENV: &str = "MONEY_MANAGER_DATA_DIR";

/// Manages all paths used by money-manager
#[derive(Debug, Clone)]
pub struct MoneyPaths {
    base_dir: PathBuf,
}

impl MoneyPaths {
    /// Resolve paths from the environment override or the platform default
    ///
    /// # Errors
    ///
    /// Returns an error if no home directory can be determined.
    pub fn new() -> Result<Self, MoneyError> {
        let base_dir = match std::env::var(DATA_DIR_ENV) {
            Ok(custom) if !custom.trim().is_empty() => PathBuf::from(custom),
            _ => resolve_default_path()?,
        };

        Ok(Self { base_dir })
    }

    /// Create MoneyPaths with a custom base directory (useful for testing)
    pub fn with_base_dir(base_dir: PathBuf) -> Self {
        Self { base_dir }
    }

    pub fn base_dir(&self) -> &PathBuf {
        &self.base_dir
    }

    /// Directory holding the database and synced documents
    pub fn data_dir(&self) -> PathBuf {
        self.base_dir.join("data")
    }

    /// Preference store
    pub fn settings_file(&self) -> PathBuf {
        self.base_dir.join("config.json")
    }

    pub fn audit_log(&self) -> PathBuf {
        self.base_dir.join("audit.log")
    }

    /// Signed-in identity
    pub fn session_file(&self) -> PathBuf {
        self.base_dir.join("session.json")
    }

    /// SQLite database with the transactions and budgets tables
    pub fn database_file(&self) -> PathBuf {
        self.data_dir().join("money.db")
    }

    /// Document store for synced profiles, one file per user
    pub fn profiles_dir(&self) -> PathBuf {
        self.data_dir().join("profiles")
    }

    /// Ensure all required directories exist
    pub fn ensure_directories(&self) -> Result<(), MoneyError> {
        std::fs::create_dir_all(&self.base_dir)
            .map_err(|e| MoneyError::Io(format!("Failed to create base directory: {}", e)))?;

        std::fs::create_dir_all(self.data_dir())
            .map_err(|e| MoneyError::Io(format!("Failed to create data directory: {}", e)))?;

        std::fs::create_dir_all(self.profiles_dir())
            .map_err(|e| MoneyError::Io(format!("Failed to create profiles directory: {}", e)))?;

        Ok(())
    }
}

fn resolve_default_path() -> Result<PathBuf, MoneyError> {
    ProjectDirs::from("", "", "money-manager")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .ok_or_else(|| MoneyError::Config("Could not determine a home directory".into()))
}
