//! Custom error types for money-manager
//!
//! This module defines the error hierarchy for the application using thiserror
//! for ergonomic error definitions.

use thiserror::Error;

/// The main error type for money-manager operations
#[derive(Error, Debug)]
pub enum MoneyError {
    /// No signed-in user is available for a store operation
    #[error("Not signed in: {0}")]
    Unauthenticated(String),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// File I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(String),

    /// Validation errors for user input and data models
    #[error("Validation error: {0}")]
    Validation(String),

    /// Entity not found errors
    #[error("{entity_type} not found: {identifier}")]
    NotFound {
        entity_type: &'static str,
        identifier: String,
    },

    /// SQLite errors
    #[error("Database error: {0}")]
    Database(String),

    /// Storage errors (locks, schema, corrupt rows)
    #[error("Storage error: {0}")]
    Storage(String),
}

impl MoneyError {
    /// Create a "not found" error for transactions
    pub fn transaction_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Transaction",
            identifier: identifier.into(),
        }
    }

    /// Create a "not found" error for budget entries
    pub fn budget_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Budget",
            identifier: identifier.into(),
        }
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Check if this is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// Check if the caller was not signed in
    pub fn is_unauthenticated(&self) -> bool {
        matches!(self, Self::Unauthenticated(_))
    }
}

impl From<std::io::Error> for MoneyError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for MoneyError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}

impl From<rusqlite::Error> for MoneyError {
    fn from(err: rusqlite::Error) -> Self {
        Self::Database(err.to_string())
    }
}

/// Result type alias for money-manager operations
pub type MoneyResult<T> = Result<T, MoneyError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = MoneyError::Config("test error".into());
        assert_eq!(err.to_string(), "Configuration error: test error");
    }

    #[test]
    fn test_not_found_error() {
        let err = MoneyError::transaction_not_found("txn-42");
        assert_eq!(err.to_string(), "Transaction not found: txn-42");
        assert!(err.is_not_found());
    }

    #[test]
    fn test_unauthenticated_error() {
        let err = MoneyError::Unauthenticated("run `moneyman auth login` first".into());
        assert!(err.is_unauthenticated());
        assert!(!err.is_validation());
    }

    #[test]
    fn test_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: MoneyError = io_err.into();
        assert!(matches!(err, MoneyError::Io(_)));
    }

    #[test]
    fn test_from_sqlite_error() {
        let err: MoneyError = rusqlite::Error::QueryReturnedNoRows.into();
        assert!(matches!(err, MoneyError::Database(_)));
    }
}
