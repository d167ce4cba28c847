//! Storage layer for money-manager
//!
//! SQLite persistence for the ledger and budget stores, plus the atomic
//! JSON helpers used by the file-backed preference and session stores.
//! Both repositories share one connection behind a mutex.

pub mod budgets;
pub mod file_io;
pub mod schema;
pub mod transactions;

pub use budgets::BudgetRepository;
pub use file_io::{read_json, write_json_atomic};
pub use transactions::TransactionRepository;

use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use rusqlite::Connection;
use serde::Serialize;
use tracing::info;

use crate::audit::{AuditEntry, AuditLogger, EntityType};
use crate::config::paths::MoneyPaths;
use crate::error::MoneyError;
use crate::models::UserId;

/// Main storage coordinator that provides access to all repositories
pub struct Storage {
    conn: Arc<Mutex<Connection>>,
    pub transactions: TransactionRepository,
    pub budgets: BudgetRepository,
    audit: Option<AuditLogger>,
}

impl Storage {
    /// Open the database under the configured data directory
    pub fn new(paths: &MoneyPaths) -> Result<Self, MoneyError> {
        paths.ensure_directories()?;
        Ok(Self::open(paths.database_file())?.with_audit_log(AuditLogger::new(paths.audit_log())))
    }

    /// Open (creating if needed) a database file and migrate it
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, MoneyError> {
        let path = path.as_ref();
        let conn = Connection::open(path).map_err(|e| {
            MoneyError::Database(format!("Failed to open {}: {}", path.display(), e))
        })?;
        conn.busy_timeout(Duration::from_secs(5))?;
        info!(path = %path.display(), "opened database");
        Self::from_connection(conn)
    }

    /// Fresh in-memory database (tests and dry runs)
    pub fn in_memory() -> Result<Self, MoneyError> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(mut conn: Connection) -> Result<Self, MoneyError> {
        schema::migrate(&mut conn)?;
        let conn = Arc::new(Mutex::new(conn));
        Ok(Self {
            transactions: TransactionRepository::new(Arc::clone(&conn)),
            budgets: BudgetRepository::new(Arc::clone(&conn)),
            conn,
            audit: None,
        })
    }

    /// Record writes to `logger`
    pub fn with_audit_log(mut self, logger: AuditLogger) -> Self {
        self.audit = Some(logger);
        self
    }

    pub fn audit_log(&self) -> Option<&AuditLogger> {
        self.audit.as_ref()
    }

    /// Audit a newly stored entity
    pub fn log_create<T: Serialize>(
        &self,
        user: &UserId,
        entity_type: EntityType,
        entity_id: impl Into<String>,
        entity_name: Option<String>,
        entity: &T,
    ) -> Result<(), MoneyError> {
        self.log(AuditEntry::create(user, entity_type, entity_id, entity_name, entity))
    }

    /// Audit an entity overwritten under its existing id
    pub fn log_replace<T: Serialize>(
        &self,
        user: &UserId,
        entity_type: EntityType,
        entity_id: impl Into<String>,
        entity_name: Option<String>,
        entity: &T,
    ) -> Result<(), MoneyError> {
        self.log(AuditEntry::replace(user, entity_type, entity_id, entity_name, entity))
    }

    /// Audit a deletion
    pub fn log_delete(
        &self,
        user: &UserId,
        entity_type: EntityType,
        entity_id: impl Into<String>,
        entity_name: Option<String>,
    ) -> Result<(), MoneyError> {
        self.log(AuditEntry::delete(user, entity_type, entity_id, entity_name))
    }

    fn log(&self, entry: AuditEntry) -> Result<(), MoneyError> {
        match &self.audit {
            Some(logger) => logger.log(&entry),
            None => Ok(()),
        }
    }

    /// Schema version recorded in the database
    pub fn schema_version(&self) -> Result<i64, MoneyError> {
        let conn = lock(&self.conn)?;
        schema::current_version(&conn)
    }
}

/// Acquire the shared connection
pub(crate) fn lock(conn: &Mutex<Connection>) -> Result<MutexGuard<'_, Connection>, MoneyError> {
    conn.lock()
        .map_err(|e| MoneyError::Storage(format!("Failed to acquire database lock: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_storage_creation() {
        let temp_dir = TempDir::new().unwrap();
        let paths = MoneyPaths::with_base_dir(temp_dir.path().to_path_buf());
        let storage = Storage::new(&paths).unwrap();

        assert!(paths.database_file().exists());
        assert_eq!(storage.schema_version().unwrap(), schema::SCHEMA_VERSION);
        assert_eq!(storage.audit_log().unwrap().path(), &paths.audit_log());
    }

    #[test]
    fn test_in_memory_storage_skips_audit() {
        let storage = Storage::in_memory().unwrap();
        assert!(storage.audit_log().is_none());
        storage
            .log_delete(&UserId::from("u1"), EntityType::Budget, "Weekly", None)
            .unwrap();
    }

    #[test]
    fn test_data_survives_reopen() {
        use crate::models::{Money, TransactionDraft, TransactionKind, UserId};

        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("money.db");
        let user = UserId::from("u1");

        {
            let storage = Storage::open(&path).unwrap();
            storage
                .transactions
                .insert(
                    &user,
                    TransactionKind::Income,
                    &TransactionDraft::new(Money::from_units(10, 0), "Gift", 0),
                )
                .unwrap();
        }

        let storage = Storage::open(&path).unwrap();
        assert_eq!(storage.transactions.count(&user).unwrap(), 1);
    }
}
