//! SQLite schema and migrations
//!
//! The schema version lives in `PRAGMA user_version`. Each entry in
//! [`MIGRATIONS`] moves the database one version forward.

use rusqlite::Connection;
use tracing::info;

use crate::error::MoneyError;

/// Ordered migrations; index `n` upgrades from version `n` to `n + 1`
const MIGRATIONS: &[&str] = &[
    // v1: ledger and budget tables
    r#"
    CREATE TABLE IF NOT EXISTS transactions (
        id             INTEGER PRIMARY KEY AUTOINCREMENT,
        user_id        TEXT    NOT NULL,
        amount         INTEGER NOT NULL CHECK (amount >= 0),
        category       TEXT    NOT NULL,
        date           INTEGER NOT NULL,
        payment_method TEXT    NOT NULL DEFAULT '',
        note           TEXT,
        type           TEXT    NOT NULL CHECK (type IN ('Expense', 'Income'))
    );
    CREATE INDEX IF NOT EXISTS idx_transactions_user_date
        ON transactions (user_id, date);

    CREATE TABLE IF NOT EXISTS budgets (
        id              INTEGER PRIMARY KEY AUTOINCREMENT,
        user_id         TEXT    NOT NULL,
        type            TEXT    NOT NULL CHECK (type IN ('Weekly', 'Monthly')),
        period_start    INTEGER NOT NULL,
        period_end      INTEGER NOT NULL,
        overall_amount  INTEGER,
        category        TEXT,
        category_amount INTEGER
    );
    CREATE INDEX IF NOT EXISTS idx_budgets_user_type_start
        ON budgets (user_id, type, period_start);
    "#,
];

/// Latest schema version this build knows about
pub const SCHEMA_VERSION: i64 = MIGRATIONS.len() as i64;

/// Read the stored schema version
pub fn current_version(conn: &Connection) -> Result<i64, MoneyError> {
    Ok(conn.query_row("PRAGMA user_version", [], |row| row.get(0))?)
}

/// Bring the database up to [`SCHEMA_VERSION`]
pub fn migrate(conn: &mut Connection) -> Result<(), MoneyError> {
    let version = current_version(conn)?;

    if version > SCHEMA_VERSION {
        return Err(MoneyError::Storage(format!(
            "Database schema version {} is newer than supported version {}",
            version, SCHEMA_VERSION
        )));
    }

    for (index, sql) in MIGRATIONS.iter().enumerate().skip(version as usize) {
        let target = index as i64 + 1;
        let tx = conn.transaction()?;
        tx.execute_batch(sql)?;
        tx.pragma_update(None, "user_version", target)?;
        tx.commit()?;
        info!(version = target, "applied schema migration");
    }

    Ok(())
}
