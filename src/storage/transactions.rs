//! Transaction repository for SQLite storage
//!
//! The ledger store. Every query is scoped by the owning user.

use std::sync::{Arc, Mutex};

use rusqlite::types::Type;
use rusqlite::{params, Connection, OptionalExtension, Row};
use tracing::debug;

use crate::error::MoneyError;
use crate::models::category::same_category;
use crate::models::{
    Money, PeriodWindow, Transaction, TransactionDraft, TransactionId, TransactionKind, UserId,
};

use super::lock;

const SELECT_COLUMNS: &str =
    "SELECT id, user_id, amount, category, date, payment_method, note, type FROM transactions";

/// Repository for transaction persistence
pub struct TransactionRepository {
    conn: Arc<Mutex<Connection>>,
}

impl TransactionRepository {
    pub(crate) fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    /// Insert a validated draft and return the stored transaction
    pub fn insert(
        &self,
        user: &UserId,
        kind: TransactionKind,
        draft: &TransactionDraft,
    ) -> Result<Transaction, MoneyError> {
        let conn = lock(&self.conn)?;

        let payment_method = match kind {
            TransactionKind::Expense => draft.payment_method.trim().to_string(),
            TransactionKind::Income => String::new(),
        };

        conn.execute(
            "INSERT INTO transactions (user_id, amount, category, date, payment_method, note, type)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                user.as_str(),
                draft.amount.cents(),
                draft.category.trim(),
                draft.date,
                payment_method,
                draft.note,
                kind.as_str(),
            ],
        )?;
        let id = TransactionId::from_raw(conn.last_insert_rowid());
        debug!(%id, user = %user, kind = %kind, amount = %draft.amount, "inserted transaction");

        Ok(Transaction {
            id,
            user_id: user.clone(),
            amount: draft.amount,
            category: draft.category.trim().to_string(),
            date: draft.date,
            payment_method,
            note: draft.note.clone(),
            kind,
        })
    }

    /// Get a transaction by ID
    pub fn get(
        &self,
        user: &UserId,
        id: TransactionId,
    ) -> Result<Option<Transaction>, MoneyError> {
        let conn = lock(&self.conn)?;
        let sql = format!("{} WHERE user_id = ?1 AND id = ?2", SELECT_COLUMNS);
        Ok(conn
            .query_row(&sql, params![user.as_str(), id.raw()], row_to_transaction)
            .optional()?)
    }

    /// All of a user's transactions, newest first
    pub fn list_for_user(&self, user: &UserId) -> Result<Vec<Transaction>, MoneyError> {
        let conn = lock(&self.conn)?;
        let sql = format!(
            "{} WHERE user_id = ?1 ORDER BY date DESC, id DESC",
            SELECT_COLUMNS
        );
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt.query_map(params![user.as_str()], row_to_transaction)?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    /// Transactions dated inside `window`, newest first
    pub fn list_in_window(
        &self,
        user: &UserId,
        window: &PeriodWindow,
        kind: Option<TransactionKind>,
    ) -> Result<Vec<Transaction>, MoneyError> {
        let conn = lock(&self.conn)?;
        let sql = format!(
            "{} WHERE user_id = ?1 AND date BETWEEN ?2 AND ?3 AND (?4 IS NULL OR type = ?4)
             ORDER BY date DESC, id DESC",
            SELECT_COLUMNS
        );
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt.query_map(
            params![
                user.as_str(),
                window.start,
                window.end,
                kind.map(|k| k.as_str())
            ],
            row_to_transaction,
        )?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    /// Most recent `limit` transactions
    pub fn recent(&self, user: &UserId, limit: usize) -> Result<Vec<Transaction>, MoneyError> {
        let conn = lock(&self.conn)?;
        let sql = format!(
            "{} WHERE user_id = ?1 ORDER BY date DESC, id DESC LIMIT ?2",
            SELECT_COLUMNS
        );
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt.query_map(params![user.as_str(), limit as i64], row_to_transaction)?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    /// Total of `kind` inside `window`, optionally for one category
    ///
    /// Category matching is trimmed and case-insensitive.
    pub fn sum_in_window(
        &self,
        user: &UserId,
        window: &PeriodWindow,
        kind: TransactionKind,
        category: Option<&str>,
    ) -> Result<Money, MoneyError> {
        match category {
            None => {
                let conn = lock(&self.conn)?;
                let cents: i64 = conn.query_row(
                    "SELECT COALESCE(SUM(amount), 0) FROM transactions
                     WHERE user_id = ?1 AND type = ?2 AND date BETWEEN ?3 AND ?4",
                    params![user.as_str(), kind.as_str(), window.start, window.end],
                    |row| row.get(0),
                )?;
                Ok(Money::from_cents(cents))
            }
            Some(name) => Ok(self
                .category_totals_in_window(user, window, kind)?
                .into_iter()
                .filter(|(category, _)| same_category(category, name))
                .map(|(_, amount)| amount)
                .sum()),
        }
    }

    /// Totals of `kind` per stored category label inside `window`
    pub fn category_totals_in_window(
        &self,
        user: &UserId,
        window: &PeriodWindow,
        kind: TransactionKind,
    ) -> Result<Vec<(String, Money)>, MoneyError> {
        let conn = lock(&self.conn)?;
        let mut stmt = conn.prepare(
            "SELECT category, SUM(amount) FROM transactions
             WHERE user_id = ?1 AND type = ?2 AND date BETWEEN ?3 AND ?4
             GROUP BY category",
        )?;
        let rows = stmt.query_map(
            params![user.as_str(), kind.as_str(), window.start, window.end],
            |row| Ok((row.get::<_, String>(0)?, Money::from_cents(row.get(1)?))),
        )?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    /// All-time totals of `kind` per stored category label
    pub fn category_totals(
        &self,
        user: &UserId,
        kind: TransactionKind,
    ) -> Result<Vec<(String, Money)>, MoneyError> {
        let conn = lock(&self.conn)?;
        let mut stmt = conn.prepare(
            "SELECT category, SUM(amount) FROM transactions
             WHERE user_id = ?1 AND type = ?2
             GROUP BY category",
        )?;
        let rows = stmt.query_map(params![user.as_str(), kind.as_str()], |row| {
            Ok((row.get::<_, String>(0)?, Money::from_cents(row.get(1)?)))
        })?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    /// All-time (income, expense) totals
    pub fn totals(&self, user: &UserId) -> Result<(Money, Money), MoneyError> {
        let conn = lock(&self.conn)?;
        let mut stmt = conn.prepare(
            "SELECT type, COALESCE(SUM(amount), 0) FROM transactions
             WHERE user_id = ?1 GROUP BY type",
        )?;
        let rows = stmt.query_map(params![user.as_str()], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)?))
        })?;

        let mut income = Money::zero();
        let mut expense = Money::zero();
        for row in rows {
            let (kind, cents) = row?;
            match kind.parse::<TransactionKind>() {
                Ok(TransactionKind::Income) => income += Money::from_cents(cents),
                Ok(TransactionKind::Expense) => expense += Money::from_cents(cents),
                Err(e) => return Err(MoneyError::Storage(e.to_string())),
            }
        }
        Ok((income, expense))
    }

    /// Count a user's transactions
    pub fn count(&self, user: &UserId) -> Result<usize, MoneyError> {
        let conn = lock(&self.conn)?;
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM transactions WHERE user_id = ?1",
            params![user.as_str()],
            |row| row.get(0),
        )?;
        Ok(count as usize)
    }
}

fn row_to_transaction(row: &Row<'_>) -> rusqlite::Result<Transaction> {
    let kind: String = row.get(7)?;
    let kind = kind
        .parse::<TransactionKind>()
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(7, Type::Text, Box::new(e)))?;

    Ok(Transaction {
        id: TransactionId::from_raw(row.get(0)?),
        user_id: UserId::new(row.get::<_, String>(1)?),
        amount: Money::from_cents(row.get(2)?),
        category: row.get(3)?,
        date: row.get(4)?,
        payment_method: row.get(5)?,
        note: row.get(6)?,
        kind,
    })
}
