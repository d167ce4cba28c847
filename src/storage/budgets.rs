//! Budget repository for SQLite storage
//!
//! The budget store. At most one overall entry and one entry per category
//! exist for a (user, period type, window); saving looks up the matching
//! row first and rewrites it under the same id.

use std::sync::{Arc, Mutex};

use rusqlite::types::Type;
use rusqlite::{params, Connection, OptionalExtension, Row};
use tracing::debug;

use crate::error::MoneyError;
use crate::models::category::same_category;
use crate::models::{BudgetEntry, BudgetId, BudgetScope, Money, PeriodType, PeriodWindow, UserId};

use super::lock;

const SELECT_COLUMNS: &str = "SELECT id, user_id, type, period_start, period_end, \
     overall_amount, category, category_amount FROM budgets";

/// Repository for budget entry persistence
pub struct BudgetRepository {
    conn: Arc<Mutex<Connection>>,
}

impl BudgetRepository {
    pub(crate) fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    /// Insert or replace the entry for (user, type, window, scope identity)
    ///
    /// Returns the stored entry; its id is reused when a matching entry
    /// already existed.
    pub fn upsert(
        &self,
        user: &UserId,
        period_type: PeriodType,
        window: PeriodWindow,
        scope: BudgetScope,
    ) -> Result<BudgetEntry, MoneyError> {
        let conn = lock(&self.conn)?;

        let existing = match &scope {
            BudgetScope::Overall { .. } => {
                find_overall_locked(&conn, user, period_type, &window)?.map(|e| e.id)
            }
            BudgetScope::Category { name, .. } => {
                category_entries_locked(&conn, user, period_type, &window)?
                    .into_iter()
                    .find(|e| e.is_for_category(name))
                    .map(|e| e.id)
            }
        };

        let (overall_amount, category, category_amount) = match &scope {
            BudgetScope::Overall { amount } => (Some(amount.cents()), None, None),
            BudgetScope::Category { name, amount } => {
                (None, Some(name.trim().to_string()), Some(amount.cents()))
            }
        };

        conn.execute(
            "INSERT OR REPLACE INTO budgets
                 (id, user_id, type, period_start, period_end, overall_amount, category, category_amount)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                existing.map(|id| id.raw()),
                user.as_str(),
                period_type.as_str(),
                window.start,
                window.end,
                overall_amount,
                category,
                category_amount,
            ],
        )?;

        let id = existing.unwrap_or_else(|| BudgetId::from_raw(conn.last_insert_rowid()));
        debug!(%id, user = %user, %period_type, replaced = existing.is_some(), "saved budget entry");

        let scope = match scope {
            BudgetScope::Category { name, amount } => BudgetScope::Category {
                name: name.trim().to_string(),
                amount,
            },
            overall => overall,
        };

        Ok(BudgetEntry {
            id,
            user_id: user.clone(),
            period_type,
            window,
            scope,
        })
    }

    /// Overall entry for exactly `window`
    pub fn find_overall(
        &self,
        user: &UserId,
        period_type: PeriodType,
        window: &PeriodWindow,
    ) -> Result<Option<BudgetEntry>, MoneyError> {
        let conn = lock(&self.conn)?;
        find_overall_locked(&conn, user, period_type, window)
    }

    /// Most recent overall entry for the period type, by window start
    pub fn latest_overall(
        &self,
        user: &UserId,
        period_type: PeriodType,
    ) -> Result<Option<BudgetEntry>, MoneyError> {
        let conn = lock(&self.conn)?;
        let sql = format!(
            "{} WHERE user_id = ?1 AND type = ?2 AND category IS NULL
             ORDER BY period_start DESC, id DESC LIMIT 1",
            SELECT_COLUMNS
        );
        Ok(conn
            .query_row(
                &sql,
                params![user.as_str(), period_type.as_str()],
                row_to_entry,
            )
            .optional()?)
    }

    /// Category entry for `category` in exactly `window`
    pub fn find_category(
        &self,
        user: &UserId,
        period_type: PeriodType,
        window: &PeriodWindow,
        category: &str,
    ) -> Result<Option<BudgetEntry>, MoneyError> {
        Ok(self
            .category_budgets_for_window(user, period_type, window)?
            .into_iter()
            .find(|e| e.is_for_category(category)))
    }

    /// All category entries for exactly `window`, ordered by category
    pub fn category_budgets_for_window(
        &self,
        user: &UserId,
        period_type: PeriodType,
        window: &PeriodWindow,
    ) -> Result<Vec<BudgetEntry>, MoneyError> {
        let conn = lock(&self.conn)?;
        category_entries_locked(&conn, user, period_type, window)
    }

    /// Every entry of a user, newest window first
    pub fn list_for_user(&self, user: &UserId) -> Result<Vec<BudgetEntry>, MoneyError> {
        let conn = lock(&self.conn)?;
        let sql = format!(
            "{} WHERE user_id = ?1 ORDER BY period_start DESC, category IS NOT NULL, category",
            SELECT_COLUMNS
        );
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt.query_map(params![user.as_str()], row_to_entry)?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    /// Delete every entry of a period type; returns rows removed
    pub fn delete_by_type(
        &self,
        user: &UserId,
        period_type: PeriodType,
    ) -> Result<usize, MoneyError> {
        let conn = lock(&self.conn)?;
        let removed = conn.execute(
            "DELETE FROM budgets WHERE user_id = ?1 AND type = ?2",
            params![user.as_str(), period_type.as_str()],
        )?;
        debug!(user = %user, %period_type, removed, "cleared budget entries");
        Ok(removed)
    }

    /// Count a user's entries
    pub fn count(&self, user: &UserId) -> Result<usize, MoneyError> {
        let conn = lock(&self.conn)?;
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM budgets WHERE user_id = ?1",
            params![user.as_str()],
            |row| row.get(0),
        )?;
        Ok(count as usize)
    }
}

fn find_overall_locked(
    conn: &Connection,
    user: &UserId,
    period_type: PeriodType,
    window: &PeriodWindow,
) -> Result<Option<BudgetEntry>, MoneyError> {
    let sql = format!(
        "{} WHERE user_id = ?1 AND type = ?2 AND period_start = ?3 AND period_end = ?4
         AND category IS NULL ORDER BY id DESC LIMIT 1",
        SELECT_COLUMNS
    );
    Ok(conn
        .query_row(
            &sql,
            params![user.as_str(), period_type.as_str(), window.start, window.end],
            row_to_entry,
        )
        .optional()?)
}

fn category_entries_locked(
    conn: &Connection,
    user: &UserId,
    period_type: PeriodType,
    window: &PeriodWindow,
) -> Result<Vec<BudgetEntry>, MoneyError> {
    let sql = format!(
        "{} WHERE user_id = ?1 AND type = ?2 AND period_start = ?3 AND period_end = ?4
         AND category IS NOT NULL ORDER BY category, id",
        SELECT_COLUMNS
    );
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(
        params![user.as_str(), period_type.as_str(), window.start, window.end],
        row_to_entry,
    )?;

    // Rows written before replace-on-save existed may repeat a category;
    // the newest one wins
    let mut entries: Vec<BudgetEntry> = Vec::new();
    for row in rows {
        let entry = row?;
        let name = entry.category().unwrap_or_default().to_string();
        match entries
            .iter_mut()
            .find(|e| e.category().is_some_and(|c| same_category(c, &name)))
        {
            Some(slot) => *slot = entry,
            None => entries.push(entry),
        }
    }
    Ok(entries)
}

fn row_to_entry(row: &Row<'_>) -> rusqlite::Result<BudgetEntry> {
    let period_type: String = row.get(2)?;
    let period_type = period_type
        .parse::<PeriodType>()
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(2, Type::Text, Box::new(e)))?;

    let category: Option<String> = row.get(6)?;
    let scope = match category {
        Some(name) => BudgetScope::Category {
            name,
            amount: Money::from_cents(row.get::<_, Option<i64>>(7)?.unwrap_or(0)),
        },
        None => BudgetScope::Overall {
            amount: Money::from_cents(row.get::<_, Option<i64>>(5)?.unwrap_or(0)),
        },
    };

    Ok(BudgetEntry {
        id: BudgetId::from_raw(row.get(0)?),
        user_id: UserId::new(row.get::<_, String>(1)?),
        period_type,
        window: PeriodWindow::new(row.get(3)?, row.get(4)?),
        scope,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::Storage;

    fn user() -> UserId {
        UserId::from("user-1")
    }

    fn overall(units: i64) -> BudgetScope {
        BudgetScope::Overall {
            amount: Money::from_units(units, 0),
        }
    }

    fn category(name: &str, amount: Money) -> BudgetScope {
        BudgetScope::Category {
            name: name.into(),
            amount,
        }
    }

    const WINDOW: PeriodWindow = PeriodWindow {
        start: 1_000,
        end: 2_000,
    };

    #[test]
    fn test_overall_save_is_idempotent() {
        let storage = Storage::in_memory().unwrap();
        let repo = &storage.budgets;

        let first = repo
            .upsert(&user(), PeriodType::Monthly, WINDOW, overall(1000))
            .unwrap();
        let second = repo
            .upsert(&user(), PeriodType::Monthly, WINDOW, overall(1000))
            .unwrap();

        assert_eq!(first.id, second.id);
        assert_eq!(repo.count(&user()).unwrap(), 1);
    }

    #[test]
    fn test_overall_save_replaces_amount() {
        let storage = Storage::in_memory().unwrap();
        let repo = &storage.budgets;

        repo.upsert(&user(), PeriodType::Weekly, WINDOW, overall(500))
            .unwrap();
        repo.upsert(&user(), PeriodType::Weekly, WINDOW, overall(800))
            .unwrap();

        let found = repo
            .find_overall(&user(), PeriodType::Weekly, &WINDOW)
            .unwrap()
            .unwrap();
        assert_eq!(found.limit(), Money::from_units(800, 0));
        assert_eq!(repo.count(&user()).unwrap(), 1);
    }

    #[test]
    fn test_new_window_creates_new_entry() {
        let storage = Storage::in_memory().unwrap();
        let repo = &storage.budgets;
        let next = PeriodWindow::new(2_001, 3_000);

        repo.upsert(&user(), PeriodType::Monthly, WINDOW, overall(1000))
            .unwrap();
        repo.upsert(&user(), PeriodType::Monthly, next, overall(1200))
            .unwrap();

        assert_eq!(repo.count(&user()).unwrap(), 2);
        let latest = repo
            .latest_overall(&user(), PeriodType::Monthly)
            .unwrap()
            .unwrap();
        assert_eq!(latest.window, next);
    }

    #[test]
    fn test_category_amount_round_trips_exactly() {
        let storage = Storage::in_memory().unwrap();
        let repo = &storage.budgets;
        let amount = Money::parse_amount("250.0").unwrap();

        repo.upsert(&user(), PeriodType::Monthly, WINDOW, category("Bills", amount))
            .unwrap();

        let found = repo
            .find_category(&user(), PeriodType::Monthly, &WINDOW, "Bills")
            .unwrap()
            .unwrap();
        assert_eq!(found.limit(), amount);
        assert_eq!(found.limit().to_string(), "250.00");
    }

    #[test]
    fn test_category_identity_ignores_case_and_whitespace() {
        let storage = Storage::in_memory().unwrap();
        let repo = &storage.budgets;

        repo.upsert(
            &user(),
            PeriodType::Monthly,
            WINDOW,
            category("Shopping", Money::from_units(100, 0)),
        )
        .unwrap();
        repo.upsert(
            &user(),
            PeriodType::Monthly,
            WINDOW,
            category(" shopping ", Money::from_units(150, 0)),
        )
        .unwrap();
        repo.upsert(
            &user(),
            PeriodType::Monthly,
            WINDOW,
            category("Bills", Money::from_units(300, 0)),
        )
        .unwrap();

        let entries = repo
            .category_budgets_for_window(&user(), PeriodType::Monthly, &WINDOW)
            .unwrap();
        assert_eq!(entries.len(), 2);
        let shopping = entries.iter().find(|e| e.is_for_category("SHOPPING")).unwrap();
        assert_eq!(shopping.limit(), Money::from_units(150, 0));
        assert_eq!(shopping.category(), Some("shopping"));
    }

    #[test]
    fn test_overall_and_category_coexist() {
        let storage = Storage::in_memory().unwrap();
        let repo = &storage.budgets;

        repo.upsert(&user(), PeriodType::Monthly, WINDOW, overall(2000))
            .unwrap();
        repo.upsert(
            &user(),
            PeriodType::Monthly,
            WINDOW,
            category("Bills", Money::from_units(300, 0)),
        )
        .unwrap();

        let found = repo
            .find_overall(&user(), PeriodType::Monthly, &WINDOW)
            .unwrap()
            .unwrap();
        assert_eq!(found.limit(), Money::from_units(2000, 0));
        assert_eq!(repo.count(&user()).unwrap(), 2);
    }

    #[test]
    fn test_delete_by_type() {
        let storage = Storage::in_memory().unwrap();
        let repo = &storage.budgets;

        repo.upsert(&user(), PeriodType::Monthly, WINDOW, overall(2000))
            .unwrap();
        repo.upsert(
            &user(),
            PeriodType::Monthly,
            WINDOW,
            category("Bills", Money::from_units(300, 0)),
        )
        .unwrap();
        repo.upsert(&user(), PeriodType::Weekly, WINDOW, overall(500))
            .unwrap();
        repo.upsert(&UserId::from("other"), PeriodType::Monthly, WINDOW, overall(1))
            .unwrap();

        assert_eq!(repo.delete_by_type(&user(), PeriodType::Monthly).unwrap(), 2);
        assert_eq!(repo.count(&user()).unwrap(), 1);
        assert_eq!(repo.count(&UserId::from("other")).unwrap(), 1);
    }
}
