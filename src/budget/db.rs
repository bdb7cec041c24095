//! Database operations for budgets.

use rusqlite::{
    Connection, Row, TransactionBehavior, params,
    types::{FromSqlError, Type},
};
use time::OffsetDateTime;

use crate::{
    Error,
    budget::{Budget, BudgetChanges, BudgetId, NewBudget, Period},
};

/// Create a budget and return the stored row.
///
/// The duplicate-category check, insert, and canonical re-read run inside one
/// SQL transaction so a concurrent insert cannot slip between the check and
/// the write.
///
/// # Errors
/// Returns [Error::DuplicateBudgetCategory] if the owner already has a budget
/// for the category.
pub fn create_budget(
    new_budget: NewBudget,
    now: OffsetDateTime,
    connection: &mut Connection,
) -> Result<Budget, Error> {
    let sql_transaction = connection.transaction_with_behavior(TransactionBehavior::Immediate)?;

    let exists = sql_transaction
        .prepare("SELECT EXISTS (SELECT 1 FROM budgets WHERE user_id = ?1 AND category = ?2)")?
        .query_row(
            params![new_budget.user_id, new_budget.category],
            |row| row.get::<_, bool>(0),
        )?;

    if exists {
        return Err(Error::DuplicateBudgetCategory);
    }

    sql_transaction.execute(
        "INSERT INTO budgets (user_id, category, amount, period, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            new_budget.user_id,
            new_budget.category,
            new_budget.amount,
            new_budget.period.as_str(),
            now,
            now,
        ],
    )?;

    let id = sql_transaction.last_insert_rowid();
    let budget = get_budget(id, &sql_transaction)?;

    sql_transaction.commit()?;

    Ok(budget)
}

/// Apply a partial update to a budget owned by `changes.user_id`.
///
/// Absent fields coalesce to their stored values; `updated_at` is refreshed
/// even when every field is absent.
///
/// # Errors
/// Returns [Error::NotFound] if no budget matches both the ID and the owner.
pub fn update_budget(
    id: BudgetId,
    changes: BudgetChanges,
    now: OffsetDateTime,
    connection: &mut Connection,
) -> Result<Budget, Error> {
    let sql_transaction = connection.transaction_with_behavior(TransactionBehavior::Immediate)?;

    let rows_affected = sql_transaction.execute(
        "UPDATE budgets
         SET category = COALESCE(?1, category),
             amount = COALESCE(?2, amount),
             period = COALESCE(?3, period),
             updated_at = ?4
         WHERE id = ?5 AND user_id = ?6",
        params![
            changes.category,
            changes.amount,
            changes.period.map(|period| period.as_str()),
            now,
            id,
            changes.user_id,
        ],
    )?;

    if rows_affected == 0 {
        return Err(Error::NotFound("Budget"));
    }

    let budget = get_budget(id, &sql_transaction)?;

    sql_transaction.commit()?;

    Ok(budget)
}

/// Delete a budget owned by `user_id`.
///
/// # Errors
/// Returns [Error::NotFound] if no budget matches both the ID and the owner.
pub fn delete_budget(id: BudgetId, user_id: &str, connection: &Connection) -> Result<(), Error> {
    let rows_affected = connection.execute(
        "DELETE FROM budgets WHERE id = ?1 AND user_id = ?2",
        params![id, user_id],
    )?;

    if rows_affected == 0 {
        return Err(Error::NotFound("Budget"));
    }

    Ok(())
}

/// Retrieve a single budget by ID, regardless of owner.
pub fn get_budget(id: BudgetId, connection: &Connection) -> Result<Budget, Error> {
    connection
        .prepare(
            "SELECT id, user_id, category, amount, period, created_at, updated_at
             FROM budgets WHERE id = ?1",
        )?
        .query_row([id], map_budget_row)
        .map_err(|error| match error {
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound("Budget"),
            error => error.into(),
        })
}

/// Retrieve all of a user's budgets, newest first.
pub fn get_budgets(user_id: &str, connection: &Connection) -> Result<Vec<Budget>, Error> {
    connection
        .prepare(
            "SELECT id, user_id, category, amount, period, created_at, updated_at
             FROM budgets WHERE user_id = ?1
             ORDER BY created_at DESC, id DESC",
        )?
        .query_map([user_id], map_budget_row)?
        .map(|maybe_budget| maybe_budget.map_err(|error| error.into()))
        .collect()
}

/// Initialize the budgets table.
///
/// The UNIQUE constraint backs up the pre-insert existence check and turns
/// blind sync inserts of an existing category into constraint violations.
pub fn create_budget_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute_batch(
        "CREATE TABLE IF NOT EXISTS budgets (
            id INTEGER PRIMARY KEY,
            user_id TEXT NOT NULL,
            category TEXT NOT NULL,
            amount REAL NOT NULL,
            period TEXT NOT NULL DEFAULT 'monthly',
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL,
            UNIQUE (user_id, category)
        );",
    )?;

    Ok(())
}

pub(super) fn map_budget_row(row: &Row) -> Result<Budget, rusqlite::Error> {
    let period_text: String = row.get(4)?;
    let period = Period::parse(&period_text).map_err(|_| {
        rusqlite::Error::FromSqlConversionFailure(
            4,
            Type::Text,
            Box::new(FromSqlError::InvalidType),
        )
    })?;

    Ok(Budget {
        id: row.get(0)?,
        user_id: row.get(1)?,
        category: row.get(2)?,
        amount: row.get(3)?,
        period,
        created_at: row.get(5)?,
        updated_at: row.get(6)?,
    })
}
