//! Database operations for savings goals.

use rusqlite::{Connection, OptionalExtension, Row, TransactionBehavior, params};
use time::OffsetDateTime;

use crate::{
    Error,
    goal::{GoalChanges, GoalId, NewGoal, SavingsGoal},
    money::round2,
};

/// Create a savings goal and return the stored row.
pub fn create_goal(
    new_goal: NewGoal,
    now: OffsetDateTime,
    connection: &mut Connection,
) -> Result<SavingsGoal, Error> {
    let sql_transaction = connection.transaction_with_behavior(TransactionBehavior::Immediate)?;

    sql_transaction.execute(
        "INSERT INTO savings_goals
            (user_id, title, target_amount, current_amount, icon, target_date,
             created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        params![
            new_goal.user_id,
            new_goal.title,
            new_goal.target_amount,
            new_goal.current_amount,
            new_goal.icon,
            new_goal.target_date,
            now,
            now,
        ],
    )?;

    let id = sql_transaction.last_insert_rowid();
    let goal = get_goal(id, &sql_transaction)?;

    sql_transaction.commit()?;

    Ok(goal)
}

/// Apply a partial update to a goal owned by `changes.user_id`.
///
/// Absent fields coalesce to their stored values, except `target_date`, which
/// is written unconditionally so the date can be cleared.
///
/// # Errors
/// Returns [Error::NotFound] if no goal matches both the ID and the owner.
pub fn update_goal(
    id: GoalId,
    changes: GoalChanges,
    now: OffsetDateTime,
    connection: &mut Connection,
) -> Result<SavingsGoal, Error> {
    let sql_transaction = connection.transaction_with_behavior(TransactionBehavior::Immediate)?;

    let rows_affected = sql_transaction.execute(
        "UPDATE savings_goals
         SET title = COALESCE(?1, title),
             target_amount = COALESCE(?2, target_amount),
             current_amount = COALESCE(?3, current_amount),
             icon = COALESCE(?4, icon),
             target_date = ?5,
             updated_at = ?6
         WHERE id = ?7 AND user_id = ?8",
        params![
            changes.title,
            changes.target_amount,
            changes.current_amount,
            changes.icon,
            changes.target_date,
            now,
            id,
            changes.user_id,
        ],
    )?;

    if rows_affected == 0 {
        return Err(Error::NotFound("Savings goal"));
    }

    let goal = get_goal(id, &sql_transaction)?;

    sql_transaction.commit()?;

    Ok(goal)
}

/// Atomically add `delta` to a goal's saved balance and return the refreshed
/// row.
///
/// The read and the write run inside one exclusive transaction, so two
/// concurrent deposits cannot both observe the old balance.
///
/// # Errors
/// Returns [Error::NotFound] if no goal matches both the ID and the owner,
/// and [Error::GoalOverdrawn] if the result would be negative.
pub fn add_money(
    id: GoalId,
    user_id: &str,
    delta: f64,
    now: OffsetDateTime,
    connection: &mut Connection,
) -> Result<SavingsGoal, Error> {
    let sql_transaction = connection.transaction_with_behavior(TransactionBehavior::Exclusive)?;

    let current: Option<f64> = sql_transaction
        .query_row(
            "SELECT current_amount FROM savings_goals WHERE id = ?1 AND user_id = ?2",
            params![id, user_id],
            |row| row.get(0),
        )
        .optional()?;

    let current = current.ok_or(Error::NotFound("Savings goal"))?;
    let new_amount = round2(current + delta);

    if new_amount < 0.0 {
        return Err(Error::GoalOverdrawn);
    }

    sql_transaction.execute(
        "UPDATE savings_goals SET current_amount = ?1, updated_at = ?2
         WHERE id = ?3 AND user_id = ?4",
        params![new_amount, now, id, user_id],
    )?;

    let goal = get_goal(id, &sql_transaction)?;

    sql_transaction.commit()?;

    Ok(goal)
}

/// Delete a goal owned by `user_id`.
///
/// # Errors
/// Returns [Error::NotFound] if no goal matches both the ID and the owner.
pub fn delete_goal(id: GoalId, user_id: &str, connection: &Connection) -> Result<(), Error> {
    let rows_affected = connection.execute(
        "DELETE FROM savings_goals WHERE id = ?1 AND user_id = ?2",
        params![id, user_id],
    )?;

    if rows_affected == 0 {
        return Err(Error::NotFound("Savings goal"));
    }

    Ok(())
}

/// Retrieve a single goal by ID, regardless of owner.
pub fn get_goal(id: GoalId, connection: &Connection) -> Result<SavingsGoal, Error> {
    connection
        .prepare(
            "SELECT id, user_id, title, target_amount, current_amount, icon, target_date,
                    created_at, updated_at
             FROM savings_goals WHERE id = ?1",
        )?
        .query_row([id], map_goal_row)
        .map_err(|error| match error {
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound("Savings goal"),
            error => error.into(),
        })
}

/// Retrieve all of a user's goals, newest first.
pub fn get_goals(user_id: &str, connection: &Connection) -> Result<Vec<SavingsGoal>, Error> {
    connection
        .prepare(
            "SELECT id, user_id, title, target_amount, current_amount, icon, target_date,
                    created_at, updated_at
             FROM savings_goals WHERE user_id = ?1
             ORDER BY created_at DESC, id DESC",
        )?
        .query_map([user_id], map_goal_row)?
        .map(|maybe_goal| maybe_goal.map_err(|error| error.into()))
        .collect()
}

/// Initialize the savings goals table.
pub fn create_savings_goal_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute_batch(
        "CREATE TABLE IF NOT EXISTS savings_goals (
            id INTEGER PRIMARY KEY,
            user_id TEXT NOT NULL,
            title TEXT NOT NULL,
            target_amount REAL NOT NULL,
            current_amount REAL NOT NULL DEFAULT 0,
            icon TEXT NOT NULL DEFAULT 'target',
            target_date TEXT,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_savings_goals_user ON savings_goals(user_id);",
    )?;

    Ok(())
}

fn map_goal_row(row: &Row) -> Result<SavingsGoal, rusqlite::Error> {
    Ok(SavingsGoal {
        id: row.get(0)?,
        user_id: row.get(1)?,
        title: row.get(2)?,
        target_amount: row.get(3)?,
        current_amount: row.get(4)?,
        icon: row.get(5)?,
        target_date: row.get(6)?,
        created_at: row.get(7)?,
        updated_at: row.get(8)?,
    })
}
