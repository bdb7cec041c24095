//! Database operations for transactions.

use rusqlite::{Connection, Row, TransactionBehavior, params};
use time::OffsetDateTime;

use crate::{
    Error,
    transaction::{NewTransaction, Transaction, TransactionId},
};

/// Create a transaction and return the stored row.
///
/// The insert, generated-id fetch, and canonical re-read run inside one SQL
/// transaction; a failure at any step rolls the whole unit back.
pub fn create_transaction(
    new_transaction: NewTransaction,
    now: OffsetDateTime,
    connection: &mut Connection,
) -> Result<Transaction, Error> {
    let sql_transaction = connection.transaction_with_behavior(TransactionBehavior::Immediate)?;

    sql_transaction.execute(
        "INSERT INTO transactions (user_id, title, amount, category, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            new_transaction.user_id,
            new_transaction.title,
            new_transaction.amount,
            new_transaction.category,
            now,
        ],
    )?;

    let id = sql_transaction.last_insert_rowid();
    let transaction = get_transaction(id, &sql_transaction)?;

    sql_transaction.commit()?;

    Ok(transaction)
}

/// Retrieve a single transaction by ID, regardless of owner.
pub fn get_transaction(id: TransactionId, connection: &Connection) -> Result<Transaction, Error> {
    connection
        .prepare(
            "SELECT id, user_id, title, amount, category, created_at
             FROM transactions WHERE id = ?1",
        )?
        .query_row([id], map_transaction_row)
        .map_err(|error| match error {
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound("Transaction"),
            error => error.into(),
        })
}

/// Retrieve all of a user's transactions, newest first.
pub fn get_transactions(user_id: &str, connection: &Connection) -> Result<Vec<Transaction>, Error> {
    connection
        .prepare(
            "SELECT id, user_id, title, amount, category, created_at
             FROM transactions WHERE user_id = ?1
             ORDER BY created_at DESC, id DESC",
        )?
        .query_map([user_id], map_transaction_row)?
        .map(|maybe_transaction| maybe_transaction.map_err(|error| error.into()))
        .collect()
}

/// Delete a transaction owned by `user_id`.
///
/// # Errors
/// Returns [Error::NotFound] if no transaction matches both the ID and the
/// owner; a mismatched owner is indistinguishable from a missing row.
pub fn delete_transaction(
    id: TransactionId,
    user_id: &str,
    connection: &Connection,
) -> Result<(), Error> {
    let rows_affected = connection.execute(
        "DELETE FROM transactions WHERE id = ?1 AND user_id = ?2",
        params![id, user_id],
    )?;

    if rows_affected == 0 {
        return Err(Error::NotFound("Transaction"));
    }

    Ok(())
}

/// Initialize the transactions table and indexes.
pub fn create_transaction_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute_batch(
        "CREATE TABLE IF NOT EXISTS transactions (
            id INTEGER PRIMARY KEY,
            user_id TEXT NOT NULL,
            title TEXT NOT NULL,
            amount REAL NOT NULL,
            category TEXT NOT NULL,
            created_at TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_transactions_user ON transactions(user_id);
        CREATE INDEX IF NOT EXISTS idx_transactions_user_category
            ON transactions(user_id, category);",
    )?;

    Ok(())
}

fn map_transaction_row(row: &Row) -> Result<Transaction, rusqlite::Error> {
    Ok(Transaction {
        id: row.get(0)?,
        user_id: row.get(1)?,
        title: row.get(2)?,
        amount: row.get(3)?,
        category: row.get(4)?,
        created_at: row.get(5)?,
    })
}
