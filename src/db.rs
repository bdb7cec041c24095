//! Database initialization.

use rusqlite::{Connection, Transaction as SqlTransaction};

use crate::{
    budget::create_budget_table, goal::create_savings_goal_table,
    transaction::create_transaction_table,
};

/// Create the tables for all domain models.
///
/// The tables are created within a single transaction so either the full
/// schema exists afterwards or none of it does.
///
/// # Errors
/// Returns an error if a table cannot be created or the transaction cannot be
/// committed.
pub fn initialize(connection: &Connection) -> Result<(), rusqlite::Error> {
    let transaction =
        SqlTransaction::new_unchecked(connection, rusqlite::TransactionBehavior::Exclusive)?;

    create_transaction_table(&transaction)?;
    create_budget_table(&transaction)?;
    create_savings_goal_table(&transaction)?;

    transaction.commit()?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use rusqlite::Connection;

    use super::initialize;

    #[test]
    fn initialize_is_idempotent() {
        let connection = Connection::open_in_memory().unwrap();

        initialize(&connection).expect("first initialize failed");
        initialize(&connection).expect("second initialize failed");
    }
}
