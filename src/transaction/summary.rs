//! Defines the balance summary endpoint.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, Path, State},
    response::{IntoResponse, Response},
};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};

use crate::{AppState, Error, money::round2};

/// A user's overall balance, income, and expense totals.
///
/// Expenses are reported as a positive magnitude. A user with no transactions
/// gets all zeroes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BalanceSummary {
    /// Net sum of all transaction amounts.
    pub balance: f64,
    /// Sum of all positive amounts.
    pub income: f64,
    /// Sum of the magnitudes of all negative amounts.
    pub expenses: f64,
}

/// Compute the balance summary for one owner.
pub fn get_balance_summary(user_id: &str, connection: &Connection) -> Result<BalanceSummary, Error> {
    connection
        .prepare(
            "SELECT COALESCE(SUM(amount), 0),
                    COALESCE(SUM(CASE WHEN amount > 0 THEN amount ELSE 0 END), 0),
                    COALESCE(SUM(CASE WHEN amount < 0 THEN ABS(amount) ELSE 0 END), 0)
             FROM transactions WHERE user_id = ?1",
        )?
        .query_row([user_id], |row| {
            Ok(BalanceSummary {
                balance: round2(row.get(0)?),
                income: round2(row.get(1)?),
                expenses: round2(row.get(2)?),
            })
        })
        .map_err(|error| error.into())
}

/// The state needed for the balance summary.
#[derive(Debug, Clone)]
pub struct TransactionSummaryState {
    /// The database connection for managing transactions.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for TransactionSummaryState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// A route handler for a user's balance summary.
pub async fn transaction_summary_endpoint(
    State(state): State<TransactionSummaryState>,
    Path(user_id): Path<String>,
) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLock.into_response();
        }
    };

    match get_balance_summary(&user_id, &connection) {
        Ok(summary) => Json(summary).into_response(),
        Err(error) => error.into_response(),
    }
}

#[cfg(test)]
mod tests {
    use rusqlite::Connection;
    use time::OffsetDateTime;

    use crate::{
        db::initialize,
        transaction::{NewTransaction, create_transaction},
    };

    use super::{BalanceSummary, get_balance_summary};

    fn get_test_connection() -> Connection {
        let connection = Connection::open_in_memory().unwrap();
        initialize(&connection).unwrap();
        connection
    }

    fn insert(connection: &mut Connection, user_id: &str, amount: f64) {
        create_transaction(
            NewTransaction {
                user_id: user_id.to_string(),
                title: "test".to_string(),
                amount,
                category: "misc".to_string(),
            },
            OffsetDateTime::now_utc(),
            connection,
        )
        .unwrap();
    }

    #[test]
    fn summary_with_no_transactions_is_all_zeroes() {
        let connection = get_test_connection();

        let summary = get_balance_summary("u1", &connection).unwrap();

        assert_eq!(
            summary,
            BalanceSummary {
                balance: 0.0,
                income: 0.0,
                expenses: 0.0
            }
        );
    }

    #[test]
    fn summary_splits_income_and_expenses() {
        let mut connection = get_test_connection();
        insert(&mut connection, "u1", 1000.0);
        insert(&mut connection, "u1", -300.0);
        insert(&mut connection, "u1", -150.5);
        // Another user's rows must not leak in.
        insert(&mut connection, "u2", -999.0);

        let summary = get_balance_summary("u1", &connection).unwrap();

        assert_eq!(summary.balance, 549.5);
        assert_eq!(summary.income, 1000.0);
        assert_eq!(summary.expenses, 450.5);
    }
}
