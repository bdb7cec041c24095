//! Defines the endpoint for listing a user's transactions.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, Path, State},
    response::{IntoResponse, Response},
};
use rusqlite::Connection;

use crate::{AppState, Error, transaction::get_transactions};

/// The state needed for listing transactions.
#[derive(Debug, Clone)]
pub struct TransactionListState {
    /// The database connection for managing transactions.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for TransactionListState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// A route handler for listing a user's transactions, newest first.
pub async fn list_transactions_endpoint(
    State(state): State<TransactionListState>,
    Path(user_id): Path<String>,
) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLock.into_response();
        }
    };

    match get_transactions(&user_id, &connection) {
        Ok(transactions) => Json(transactions).into_response(),
        Err(error) => error.into_response(),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::{Router, routing::get};
    use axum_test::TestServer;
    use rusqlite::Connection;
    use time::OffsetDateTime;

    use crate::{
        db::initialize,
        endpoints,
        transaction::{NewTransaction, Transaction, create_transaction},
    };

    use super::{TransactionListState, list_transactions_endpoint};

    #[tokio::test]
    async fn list_returns_only_the_owners_transactions() {
        let connection = Connection::open_in_memory().unwrap();
        initialize(&connection).unwrap();
        let state = TransactionListState {
            db_connection: Arc::new(Mutex::new(connection)),
        };

        {
            let mut connection = state.db_connection.lock().unwrap();
            for (user_id, title) in [("u1", "mine"), ("u2", "theirs")] {
                create_transaction(
                    NewTransaction {
                        user_id: user_id.to_string(),
                        title: title.to_string(),
                        amount: -1.0,
                        category: "misc".to_string(),
                    },
                    OffsetDateTime::now_utc(),
                    &mut connection,
                )
                .unwrap();
            }
        }

        let app = Router::new()
            .route(
                endpoints::TRANSACTIONS_BY_USER,
                get(list_transactions_endpoint),
            )
            .with_state(state);
        let server = TestServer::try_new(app).expect("Could not create test server.");

        let response = server.get("/api/transactions/u1").await;

        response.assert_status_ok();
        let transactions: Vec<Transaction> = response.json();
        assert_eq!(transactions.len(), 1);
        assert_eq!(transactions[0].title, "mine");
    }
}
