//! Defines the endpoint for creating a new transaction.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use rusqlite::Connection;
use time::OffsetDateTime;

use crate::{
    AppState, Error,
    transaction::{CreateTransactionRequest, create_transaction},
};

/// The state needed for creating a transaction.
#[derive(Debug, Clone)]
pub struct CreateTransactionState {
    /// The database connection for managing transactions.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for CreateTransactionState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// A route handler for creating a new transaction.
///
/// Returns 201 with the stored row on success, 400 on a validation error.
pub async fn create_transaction_endpoint(
    State(state): State<CreateTransactionState>,
    Json(request): Json<CreateTransactionRequest>,
) -> Response {
    let new_transaction = match request.validate() {
        Ok(new_transaction) => new_transaction,
        Err(error) => return error.into_response(),
    };

    let mut connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLock.into_response();
        }
    };

    match create_transaction(new_transaction, OffsetDateTime::now_utc(), &mut connection) {
        Ok(transaction) => (StatusCode::CREATED, Json(transaction)).into_response(),
        Err(error) => error.into_response(),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::{Router, routing::post};
    use axum_test::TestServer;
    use rusqlite::Connection;
    use serde_json::json;

    use crate::{db::initialize, endpoints, transaction::Transaction};

    use super::{CreateTransactionState, create_transaction_endpoint};

    fn get_test_state() -> CreateTransactionState {
        let connection = Connection::open_in_memory().unwrap();
        initialize(&connection).unwrap();

        CreateTransactionState {
            db_connection: Arc::new(Mutex::new(connection)),
        }
    }

    fn get_test_server(state: CreateTransactionState) -> TestServer {
        let app = Router::new()
            .route(endpoints::TRANSACTIONS, post(create_transaction_endpoint))
            .with_state(state);

        TestServer::try_new(app).expect("Could not create test server.")
    }

    #[tokio::test]
    async fn create_transaction_succeeds() {
        let state = get_test_state();
        let server = get_test_server(state.clone());

        let response = server
            .post(endpoints::TRANSACTIONS)
            .json(&json!({
                "user_id": "u1",
                "title": "Groceries",
                "amount": -42.5,
                "category": "food",
            }))
            .await;

        response.assert_status(axum::http::StatusCode::CREATED);
        let transaction: Transaction = response.json();
        assert!(transaction.id > 0);
        assert_eq!(transaction.title, "Groceries");
        assert_eq!(transaction.amount, -42.5);

        // The row is queryable afterwards.
        let connection = state.db_connection.lock().unwrap();
        let stored =
            crate::transaction::get_transaction(transaction.id, &connection).expect("row missing");
        assert_eq!(stored, transaction);
    }

    #[tokio::test]
    async fn create_transaction_rounds_amount_half_up() {
        let server = get_test_server(get_test_state());

        let response = server
            .post(endpoints::TRANSACTIONS)
            .json(&json!({
                "user_id": "u1",
                "title": "Refund",
                "amount": 200.005,
                "category": "misc",
            }))
            .await;

        response.assert_status(axum::http::StatusCode::CREATED);
        let transaction: Transaction = response.json();
        assert_eq!(transaction.amount, 200.01);
    }

    #[tokio::test]
    async fn create_transaction_rejects_missing_title() {
        let server = get_test_server(get_test_state());

        let response = server
            .post(endpoints::TRANSACTIONS)
            .json(&json!({
                "user_id": "u1",
                "amount": -1.0,
                "category": "food",
            }))
            .await;

        response.assert_status_bad_request();
        let body: serde_json::Value = response.json();
        assert_eq!(body["message"], "title is required");
    }
}
