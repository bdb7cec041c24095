//! Defines the endpoint for deleting a transaction.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, Path, State},
    response::{IntoResponse, Response},
};
use rusqlite::Connection;
use serde::Deserialize;
use serde_json::json;

use crate::{
    AppState, Error,
    transaction::{TransactionId, delete_transaction},
    validate::non_empty,
};

/// The state needed for deleting a transaction.
#[derive(Debug, Clone)]
pub struct DeleteTransactionState {
    /// The database connection for managing transactions.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for DeleteTransactionState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The request body for deleting a transaction.
#[derive(Debug, Deserialize)]
pub struct DeleteTransactionRequest {
    /// The owner the transaction must belong to.
    pub user_id: Option<String>,
}

/// A route handler for deleting a transaction owned by the requesting user.
///
/// An ID owned by someone else reports 404, identical to a missing row.
pub async fn delete_transaction_endpoint(
    State(state): State<DeleteTransactionState>,
    Path(id): Path<TransactionId>,
    Json(request): Json<DeleteTransactionRequest>,
) -> Response {
    let user_id = match non_empty(request.user_id, "user_id") {
        Ok(user_id) => user_id,
        Err(error) => return error.into_response(),
    };

    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLock.into_response();
        }
    };

    match delete_transaction(id, &user_id, &connection) {
        Ok(()) => Json(json!({ "message": "Transaction deleted successfully" })).into_response(),
        Err(error) => error.into_response(),
    }
}
