//! Defines the endpoint for fetching one budget by id.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, Path, State},
    response::{IntoResponse, Response},
};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    budget::{BudgetId, get_budget},
};

/// The state needed for fetching a budget.
#[derive(Debug, Clone)]
pub struct BudgetDetailsState {
    /// The database connection for managing budgets.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for BudgetDetailsState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// A route handler for fetching a single budget by its id.
pub async fn budget_details_endpoint(
    State(state): State<BudgetDetailsState>,
    Path(id): Path<BudgetId>,
) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLock.into_response();
        }
    };

    match get_budget(id, &connection) {
        Ok(budget) => Json(budget).into_response(),
        Err(error) => error.into_response(),
    }
}
