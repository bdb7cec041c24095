//! Defines the endpoint for deleting a savings goal.

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
    goal::{GoalId, delete_goal},
    validate::non_empty,
};

/// The state needed for deleting a savings goal.
#[derive(Debug, Clone)]
pub struct DeleteGoalState {
    /// The database connection for managing savings goals.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for DeleteGoalState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The request body for deleting a savings goal.
#[derive(Debug, Deserialize)]
pub struct DeleteGoalRequest {
    /// The owner the goal must belong to.
    pub user_id: Option<String>,
}

/// A route handler for deleting a savings goal owned by the requesting user.
pub async fn delete_goal_endpoint(
    State(state): State<DeleteGoalState>,
    Path(id): Path<GoalId>,
    Json(request): Json<DeleteGoalRequest>,
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

    match delete_goal(id, &user_id, &connection) {
        Ok(()) => Json(json!({ "message": "Savings goal deleted successfully" })).into_response(),
        Err(error) => error.into_response(),
    }
}
