//! Defines the endpoint for listing a user's savings goals.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, Path, State},
    response::{IntoResponse, Response},
};
use rusqlite::Connection;

use crate::{AppState, Error, goal::get_goals};

/// The state needed for listing savings goals.
#[derive(Debug, Clone)]
pub struct GoalListState {
    /// The database connection for managing savings goals.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for GoalListState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// A route handler for listing a user's savings goals, newest first.
pub async fn list_goals_endpoint(
    State(state): State<GoalListState>,
    Path(user_id): Path<String>,
) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLock.into_response();
        }
    };

    match get_goals(&user_id, &connection) {
        Ok(goals) => Json(goals).into_response(),
        Err(error) => error.into_response(),
    }
}
