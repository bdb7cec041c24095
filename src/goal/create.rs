//! Defines the endpoint for creating a savings goal.

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
    goal::{CreateGoalRequest, create_goal},
};

/// The state needed for creating a savings goal.
#[derive(Debug, Clone)]
pub struct CreateGoalState {
    /// The database connection for managing savings goals.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for CreateGoalState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// A route handler for creating a new savings goal.
pub async fn create_goal_endpoint(
    State(state): State<CreateGoalState>,
    Json(request): Json<CreateGoalRequest>,
) -> Response {
    let new_goal = match request.validate() {
        Ok(new_goal) => new_goal,
        Err(error) => return error.into_response(),
    };

    let mut connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLock.into_response();
        }
    };

    match create_goal(new_goal, OffsetDateTime::now_utc(), &mut connection) {
        Ok(goal) => (StatusCode::CREATED, Json(goal)).into_response(),
        Err(error) => error.into_response(),
    }
}
