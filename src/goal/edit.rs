//! Defines the endpoint for partially updating a savings goal.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, Path, State},
    response::{IntoResponse, Response},
};
use rusqlite::Connection;
use time::OffsetDateTime;

use crate::{
    AppState, Error,
    goal::{GoalId, UpdateGoalRequest, update_goal},
};

/// The state needed for updating a savings goal.
#[derive(Debug, Clone)]
pub struct UpdateGoalState {
    /// The database connection for managing savings goals.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for UpdateGoalState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// A route handler for partially updating a savings goal.
///
/// Absent fields keep their stored values, except `target_date`, which is
/// cleared when absent.
pub async fn update_goal_endpoint(
    State(state): State<UpdateGoalState>,
    Path(id): Path<GoalId>,
    Json(request): Json<UpdateGoalRequest>,
) -> Response {
    let changes = match request.validate() {
        Ok(changes) => changes,
        Err(error) => return error.into_response(),
    };

    let mut connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLock.into_response();
        }
    };

    match update_goal(id, changes, OffsetDateTime::now_utc(), &mut connection) {
        Ok(goal) => Json(goal).into_response(),
        Err(error) => error.into_response(),
    }
}
