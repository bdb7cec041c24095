//! Defines the endpoint for adding money to a savings goal.

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
    goal::{AddMoneyRequest, GoalId, add_money},
};

/// The state needed for adding money to a goal.
#[derive(Debug, Clone)]
pub struct AddMoneyState {
    /// The database connection for managing savings goals.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for AddMoneyState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// A route handler for adding money to a savings goal.
///
/// Returns the refreshed goal; concurrent deposits on the same goal never
/// lose an update.
pub async fn add_money_endpoint(
    State(state): State<AddMoneyState>,
    Path(id): Path<GoalId>,
    Json(request): Json<AddMoneyRequest>,
) -> Response {
    let (user_id, amount) = match request.validate() {
        Ok(validated) => validated,
        Err(error) => return error.into_response(),
    };

    let mut connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLock.into_response();
        }
    };

    match add_money(id, &user_id, amount, OffsetDateTime::now_utc(), &mut connection) {
        Ok(goal) => Json(goal).into_response(),
        Err(error) => error.into_response(),
    }
}
