//! Defines the savings summary endpoint.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, Path, State},
    response::{IntoResponse, Response},
};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};

use crate::{AppState, Error, money::round2};

/// A user's savings totals across all goals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavingsSummary {
    /// How many goals the user has.
    pub total_goals: i64,
    /// Sum of saved balances.
    pub total_saved: f64,
    /// Sum of target amounts.
    pub total_target: f64,
}

/// Compute the savings summary for one owner.
pub fn get_savings_summary(user_id: &str, connection: &Connection) -> Result<SavingsSummary, Error> {
    connection
        .prepare(
            "SELECT COUNT(*),
                    COALESCE(SUM(current_amount), 0),
                    COALESCE(SUM(target_amount), 0)
             FROM savings_goals WHERE user_id = ?1",
        )?
        .query_row([user_id], |row| {
            Ok(SavingsSummary {
                total_goals: row.get(0)?,
                total_saved: round2(row.get(1)?),
                total_target: round2(row.get(2)?),
            })
        })
        .map_err(|error| error.into())
}

/// The state needed for the savings summary.
#[derive(Debug, Clone)]
pub struct SavingsSummaryState {
    /// The database connection for managing savings goals.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for SavingsSummaryState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// A route handler for a user's savings totals.
pub async fn savings_summary_endpoint(
    State(state): State<SavingsSummaryState>,
    Path(user_id): Path<String>,
) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLock.into_response();
        }
    };

    match get_savings_summary(&user_id, &connection) {
        Ok(summary) => Json(summary).into_response(),
        Err(error) => error.into_response(),
    }
}
