//! Defines the sync upload endpoint.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, State},
    response::{IntoResponse, Response},
};
use rusqlite::Connection;
use serde_json::json;
use time::OffsetDateTime;

use crate::{
    AppState, Error,
    sync::{SyncRequest, apply_sync},
    validate::non_empty,
};

/// The state needed for sync uploads.
#[derive(Debug, Clone)]
pub struct SyncUploadState {
    /// The database connection all records are applied against.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for SyncUploadState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// A route handler for batch sync uploads.
///
/// Every record is applied independently; failed records are counted as
/// resolved conflicts and never abort the batch.
pub async fn sync_upload_endpoint(
    State(state): State<SyncUploadState>,
    Json(request): Json<SyncRequest>,
) -> Response {
    let user_id = match non_empty(request.user_id, "user_id") {
        Ok(user_id) => user_id,
        Err(error) => return error.into_response(),
    };

    if let Some(last_sync_time) = &request.last_sync_time {
        tracing::debug!("sync upload from {user_id}, client last synced at {last_sync_time}");
    }

    let mut connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLock.into_response();
        }
    };

    match apply_sync(
        &user_id,
        request.transactions,
        request.budgets,
        request.goals,
        OffsetDateTime::now_utc(),
        &mut connection,
    ) {
        Ok(report) => Json(json!({
            "success": true,
            "message": "Sync completed successfully",
            "recordsSynced": report.records_synced,
            "conflictsResolved": report.conflicts_resolved,
        }))
        .into_response(),
        Err(error) => error.into_response(),
    }
}
