//! Defines the endpoint for deleting a budget.

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
    budget::{BudgetId, delete_budget},
    validate::non_empty,
};

/// The state needed for deleting a budget.
#[derive(Debug, Clone)]
pub struct DeleteBudgetState {
    /// The database connection for managing budgets.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for DeleteBudgetState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The request body for deleting a budget.
#[derive(Debug, Deserialize)]
pub struct DeleteBudgetRequest {
    /// The owner the budget must belong to.
    pub user_id: Option<String>,
}

/// A route handler for deleting a budget owned by the requesting user.
pub async fn delete_budget_endpoint(
    State(state): State<DeleteBudgetState>,
    Path(id): Path<BudgetId>,
    Json(request): Json<DeleteBudgetRequest>,
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

    match delete_budget(id, &user_id, &connection) {
        Ok(()) => Json(json!({ "message": "Budget deleted successfully" })).into_response(),
        Err(error) => error.into_response(),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::{Router, routing::delete};
    use axum_test::TestServer;
    use rusqlite::Connection;
    use serde_json::json;
    use time::OffsetDateTime;

    use crate::{
        budget::{NewBudget, Period, create_budget},
        db::initialize,
        endpoints,
    };

    use super::{DeleteBudgetState, delete_budget_endpoint};

    #[tokio::test]
    async fn delete_budget_requires_matching_owner() {
        let connection = Connection::open_in_memory().unwrap();
        initialize(&connection).unwrap();
        let state = DeleteBudgetState {
            db_connection: Arc::new(Mutex::new(connection)),
        };

        let budget = {
            let mut connection = state.db_connection.lock().unwrap();
            create_budget(
                NewBudget {
                    user_id: "u1".to_string(),
                    category: "food".to_string(),
                    amount: 100.0,
                    period: Period::Monthly,
                },
                OffsetDateTime::now_utc(),
                &mut connection,
            )
            .unwrap()
        };

        let app = Router::new()
            .route(endpoints::BUDGETS_BY_USER, delete(delete_budget_endpoint))
            .with_state(state);
        let server = TestServer::try_new(app).expect("Could not create test server.");

        let response = server
            .delete(&format!("/api/budgets/{}", budget.id))
            .json(&json!({ "user_id": "u2" }))
            .await;
        response.assert_status_not_found();

        let response = server
            .delete(&format!("/api/budgets/{}", budget.id))
            .json(&json!({ "user_id": "u1" }))
            .await;
        response.assert_status_ok();
        let body: serde_json::Value = response.json();
        assert_eq!(body["message"], "Budget deleted successfully");
    }
}
