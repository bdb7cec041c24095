//! Defines the endpoint for partially updating a budget.

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
    budget::{BudgetId, UpdateBudgetRequest, update_budget},
};

/// The state needed for updating a budget.
#[derive(Debug, Clone)]
pub struct UpdateBudgetState {
    /// The database connection for managing budgets.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for UpdateBudgetState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// A route handler for partially updating a budget.
///
/// Fields absent from the body keep their stored values; `updated_at` is
/// refreshed on every accepted update.
pub async fn update_budget_endpoint(
    State(state): State<UpdateBudgetState>,
    Path(id): Path<BudgetId>,
    Json(request): Json<UpdateBudgetRequest>,
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

    match update_budget(id, changes, OffsetDateTime::now_utc(), &mut connection) {
        Ok(budget) => Json(budget).into_response(),
        Err(error) => error.into_response(),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::{Router, routing::put};
    use axum_test::TestServer;
    use rusqlite::Connection;
    use serde_json::json;
    use time::OffsetDateTime;

    use crate::{
        budget::{Budget, NewBudget, Period, create_budget},
        db::initialize,
        endpoints,
    };

    use super::{UpdateBudgetState, update_budget_endpoint};

    fn get_test_state() -> UpdateBudgetState {
        let connection = Connection::open_in_memory().unwrap();
        initialize(&connection).unwrap();

        UpdateBudgetState {
            db_connection: Arc::new(Mutex::new(connection)),
        }
    }

    fn insert_test_budget(state: &UpdateBudgetState) -> Budget {
        let mut connection = state.db_connection.lock().unwrap();

        create_budget(
            NewBudget {
                user_id: "u1".to_string(),
                category: "food".to_string(),
                amount: 200.0,
                period: Period::Monthly,
            },
            OffsetDateTime::now_utc(),
            &mut connection,
        )
        .unwrap()
    }

    fn get_test_server(state: UpdateBudgetState) -> TestServer {
        let app = Router::new()
            .route(endpoints::BUDGETS_BY_USER, put(update_budget_endpoint))
            .with_state(state);

        TestServer::try_new(app).expect("Could not create test server.")
    }

    #[tokio::test]
    async fn update_with_only_amount_keeps_category_and_period() {
        let state = get_test_state();
        let budget = insert_test_budget(&state);
        let server = get_test_server(state);

        let response = server
            .put(&format!("/api/budgets/{}", budget.id))
            .json(&json!({ "user_id": "u1", "amount": 50 }))
            .await;

        response.assert_status_ok();
        let updated: Budget = response.json();
        assert_eq!(updated.amount, 50.0);
        assert_eq!(updated.category, "food");
        assert_eq!(updated.period, Period::Monthly);
    }

    #[tokio::test]
    async fn update_missing_budget_returns_not_found() {
        let server = get_test_server(get_test_state());

        let response = server
            .put("/api/budgets/999")
            .json(&json!({ "user_id": "u1", "amount": 50 }))
            .await;

        response.assert_status_not_found();
        let body: serde_json::Value = response.json();
        assert_eq!(body["message"], "Budget not found");
    }

    #[tokio::test]
    async fn update_rejects_invalid_period() {
        let state = get_test_state();
        let budget = insert_test_budget(&state);
        let server = get_test_server(state);

        let response = server
            .put(&format!("/api/budgets/{}", budget.id))
            .json(&json!({ "user_id": "u1", "period": "daily" }))
            .await;

        response.assert_status_bad_request();
    }
}
