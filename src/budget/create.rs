//! Defines the endpoint for creating a budget.

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
    budget::{CreateBudgetRequest, create_budget},
};

/// The state needed for creating a budget.
#[derive(Debug, Clone)]
pub struct CreateBudgetState {
    /// The database connection for managing budgets.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for CreateBudgetState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// A route handler for creating a new budget.
///
/// Returns 201 with the stored row, 400 on a validation error or when the
/// owner already has a budget for the category.
pub async fn create_budget_endpoint(
    State(state): State<CreateBudgetState>,
    Json(request): Json<CreateBudgetRequest>,
) -> Response {
    let new_budget = match request.validate() {
        Ok(new_budget) => new_budget,
        Err(error) => return error.into_response(),
    };

    let mut connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLock.into_response();
        }
    };

    match create_budget(new_budget, OffsetDateTime::now_utc(), &mut connection) {
        Ok(budget) => (StatusCode::CREATED, Json(budget)).into_response(),
        Err(error) => error.into_response(),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::{Router, routing::post};
    use axum_test::TestServer;
    use rusqlite::Connection;
    use serde_json::json;

    use crate::{budget::Budget, db::initialize, endpoints};

    use super::{CreateBudgetState, create_budget_endpoint};

    fn get_test_server() -> TestServer {
        let connection = Connection::open_in_memory().unwrap();
        initialize(&connection).unwrap();

        let app = Router::new()
            .route(endpoints::BUDGETS, post(create_budget_endpoint))
            .with_state(CreateBudgetState {
                db_connection: Arc::new(Mutex::new(connection)),
            });

        TestServer::try_new(app).expect("Could not create test server.")
    }

    #[tokio::test]
    async fn create_budget_succeeds_and_rounds_amount() {
        let server = get_test_server();

        let response = server
            .post(endpoints::BUDGETS)
            .json(&json!({
                "user_id": "u1",
                "category": "food",
                "amount": 200.005,
            }))
            .await;

        response.assert_status(axum::http::StatusCode::CREATED);
        let budget: Budget = response.json();
        assert_eq!(budget.amount, 200.01);
        assert_eq!(budget.period.as_str(), "monthly");
    }

    #[tokio::test]
    async fn duplicate_category_reports_specific_message() {
        let server = get_test_server();
        let body = json!({ "user_id": "u1", "category": "food", "amount": 100 });

        server
            .post(endpoints::BUDGETS)
            .json(&body)
            .await
            .assert_status(axum::http::StatusCode::CREATED);

        let response = server.post(endpoints::BUDGETS).json(&body).await;

        response.assert_status_bad_request();
        let body: serde_json::Value = response.json();
        assert_eq!(body["message"], "Budget already exists for this category");
    }

    #[tokio::test]
    async fn create_budget_rejects_missing_amount() {
        let server = get_test_server();

        let response = server
            .post(endpoints::BUDGETS)
            .json(&json!({ "user_id": "u1", "category": "food" }))
            .await;

        response.assert_status_bad_request();
        let body: serde_json::Value = response.json();
        assert_eq!(body["message"], "amount is required");
    }
}
