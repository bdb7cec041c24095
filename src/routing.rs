//! Application router configuration.

use axum::{
    Json, Router,
    http::StatusCode,
    routing::{get, patch, post},
};
use serde_json::json;

use crate::{
    AppState, endpoints,
    budget::{
        budget_details_endpoint, budget_progress_endpoint, budget_summary_endpoint,
        create_budget_endpoint, delete_budget_endpoint, list_budgets_endpoint,
        update_budget_endpoint,
    },
    goal::{
        add_money_endpoint, create_goal_endpoint, delete_goal_endpoint, goal_details_endpoint,
        list_goals_endpoint, savings_summary_endpoint, update_goal_endpoint,
    },
    report::{
        budget_adherence_endpoint, category_distribution_endpoint, monthly_expenditure_endpoint,
        report_summary_endpoint, savings_forecast_endpoint, savings_progress_endpoint,
    },
    sync::sync_upload_endpoint,
    transaction::{
        create_transaction_endpoint, delete_transaction_endpoint, list_transactions_endpoint,
        transaction_summary_endpoint,
    },
};

/// Return a router with all the app's routes.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route(endpoints::TRANSACTIONS, post(create_transaction_endpoint))
        .route(
            endpoints::TRANSACTION_SUMMARY,
            get(transaction_summary_endpoint),
        )
        .route(
            endpoints::TRANSACTIONS_BY_USER,
            get(list_transactions_endpoint).delete(delete_transaction_endpoint),
        )
        .route(endpoints::BUDGETS, post(create_budget_endpoint))
        .route(endpoints::BUDGET_SUMMARY, get(budget_summary_endpoint))
        .route(endpoints::BUDGET_PROGRESS, get(budget_progress_endpoint))
        .route(endpoints::BUDGET_DETAILS, get(budget_details_endpoint))
        .route(
            endpoints::BUDGETS_BY_USER,
            get(list_budgets_endpoint)
                .put(update_budget_endpoint)
                .delete(delete_budget_endpoint),
        )
        .route(endpoints::GOALS, post(create_goal_endpoint))
        .route(endpoints::GOAL_SUMMARY, get(savings_summary_endpoint))
        .route(endpoints::GOAL_DETAILS, get(goal_details_endpoint))
        .route(
            endpoints::GOALS_BY_USER,
            get(list_goals_endpoint)
                .put(update_goal_endpoint)
                .delete(delete_goal_endpoint),
        )
        .route(endpoints::GOAL_ADD_MONEY, patch(add_money_endpoint))
        .route(endpoints::REPORT_SUMMARY, get(report_summary_endpoint))
        .route(
            endpoints::REPORT_MONTHLY_EXPENDITURE,
            get(monthly_expenditure_endpoint),
        )
        .route(
            endpoints::REPORT_BUDGET_ADHERENCE,
            get(budget_adherence_endpoint),
        )
        .route(
            endpoints::REPORT_SAVINGS_PROGRESS,
            get(savings_progress_endpoint),
        )
        .route(
            endpoints::REPORT_CATEGORY_DISTRIBUTION,
            get(category_distribution_endpoint),
        )
        .route(
            endpoints::REPORT_SAVINGS_FORECAST,
            get(savings_forecast_endpoint),
        )
        .route(endpoints::SYNC_UPLOAD, post(sync_upload_endpoint))
        .fallback(route_not_found)
        .with_state(state)
}

async fn route_not_found() -> (StatusCode, Json<serde_json::Value>) {
    (
        StatusCode::NOT_FOUND,
        Json(json!({ "message": "Route not found" })),
    )
}
