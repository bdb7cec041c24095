//! Pocketledger is a bookkeeping backend for personal finances.
//!
//! This library provides a JSON REST API for recording transactions, managing
//! budgets and savings goals, computing spending reports, and accepting batch
//! uploads from clients that were offline.

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_server::Handle;
use serde_json::json;
use tokio::signal;

mod app_state;
mod budget;
mod dates;
mod db;
mod endpoints;
mod goal;
mod money;
mod report;
mod routing;
mod sync;
mod transaction;
mod validate;

pub use app_state::AppState;
pub use db::initialize as initialize_db;
pub use routing::build_router;

/// An async task that waits for either the ctrl+c or terminate signal, whichever comes first, and
/// then signals the server to shut down gracefully.
///
/// `handle` is a handle to an Axum `Server`.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::debug!("Received ctrl+c signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
        _ = terminate => {
            tracing::debug!("Received terminate signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
    }
}

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// A required request field was missing, null, or empty.
    #[error("{0} is required")]
    MissingField(&'static str),

    /// A numeric field did not parse to a finite decimal.
    #[error("{0} must be a valid number")]
    InvalidAmount(&'static str),

    /// An amount that must be strictly positive was zero or negative.
    #[error("{0} must be greater than zero")]
    NonPositiveAmount(&'static str),

    /// An amount that must not be negative was negative.
    #[error("{0} must not be negative")]
    NegativeAmount(&'static str),

    /// Adding the requested amount would take the goal's saved balance below
    /// zero.
    #[error("amount would overdraw the goal's current balance")]
    GoalOverdrawn,

    /// A date string was not a valid `YYYY-MM-DD` calendar date.
    #[error("\"{0}\" is not a valid date in YYYY-MM-DD format")]
    InvalidDate(String),

    /// A budget period was not one of `weekly`, `monthly`, or `yearly`.
    #[error("\"{0}\" is not a valid period, expected weekly, monthly, or yearly")]
    InvalidPeriod(String),

    /// The owner already has a budget for the requested category.
    #[error("Budget already exists for this category")]
    DuplicateBudgetCategory,

    /// The requested row does not exist, or exists under a different owner.
    ///
    /// An ownership mismatch is deliberately indistinguishable from absence so
    /// that one user cannot probe for another user's row ids.
    #[error("{0} not found")]
    NotFound(&'static str),

    /// Could not acquire the database lock.
    #[error("could not acquire the database lock")]
    DatabaseLock,

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            // Code 2067 occurs when a UNIQUE constraint failed.
            rusqlite::Error::SqliteFailure(sql_error, Some(ref desc))
                if sql_error.extended_code == 2067 && desc.contains("budgets") =>
            {
                Error::DuplicateBudgetCategory
            }
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound("Resource"),
            error => Error::SqlError(error),
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = match &self {
            Error::MissingField(_)
            | Error::InvalidAmount(_)
            | Error::NonPositiveAmount(_)
            | Error::NegativeAmount(_)
            | Error::GoalOverdrawn
            | Error::InvalidDate(_)
            | Error::InvalidPeriod(_)
            | Error::DuplicateBudgetCategory => StatusCode::BAD_REQUEST,
            Error::NotFound(_) => StatusCode::NOT_FOUND,
            Error::DatabaseLock | Error::SqlError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        // Store failures are logged server-side and reported to the client as
        // a generic message.
        let message = if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!("An unexpected error occurred: {self}");
            "Internal server error".to_string()
        } else {
            self.to_string()
        };

        (status, Json(json!({ "message": message }))).into_response()
    }
}

#[cfg(test)]
mod error_tests {
    use axum::{http::StatusCode, response::IntoResponse};

    use super::Error;

    #[test]
    fn validation_errors_map_to_bad_request() {
        for error in [
            Error::MissingField("title"),
            Error::InvalidAmount("amount"),
            Error::InvalidDate("soon".to_string()),
            Error::InvalidPeriod("fortnightly".to_string()),
            Error::DuplicateBudgetCategory,
        ] {
            let response = error.into_response();
            assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        }
    }

    #[test]
    fn not_found_maps_to_404() {
        let response = Error::NotFound("Budget").into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn sql_errors_map_to_internal_server_error() {
        let response = Error::SqlError(rusqlite::Error::InvalidQuery).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn unique_budget_violation_converts_to_duplicate_category() {
        let sql_error = rusqlite::Error::SqliteFailure(
            rusqlite::ffi::Error {
                code: rusqlite::ffi::ErrorCode::ConstraintViolation,
                extended_code: 2067,
            },
            Some("UNIQUE constraint failed: budgets.user_id, budgets.category".to_string()),
        );

        assert_eq!(Error::from(sql_error), Error::DuplicateBudgetCategory);
    }

    #[test]
    fn no_rows_converts_to_not_found() {
        assert_eq!(
            Error::from(rusqlite::Error::QueryReturnedNoRows),
            Error::NotFound("Resource")
        );
    }
}
