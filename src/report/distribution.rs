//! Category expense distribution over a date window.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, Path, Query, State},
    response::{IntoResponse, Response},
};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use time::{Date, Duration};

use crate::{
    AppState, Error,
    dates::{day_start, parse_date},
    money::round2,
    validate::optional_trimmed,
};

/// One category's share of the window's expenses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryDistribution {
    /// The spending category.
    pub category: String,
    /// Total spend in the window.
    pub total_amount: f64,
    /// How many expense transactions the category had.
    pub transaction_count: i64,
    /// Mean expense amount.
    pub avg_amount: f64,
    /// Smallest expense amount.
    pub min_amount: f64,
    /// Largest expense amount.
    pub max_amount: f64,
    /// This category's share of the window total, in percent. Shares across
    /// all returned categories sum to 100 up to rounding.
    pub percentage: f64,
    /// 1-based position when ranked by total spend, highest first.
    pub rank: i64,
}

/// Per-category aggregates before shares and ranks are attached.
struct CategoryAggregate {
    category: String,
    total: f64,
    count: i64,
    average: f64,
    minimum: f64,
    maximum: f64,
}

/// Compute the expense distribution for one owner over `[start, end]`.
pub fn get_category_distribution(
    user_id: &str,
    start: Date,
    end: Date,
    connection: &Connection,
) -> Result<Vec<CategoryDistribution>, Error> {
    let window_end = end
        .next_day()
        .map(day_start)
        .unwrap_or_else(|| day_start(end));

    let aggregates = connection
        .prepare(
            "SELECT category, SUM(ABS(amount)), COUNT(*), AVG(ABS(amount)),
                    MIN(ABS(amount)), MAX(ABS(amount))
             FROM transactions
             WHERE user_id = ?1 AND amount < 0
               AND created_at >= ?2 AND created_at < ?3
             GROUP BY category
             ORDER BY SUM(ABS(amount)) DESC",
        )?
        .query_map(
            rusqlite::params![user_id, day_start(start), window_end],
            |row| {
                Ok(CategoryAggregate {
                    category: row.get(0)?,
                    total: row.get(1)?,
                    count: row.get(2)?,
                    average: row.get(3)?,
                    minimum: row.get(4)?,
                    maximum: row.get(5)?,
                })
            },
        )?
        .collect::<Result<Vec<_>, _>>()?;

    Ok(attach_shares(aggregates))
}

/// Attach percentage shares and ranks to aggregates already sorted by
/// descending total.
fn attach_shares(aggregates: Vec<CategoryAggregate>) -> Vec<CategoryDistribution> {
    let grand_total: f64 = aggregates.iter().map(|aggregate| aggregate.total).sum();

    aggregates
        .into_iter()
        .enumerate()
        .map(|(index, aggregate)| CategoryDistribution {
            category: aggregate.category,
            total_amount: round2(aggregate.total),
            transaction_count: aggregate.count,
            avg_amount: round2(aggregate.average),
            min_amount: round2(aggregate.minimum),
            max_amount: round2(aggregate.maximum),
            percentage: if grand_total > 0.0 {
                round2(aggregate.total / grand_total * 100.0)
            } else {
                0.0
            },
            rank: index as i64 + 1,
        })
        .collect()
}

/// Query parameters for the category distribution endpoint.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DistributionParams {
    /// Window start in `YYYY-MM-DD` format, defaults to 30 days before the
    /// end.
    pub start_date: Option<String>,
    /// Window end in `YYYY-MM-DD` format, defaults to today.
    pub end_date: Option<String>,
}

/// The state needed for the category distribution report.
#[derive(Debug, Clone)]
pub struct DistributionState {
    /// The database connection for reading transactions.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for DistributionState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// A route handler for the category expense distribution.
pub async fn category_distribution_endpoint(
    State(state): State<DistributionState>,
    Path(user_id): Path<String>,
    Query(params): Query<DistributionParams>,
) -> Response {
    let today = time::OffsetDateTime::now_utc().date();

    let end = match optional_trimmed(params.end_date) {
        Some(text) => match parse_date(&text) {
            Ok(date) => date,
            Err(error) => return error.into_response(),
        },
        None => today,
    };
    let start = match optional_trimmed(params.start_date) {
        Some(text) => match parse_date(&text) {
            Ok(date) => date,
            Err(error) => return error.into_response(),
        },
        None => end - Duration::days(30),
    };

    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLock.into_response();
        }
    };

    match get_category_distribution(&user_id, start, end, &connection) {
        Ok(distribution) => Json(distribution).into_response(),
        Err(error) => error.into_response(),
    }
}
