//! Per-budget adherence over each budget's own period window.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, Path, State},
    response::{IntoResponse, Response},
};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::{
    AppState, Error,
    budget::Period,
    dates::day_start,
    money::round2,
};

/// How a budget is tracking against its limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdherenceStatus {
    /// Spend exceeds the limit.
    OverBudget,
    /// Spend is at or above 80% of the limit.
    Warning,
    /// Everything else.
    OnTrack,
}

/// One budget's adherence numbers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetAdherence {
    /// The budget's category.
    pub category: String,
    /// The budget's limit.
    pub budget_amount: f64,
    /// The budget's evaluation window.
    pub period: Period,
    /// Spend within the budget's own window.
    pub spent_amount: f64,
    /// Limit minus spend; negative when over budget.
    pub remaining_amount: f64,
    /// Spend as a share of the limit, in percent.
    pub adherence_percentage: f64,
    /// How the budget is tracking.
    pub status: AdherenceStatus,
    /// How many expense transactions fell in the window.
    pub transaction_count: i64,
}

fn adherence_status(spent: f64, limit: f64) -> AdherenceStatus {
    if spent > limit {
        AdherenceStatus::OverBudget
    } else if limit > 0.0 && spent / limit >= 0.8 {
        AdherenceStatus::Warning
    } else {
        AdherenceStatus::OnTrack
    }
}

/// Compute adherence for all of one owner's budgets as of `now`.
///
/// Each budget is evaluated over its own stored period, unlike the budget
/// progress report where the caller picks one window for every budget.
pub fn get_budget_adherence(
    user_id: &str,
    now: OffsetDateTime,
    connection: &Connection,
) -> Result<Vec<BudgetAdherence>, Error> {
    let today = now.date();
    let weekly_start = day_start(Period::Weekly.window_start(today));
    let monthly_start = day_start(Period::Monthly.window_start(today));
    let yearly_start = day_start(Period::Yearly.window_start(today));

    connection
        .prepare(
            "SELECT b.category, b.amount, b.period,
                    COALESCE(SUM(ABS(t.amount)), 0) AS spent,
                    COUNT(t.id) AS transaction_count
             FROM budgets b
             LEFT JOIN transactions t
                ON t.category = b.category AND t.user_id = b.user_id AND t.amount < 0
                AND t.created_at >= CASE b.period
                                    WHEN 'weekly' THEN ?2
                                    WHEN 'yearly' THEN ?4
                                    ELSE ?3
                                    END
             WHERE b.user_id = ?1
             GROUP BY b.id, b.category, b.amount, b.period
             ORDER BY COALESCE(SUM(ABS(t.amount)), 0) / MAX(b.amount, 0.01) DESC, b.id ASC",
        )?
        .query_map(
            rusqlite::params![user_id, weekly_start, monthly_start, yearly_start],
            |row| {
                let category: String = row.get(0)?;
                let limit: f64 = row.get(1)?;
                let period_text: String = row.get(2)?;
                let spent: f64 = row.get(3)?;

                Ok((category, limit, period_text, spent, row.get::<_, i64>(4)?))
            },
        )?
        .map(|maybe_row| {
            let (category, limit, period_text, spent, transaction_count) = maybe_row?;
            let period = Period::parse(&period_text).unwrap_or_default();
            let spent = round2(spent);

            Ok(BudgetAdherence {
                category,
                budget_amount: limit,
                period,
                spent_amount: spent,
                remaining_amount: round2(limit - spent),
                adherence_percentage: if limit > 0.0 {
                    round2(spent / limit * 100.0)
                } else {
                    0.0
                },
                status: adherence_status(spent, limit),
                transaction_count,
            })
        })
        .collect()
}

/// The state needed for the budget adherence report.
#[derive(Debug, Clone)]
pub struct BudgetAdherenceState {
    /// The database connection for reading budgets and transactions.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for BudgetAdherenceState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// A route handler for per-budget adherence.
pub async fn budget_adherence_endpoint(
    State(state): State<BudgetAdherenceState>,
    Path(user_id): Path<String>,
) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLock.into_response();
        }
    };

    match get_budget_adherence(&user_id, OffsetDateTime::now_utc(), &connection) {
        Ok(adherence) => Json(adherence).into_response(),
        Err(error) => error.into_response(),
    }
}
