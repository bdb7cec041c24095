//! Defines the budget summary endpoint.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, Path, State},
    response::{IntoResponse, Response},
};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};

use crate::{AppState, Error, money::round2};

/// Budget totals for one owner, with all-time per-category spend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetSummary {
    /// Sum of all budget limits.
    pub total_budget: f64,
    /// Sum of the magnitudes of all expense transactions, across every
    /// category.
    pub total_spent: f64,
    /// `total_budget - total_spent`.
    pub remaining: f64,
    /// Per-budget spend, one entry per budget row.
    pub category_spending: Vec<CategorySpending>,
}

/// Spend against one budget's category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategorySpending {
    /// The budget's category.
    pub category: String,
    /// The budget's limit.
    pub budget_amount: f64,
    /// All-time spend in the category.
    pub spent_amount: f64,
}

/// Compute the budget summary for one owner.
///
/// An owner with budgets but no transactions gets `total_spent = 0` and their
/// full budget as `remaining`, never an error.
pub fn get_budget_summary(user_id: &str, connection: &Connection) -> Result<BudgetSummary, Error> {
    let (total_budget, total_spent) = connection
        .prepare(
            "SELECT (SELECT COALESCE(SUM(amount), 0) FROM budgets WHERE user_id = ?1),
                    (SELECT COALESCE(SUM(ABS(amount)), 0) FROM transactions
                     WHERE user_id = ?1 AND amount < 0)",
        )?
        .query_row([user_id], |row| {
            Ok((row.get::<_, f64>(0)?, row.get::<_, f64>(1)?))
        })?;

    let category_spending = connection
        .prepare(
            "SELECT b.category, b.amount, COALESCE(SUM(ABS(t.amount)), 0)
             FROM budgets b
             LEFT JOIN transactions t
                ON t.category = b.category AND t.user_id = b.user_id AND t.amount < 0
             WHERE b.user_id = ?1
             GROUP BY b.id, b.category, b.amount
             ORDER BY b.id",
        )?
        .query_map([user_id], |row| {
            Ok(CategorySpending {
                category: row.get(0)?,
                budget_amount: row.get(1)?,
                spent_amount: round2(row.get(2)?),
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;

    let total_budget = round2(total_budget);
    let total_spent = round2(total_spent);

    Ok(BudgetSummary {
        total_budget,
        total_spent,
        remaining: round2(total_budget - total_spent),
        category_spending,
    })
}

/// The state needed for the budget summary.
#[derive(Debug, Clone)]
pub struct BudgetSummaryState {
    /// The database connection for managing budgets.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for BudgetSummaryState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// A route handler for a user's budget summary.
pub async fn budget_summary_endpoint(
    State(state): State<BudgetSummaryState>,
    Path(user_id): Path<String>,
) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLock.into_response();
        }
    };

    match get_budget_summary(&user_id, &connection) {
        Ok(summary) => Json(summary).into_response(),
        Err(error) => error.into_response(),
    }
}
