//! Defines the budget progress endpoint.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, Path, Query, State},
    response::{IntoResponse, Response},
};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::{
    AppState, Error,
    budget::{BudgetId, Period},
    dates::day_start,
    money::round2,
    validate::optional_trimmed,
};

/// One budget's utilization over a period window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetProgress {
    /// The ID of the budget.
    pub id: BudgetId,
    /// The budget's category.
    pub category: String,
    /// The budget's limit.
    pub budget_amount: f64,
    /// Spend within the window.
    pub spent_amount: f64,
    /// `spent / limit * 100`, or 0 for a zero limit.
    pub percentage: f64,
}

/// Compute per-budget utilization for one owner over the window ending at
/// `now`.
///
/// The window restricts the transaction join, not the budget rows: a budget
/// with no spend in the window still appears with zero. Results are ordered
/// by descending percentage, ties broken by budget id.
pub fn get_budget_progress(
    user_id: &str,
    period: Period,
    now: OffsetDateTime,
    connection: &Connection,
) -> Result<Vec<BudgetProgress>, Error> {
    let window_start = day_start(period.window_start(now.date()));

    connection
        .prepare(
            "SELECT b.id, b.category, b.amount,
                    COALESCE(SUM(ABS(t.amount)), 0) AS spent,
                    CASE WHEN b.amount > 0
                         THEN COALESCE(SUM(ABS(t.amount)), 0) / b.amount * 100
                         ELSE 0
                    END AS percentage
             FROM budgets b
             LEFT JOIN transactions t
                ON t.category = b.category AND t.user_id = b.user_id
                AND t.amount < 0 AND t.created_at >= ?2
             WHERE b.user_id = ?1
             GROUP BY b.id, b.category, b.amount
             ORDER BY percentage DESC, b.id ASC",
        )?
        .query_map(rusqlite::params![user_id, window_start], |row| {
            Ok(BudgetProgress {
                id: row.get(0)?,
                category: row.get(1)?,
                budget_amount: row.get(2)?,
                spent_amount: round2(row.get(3)?),
                percentage: round2(row.get(4)?),
            })
        })?
        .map(|maybe_progress| maybe_progress.map_err(|error| error.into()))
        .collect()
}

/// Query parameters for the budget progress endpoint.
#[derive(Debug, Deserialize)]
pub struct ProgressParams {
    /// The window to evaluate, defaults to monthly.
    pub period: Option<String>,
}

/// The state needed for the budget progress report.
#[derive(Debug, Clone)]
pub struct BudgetProgressState {
    /// The database connection for managing budgets.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for BudgetProgressState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// A route handler for per-budget utilization, highest first.
pub async fn budget_progress_endpoint(
    State(state): State<BudgetProgressState>,
    Path(user_id): Path<String>,
    Query(params): Query<ProgressParams>,
) -> Response {
    let period = match optional_trimmed(params.period) {
        Some(text) => match Period::parse(&text) {
            Ok(period) => period,
            Err(error) => return error.into_response(),
        },
        None => Period::default(),
    };

    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLock.into_response();
        }
    };

    match get_budget_progress(&user_id, period, OffsetDateTime::now_utc(), &connection) {
        Ok(progress) => Json(progress).into_response(),
        Err(error) => error.into_response(),
    }
}

#[cfg(test)]
mod tests {
    use rusqlite::Connection;
    use time::{Duration, OffsetDateTime};

    use crate::{
        budget::{NewBudget, Period, create_budget},
        db::initialize,
        transaction::{NewTransaction, create_transaction},
    };

    use super::get_budget_progress;

    fn get_test_connection() -> Connection {
        let connection = Connection::open_in_memory().unwrap();
        initialize(&connection).unwrap();
        connection
    }

    fn insert_budget(connection: &mut Connection, category: &str, amount: f64) {
        create_budget(
            NewBudget {
                user_id: "u1".to_string(),
                category: category.to_string(),
                amount,
                period: Period::Monthly,
            },
            OffsetDateTime::now_utc(),
            connection,
        )
        .unwrap();
    }

    fn insert_expense_at(
        connection: &mut Connection,
        category: &str,
        amount: f64,
        at: OffsetDateTime,
    ) {
        create_transaction(
            NewTransaction {
                user_id: "u1".to_string(),
                title: "expense".to_string(),
                amount,
                category: category.to_string(),
            },
            at,
            connection,
        )
        .unwrap();
    }

    #[test]
    fn budgets_without_spend_still_appear() {
        let mut connection = get_test_connection();
        insert_budget(&mut connection, "food", 200.0);

        let progress =
            get_budget_progress("u1", Period::Monthly, OffsetDateTime::now_utc(), &connection)
                .unwrap();

        assert_eq!(progress.len(), 1);
        assert_eq!(progress[0].spent_amount, 0.0);
        assert_eq!(progress[0].percentage, 0.0);
    }

    #[test]
    fn spend_outside_the_window_is_excluded() {
        let mut connection = get_test_connection();
        let now = OffsetDateTime::now_utc();
        insert_budget(&mut connection, "food", 100.0);
        insert_expense_at(&mut connection, "food", -40.0, now - Duration::days(2));
        insert_expense_at(&mut connection, "food", -60.0, now - Duration::days(30));

        let progress = get_budget_progress("u1", Period::Weekly, now, &connection).unwrap();

        assert_eq!(progress[0].spent_amount, 40.0);
        assert_eq!(progress[0].percentage, 40.0);
    }

    #[test]
    fn results_are_ordered_by_descending_percentage() {
        let mut connection = get_test_connection();
        let now = OffsetDateTime::now_utc();
        insert_budget(&mut connection, "food", 100.0);
        insert_budget(&mut connection, "rent", 1000.0);
        insert_budget(&mut connection, "fun", 100.0);
        insert_expense_at(&mut connection, "food", -90.0, now - Duration::days(1));
        insert_expense_at(&mut connection, "rent", -500.0, now - Duration::days(1));

        let progress = get_budget_progress("u1", Period::Monthly, now, &connection).unwrap();

        let categories: Vec<&str> = progress
            .iter()
            .map(|progress| progress.category.as_str())
            .collect();
        assert_eq!(categories, vec!["food", "rent", "fun"]);
        assert_eq!(progress[0].percentage, 90.0);
        assert_eq!(progress[1].percentage, 50.0);
    }

    #[test]
    fn zero_limit_budget_reports_zero_percentage() {
        let mut connection = get_test_connection();
        let now = OffsetDateTime::now_utc();
        // A zero limit cannot be created through validation; simulate legacy
        // data directly.
        connection
            .execute(
                "INSERT INTO budgets (user_id, category, amount, period, created_at, updated_at)
                 VALUES ('u1', 'legacy', 0, 'monthly', ?1, ?1)",
                [now],
            )
            .unwrap();
        insert_expense_at(&mut connection, "legacy", -10.0, now - Duration::days(1));

        let progress = get_budget_progress("u1", Period::Monthly, now, &connection).unwrap();

        assert_eq!(progress[0].percentage, 0.0);
        assert_eq!(progress[0].spent_amount, 10.0);
    }
}
