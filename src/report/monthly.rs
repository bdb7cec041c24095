//! Per-category expenditure analysis for one calendar month.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, Path, Query, State},
    response::{IntoResponse, Response},
};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use time::{Date, Month};

use crate::{
    AppState, Error,
    dates::{day_start, start_of_next_month},
    money::round2,
};

/// One category's totals within the requested month.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyExpenditure {
    /// The analyzed month as `YYYY-MM`.
    pub month: String,
    /// The spending category.
    pub category: String,
    /// Total spend in the category.
    pub total_expense: f64,
    /// Total income recorded against the category.
    pub total_income: f64,
    /// How many expense transactions the category had.
    pub expense_count: i64,
    /// Mean expense amount, zero when there were none.
    pub avg_expense: f64,
}

/// Compute the per-category analysis for one owner and month.
pub fn get_monthly_expenditure(
    user_id: &str,
    year: i32,
    month: Month,
    connection: &Connection,
) -> Result<Vec<MonthlyExpenditure>, Error> {
    let month_start = Date::from_calendar_date(year, month, 1)
        .map_err(|_| Error::InvalidDate(format!("{year}-{:02}", u8::from(month))))?;
    let month_label = format!("{year}-{:02}", u8::from(month));

    connection
        .prepare(
            "SELECT category,
                    COALESCE(SUM(CASE WHEN amount < 0 THEN ABS(amount) ELSE 0 END), 0),
                    COALESCE(SUM(CASE WHEN amount > 0 THEN amount ELSE 0 END), 0),
                    COUNT(CASE WHEN amount < 0 THEN 1 END),
                    COALESCE(AVG(CASE WHEN amount < 0 THEN ABS(amount) END), 0)
             FROM transactions
             WHERE user_id = ?1 AND created_at >= ?2 AND created_at < ?3
             GROUP BY category
             ORDER BY 2 DESC",
        )?
        .query_map(
            rusqlite::params![
                user_id,
                day_start(month_start),
                day_start(start_of_next_month(month_start)),
            ],
            |row| {
                Ok(MonthlyExpenditure {
                    month: month_label.clone(),
                    category: row.get(0)?,
                    total_expense: round2(row.get(1)?),
                    total_income: round2(row.get(2)?),
                    expense_count: row.get(3)?,
                    avg_expense: round2(row.get(4)?),
                })
            },
        )?
        .map(|maybe_row| maybe_row.map_err(|error| error.into()))
        .collect()
}

/// Query parameters for the monthly expenditure endpoint.
#[derive(Debug, Deserialize)]
pub struct MonthlyParams {
    /// The calendar year, defaults to the current year.
    pub year: Option<i32>,
    /// The calendar month (1-12), defaults to the current month.
    pub month: Option<u8>,
}

/// The state needed for the monthly expenditure report.
#[derive(Debug, Clone)]
pub struct MonthlyExpenditureState {
    /// The database connection for reading transactions.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for MonthlyExpenditureState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// A route handler for the per-category monthly expenditure analysis.
pub async fn monthly_expenditure_endpoint(
    State(state): State<MonthlyExpenditureState>,
    Path(user_id): Path<String>,
    Query(params): Query<MonthlyParams>,
) -> Response {
    let today = time::OffsetDateTime::now_utc().date();
    let year = params.year.unwrap_or_else(|| today.year());

    let month = match params.month {
        None => today.month(),
        Some(number) => match Month::try_from(number) {
            Ok(month) => month,
            Err(_) => {
                return Error::InvalidDate(format!("{year}-{number:02}")).into_response();
            }
        },
    };

    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLock.into_response();
        }
    };

    match get_monthly_expenditure(&user_id, year, month, &connection) {
        Ok(analysis) => Json(analysis).into_response(),
        Err(error) => error.into_response(),
    }
}

#[cfg(test)]
mod tests {
    use rusqlite::Connection;
    use time::{Month, macros::date};

    use crate::{
        dates::day_start,
        db::initialize,
        transaction::{NewTransaction, create_transaction},
    };

    use super::get_monthly_expenditure;

    fn insert_on(connection: &mut Connection, day: time::Date, category: &str, amount: f64) {
        create_transaction(
            NewTransaction {
                user_id: "u1".to_string(),
                title: "t".to_string(),
                amount,
                category: category.to_string(),
            },
            day_start(day),
            connection,
        )
        .unwrap();
    }

    #[test]
    fn analysis_is_bounded_to_the_requested_month() {
        let mut connection = Connection::open_in_memory().unwrap();
        initialize(&connection).unwrap();
        insert_on(&mut connection, date!(2025 - 07 - 01), "food", -50.0);
        insert_on(&mut connection, date!(2025 - 07 - 31), "food", -25.0);
        insert_on(&mut connection, date!(2025 - 07 - 10), "food", 10.0);
        // Adjacent months are excluded.
        insert_on(&mut connection, date!(2025 - 06 - 30), "food", -99.0);
        insert_on(&mut connection, date!(2025 - 08 - 01), "food", -99.0);

        let analysis = get_monthly_expenditure("u1", 2025, Month::July, &connection).unwrap();

        assert_eq!(analysis.len(), 1);
        assert_eq!(analysis[0].month, "2025-07");
        assert_eq!(analysis[0].total_expense, 75.0);
        assert_eq!(analysis[0].total_income, 10.0);
        assert_eq!(analysis[0].expense_count, 2);
        assert_eq!(analysis[0].avg_expense, 37.5);
    }

    #[test]
    fn analysis_with_no_rows_is_empty() {
        let connection = Connection::open_in_memory().unwrap();
        initialize(&connection).unwrap();

        let analysis = get_monthly_expenditure("u1", 2025, Month::July, &connection).unwrap();

        assert_eq!(analysis, vec![]);
    }
}
