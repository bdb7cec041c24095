//! Linear savings forecast from trailing monthly history.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, Path, Query, State},
    response::{IntoResponse, Response},
};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use time::Date;

use crate::{
    AppState, Error,
    dates::{day_start, months_back, start_of_month, start_of_next_month},
    money::round2,
};

const DEFAULT_MONTHS_BACK: u32 = 6;
const DEFAULT_MONTHS_FORECAST: u32 = 3;

/// How much weight to put on a projected month.
///
/// Confidence never increases with forecast distance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    /// Projections more than two months out, or from thin history.
    Low,
    /// The second projected month.
    Medium,
    /// The first projected month, given enough history.
    High,
}

/// One projected month.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForecastMonth {
    /// 1-based distance from the current month.
    pub forecast_month: u32,
    /// The first day of the projected month.
    pub forecast_date: Date,
    /// Projected income for the month.
    pub projected_income: f64,
    /// Projected expenses for the month.
    pub projected_expense: f64,
    /// Projected income minus expenses.
    pub projected_savings: f64,
    /// Projected balance at the end of the month.
    pub projected_balance: f64,
    /// How much weight to put on this projection.
    pub confidence_level: Confidence,
}

/// Average monthly flows observed over the trailing history window.
struct History {
    avg_income: f64,
    avg_expense: f64,
    months_with_data: u32,
}

/// Query the trailing `months_back` full calendar months of history.
///
/// Averages are taken over the window length, so sparse history reads as low
/// monthly flow rather than being extrapolated from its few active months.
fn get_history(
    user_id: &str,
    months_back_count: u32,
    today: Date,
    connection: &Connection,
) -> Result<(History, f64), Error> {
    let window_start = day_start(start_of_month(months_back(today, months_back_count)));
    let window_end = day_start(start_of_month(today));

    let (total_income, total_expense, months_with_data) = connection
        .prepare(
            "SELECT COALESCE(SUM(CASE WHEN amount > 0 THEN amount ELSE 0 END), 0),
                    COALESCE(SUM(CASE WHEN amount < 0 THEN ABS(amount) ELSE 0 END), 0),
                    COUNT(DISTINCT substr(created_at, 1, 7))
             FROM transactions
             WHERE user_id = ?1 AND created_at >= ?2 AND created_at < ?3",
        )?
        .query_row(rusqlite::params![user_id, window_start, window_end], |row| {
            Ok((
                row.get::<_, f64>(0)?,
                row.get::<_, f64>(1)?,
                row.get::<_, i64>(2)?,
            ))
        })?;

    let balance: f64 = connection.query_row(
        "SELECT COALESCE(SUM(amount), 0) FROM transactions WHERE user_id = ?1",
        [user_id],
        |row| row.get(0),
    )?;

    let window_months = months_back_count.max(1) as f64;

    Ok((
        History {
            avg_income: total_income / window_months,
            avg_expense: total_expense / window_months,
            months_with_data: months_with_data as u32,
        },
        balance,
    ))
}

fn confidence(distance: u32, months_with_data: u32) -> Confidence {
    let base = match distance {
        1 => Confidence::High,
        2 => Confidence::Medium,
        _ => Confidence::Low,
    };

    if months_with_data >= 3 {
        base
    } else {
        // Thin history caps every projection one step lower.
        match base {
            Confidence::High => Confidence::Medium,
            _ => Confidence::Low,
        }
    }
}

/// Project the history forward `months_forecast` months from `today`.
fn project(
    history: &History,
    balance: f64,
    today: Date,
    months_forecast: u32,
) -> Vec<ForecastMonth> {
    let monthly_savings = history.avg_income - history.avg_expense;

    (1..=months_forecast)
        .map(|distance| {
            ForecastMonth {
                forecast_month: distance,
                forecast_date: forecast_month_start(today, distance),
                projected_income: round2(history.avg_income),
                projected_expense: round2(history.avg_expense),
                projected_savings: round2(monthly_savings),
                projected_balance: round2(balance + monthly_savings * distance as f64),
                confidence_level: confidence(distance, history.months_with_data),
            }
        })
        .collect()
}

/// The first day of the month `distance` months after `today`'s month.
fn forecast_month_start(today: Date, distance: u32) -> Date {
    let mut date = start_of_next_month(today);
    for _ in 1..distance {
        date = start_of_next_month(date);
    }
    date
}

/// Compute the savings forecast for one owner.
pub fn get_savings_forecast(
    user_id: &str,
    months_back_count: u32,
    months_forecast: u32,
    today: Date,
    connection: &Connection,
) -> Result<Vec<ForecastMonth>, Error> {
    let (history, balance) = get_history(user_id, months_back_count, today, connection)?;

    Ok(project(&history, balance, today, months_forecast))
}

/// Query parameters for the savings forecast endpoint.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForecastParams {
    /// Months of history to average over, defaults to 6.
    pub months_back: Option<u32>,
    /// Months to project forward, defaults to 3.
    pub months_forecast: Option<u32>,
}

/// The state needed for the savings forecast.
#[derive(Debug, Clone)]
pub struct ForecastState {
    /// The database connection for reading transactions.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for ForecastState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// A route handler for the linear savings forecast.
pub async fn savings_forecast_endpoint(
    State(state): State<ForecastState>,
    Path(user_id): Path<String>,
    Query(params): Query<ForecastParams>,
) -> Response {
    let months_back_count = params.months_back.unwrap_or(DEFAULT_MONTHS_BACK).max(1);
    let months_forecast = params
        .months_forecast
        .unwrap_or(DEFAULT_MONTHS_FORECAST)
        .max(1);

    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLock.into_response();
        }
    };

    let today = time::OffsetDateTime::now_utc().date();

    match get_savings_forecast(
        &user_id,
        months_back_count,
        months_forecast,
        today,
        &connection,
    ) {
        Ok(forecast) => Json(forecast).into_response(),
        Err(error) => error.into_response(),
    }
}

#[cfg(test)]
mod tests {
    use rusqlite::Connection;
    use time::macros::date;

    use crate::{
        dates::day_start,
        db::initialize,
        transaction::{NewTransaction, create_transaction},
    };

    use super::{Confidence, confidence, forecast_month_start, get_savings_forecast};

    fn get_test_connection() -> Connection {
        let connection = Connection::open_in_memory().unwrap();
        initialize(&connection).unwrap();
        connection
    }

    fn insert_on(connection: &mut Connection, day: time::Date, amount: f64) {
        create_transaction(
            NewTransaction {
                user_id: "u1".to_string(),
                title: "t".to_string(),
                amount,
                category: "misc".to_string(),
            },
            day_start(day),
            connection,
        )
        .unwrap();
    }

    #[test]
    fn confidence_is_monotonically_non_increasing() {
        for months_with_data in [0, 1, 3, 12] {
            let levels: Vec<Confidence> = (1..=6)
                .map(|distance| confidence(distance, months_with_data))
                .collect();

            for pair in levels.windows(2) {
                assert!(
                    pair[1] <= pair[0],
                    "confidence increased with distance: {levels:?}"
                );
            }
        }
    }

    #[test]
    fn thin_history_degrades_confidence() {
        assert_eq!(confidence(1, 6), Confidence::High);
        assert_eq!(confidence(1, 2), Confidence::Medium);
        assert_eq!(confidence(3, 2), Confidence::Low);
    }

    #[test]
    fn forecast_months_start_after_the_current_month() {
        let today = date!(2025 - 07 - 15);

        assert_eq!(forecast_month_start(today, 1), date!(2025 - 08 - 01));
        assert_eq!(forecast_month_start(today, 2), date!(2025 - 09 - 01));
        assert_eq!(forecast_month_start(today, 6), date!(2026 - 01 - 01));
    }

    #[test]
    fn forecast_projects_average_flows_linearly() {
        let mut connection = get_test_connection();
        let today = date!(2025 - 07 - 15);
        // Two months of history: income 1000, expenses 400 each month.
        for month_start in [date!(2025 - 05 - 01), date!(2025 - 06 - 01)] {
            insert_on(&mut connection, month_start, 1000.0);
            insert_on(&mut connection, month_start, -400.0);
        }

        let forecast = get_savings_forecast("u1", 2, 3, today, &connection).unwrap();

        assert_eq!(forecast.len(), 3);
        assert_eq!(forecast[0].projected_income, 1000.0);
        assert_eq!(forecast[0].projected_expense, 400.0);
        assert_eq!(forecast[0].projected_savings, 600.0);
        // Current balance is 1200; each month adds 600.
        assert_eq!(forecast[0].projected_balance, 1800.0);
        assert_eq!(forecast[2].projected_balance, 3000.0);
        assert_eq!(forecast[0].forecast_date, date!(2025 - 08 - 01));
    }

    #[test]
    fn forecast_with_no_history_is_flat_zeroes() {
        let connection = get_test_connection();

        let forecast =
            get_savings_forecast("u1", 6, 2, date!(2025 - 07 - 15), &connection).unwrap();

        assert_eq!(forecast.len(), 2);
        assert_eq!(forecast[0].projected_income, 0.0);
        assert_eq!(forecast[0].projected_balance, 0.0);
        assert_eq!(forecast[0].confidence_level, Confidence::Medium);
        assert_eq!(forecast[1].confidence_level, Confidence::Low);
    }
}
