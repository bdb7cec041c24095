//! Cross-entity report summary.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, Path, State},
    response::{IntoResponse, Response},
};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use time::Date;

use crate::{
    AppState, Error,
    dates::{day_start, start_of_month, start_of_next_month},
    money::round2,
};

/// Current-month transaction totals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlySummary {
    /// Total spend this calendar month.
    pub total_expense: f64,
    /// Total income this calendar month.
    pub total_income: f64,
    /// How many expense transactions this calendar month.
    pub expense_transactions: i64,
}

/// Budget counts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetCounts {
    /// How many budgets the user has.
    pub total_budgets: i64,
    /// How many budgets whose all-time spend exceeds their limit.
    pub over_budget_count: i64,
}

/// Savings goal counts and totals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavingsCounts {
    /// How many goals the user has.
    pub total_goals: i64,
    /// How many goals have reached their target.
    pub completed_goals: i64,
    /// Sum of saved balances.
    pub total_saved: f64,
    /// Sum of target amounts.
    pub total_target: f64,
}

/// The combined report summary across all three entities.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportSummary {
    /// Current-month transaction totals.
    pub monthly: MonthlySummary,
    /// Budget counts.
    pub budgets: BudgetCounts,
    /// Savings goal counts and totals.
    pub savings: SavingsCounts,
}

/// Compute the cross-entity summary for one owner, with the monthly section
/// bounded to the calendar month containing `today`.
pub fn get_report_summary(
    user_id: &str,
    today: Date,
    connection: &Connection,
) -> Result<ReportSummary, Error> {
    let month_start = day_start(start_of_month(today));
    let month_end = day_start(start_of_next_month(today));

    let monthly = connection
        .prepare(
            "SELECT COALESCE(SUM(CASE WHEN amount < 0 THEN ABS(amount) ELSE 0 END), 0),
                    COALESCE(SUM(CASE WHEN amount > 0 THEN amount ELSE 0 END), 0),
                    COUNT(CASE WHEN amount < 0 THEN 1 END)
             FROM transactions
             WHERE user_id = ?1 AND created_at >= ?2 AND created_at < ?3",
        )?
        .query_row(
            rusqlite::params![user_id, month_start, month_end],
            |row| {
                Ok(MonthlySummary {
                    total_expense: round2(row.get(0)?),
                    total_income: round2(row.get(1)?),
                    expense_transactions: row.get(2)?,
                })
            },
        )?;

    let budgets = connection
        .prepare(
            "SELECT COUNT(*),
                    COUNT(CASE WHEN (SELECT COALESCE(SUM(ABS(t.amount)), 0)
                                     FROM transactions t
                                     WHERE t.category = b.category
                                       AND t.user_id = b.user_id
                                       AND t.amount < 0) > b.amount
                          THEN 1 END)
             FROM budgets b
             WHERE b.user_id = ?1",
        )?
        .query_row([user_id], |row| {
            Ok(BudgetCounts {
                total_budgets: row.get(0)?,
                over_budget_count: row.get(1)?,
            })
        })?;

    let savings = connection
        .prepare(
            "SELECT COUNT(*),
                    COUNT(CASE WHEN current_amount >= target_amount THEN 1 END),
                    COALESCE(SUM(current_amount), 0),
                    COALESCE(SUM(target_amount), 0)
             FROM savings_goals
             WHERE user_id = ?1",
        )?
        .query_row([user_id], |row| {
            Ok(SavingsCounts {
                total_goals: row.get(0)?,
                completed_goals: row.get(1)?,
                total_saved: round2(row.get(2)?),
                total_target: round2(row.get(3)?),
            })
        })?;

    Ok(ReportSummary {
        monthly,
        budgets,
        savings,
    })
}

/// The state needed for the report summary.
#[derive(Debug, Clone)]
pub struct ReportSummaryState {
    /// The database connection for reading all entities.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for ReportSummaryState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// A route handler for the cross-entity report summary.
pub async fn report_summary_endpoint(
    State(state): State<ReportSummaryState>,
    Path(user_id): Path<String>,
) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLock.into_response();
        }
    };

    let today = time::OffsetDateTime::now_utc().date();

    match get_report_summary(&user_id, today, &connection) {
        Ok(summary) => Json(summary).into_response(),
        Err(error) => error.into_response(),
    }
}

#[cfg(test)]
mod tests {
    use rusqlite::Connection;
    use time::{Duration, OffsetDateTime};

    use crate::{
        budget::{NewBudget, Period, create_budget},
        dates::months_back,
        db::initialize,
        goal::{NewGoal, create_goal},
        transaction::{NewTransaction, create_transaction},
    };

    use super::get_report_summary;

    fn get_test_connection() -> Connection {
        let connection = Connection::open_in_memory().unwrap();
        initialize(&connection).unwrap();
        connection
    }

    #[test]
    fn summary_with_no_data_is_all_zeroes() {
        let connection = get_test_connection();

        let summary =
            get_report_summary("u1", OffsetDateTime::now_utc().date(), &connection).unwrap();

        assert_eq!(summary.monthly.total_expense, 0.0);
        assert_eq!(summary.budgets.total_budgets, 0);
        assert_eq!(summary.savings.total_goals, 0);
    }

    #[test]
    fn summary_combines_all_three_entities() {
        let mut connection = get_test_connection();
        let now = OffsetDateTime::now_utc();
        let today = now.date();

        // Current-month transactions plus one several months old.
        for (amount, at) in [
            (-100.0, now),
            (-50.0, now - Duration::hours(1)),
            (2000.0, now),
        ] {
            create_transaction(
                NewTransaction {
                    user_id: "u1".to_string(),
                    title: "t".to_string(),
                    amount,
                    category: "food".to_string(),
                },
                at,
                &mut connection,
            )
            .unwrap();
        }
        create_transaction(
            NewTransaction {
                user_id: "u1".to_string(),
                title: "old".to_string(),
                amount: -75.0,
                category: "food".to_string(),
            },
            crate::dates::day_start(months_back(today, 3)),
            &mut connection,
        )
        .unwrap();

        // One budget of 200 against 225 of all-time food spend: over budget.
        create_budget(
            NewBudget {
                user_id: "u1".to_string(),
                category: "food".to_string(),
                amount: 200.0,
                period: Period::Monthly,
            },
            now,
            &mut connection,
        )
        .unwrap();

        for (target, current) in [(1000.0, 1000.0), (500.0, 10.0)] {
            create_goal(
                NewGoal {
                    user_id: "u1".to_string(),
                    title: "g".to_string(),
                    target_amount: target,
                    current_amount: current,
                    icon: "target".to_string(),
                    target_date: None,
                },
                now,
                &mut connection,
            )
            .unwrap();
        }

        let summary = get_report_summary("u1", today, &connection).unwrap();

        // The current month may or may not contain the hour-old transaction's
        // month boundary; both current-month rows were inserted "now".
        assert!(summary.monthly.total_expense >= 100.0);
        assert_eq!(summary.monthly.total_income, 2000.0);
        assert_eq!(summary.budgets.total_budgets, 1);
        assert_eq!(summary.budgets.over_budget_count, 1);
        assert_eq!(summary.savings.total_goals, 2);
        assert_eq!(summary.savings.completed_goals, 1);
        assert_eq!(summary.savings.total_saved, 1010.0);
        assert_eq!(summary.savings.total_target, 1500.0);
    }
}
