//! Per-goal savings progress.

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
    goal::{GoalId, SavingsGoal, get_goals},
    money::round2,
};

/// How a goal is tracking against its target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GoalStatus {
    /// The saved balance has reached the target.
    Completed,
    /// The target date has passed and the goal is incomplete.
    Overdue,
    /// Everything else.
    OnTrack,
}

/// Progress towards one savings goal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoalProgress {
    /// The ID of the goal.
    pub id: GoalId,
    /// What the user is saving for.
    pub title: String,
    /// The amount to save in total.
    pub target_amount: f64,
    /// The amount saved so far.
    pub current_amount: f64,
    /// How much is left to save, floored at zero.
    pub remaining_amount: f64,
    /// Saved share of the target, in percent.
    pub progress_percentage: f64,
    /// The target day, if any.
    pub target_date: Option<Date>,
    /// Whole days until the target day; negative once it has passed, null
    /// without a target day.
    pub days_remaining: Option<i64>,
    /// How the goal is tracking.
    pub status: GoalStatus,
    /// Dollars per day needed to hit the target on time, when both the
    /// remainder and the days remaining are positive.
    pub daily_savings_needed: Option<f64>,
}

/// Derive the progress numbers for one goal as of `today`.
fn compute_progress(goal: &SavingsGoal, today: Date) -> GoalProgress {
    let remaining = round2((goal.target_amount - goal.current_amount).max(0.0));
    let progress = if goal.target_amount > 0.0 {
        round2(goal.current_amount / goal.target_amount * 100.0)
    } else {
        0.0
    };

    let days_remaining = goal
        .target_date
        .map(|target_date| (target_date - today).whole_days());

    let status = if goal.current_amount >= goal.target_amount {
        GoalStatus::Completed
    } else if days_remaining.is_some_and(|days| days < 0) {
        GoalStatus::Overdue
    } else {
        GoalStatus::OnTrack
    };

    let daily_savings_needed = match days_remaining {
        Some(days) if days > 0 && remaining > 0.0 => Some(round2(remaining / days as f64)),
        _ => None,
    };

    GoalProgress {
        id: goal.id,
        title: goal.title.clone(),
        target_amount: goal.target_amount,
        current_amount: goal.current_amount,
        remaining_amount: remaining,
        progress_percentage: progress,
        target_date: goal.target_date,
        days_remaining,
        status,
        daily_savings_needed,
    }
}

/// Compute progress for all of one owner's goals as of `today`.
pub fn get_savings_progress(
    user_id: &str,
    today: Date,
    connection: &Connection,
) -> Result<Vec<GoalProgress>, Error> {
    let goals = get_goals(user_id, connection)?;

    Ok(goals
        .iter()
        .map(|goal| compute_progress(goal, today))
        .collect())
}

/// The state needed for the savings progress report.
#[derive(Debug, Clone)]
pub struct SavingsProgressState {
    /// The database connection for reading savings goals.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for SavingsProgressState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// A route handler for per-goal savings progress.
pub async fn savings_progress_endpoint(
    State(state): State<SavingsProgressState>,
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

    match get_savings_progress(&user_id, today, &connection) {
        Ok(progress) => Json(progress).into_response(),
        Err(error) => error.into_response(),
    }
}
