//! Applies a sync batch record by record.

use rusqlite::{Connection, TransactionBehavior, params};
use time::OffsetDateTime;

use crate::{
    Error,
    budget::CreateBudgetRequest,
    dates::parse_datetime,
    goal::CreateGoalRequest,
    sync::{SyncBudget, SyncGoal, SyncTransaction},
    transaction::CreateTransactionRequest,
};

/// The outcome of a sync batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SyncReport {
    /// How many records were inserted.
    pub records_synced: usize,
    /// How many records failed and were skipped.
    pub conflicts_resolved: usize,
}

/// Apply every record in the batch as an independent insert under `user_id`.
///
/// Each record is validated and inserted on its own; a bad record is counted
/// and skipped without touching the records after it. The whole batch runs in
/// one SQL transaction committed at the end — a failed statement only aborts
/// itself, so the per-record isolation holds — and only a failure to begin or
/// commit that transaction is fatal to the call.
pub fn apply_sync(
    user_id: &str,
    transactions: Vec<SyncTransaction>,
    budgets: Vec<SyncBudget>,
    goals: Vec<SyncGoal>,
    now: OffsetDateTime,
    connection: &mut Connection,
) -> Result<SyncReport, Error> {
    let sql_transaction = connection.transaction_with_behavior(TransactionBehavior::Immediate)?;

    let mut results: Vec<Result<(), Error>> = Vec::new();

    results.extend(
        transactions
            .into_iter()
            .map(|record| apply_transaction(user_id, record, now, &sql_transaction)),
    );
    results.extend(
        budgets
            .into_iter()
            .map(|record| apply_budget(user_id, record, now, &sql_transaction)),
    );
    results.extend(
        goals
            .into_iter()
            .map(|record| apply_goal(user_id, record, now, &sql_transaction)),
    );

    sql_transaction.commit()?;

    let records_synced = results.iter().filter(|result| result.is_ok()).count();

    for error in results.iter().filter_map(|result| result.as_ref().err()) {
        tracing::warn!("skipped sync record: {error}");
    }

    Ok(SyncReport {
        records_synced,
        conflicts_resolved: results.len() - records_synced,
    })
}

fn created_at_or(now: OffsetDateTime, text: Option<String>) -> Result<OffsetDateTime, Error> {
    match text {
        Some(text) => parse_datetime(&text),
        None => Ok(now),
    }
}

fn apply_transaction(
    user_id: &str,
    record: SyncTransaction,
    now: OffsetDateTime,
    connection: &Connection,
) -> Result<(), Error> {
    let created_at = created_at_or(now, record.created_at)?;
    let new_transaction = CreateTransactionRequest {
        user_id: Some(user_id.to_string()),
        title: record.title,
        amount: record.amount,
        category: record.category,
    }
    .validate()?;

    connection.execute(
        "INSERT INTO transactions (user_id, title, amount, category, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            new_transaction.user_id,
            new_transaction.title,
            new_transaction.amount,
            new_transaction.category,
            created_at,
        ],
    )?;

    Ok(())
}

fn apply_budget(
    user_id: &str,
    record: SyncBudget,
    now: OffsetDateTime,
    connection: &Connection,
) -> Result<(), Error> {
    let created_at = created_at_or(now, record.created_at)?;
    let new_budget = CreateBudgetRequest {
        user_id: Some(user_id.to_string()),
        category: record.category,
        amount: record.amount,
        period: record.period,
    }
    .validate()?;

    // A blind insert: an existing (owner, category) budget surfaces as a
    // UNIQUE violation and is counted by the caller.
    connection.execute(
        "INSERT INTO budgets (user_id, category, amount, period, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?5)",
        params![
            new_budget.user_id,
            new_budget.category,
            new_budget.amount,
            new_budget.period.as_str(),
            created_at,
        ],
    )?;

    Ok(())
}

fn apply_goal(
    user_id: &str,
    record: SyncGoal,
    now: OffsetDateTime,
    connection: &Connection,
) -> Result<(), Error> {
    let created_at = created_at_or(now, record.created_at)?;
    let new_goal = CreateGoalRequest {
        user_id: Some(user_id.to_string()),
        title: record.title,
        target_amount: record.target_amount,
        current_amount: record.current_amount,
        icon: record.icon,
        target_date: record.target_date,
    }
    .validate()?;

    connection.execute(
        "INSERT INTO savings_goals
            (user_id, title, target_amount, current_amount, icon, target_date,
             created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?7)",
        params![
            new_goal.user_id,
            new_goal.title,
            new_goal.target_amount,
            new_goal.current_amount,
            new_goal.icon,
            new_goal.target_date,
            created_at,
        ],
    )?;

    Ok(())
}
