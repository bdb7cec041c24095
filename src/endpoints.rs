//! The API endpoint URIs.
//!
//! Listing is `GET /api/<entity>/{user_id}` while update and delete reuse the
//! same path with the parameter read as the row id. The router accepts one
//! pattern per path, so those routes share a constant and the handlers give
//! the parameter its meaning.

/// The route to create a transaction.
pub const TRANSACTIONS: &str = "/api/transactions";
/// The route to list a user's transactions (GET); DELETE on the same path
/// deletes, with the parameter read as the transaction id.
pub const TRANSACTIONS_BY_USER: &str = "/api/transactions/{user_id}";
/// The route for a user's balance summary.
pub const TRANSACTION_SUMMARY: &str = "/api/transactions/summary/{user_id}";

/// The route to create a budget.
pub const BUDGETS: &str = "/api/budgets";
/// The route to list a user's budgets (GET); PUT and DELETE on the same path
/// update and delete, with the parameter read as the budget id.
pub const BUDGETS_BY_USER: &str = "/api/budgets/{user_id}";
/// The route for a user's budget totals and per-category spending.
pub const BUDGET_SUMMARY: &str = "/api/budgets/summary/{user_id}";
/// The route for per-budget utilization over a period window.
pub const BUDGET_PROGRESS: &str = "/api/budgets/progress/{user_id}";
/// The route to fetch one budget by id.
pub const BUDGET_DETAILS: &str = "/api/budgets/details/{id}";

/// The route to create a savings goal.
pub const GOALS: &str = "/api/savings-goals";
/// The route to list a user's savings goals (GET); PUT and DELETE on the
/// same path update and delete, with the parameter read as the goal id.
pub const GOALS_BY_USER: &str = "/api/savings-goals/{user_id}";
/// The route for a user's savings totals.
pub const GOAL_SUMMARY: &str = "/api/savings-goals/summary/{user_id}";
/// The route to fetch one savings goal by id.
pub const GOAL_DETAILS: &str = "/api/savings-goals/details/{id}";
/// The route to add money to a savings goal; the path parameter is the goal
/// id (named to line up with the sibling list route).
pub const GOAL_ADD_MONEY: &str = "/api/savings-goals/{user_id}/add-money";

/// The route for the cross-entity report summary.
pub const REPORT_SUMMARY: &str = "/api/reports/summary/{user_id}";
/// The route for per-category totals within one calendar month.
pub const REPORT_MONTHLY_EXPENDITURE: &str = "/api/reports/monthly-expenditure/{user_id}";
/// The route for per-budget adherence over each budget's own period.
pub const REPORT_BUDGET_ADHERENCE: &str = "/api/reports/budget-adherence/{user_id}";
/// The route for per-goal savings progress.
pub const REPORT_SAVINGS_PROGRESS: &str = "/api/reports/savings-progress/{user_id}";
/// The route for the category expense distribution.
pub const REPORT_CATEGORY_DISTRIBUTION: &str = "/api/reports/category-distribution/{user_id}";
/// The route for the linear savings forecast.
pub const REPORT_SAVINGS_FORECAST: &str = "/api/reports/savings-forecast/{user_id}";

/// The route for batch sync uploads from offline clients.
pub const SYNC_UPLOAD: &str = "/api/sync/upload";
