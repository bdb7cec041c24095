//! Read-only reports derived from transactions, budgets, and savings goals.
//!
//! Every report is a pure function of the stored data and the request
//! parameters; "now" is passed in by the handlers so the math is
//! deterministic under test. A user with no data gets zeroes and empty
//! lists, never an error.

mod adherence;
mod distribution;
mod forecast;
mod monthly;
mod savings_progress;
mod summary;

pub use adherence::{BudgetAdherence, budget_adherence_endpoint};
pub use distribution::{CategoryDistribution, category_distribution_endpoint};
pub use forecast::{ForecastMonth, savings_forecast_endpoint};
pub use monthly::{MonthlyExpenditure, monthly_expenditure_endpoint};
pub use savings_progress::{GoalProgress, savings_progress_endpoint};
pub use summary::{ReportSummary, report_summary_endpoint};
