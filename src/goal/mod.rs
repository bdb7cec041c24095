//! Savings goal management: targets, saved balances, and deposits.

mod add_money;
mod create;
mod db;
mod delete;
mod details;
mod domain;
mod edit;
mod list;
mod summary;

pub use add_money::add_money_endpoint;
pub use create::create_goal_endpoint;
pub use db::{
    add_money, create_goal, create_savings_goal_table, delete_goal, get_goal, get_goals,
    update_goal,
};
pub use delete::delete_goal_endpoint;
pub use details::goal_details_endpoint;
pub use domain::{
    AddMoneyRequest, CreateGoalRequest, GoalChanges, GoalId, NewGoal, SavingsGoal,
    UpdateGoalRequest,
};
pub use edit::update_goal_endpoint;
pub use list::list_goals_endpoint;
pub use summary::{SavingsSummary, savings_summary_endpoint};
