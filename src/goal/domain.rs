//! Core savings goal domain types.

use serde::{Deserialize, Serialize};
use time::{Date, OffsetDateTime};

use crate::{
    Error,
    dates::parse_date,
    money::{parse_optional_amount, parse_required_amount},
    validate::{non_empty, optional_trimmed},
};

/// Database identifier for a savings goal.
pub type GoalId = i64;

/// A savings target with a running saved balance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavingsGoal {
    /// The ID of the goal.
    pub id: GoalId,
    /// The owner of the goal.
    pub user_id: String,
    /// What the user is saving for.
    pub title: String,
    /// The amount to save in total.
    pub target_amount: f64,
    /// The amount saved so far. Never negative.
    pub current_amount: f64,
    /// The client-side display icon name.
    pub icon: String,
    /// The day the user wants to reach the target, if any.
    pub target_date: Option<Date>,
    /// When the goal was created.
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    /// When the goal was last modified.
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

/// The request body for creating a savings goal.
#[derive(Debug, Deserialize)]
pub struct CreateGoalRequest {
    /// The owner of the new goal.
    pub user_id: Option<String>,
    /// What the user is saving for.
    pub title: Option<String>,
    /// The amount to save in total.
    pub target_amount: Option<f64>,
    /// An opening saved balance, defaults to 0.
    pub current_amount: Option<f64>,
    /// The display icon, defaults to `"target"`.
    pub icon: Option<String>,
    /// The target day in `YYYY-MM-DD` format.
    pub target_date: Option<String>,
}

impl CreateGoalRequest {
    /// Check field presence and shape, normalize amounts, and parse the
    /// target date.
    pub fn validate(self) -> Result<NewGoal, Error> {
        let title = non_empty(self.title, "title")?;
        let user_id = non_empty(self.user_id, "user_id")?;

        let target_amount = parse_required_amount(self.target_amount, "target_amount")?;
        if target_amount <= 0.0 {
            return Err(Error::NonPositiveAmount("target_amount"));
        }

        let current_amount =
            parse_optional_amount(self.current_amount, "current_amount")?.unwrap_or(0.0);
        if current_amount < 0.0 {
            return Err(Error::NegativeAmount("current_amount"));
        }

        let target_date = match optional_trimmed(self.target_date) {
            Some(text) => Some(parse_date(&text)?),
            None => None,
        };

        Ok(NewGoal {
            user_id,
            title,
            target_amount,
            current_amount,
            icon: optional_trimmed(self.icon).unwrap_or_else(|| "target".to_string()),
            target_date,
        })
    }
}

/// A validated savings goal ready to be inserted.
#[derive(Debug, Clone, PartialEq)]
pub struct NewGoal {
    /// The owner of the new goal.
    pub user_id: String,
    /// What the user is saving for.
    pub title: String,
    /// The normalized target amount.
    pub target_amount: f64,
    /// The normalized opening balance.
    pub current_amount: f64,
    /// The display icon.
    pub icon: String,
    /// The target day, if any.
    pub target_date: Option<Date>,
}

/// The request body for partially updating a savings goal.
#[derive(Debug, Deserialize)]
pub struct UpdateGoalRequest {
    /// The owner the goal must belong to.
    pub user_id: Option<String>,
    /// A new title, or absent to keep the stored one.
    pub title: Option<String>,
    /// A new target, or absent to keep the stored one.
    pub target_amount: Option<f64>,
    /// A new saved balance, or absent to keep the stored one.
    pub current_amount: Option<f64>,
    /// A new icon, or absent to keep the stored one.
    pub icon: Option<String>,
    /// A new target day. Unlike the other fields, an absent value clears the
    /// stored date.
    pub target_date: Option<String>,
}

impl UpdateGoalRequest {
    /// Check the supplied fields.
    pub fn validate(self) -> Result<GoalChanges, Error> {
        let user_id = non_empty(self.user_id, "user_id")?;

        let target_amount = parse_optional_amount(self.target_amount, "target_amount")?;
        if let Some(target_amount) = target_amount
            && target_amount <= 0.0
        {
            return Err(Error::NonPositiveAmount("target_amount"));
        }

        let current_amount = parse_optional_amount(self.current_amount, "current_amount")?;
        if let Some(current_amount) = current_amount
            && current_amount < 0.0
        {
            return Err(Error::NegativeAmount("current_amount"));
        }

        let target_date = match optional_trimmed(self.target_date) {
            Some(text) => Some(parse_date(&text)?),
            None => None,
        };

        Ok(GoalChanges {
            user_id,
            title: optional_trimmed(self.title),
            target_amount,
            current_amount,
            icon: optional_trimmed(self.icon),
            target_date,
        })
    }
}

/// A validated partial update.
///
/// `None` retains the stored value for every field except `target_date`,
/// which is written unconditionally.
#[derive(Debug, Clone, PartialEq)]
pub struct GoalChanges {
    /// The owner the goal must belong to.
    pub user_id: String,
    /// The new title, if any.
    pub title: Option<String>,
    /// The new target amount, if any.
    pub target_amount: Option<f64>,
    /// The new saved balance, if any.
    pub current_amount: Option<f64>,
    /// The new icon, if any.
    pub icon: Option<String>,
    /// The new target day. `None` clears the stored date.
    pub target_date: Option<Date>,
}

/// The request body for adding money to a goal.
#[derive(Debug, Deserialize)]
pub struct AddMoneyRequest {
    /// The owner the goal must belong to.
    pub user_id: Option<String>,
    /// The amount to add. May be negative to withdraw, but must not overdraw
    /// the saved balance.
    pub amount: Option<f64>,
}

impl AddMoneyRequest {
    /// Check field presence and shape. A zero amount is rejected.
    pub fn validate(self) -> Result<(String, f64), Error> {
        let amount = parse_required_amount(self.amount, "amount")?;
        if amount == 0.0 {
            return Err(Error::InvalidAmount("amount"));
        }

        let user_id = non_empty(self.user_id, "user_id")?;

        Ok((user_id, amount))
    }
}
