//! Core budget domain types.

use std::fmt::Display;

use serde::{Deserialize, Serialize};
use time::{Date, Duration, OffsetDateTime};

use crate::{
    Error,
    dates::months_back,
    money::{parse_optional_amount, parse_required_amount},
    validate::{non_empty, optional_trimmed},
};

/// Database identifier for a budget.
pub type BudgetId = i64;

/// The evaluation window of a budget.
///
/// The period only bounds which transactions count towards the budget's
/// spend; it is not stored per transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Period {
    /// The trailing seven days.
    Weekly,
    /// The trailing calendar month.
    #[default]
    Monthly,
    /// The trailing twelve calendar months.
    Yearly,
}

impl Period {
    /// Parse a period name.
    ///
    /// # Errors
    /// Returns [Error::InvalidPeriod] for anything other than `weekly`,
    /// `monthly`, or `yearly`.
    pub fn parse(text: &str) -> Result<Self, Error> {
        match text {
            "weekly" => Ok(Period::Weekly),
            "monthly" => Ok(Period::Monthly),
            "yearly" => Ok(Period::Yearly),
            other => Err(Error::InvalidPeriod(other.to_string())),
        }
    }

    /// The period name as stored in the database.
    pub fn as_str(&self) -> &'static str {
        match self {
            Period::Weekly => "weekly",
            Period::Monthly => "monthly",
            Period::Yearly => "yearly",
        }
    }

    /// The first day of this period's window, counting back from `today`.
    pub fn window_start(&self, today: Date) -> Date {
        match self {
            Period::Weekly => today - Duration::days(7),
            Period::Monthly => months_back(today, 1),
            Period::Yearly => months_back(today, 12),
        }
    }
}

impl Display for Period {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A per-category spending limit.
///
/// At most one budget exists per (owner, category) pair. The budget's spend
/// is never stored; it is derived by joining against the owner's expense
/// transactions in the same category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Budget {
    /// The ID of the budget.
    pub id: BudgetId,
    /// The owner of the budget.
    pub user_id: String,
    /// The spending category the budget applies to.
    pub category: String,
    /// The spending limit in dollars.
    pub amount: f64,
    /// The evaluation window.
    pub period: Period,
    /// When the budget was created.
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    /// When the budget was last modified.
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

/// The request body for creating a budget.
#[derive(Debug, Deserialize)]
pub struct CreateBudgetRequest {
    /// The owner of the new budget.
    pub user_id: Option<String>,
    /// The spending category.
    pub category: Option<String>,
    /// The spending limit in dollars.
    pub amount: Option<f64>,
    /// The evaluation window, defaults to monthly.
    pub period: Option<String>,
}

impl CreateBudgetRequest {
    /// Check field presence and shape, and normalize the amount to two
    /// decimal places.
    pub fn validate(self) -> Result<NewBudget, Error> {
        let category = non_empty(self.category, "category")?;
        let user_id = non_empty(self.user_id, "user_id")?;
        let amount = parse_required_amount(self.amount, "amount")?;

        if amount <= 0.0 {
            return Err(Error::NonPositiveAmount("amount"));
        }

        let period = match optional_trimmed(self.period) {
            Some(text) => Period::parse(&text)?,
            None => Period::default(),
        };

        Ok(NewBudget {
            user_id,
            category,
            amount,
            period,
        })
    }
}

/// A validated budget ready to be inserted.
#[derive(Debug, Clone, PartialEq)]
pub struct NewBudget {
    /// The owner of the new budget.
    pub user_id: String,
    /// The spending category.
    pub category: String,
    /// The normalized spending limit.
    pub amount: f64,
    /// The evaluation window.
    pub period: Period,
}

/// The request body for partially updating a budget.
#[derive(Debug, Deserialize)]
pub struct UpdateBudgetRequest {
    /// The owner the budget must belong to.
    pub user_id: Option<String>,
    /// A new category, or absent to keep the stored one.
    pub category: Option<String>,
    /// A new limit, or absent to keep the stored one.
    pub amount: Option<f64>,
    /// A new period, or absent to keep the stored one.
    pub period: Option<String>,
}

impl UpdateBudgetRequest {
    /// Check the supplied fields. Absent fields stay `None` and leave the
    /// stored values unchanged.
    pub fn validate(self) -> Result<BudgetChanges, Error> {
        let user_id = non_empty(self.user_id, "user_id")?;
        let amount = parse_optional_amount(self.amount, "amount")?;

        if let Some(amount) = amount
            && amount <= 0.0
        {
            return Err(Error::NonPositiveAmount("amount"));
        }

        let period = match optional_trimmed(self.period) {
            Some(text) => Some(Period::parse(&text)?),
            None => None,
        };

        Ok(BudgetChanges {
            user_id,
            category: optional_trimmed(self.category),
            amount,
            period,
        })
    }
}

/// A validated partial update. `None` fields retain their stored values.
#[derive(Debug, Clone, PartialEq)]
pub struct BudgetChanges {
    /// The owner the budget must belong to.
    pub user_id: String,
    /// The new category, if any.
    pub category: Option<String>,
    /// The new limit, if any.
    pub amount: Option<f64>,
    /// The new period, if any.
    pub period: Option<Period>,
}
