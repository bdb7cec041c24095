//! Core transaction domain types.

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::{Error, money::parse_required_amount, validate::non_empty};

/// Database identifier for a transaction.
pub type TransactionId = i64;

/// An expense or income, i.e. an event where money was either spent or earned.
///
/// Positive amounts are income, negative amounts are expenses. Transactions
/// are immutable once recorded; the only mutation is an owner-scoped delete.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// The ID of the transaction.
    pub id: TransactionId,
    /// The owner of the transaction.
    pub user_id: String,
    /// A short description of what the transaction was for.
    pub title: String,
    /// The amount of money spent or earned, in dollars.
    pub amount: f64,
    /// The free-form spending category, e.g. "groceries".
    pub category: String,
    /// When the transaction was recorded.
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

/// The request body for creating a transaction.
///
/// Fields are optional so that presence can be checked explicitly and
/// reported as a validation error rather than a deserialization failure.
#[derive(Debug, Deserialize)]
pub struct CreateTransactionRequest {
    /// The owner of the new transaction.
    pub user_id: Option<String>,
    /// A short description of the transaction.
    pub title: Option<String>,
    /// The transaction amount in dollars, positive for income.
    pub amount: Option<f64>,
    /// The spending category.
    pub category: Option<String>,
}

impl CreateTransactionRequest {
    /// Check field presence and shape, and normalize the amount to two
    /// decimal places.
    pub fn validate(self) -> Result<NewTransaction, Error> {
        let title = non_empty(self.title, "title")?;
        let user_id = non_empty(self.user_id, "user_id")?;
        let category = non_empty(self.category, "category")?;
        let amount = parse_required_amount(self.amount, "amount")?;

        Ok(NewTransaction {
            user_id,
            title,
            amount,
            category,
        })
    }
}

/// A validated transaction ready to be inserted.
#[derive(Debug, Clone, PartialEq)]
pub struct NewTransaction {
    /// The owner of the new transaction.
    pub user_id: String,
    /// A short description of the transaction.
    pub title: String,
    /// The normalized transaction amount.
    pub amount: f64,
    /// The spending category.
    pub category: String,
}
