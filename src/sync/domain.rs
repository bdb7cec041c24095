//! Wire types for the sync upload.

use serde::Deserialize;

/// The request body for a sync upload.
///
/// The envelope carries the owner; the per-record shapes mirror the create
/// request bodies minus `user_id`, plus the client-side `created_at`.
#[derive(Debug, Deserialize)]
pub struct SyncRequest {
    /// The owner all records are applied under.
    #[serde(rename = "userId")]
    pub user_id: Option<String>,
    /// When the client last synced. Accepted as caller bookkeeping only; the
    /// records themselves are applied as blind inserts.
    #[serde(rename = "lastSyncTime")]
    pub last_sync_time: Option<String>,
    /// Transactions recorded offline.
    #[serde(default)]
    pub transactions: Vec<SyncTransaction>,
    /// Budgets created offline.
    #[serde(default)]
    pub budgets: Vec<SyncBudget>,
    /// Savings goals created offline.
    #[serde(default)]
    pub goals: Vec<SyncGoal>,
}

/// One transaction in a sync upload.
#[derive(Debug, Clone, Deserialize)]
pub struct SyncTransaction {
    /// A short description of the transaction.
    pub title: Option<String>,
    /// The transaction amount in dollars.
    pub amount: Option<f64>,
    /// The spending category.
    pub category: Option<String>,
    /// When the client recorded it, as `YYYY-MM-DD HH:MM:SS`.
    pub created_at: Option<String>,
}

/// One budget in a sync upload.
#[derive(Debug, Clone, Deserialize)]
pub struct SyncBudget {
    /// The spending category.
    pub category: Option<String>,
    /// The spending limit in dollars.
    pub amount: Option<f64>,
    /// The evaluation window.
    pub period: Option<String>,
    /// When the client recorded it, as `YYYY-MM-DD HH:MM:SS`.
    pub created_at: Option<String>,
}

/// One savings goal in a sync upload.
#[derive(Debug, Clone, Deserialize)]
pub struct SyncGoal {
    /// What the user is saving for.
    pub title: Option<String>,
    /// The amount to save in total.
    pub target_amount: Option<f64>,
    /// The amount already saved.
    pub current_amount: Option<f64>,
    /// The display icon.
    pub icon: Option<String>,
    /// The target day in `YYYY-MM-DD` format.
    pub target_date: Option<String>,
    /// When the client recorded it, as `YYYY-MM-DD HH:MM:SS`.
    pub created_at: Option<String>,
}
