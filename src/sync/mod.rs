//! Batch upload of records accumulated by offline clients.

mod apply;
mod domain;
mod upload;

pub use apply::{SyncReport, apply_sync};
pub use domain::{SyncBudget, SyncGoal, SyncRequest, SyncTransaction};
pub use upload::sync_upload_endpoint;
