//! Recording and querying of income and expense transactions.

mod create;
mod db;
mod delete;
mod domain;
mod list;
mod summary;

pub use create::create_transaction_endpoint;
pub use db::{
    create_transaction, create_transaction_table, delete_transaction, get_transaction,
    get_transactions,
};
pub use delete::delete_transaction_endpoint;
pub use domain::{CreateTransactionRequest, NewTransaction, Transaction, TransactionId};
pub use list::list_transactions_endpoint;
pub use summary::{BalanceSummary, transaction_summary_endpoint};
