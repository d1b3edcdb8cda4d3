pub mod client;
pub mod models;
pub mod query;

pub use client::TransactionsClient;
pub use models::{ApiError, Transaction, TransactionPage};
pub use query::{DateFilter, DateUnit};
