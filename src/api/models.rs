use serde::Deserialize;
use thiserror::Error;

/// A single transaction as returned by the listing endpoint.
///
/// Immutable once fetched. `date` is unix seconds; `currency` is a
/// lowercase ISO code. `tags` may be absent in the response body and
/// deserializes to an empty list.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Transaction {
    pub id: String,
    pub amount: f64,
    pub currency: String,
    pub date: i64,
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// One page of the transaction listing.
///
/// `transactions` may be absent or empty, which is a valid "no results"
/// page. A missing `hasMore` is a shape mismatch and fails deserialization.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionPage {
    #[serde(default)]
    pub transactions: Vec<Transaction>,
    pub has_more: bool,
}

/// Errors from the transactions API
#[derive(Debug, Clone, Error)]
pub enum ApiError {
    /// Network failure or timeout before a response arrived
    #[error("Request failed: {0}")]
    Request(String),
    /// Non-2xx HTTP status
    #[error("Server returned {status}: {body}")]
    Http { status: u16, body: String },
    /// 2xx response whose body did not match the expected shape
    #[error("Malformed response: {0}")]
    Decode(String),
}
