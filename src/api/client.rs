use reqwest::Client as HttpClient;
use std::time::Duration;
use tracing::debug;

use super::models::{ApiError, TransactionPage};
use super::query::{self, DateFilter, DateUnit};
use crate::config::Config;

/// HTTP client for the transaction listing endpoint
pub struct TransactionsClient {
    http_client: HttpClient,
    base_url: String,
    date_unit: DateUnit,
}

impl TransactionsClient {
    /// Create a client from the loaded configuration
    pub fn new(config: &Config) -> Result<Self, ApiError> {
        let http_client = HttpClient::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| ApiError::Request(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http_client,
            base_url: config.base_url.clone(),
            date_unit: config.date_unit,
        })
    }

    /// Create a client against a custom base URL (for testing)
    #[cfg(test)]
    pub fn with_base_url(base_url: String, date_unit: DateUnit) -> Self {
        Self {
            http_client: HttpClient::new(),
            base_url,
            date_unit,
        }
    }

    /// GET {base}
    ///
    /// Fetches one page of the transaction listing. `cursor` is the id of
    /// the last transaction already displayed; it is only sent while no
    /// date filter is active (filtered requests restart from the start).
    ///
    /// # Returns
    /// * `Ok(TransactionPage)` - the page and its `hasMore` flag
    /// * `Err(ApiError)` - network/timeout failure, non-2xx status, or a
    ///   body that does not match the documented shape
    pub async fn list(
        &self,
        cursor: Option<&str>,
        filter: &DateFilter,
    ) -> Result<TransactionPage, ApiError> {
        let params = query::build_params(cursor, filter, self.date_unit);
        debug!("GET {}", query::display_url(&self.base_url, &params));

        let response = self
            .http_client
            .get(&self.base_url)
            .query(&params)
            .send()
            .await
            .map_err(|e| ApiError::Request(format!("Request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::Http {
                status: status.as_u16(),
                body,
            });
        }

        response
            .json::<TransactionPage>()
            .await
            .map_err(|e| ApiError::Decode(format!("Failed to parse response: {}", e)))
    }
}
