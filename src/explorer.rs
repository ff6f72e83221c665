use std::time::Duration;

use eyre::{Result, WrapErr};
use tracing::{debug, warn};

use crate::models::{Transaction, TxListResponse};

/// Thin client for an etherscan-shaped transaction index. Cheap to clone;
/// the underlying `reqwest::Client` shares its connection pool.
#[derive(Debug, Clone)]
pub struct ExplorerClient {
    http: reqwest::Client,
    api_url: String,
    page_size: usize,
    page_delay: Duration,
}

impl ExplorerClient {
    pub fn new(api_url: impl Into<String>, page_size: usize, page_delay: Duration) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_url: api_url.into(),
            page_size,
            page_delay,
        }
    }

    /// Fetches the complete ascending transaction history for one address.
    ///
    /// Pages until the explorer returns a short or empty page. A non-success
    /// API status also ends the loop, returning whatever accumulated so far:
    /// explorers report "no transactions found" with the same status as real
    /// failures, so the two are not distinguished here. Transport and decode
    /// errors abort with an error and are never retried.
    pub async fn account_transactions(&self, address: &str) -> Result<Vec<Transaction>> {
        let mut transactions = Vec::new();
        let mut page: u64 = 1;
        let offset = self.page_size.to_string();

        loop {
            let page_str = page.to_string();
            let response = self
                .http
                .get(&self.api_url)
                .query(&[
                    ("module", "account"),
                    ("action", "txlist"),
                    ("address", address),
                    ("startblock", "0"),
                    ("endblock", "99999999"),
                    ("page", page_str.as_str()),
                    ("offset", offset.as_str()),
                    ("sort", "asc"),
                ])
                .send()
                .await
                .wrap_err_with(|| format!("request failed for {address} page {page}"))?;

            let data: TxListResponse = response
                .json()
                .await
                .wrap_err_with(|| format!("bad explorer response for {address} page {page}"))?;

            if data.status != "1" {
                warn!(
                    address,
                    page,
                    message = data.message.as_deref().unwrap_or("unknown error"),
                    "explorer returned non-success status, stopping"
                );
                break;
            }

            let batch = data.result.unwrap_or_default();
            if batch.is_empty() {
                break;
            }

            let count = batch.len();
            transactions.extend(batch);
            debug!(address, page, count, total = transactions.len(), "fetched page");

            if count < self.page_size {
                break;
            }
            page += 1;
            tokio::time::sleep(self.page_delay).await;
        }

        Ok(transactions)
    }
}
