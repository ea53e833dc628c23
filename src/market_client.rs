use crate::config;
use crate::models::{AggBar, AggsResponse, ContractsResponse, OptionContract};
use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::Utc;
use reqwest::{header, Client, StatusCode};
use std::time::Duration;
use tokio_retry::strategy::ExponentialBackoff;
use tokio_retry::Retry;

// -----------------------------------------------
// MARKET-DATA CAPABILITY
// -----------------------------------------------

/// Read-only market-data lookups the collector consumes. Implemented by the
/// Polygon client in production and by fakes in tests.
#[async_trait]
pub trait MarketData: Send + Sync {
    /// Previous-session daily bar for an equity ticker. `None` when the
    /// provider has no bar for that session.
    async fn prev_day_bar(&self, ticker: &str) -> Result<Option<AggBar>>;

    /// Today's session bar, the fallback when the previous-session lookup
    /// comes back empty.
    async fn day_bar(&self, ticker: &str) -> Result<Option<AggBar>>;

    /// Full call-contract listing for an underlying.
    async fn list_call_contracts(&self, underlying: &str) -> Result<Vec<OptionContract>>;

    /// Previous-session bar for an option contract.
    async fn option_prev_day_bar(&self, contract_ticker: &str) -> Result<Option<AggBar>>;
}

// -----------------------------------------------
// POLYGON CLIENT
// -----------------------------------------------

pub struct PolygonClient {
    client: Client,
    api_key: String,
}

impl PolygonClient {
    /// Build a client from the environment. Missing API key is fatal.
    pub fn new() -> Result<Self> {
        Self::with_key(config::get_api_key()?)
    }

    pub fn with_key(api_key: String) -> Result<Self> {
        Ok(Self {
            client: build_client()?,
            api_key,
        })
    }

    /// Retrying GET returning the raw body. Rate-limit and server errors are
    /// retried with exponential backoff; other client errors fail fast.
    async fn fetch_json(&self, url: &str, timeout: Duration) -> Result<String> {
        let backoff = ExponentialBackoff::from_millis(config::RETRY_BASE_DELAY_MS)
            .factor(config::RETRY_FACTOR)
            .max_delay(Duration::from_secs(config::RETRY_MAX_DELAY_SECS))
            .take(config::RETRY_MAX_ATTEMPTS);

        Retry::spawn(backoff, || async {
            let res = self
                .client
                .get(url)
                .query(&[("apikey", self.api_key.as_str())])
                .timeout(timeout)
                .send()
                .await
                .context("Request send failed")?;

            let status = res.status();

            if status.is_success() {
                res.text().await.context("Failed to read body")
            } else if status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error() {
                anyhow::bail!("Retryable error: {}", status)
            } else {
                let body = res.text().await.unwrap_or_default();
                let preview: String = body.chars().take(200).collect();
                anyhow::bail!("Client error {}: {}", status, preview)
            }
        })
        .await
    }

    async fn fetch_agg(&self, url: &str, timeout: Duration) -> Result<Option<AggBar>> {
        let text = self.fetch_json(url, timeout).await?;
        let parsed: AggsResponse =
            serde_json::from_str(&text).context("Failed to parse aggregates response")?;
        Ok(parsed.first_bar().cloned())
    }
}

#[async_trait]
impl MarketData for PolygonClient {
    async fn prev_day_bar(&self, ticker: &str) -> Result<Option<AggBar>> {
        self.fetch_agg(&config::prev_day_url(ticker), config::PRICE_REQUEST_TIMEOUT)
            .await
    }

    async fn day_bar(&self, ticker: &str) -> Result<Option<AggBar>> {
        let today = Utc::now().date_naive().format("%Y-%m-%d").to_string();
        self.fetch_agg(
            &config::day_range_url(ticker, &today),
            config::PRICE_REQUEST_TIMEOUT,
        )
        .await
    }

    async fn list_call_contracts(&self, underlying: &str) -> Result<Vec<OptionContract>> {
        let url = config::contracts_url(underlying, config::CONTRACT_LISTING_LIMIT);
        let text = self
            .fetch_json(&url, config::CONTRACTS_REQUEST_TIMEOUT)
            .await?;
        let parsed: ContractsResponse =
            serde_json::from_str(&text).context("Failed to parse contracts response")?;
        Ok(parsed.results)
    }

    async fn option_prev_day_bar(&self, contract_ticker: &str) -> Result<Option<AggBar>> {
        self.fetch_agg(
            &config::prev_day_url(contract_ticker),
            config::QUOTE_REQUEST_TIMEOUT,
        )
        .await
    }
}

// -----------------------------------------------
// HTTP CLIENT BUILDER
// -----------------------------------------------

fn build_client() -> Result<Client> {
    let mut headers = header::HeaderMap::new();
    headers.insert(
        header::ACCEPT,
        header::HeaderValue::from_static("application/json"),
    );

    Ok(Client::builder()
        .default_headers(headers)
        .timeout(config::HTTP_TIMEOUT)
        .build()
        .context("Failed to build HTTP client")?)
}
