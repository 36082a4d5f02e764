use async_trait::async_trait;
use tickwatch_core::{FetchError, MarketClock, MarketStatus};
use tracing::debug;

/// Public market-clock endpoint.
pub const DEFAULT_BASE_URL: &str = "https://www.stockmarketclock.com";

/// HTTP market clock backed by the stockmarketclock status API:
/// `GET {base}/api-v1/status?exchange={exchange}`.
pub struct StockMarketClockClient {
    base_url: String,
    client: reqwest::Client,
}

impl StockMarketClockClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(10))
            .build()
            .map_err(|e| FetchError::Http(e.to_string()))?;
        Ok(Self {
            base_url: base_url.into(),
            client,
        })
    }
}

/// Pull `results.{exchange}.status` out of a status response body.
pub fn parse_status(exchange: &str, body: &str) -> Result<MarketStatus, FetchError> {
    let value: serde_json::Value =
        serde_json::from_str(body).map_err(|e| FetchError::Payload(e.to_string()))?;
    let status = value["results"][exchange]["status"]
        .as_str()
        .ok_or_else(|| {
            FetchError::Payload(format!("no status for exchange '{exchange}' in response"))
        })?;
    Ok(MarketStatus::from_api(status))
}

#[async_trait]
impl MarketClock for StockMarketClockClient {
    async fn status(&self, exchange: &str) -> Result<MarketStatus, FetchError> {
        let url = format!("{}/api-v1/status?exchange={}", self.base_url, exchange);
        debug!(%url, "Requesting market status");

        let resp = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| FetchError::Http(e.to_string()))?
            .error_for_status()
            .map_err(|e| FetchError::Http(e.to_string()))?;

        let body = resp
            .text()
            .await
            .map_err(|e| FetchError::Http(e.to_string()))?;
        parse_status(exchange, &body)
    }
}
