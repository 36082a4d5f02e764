use crate::models::{MarketStatus, PriceSeries, Range};
use async_trait::async_trait;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Errors from the external series/status collaborators.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Http(String),
    #[error("unexpected payload: {0}")]
    Payload(String),
    #[error("no data returned for {0}")]
    Empty(String),
}

/// Errors from dataset assembly and tabular storage.
#[derive(Debug, thiserror::Error)]
pub enum DataError {
    #[error("column '{column}' has {got} rows, expected {expected}")]
    LengthMismatch {
        column: String,
        expected: usize,
        got: usize,
    },
    #[error("duplicate column '{0}'")]
    DuplicateColumn(String),
    #[error("data not found: {0}")]
    NotFound(String),
    #[error("parse error: {0}")]
    ParseError(String),
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

// ---------------------------------------------------------------------------
// Collaborator traits
// ---------------------------------------------------------------------------

/// Supplies historical (timestamp, close) series for a symbol.
#[async_trait]
pub trait SeriesSource: Send + Sync {
    async fn fetch(&self, symbol: &str, range: Range) -> Result<PriceSeries, FetchError>;
}

/// Reports whether an exchange is currently trading.
#[async_trait]
pub trait MarketClock: Send + Sync {
    async fn status(&self, exchange: &str) -> Result<MarketStatus, FetchError>;
}

/// Yields the universe of symbols to process.
///
/// Ticker-list acquisition (e.g. scraping an index constituents table)
/// lives behind this seam so the core never depends on markup structure.
#[async_trait]
pub trait TickerSource: Send + Sync {
    async fn tickers(&self) -> Result<Vec<String>, FetchError>;
}
