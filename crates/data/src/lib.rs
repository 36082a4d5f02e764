pub mod csv_store;
pub mod iex;
pub mod market_clock;

use async_trait::async_trait;
use chrono::Timelike;
use tickwatch_core::{FetchError, PriceSeries, TickerSource};

pub use csv_store::CsvStore;
pub use iex::IexChartClient;
pub use market_clock::StockMarketClockClient;

/// A fixed, explicitly-configured symbol universe.
pub struct StaticTickers {
    symbols: Vec<String>,
}

impl StaticTickers {
    pub fn new(symbols: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            symbols: symbols.into_iter().map(Into::into).collect(),
        }
    }
}

#[async_trait]
impl TickerSource for StaticTickers {
    async fn tickers(&self) -> Result<Vec<String>, FetchError> {
        Ok(self.symbols.clone())
    }
}

/// Downsample an intraday series to top-of-hour closes: keeps points whose
/// minute label ends on :59. Daily points (no minute label) are dropped.
pub fn hourly_closes(series: &PriceSeries) -> PriceSeries {
    let points = series
        .points
        .iter()
        .filter(|p| p.minute.map(|m| m.minute() == 59).unwrap_or(false))
        .copied()
        .collect();
    PriceSeries::new(series.symbol.clone(), points)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveTime};
    use tickwatch_core::PricePoint;

    #[test]
    fn test_hourly_closes_keeps_59th_minute() {
        let d = NaiveDate::from_ymd_opt(2019, 7, 1).unwrap();
        let t = |h, m| NaiveTime::from_hms_opt(h, m, 0).unwrap();
        let series = PriceSeries::new(
            "AAPL",
            vec![
                PricePoint::intraday(d, t(9, 30), 200.0),
                PricePoint::intraday(d, t(9, 59), 201.0),
                PricePoint::intraday(d, t(10, 30), 202.0),
                PricePoint::intraday(d, t(10, 59), 203.0),
                PricePoint::daily(d, 204.0),
            ],
        );
        let hourly = hourly_closes(&series);
        assert_eq!(hourly.closes(), vec![201.0, 203.0]);
    }

    #[tokio::test]
    async fn test_static_tickers() {
        let source = StaticTickers::new(["SPY", "AMZN"]);
        assert_eq!(source.tickers().await.unwrap(), vec!["SPY", "AMZN"]);
    }
}
