use async_trait::async_trait;
use chrono::{NaiveDate, NaiveTime};
use serde::Deserialize;
use tickwatch_core::{FetchError, PricePoint, PriceSeries, Range, SeriesSource};
use tracing::debug;

/// Public IEX-compatible chart endpoint.
pub const DEFAULT_BASE_URL: &str = "https://api.iextrading.com/1.0";

/// HTTP series source speaking the IEX chart API:
/// `GET {base}/stock/{symbol}/chart/{range}`.
pub struct IexChartClient {
    base_url: String,
    client: reqwest::Client,
}

impl IexChartClient {
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

/// One row of the chart payload. Daily rows carry `date` as `YYYY-MM-DD`;
/// intraday rows carry `date` as `YYYYMMDD` plus a `minute` label. `close`
/// can be null for minutes with no trades.
#[derive(Debug, Deserialize)]
struct ChartRow {
    date: String,
    #[serde(default)]
    minute: Option<String>,
    #[serde(default)]
    close: Option<f64>,
}

/// Parse a chart JSON body into an ordered series. Pure, so it is testable
/// without a network.
pub fn parse_chart(symbol: &str, body: &str) -> Result<PriceSeries, FetchError> {
    let rows: Vec<ChartRow> =
        serde_json::from_str(body).map_err(|e| FetchError::Payload(e.to_string()))?;

    let mut points = Vec::with_capacity(rows.len());
    for row in rows {
        // Untraded minutes report a null close; skip them.
        let Some(close) = row.close else { continue };
        let date = parse_date(&row.date)?;
        let point = match &row.minute {
            Some(m) => {
                let minute = NaiveTime::parse_from_str(m, "%H:%M")
                    .map_err(|e| FetchError::Payload(format!("bad minute '{m}': {e}")))?;
                PricePoint::intraday(date, minute, close)
            }
            None => PricePoint::daily(date, close),
        };
        points.push(point);
    }

    if points.is_empty() {
        return Err(FetchError::Empty(symbol.to_string()));
    }
    Ok(PriceSeries::new(symbol, points))
}

fn parse_date(s: &str) -> Result<NaiveDate, FetchError> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(s, "%Y%m%d"))
        .map_err(|e| FetchError::Payload(format!("bad date '{s}': {e}")))
}

#[async_trait]
impl SeriesSource for IexChartClient {
    async fn fetch(&self, symbol: &str, range: Range) -> Result<PriceSeries, FetchError> {
        let url = format!("{}/stock/{}/chart/{}", self.base_url, symbol, range);
        debug!(%url, "Requesting chart");

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
        parse_chart(symbol, &body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_daily_chart() {
        let body = r#"[
            {"date": "2019-07-02", "close": 293.06},
            {"date": "2019-07-01", "close": 291.5}
        ]"#;
        let series = parse_chart("SPY", body).unwrap();
        assert_eq!(series.symbol, "SPY");
        // Rows arrive unordered; the series is sorted ascending.
        assert_eq!(series.closes(), vec![291.5, 293.06]);
        assert_eq!(series.points[0].label(), "2019-07-01");
    }

    #[test]
    fn test_parse_intraday_chart_skips_null_closes() {
        let body = r#"[
            {"date": "20190701", "minute": "09:30", "close": 200.1},
            {"date": "20190701", "minute": "09:31", "close": null},
            {"date": "20190701", "minute": "09:32", "close": 200.4}
        ]"#;
        let series = parse_chart("AAPL", body).unwrap();
        assert_eq!(series.closes(), vec![200.1, 200.4]);
        assert_eq!(series.points[1].label(), "2019-07-01 09:32");
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(matches!(
            parse_chart("SPY", "not json"),
            Err(FetchError::Payload(_))
        ));
        assert!(matches!(
            parse_chart("SPY", r#"[{"date": "0x99", "close": 1.0}]"#),
            Err(FetchError::Payload(_))
        ));
    }

    #[test]
    fn test_parse_empty_payload() {
        assert!(matches!(
            parse_chart("SPY", "[]"),
            Err(FetchError::Empty(_))
        ));
    }
}
