use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ---------------------------------------------------------------------------
// Price data
// ---------------------------------------------------------------------------

/// A single (timestamp, close) observation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub date: NaiveDate,
    /// Present for intraday points (e.g. 15:59); daily points omit it.
    pub minute: Option<NaiveTime>,
    pub close: f64,
}

impl PricePoint {
    pub fn daily(date: NaiveDate, close: f64) -> Self {
        Self {
            date,
            minute: None,
            close,
        }
    }

    pub fn intraday(date: NaiveDate, minute: NaiveTime, close: f64) -> Self {
        Self {
            date,
            minute: Some(minute),
            close,
        }
    }

    /// Timestamp label used in tabular exports: `YYYY-MM-DD` for daily
    /// points, `YYYY-MM-DD HH:MM` for intraday points.
    pub fn label(&self) -> String {
        match self.minute {
            Some(minute) => format!("{} {}", self.date, minute.format("%H:%M")),
            None => self.date.to_string(),
        }
    }

    /// Inverse of [`label`](Self::label).
    pub fn from_label(label: &str, close: f64) -> Result<Self, chrono::ParseError> {
        if let Ok(dt) = NaiveDateTime::parse_from_str(label, "%Y-%m-%d %H:%M") {
            return Ok(Self::intraday(dt.date(), dt.time(), close));
        }
        NaiveDate::parse_from_str(label, "%Y-%m-%d").map(|date| Self::daily(date, close))
    }
}

/// An ordered close-price history for one symbol.
///
/// Points are time-ascending with no duplicate timestamps, and the series
/// is immutable once fetched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceSeries {
    pub symbol: String,
    pub points: Vec<PricePoint>,
}

impl PriceSeries {
    /// Build a series from possibly-unordered points: sorts ascending by
    /// timestamp and drops duplicates, keeping the first occurrence.
    pub fn new(symbol: impl Into<String>, mut points: Vec<PricePoint>) -> Self {
        points.sort_by_key(|p| (p.date, p.minute));
        points.dedup_by(|a, b| a.date == b.date && a.minute == b.minute);
        Self {
            symbol: symbol.into(),
            points,
        }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// The close column, in series order.
    pub fn closes(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.close).collect()
    }
}

// ---------------------------------------------------------------------------
// Chart range
// ---------------------------------------------------------------------------

/// Lookback ranges understood by the series source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Range {
    OneDay,
    OneMonth,
    ThreeMonths,
    SixMonths,
    YearToDate,
    OneYear,
    TwoYears,
    FiveYears,
}

impl Range {
    /// The wire form used in chart URLs.
    pub fn as_str(&self) -> &'static str {
        match self {
            Range::OneDay => "1d",
            Range::OneMonth => "1m",
            Range::ThreeMonths => "3m",
            Range::SixMonths => "6m",
            Range::YearToDate => "ytd",
            Range::OneYear => "1y",
            Range::TwoYears => "2y",
            Range::FiveYears => "5y",
        }
    }
}

impl fmt::Display for Range {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, thiserror::Error)]
#[error("unknown range '{0}' (expected 1d, 1m, 3m, 6m, ytd, 1y, 2y, or 5y)")]
pub struct ParseRangeError(pub String);

impl FromStr for Range {
    type Err = ParseRangeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "1d" => Ok(Range::OneDay),
            "1m" => Ok(Range::OneMonth),
            "3m" => Ok(Range::ThreeMonths),
            "6m" => Ok(Range::SixMonths),
            "ytd" => Ok(Range::YearToDate),
            "1y" => Ok(Range::OneYear),
            "2y" => Ok(Range::TwoYears),
            "5y" => Ok(Range::FiveYears),
            other => Err(ParseRangeError(other.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// Market status
// ---------------------------------------------------------------------------

/// Whether an exchange is currently trading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MarketStatus {
    Open,
    Closed,
    Unknown,
}

impl MarketStatus {
    /// Map the status string reported by a market-clock API. Anything
    /// unrecognized is `Unknown` rather than an error.
    pub fn from_api(s: &str) -> Self {
        match s {
            "open" => MarketStatus::Open,
            "closed" => MarketStatus::Closed,
            _ => MarketStatus::Unknown,
        }
    }
}

impl fmt::Display for MarketStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            MarketStatus::Open => "open",
            MarketStatus::Closed => "closed",
            MarketStatus::Unknown => "unknown",
        };
        f.write_str(s)
    }
}
