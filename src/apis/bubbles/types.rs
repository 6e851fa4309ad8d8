/// Crypto Bubbles wire types
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One coin from the bubbles list, as far as the catalog needs it
///
/// The payload carries many more fields (prices, performance, images); they
/// are ignored here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BubbleCoin {
    /// CoinGecko-style canonical id, e.g. "bitcoin"
    pub cg_id: String,
    pub symbol: String,
}

/// Time bucket for chart series
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChartRange {
    Hour,
    Day,
    Week,
    Month,
    Year,
}

impl ChartRange {
    pub const ALL: [ChartRange; 5] = [
        ChartRange::Hour,
        ChartRange::Day,
        ChartRange::Week,
        ChartRange::Month,
        ChartRange::Year,
    ];

    /// URL path segment
    pub fn path(&self) -> &'static str {
        match self {
            ChartRange::Hour => "hour",
            ChartRange::Day => "day",
            ChartRange::Week => "week",
            ChartRange::Month => "month",
            ChartRange::Year => "year",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            ChartRange::Hour => "Hour",
            ChartRange::Day => "Day",
            ChartRange::Week => "Week",
            ChartRange::Month => "Month",
            ChartRange::Year => "Year",
        }
    }
}

impl Default for ChartRange {
    fn default() -> Self {
        ChartRange::Day
    }
}

impl fmt::Display for ChartRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.title())
    }
}

impl FromStr for ChartRange {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim().to_lowercase();
        ChartRange::ALL
            .iter()
            .copied()
            .find(|range| range.path() == needle)
            .ok_or_else(|| format!("Unknown chart range '{}' (expected hour, day, week, month or year)", s))
    }
}

/// One point of a price series
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChartPoint {
    /// Unix seconds
    pub t: f64,
    /// Price in the requested quote currency
    pub p: f64,
}

impl ChartPoint {
    pub fn time(&self) -> Option<DateTime<Utc>> {
        let secs = self.t.floor();
        let nanos = ((self.t - secs) * 1e9) as u32;
        DateTime::<Utc>::from_timestamp(secs as i64, nanos)
    }
}

/// Summary of a series for headline display
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeriesStats {
    pub first: f64,
    pub last: f64,
    pub high: f64,
    pub low: f64,
    /// Percent change from first to last point
    pub change_pct: f64,
}

impl SeriesStats {
    pub fn from_points(points: &[ChartPoint]) -> Option<Self> {
        let first = points.first()?.p;
        let last = points.last()?.p;

        let (high, low) = points
            .iter()
            .fold((f64::MIN, f64::MAX), |(hi, lo), pt| (hi.max(pt.p), lo.min(pt.p)));

        let change_pct = if first != 0.0 {
            (last - first) / first * 100.0
        } else {
            0.0
        };

        Some(Self {
            first,
            last,
            high,
            low,
            change_pct,
        })
    }

    pub fn is_up(&self) -> bool {
        self.last >= self.first
    }
}

/// Aggregate metrics for one coin, normalised from the bubbles list
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BubbleMetrics {
    /// Numeric Crypto Bubbles id
    pub id: Option<i64>,
    pub symbol: Option<String>,
    pub rank: Option<i64>,
    pub market_cap: Option<f64>,
    pub volume: Option<f64>,
    pub price: Option<f64>,
}
