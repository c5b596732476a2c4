use serde::{Deserialize, Serialize};

/// Lifecycle status of a market (also used to filter events and series)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MarketStatus {
    Initialized,
    Active,
    Inactive,
    Closed,
    Determined,
    Finalized,
    /// Status value introduced by the server after this client was built
    #[serde(other)]
    Unknown,
}

impl MarketStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            MarketStatus::Initialized => "initialized",
            MarketStatus::Active => "active",
            MarketStatus::Inactive => "inactive",
            MarketStatus::Closed => "closed",
            MarketStatus::Determined => "determined",
            MarketStatus::Finalized => "finalized",
            MarketStatus::Unknown => "unknown",
        }
    }

    /// Whether the outcome is known and redemption may open
    pub fn is_settled(&self) -> bool {
        matches!(self, MarketStatus::Determined | MarketStatus::Finalized)
    }
}

/// Sort field for event, market and search listings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    Volume,
    Volume24h,
    Liquidity,
    OpenInterest,
    StartDate,
    Score,
}

impl SortField {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortField::Volume => "volume",
            SortField::Volume24h => "volume_24h",
            SortField::Liquidity => "liquidity",
            SortField::OpenInterest => "open_interest",
            SortField::StartDate => "start_date",
            SortField::Score => "score",
        }
    }
}

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Asc,
    Desc,
}

impl SortOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Asc => "asc",
            SortOrder::Desc => "desc",
        }
    }
}

/// Candlestick period length in minutes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PeriodInterval {
    OneMinute,
    OneHour,
    OneDay,
}

impl PeriodInterval {
    pub fn minutes(&self) -> u32 {
        match self {
            PeriodInterval::OneMinute => 1,
            PeriodInterval::OneHour => 60,
            PeriodInterval::OneDay => 1440,
        }
    }
}

/// OHLCV candlestick data point
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candlestick {
    #[serde(alias = "end_period_ts", alias = "endPeriodTs")]
    pub timestamp: i64,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    #[serde(default)]
    pub volume: f64,
}

/// Price component of a relayed market candlestick
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandlestickPrice {
    pub open: Option<f64>,
    pub high: Option<f64>,
    pub low: Option<f64>,
    pub close: Option<f64>,
}

/// Candlestick relayed per market by the event candlesticks endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketCandlestick {
    #[serde(alias = "end_period_ts", alias = "endPeriodTs")]
    pub timestamp: i64,
    #[serde(default)]
    pub price: Option<CandlestickPrice>,
    #[serde(default)]
    pub volume: Option<f64>,
    #[serde(default, alias = "open_interest", alias = "openInterest")]
    pub open_interest: Option<f64>,
}

/// Settlement source attached to events and series
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettlementSource {
    pub name: String,
    pub url: String,
}

/// Raw-to-datetime helper for unix-second timestamps
pub(crate) fn unix_seconds(ts: i64) -> Option<chrono::DateTime<chrono::Utc>> {
    chrono::DateTime::from_timestamp(ts, 0)
}
