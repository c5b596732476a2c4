use serde::{Deserialize, Serialize};

use super::common::SettlementSource;
use super::markets::Market;
use crate::pagination::CursorPage;

/// Prediction event: a question grouping one or more markets
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub ticker: String,
    pub title: String,
    #[serde(default)]
    pub subtitle: String,
    #[serde(alias = "series_ticker")]
    pub series_ticker: String,
    #[serde(default)]
    pub competition: Option<String>,
    #[serde(default, alias = "competition_scope")]
    pub competition_scope: Option<String>,
    #[serde(default, alias = "image_url")]
    pub image_url: Option<String>,
    #[serde(default)]
    pub liquidity: Option<f64>,
    #[serde(default)]
    pub markets: Option<Vec<Market>>,
    #[serde(default, alias = "open_interest")]
    pub open_interest: Option<f64>,
    #[serde(default, alias = "settlement_sources")]
    pub settlement_sources: Option<Vec<SettlementSource>>,
    #[serde(default, alias = "strike_date")]
    pub strike_date: Option<i64>,
    #[serde(default, alias = "strike_period")]
    pub strike_period: Option<String>,
    #[serde(default, alias = "mutually_exclusive")]
    pub mutually_exclusive: Option<bool>,
    #[serde(default)]
    pub volume: Option<f64>,
    #[serde(default, rename = "volume24h", alias = "volume_24h")]
    pub volume_24h: Option<f64>,
}

/// Page of events; `cursor` is a numeric offset
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventsResponse {
    #[serde(default)]
    pub cursor: Option<u64>,
    pub events: Vec<Event>,
}

impl CursorPage for EventsResponse {
    type Cursor = u64;

    fn next_cursor(&self) -> Option<u64> {
        self.cursor
    }
}

/// Single point of a forecast percentile history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForecastHistoryPoint {
    pub timestamp: i64,
    #[serde(alias = "yes_price")]
    pub yes_price: f64,
    #[serde(alias = "no_price")]
    pub no_price: f64,
    #[serde(default)]
    pub percentile: Option<f64>,
}

/// Forecast history relayed for an event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForecastHistory {
    #[serde(alias = "event_ticker")]
    pub event_ticker: String,
    #[serde(default)]
    pub history: Vec<ForecastHistoryPoint>,
}

/// Wire shape of the event candlesticks endpoint: two parallel arrays
#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct EventCandlesticksBody {
    #[serde(default, alias = "marketTickers")]
    pub market_tickers: Vec<String>,
    #[serde(default, alias = "marketCandlesticks")]
    pub market_candlesticks: Vec<Option<Vec<super::common::MarketCandlestick>>>,
}
