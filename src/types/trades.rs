use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use super::common::unix_seconds;
use crate::pagination::CursorPage;

/// Side of the taker in a trade
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TradeSide {
    Yes,
    No,
}

impl TradeSide {
    pub fn as_str(&self) -> &'static str {
        match self {
            TradeSide::Yes => "yes",
            TradeSide::No => "no",
        }
    }
}

/// Historical trade
///
/// Decodes both the current wire shape (`tradeId`, `ticker`, `takerSide`,
/// `count`, `createdTime`) and the legacy one (`id`, `marketTicker`, `side`,
/// `quantity`, `timestamp`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Trade {
    #[serde(alias = "trade_id", alias = "id")]
    pub trade_id: String,
    #[serde(alias = "marketTicker", alias = "market_ticker")]
    pub ticker: String,
    #[serde(alias = "taker_side", alias = "side")]
    pub taker_side: TradeSide,
    pub price: f64,
    #[serde(default, alias = "yes_price")]
    pub yes_price: Option<f64>,
    #[serde(default, alias = "no_price")]
    pub no_price: Option<f64>,
    #[serde(default, alias = "yes_price_dollars")]
    pub yes_price_dollars: Option<String>,
    #[serde(default, alias = "no_price_dollars")]
    pub no_price_dollars: Option<String>,
    #[serde(alias = "quantity")]
    pub count: f64,
    #[serde(
        alias = "created_time",
        alias = "timestamp",
        deserialize_with = "deserialize_unix_time"
    )]
    pub created_time: i64,
}

impl Trade {
    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        unix_seconds(self.created_time)
    }
}

/// Page of trades; `cursor` is the trade id to continue from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradesResponse {
    #[serde(default)]
    pub cursor: Option<String>,
    pub trades: Vec<Trade>,
}

impl CursorPage for TradesResponse {
    type Cursor = String;

    fn next_cursor(&self) -> Option<String> {
        self.cursor.clone()
    }
}

/// Accept unix seconds as a number, a numeric string or an RFC 3339 string
pub(crate) fn deserialize_unix_time<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Int(i64),
        Float(f64),
        Text(String),
    }

    match Raw::deserialize(deserializer)? {
        Raw::Int(ts) => Ok(ts),
        Raw::Float(ts) => Ok(ts as i64),
        Raw::Text(s) => s
            .parse::<i64>()
            .ok()
            .or_else(|| {
                DateTime::parse_from_rfc3339(&s)
                    .ok()
                    .map(|dt| dt.timestamp())
            })
            .ok_or_else(|| serde::de::Error::custom(format!("invalid timestamp: {}", s))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_current_wire_shape() {
        let trade: Trade = serde_json::from_str(
            r#"{"tradeId":"t1","ticker":"M1","takerSide":"yes","price":42,"yesPrice":42,
                "noPrice":58,"yesPriceDollars":"0.42","noPriceDollars":"0.58","count":10,
                "createdTime":1704067200}"#,
        )
        .unwrap();
        assert_eq!(trade.trade_id, "t1");
        assert_eq!(trade.taker_side, TradeSide::Yes);
        assert_eq!(trade.count, 10.0);
        assert_eq!(trade.created_at().unwrap().timestamp(), 1704067200);
    }

    #[test]
    fn test_legacy_wire_shape() {
        let trade: Trade = serde_json::from_str(
            r#"{"id":"t2","marketTicker":"M2","side":"no","action":"sell","price":0.3,
                "quantity":2.5,"timestamp":"2024-01-01T00:00:00Z"}"#,
        )
        .unwrap();
        assert_eq!(trade.trade_id, "t2");
        assert_eq!(trade.ticker, "M2");
        assert_eq!(trade.taker_side, TradeSide::No);
        assert_eq!(trade.count, 2.5);
        assert_eq!(trade.created_time, 1704067200);
        assert!(trade.yes_price.is_none());
    }

    #[test]
    fn test_trades_cursor_is_string() {
        let page: TradesResponse =
            serde_json::from_str(r#"{"cursor":"t9","trades":[]}"#).unwrap();
        assert_eq!(page.next_cursor().as_deref(), Some("t9"));
    }
}
