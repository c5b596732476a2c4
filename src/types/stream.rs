use serde::{Deserialize, Serialize};

use super::trades::TradeSide;

/// Streaming channel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Channel {
    Prices,
    Trades,
    Orderbook,
}

impl Channel {
    pub const ALL: [Channel; 3] = [Channel::Prices, Channel::Trades, Channel::Orderbook];

    pub fn as_str(&self) -> &'static str {
        match self {
            Channel::Prices => "prices",
            Channel::Trades => "trades",
            Channel::Orderbook => "orderbook",
        }
    }

    pub fn from_wire(name: &str) -> Option<Channel> {
        Channel::ALL.into_iter().find(|c| c.as_str() == name)
    }
}

/// Price level in an orderbook update
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceLevel {
    pub price: f64,
    pub quantity: f64,
}

/// Real-time price update
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceUpdate {
    pub ticker: String,
    pub timestamp: i64,
    #[serde(alias = "yes_price")]
    pub yes_price: f64,
    #[serde(alias = "no_price")]
    pub no_price: f64,
    #[serde(default, alias = "yes_bid")]
    pub yes_bid: Option<f64>,
    #[serde(default, alias = "yes_ask")]
    pub yes_ask: Option<f64>,
    #[serde(default, alias = "no_bid")]
    pub no_bid: Option<f64>,
    #[serde(default, alias = "no_ask")]
    pub no_ask: Option<f64>,
}

/// Real-time trade update
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TradeUpdate {
    pub ticker: String,
    pub timestamp: i64,
    pub side: TradeSide,
    pub price: f64,
    pub quantity: f64,
    #[serde(alias = "trade_id")]
    pub trade_id: String,
}

/// Real-time orderbook update
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderbookUpdate {
    pub ticker: String,
    pub timestamp: i64,
    #[serde(default, alias = "yes_ask")]
    pub yes_ask: Vec<PriceLevel>,
    #[serde(default, alias = "yes_bid")]
    pub yes_bid: Vec<PriceLevel>,
    #[serde(default, alias = "no_ask")]
    pub no_ask: Vec<PriceLevel>,
    #[serde(default, alias = "no_bid")]
    pub no_bid: Vec<PriceLevel>,
}

/// Inbound frame, discriminated by its `channel` field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "channel")]
pub enum StreamUpdate {
    #[serde(rename = "prices")]
    Price(PriceUpdate),
    #[serde(rename = "trades")]
    Trade(TradeUpdate),
    #[serde(rename = "orderbook")]
    Orderbook(OrderbookUpdate),
}

impl StreamUpdate {
    pub fn channel(&self) -> Channel {
        match self {
            StreamUpdate::Price(_) => Channel::Prices,
            StreamUpdate::Trade(_) => Channel::Trades,
            StreamUpdate::Orderbook(_) => Channel::Orderbook,
        }
    }

    pub fn ticker(&self) -> &str {
        match self {
            StreamUpdate::Price(u) => &u.ticker,
            StreamUpdate::Trade(u) => &u.ticker,
            StreamUpdate::Orderbook(u) => &u.ticker,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ControlAction {
    Subscribe,
    Unsubscribe,
}

/// Outbound subscribe/unsubscribe frame
///
/// Exactly one of `tickers` and `all` is set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ControlMessage {
    #[serde(rename = "type")]
    pub action: ControlAction,
    pub channel: Channel,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tickers: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub all: Option<bool>,
}

impl ControlMessage {
    pub fn subscribe(channel: Channel, tickers: Vec<String>) -> Self {
        Self {
            action: ControlAction::Subscribe,
            channel,
            tickers: Some(tickers),
            all: None,
        }
    }

    pub fn subscribe_all(channel: Channel) -> Self {
        Self {
            action: ControlAction::Subscribe,
            channel,
            tickers: None,
            all: Some(true),
        }
    }

    pub fn unsubscribe(channel: Channel, tickers: Vec<String>) -> Self {
        Self {
            action: ControlAction::Unsubscribe,
            channel,
            tickers: Some(tickers),
            all: None,
        }
    }

    pub fn unsubscribe_all(channel: Channel) -> Self {
        Self {
            action: ControlAction::Unsubscribe,
            channel,
            tickers: None,
            all: Some(true),
        }
    }
}
