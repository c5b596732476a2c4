use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::common::MarketStatus;
use crate::pagination::CursorPage;

/// Resolved result of a market; empty for unresolved or scalar markets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum MarketResult {
    Yes,
    No,
    #[default]
    #[serde(rename = "")]
    Unresolved,
}

/// Whether winning tokens may currently be redeemed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RedemptionStatus {
    Open,
    Closed,
    Pending,
    #[serde(other)]
    Unknown,
}

/// On-chain accounts of a market for one settlement mint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketAccount {
    #[serde(alias = "yes_mint")]
    pub yes_mint: String,
    #[serde(alias = "no_mint")]
    pub no_mint: String,
    #[serde(alias = "market_ledger")]
    pub market_ledger: String,
    #[serde(alias = "redemption_status")]
    pub redemption_status: RedemptionStatus,
    /// Scalar payout in basis points of 10000 for the YES side
    #[serde(default, alias = "scalar_outcome_pct")]
    pub scalar_outcome_pct: Option<u32>,
}

impl MarketAccount {
    pub fn holds_mint(&self, mint: &str) -> bool {
        self.yes_mint == mint || self.no_mint == mint
    }
}

/// A single tradable market with YES/NO outcome tokens
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Market {
    pub ticker: String,
    pub title: String,
    #[serde(default)]
    pub subtitle: String,
    #[serde(alias = "event_ticker")]
    pub event_ticker: String,
    pub status: MarketStatus,
    #[serde(default)]
    pub result: MarketResult,
    #[serde(default, alias = "market_type")]
    pub market_type: String,
    #[serde(default, alias = "yes_sub_title")]
    pub yes_sub_title: String,
    #[serde(default, alias = "no_sub_title")]
    pub no_sub_title: String,
    #[serde(default, alias = "can_close_early")]
    pub can_close_early: bool,
    #[serde(default, alias = "rules_primary", alias = "rules")]
    pub rules_primary: String,
    #[serde(default, alias = "rules_secondary")]
    pub rules_secondary: Option<String>,
    #[serde(default, alias = "early_close_condition")]
    pub early_close_condition: Option<String>,
    #[serde(default)]
    pub volume: f64,
    #[serde(default)]
    pub liquidity: Option<f64>,
    #[serde(default, alias = "open_interest")]
    pub open_interest: f64,
    #[serde(default, alias = "open_time")]
    pub open_time: i64,
    #[serde(default, alias = "close_time")]
    pub close_time: i64,
    #[serde(default, alias = "expiration_time")]
    pub expiration_time: i64,
    /// Accounts keyed by settlement mint
    #[serde(default)]
    pub accounts: HashMap<String, MarketAccount>,
    #[serde(default, alias = "yes_ask")]
    pub yes_ask: Option<String>,
    #[serde(default, alias = "yes_bid")]
    pub yes_bid: Option<String>,
    #[serde(default, alias = "no_ask")]
    pub no_ask: Option<String>,
    #[serde(default, alias = "no_bid")]
    pub no_bid: Option<String>,
}

impl Market {
    /// YES price, taken from the best YES bid
    pub fn yes_price(&self) -> Option<f64> {
        self.yes_bid.as_deref().and_then(|p| p.parse().ok())
    }

    /// NO price, taken from the best NO bid
    pub fn no_price(&self) -> Option<f64> {
        self.no_bid.as_deref().and_then(|p| p.parse().ok())
    }

    /// Every mint (YES, NO and ledger) belonging to this market
    pub fn mints(&self) -> impl Iterator<Item = &str> {
        self.accounts.values().flat_map(|a| {
            [
                a.yes_mint.as_str(),
                a.no_mint.as_str(),
                a.market_ledger.as_str(),
            ]
        })
    }
}

/// Page of markets; `cursor` is a numeric offset
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketsResponse {
    #[serde(default)]
    pub cursor: Option<u64>,
    pub markets: Vec<Market>,
}

impl CursorPage for MarketsResponse {
    type Cursor = u64;

    fn next_cursor(&self) -> Option<u64> {
        self.cursor
    }
}

/// Batch endpoint body: either wrapped in `{markets: [...]}` or a flat array
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub(crate) enum MarketsBatchBody {
    Wrapped { markets: Vec<Market> },
    Flat(Vec<Market>),
}

impl MarketsBatchBody {
    pub fn into_markets(self) -> Vec<Market> {
        match self {
            MarketsBatchBody::Wrapped { markets } => markets,
            MarketsBatchBody::Flat(markets) => markets,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct OutcomeMintsBody {
    #[serde(default)]
    pub mints: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct FilterOutcomeMintsBody {
    #[serde(default, rename = "outcomeMints", alias = "outcome_mints")]
    pub outcome_mints: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct CandlesticksBody {
    #[serde(default)]
    pub candlesticks: Vec<super::common::Candlestick>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn market_json(ticker: &str, yes: &str, no: &str) -> serde_json::Value {
        json!({
            "ticker": ticker,
            "title": "Will it happen?",
            "subtitle": "",
            "eventTicker": "EVT",
            "status": "active",
            "result": "",
            "marketType": "binary",
            "volume": 10.0,
            "openInterest": 5.0,
            "openTime": 1,
            "closeTime": 2,
            "expirationTime": 3,
            "accounts": {
                "USDC": {
                    "yesMint": yes,
                    "noMint": no,
                    "marketLedger": format!("{}-ledger", ticker),
                    "redemptionStatus": "closed"
                }
            },
            "yesBid": "0.42"
        })
    }

    #[test]
    fn test_market_decodes_camel_case() {
        let market: Market = serde_json::from_value(market_json("M1", "Y1", "N1")).unwrap();
        assert_eq!(market.event_ticker, "EVT");
        assert_eq!(market.result, MarketResult::Unresolved);
        assert_eq!(market.yes_price(), Some(0.42));
        assert_eq!(market.no_price(), None);
        assert_eq!(market.mints().count(), 3);
    }

    #[test]
    fn test_batch_body_accepts_both_shapes() {
        let wrapped: MarketsBatchBody =
            serde_json::from_value(json!({ "markets": [market_json("A", "Y", "N")] })).unwrap();
        assert_eq!(wrapped.into_markets().len(), 1);

        let flat: MarketsBatchBody = serde_json::from_value(json!([
            market_json("A", "Y", "N"),
            market_json("B", "Y2", "N2")
        ]))
        .unwrap();
        assert_eq!(flat.into_markets().len(), 2);
    }

    #[test]
    fn test_markets_response_cursor() {
        let page: MarketsResponse =
            serde_json::from_value(json!({ "cursor": 50, "markets": [] })).unwrap();
        assert_eq!(page.next_cursor(), Some(50));
        let last: MarketsResponse =
            serde_json::from_value(json!({ "cursor": null, "markets": [] })).unwrap();
        assert_eq!(last.next_cursor(), None);
    }
}
