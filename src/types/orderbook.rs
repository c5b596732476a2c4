use std::collections::HashMap;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Single aggregated price level
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderbookLevel {
    pub price: Decimal,
    pub quantity: Decimal,
}

/// Orderbook snapshot for a market
///
/// The server keys resting bids by their price string; use [`Orderbook::yes_levels`]
/// and [`Orderbook::no_levels`] for levels sorted best price first.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Orderbook {
    #[serde(default, alias = "yesBids")]
    pub yes_bids: HashMap<String, u64>,
    #[serde(default, alias = "noBids")]
    pub no_bids: HashMap<String, u64>,
    #[serde(default, alias = "timestamp")]
    pub sequence: u64,
}

impl Orderbook {
    pub fn yes_levels(&self) -> Vec<OrderbookLevel> {
        sorted_levels(&self.yes_bids)
    }

    pub fn no_levels(&self) -> Vec<OrderbookLevel> {
        sorted_levels(&self.no_bids)
    }

    pub fn best_yes_bid(&self) -> Option<OrderbookLevel> {
        self.yes_levels().into_iter().next()
    }

    pub fn best_no_bid(&self) -> Option<OrderbookLevel> {
        self.no_levels().into_iter().next()
    }
}

// Keys that are not valid decimals are skipped.
fn sorted_levels(bids: &HashMap<String, u64>) -> Vec<OrderbookLevel> {
    let mut levels: Vec<OrderbookLevel> = bids
        .iter()
        .filter_map(|(price, qty)| {
            Decimal::from_str(price).ok().map(|price| OrderbookLevel {
                price,
                quantity: Decimal::from(*qty),
            })
        })
        .collect();
    levels.sort_by(|a, b| b.price.cmp(&a.price));
    levels
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    #[test]
    fn test_levels_sorted_best_first() {
        let book: Orderbook = serde_json::from_str(
            r#"{"yes_bids":{"0.41":10,"0.45":3,"bad":1},"no_bids":{},"sequence":7}"#,
        )
        .unwrap();
        let levels = book.yes_levels();
        assert_eq!(levels.len(), 2);
        assert_eq!(levels[0].price, dec("0.45"));
        assert_eq!(levels[0].quantity, Decimal::from(3));
        assert_eq!(levels[1].price, dec("0.41"));
        assert!(book.best_no_bid().is_none());
        assert_eq!(book.sequence, 7);
    }
}
