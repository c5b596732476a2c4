use std::sync::Arc;

use crate::error::Result;
use crate::http::HttpClient;
use crate::types::Orderbook;

/// Client for market orderbook snapshots
#[derive(Debug, Clone)]
pub struct OrderbookClient {
    http: Arc<HttpClient>,
}

impl OrderbookClient {
    pub(crate) fn new(http: Arc<HttpClient>) -> Self {
        Self { http }
    }

    /// Get the orderbook for a market ticker
    pub async fn get_orderbook(&self, ticker: &str) -> Result<Orderbook> {
        self.http.get(&format!("/orderbook/{}", ticker), &[]).await
    }

    /// Get the orderbook for a market mint
    pub async fn get_orderbook_by_mint(&self, mint: &str) -> Result<Orderbook> {
        self.http
            .get(&format!("/orderbook/by-mint/{}", mint), &[])
            .await
    }
}
