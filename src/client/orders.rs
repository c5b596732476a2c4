use std::sync::Arc;

use crate::error::Result;
use crate::http::HttpClient;
use crate::request::OrderParams;
use crate::types::{OrderResponse, OrderStatusResponse};

/// Client for prediction market orders (requires an API key)
#[derive(Debug, Clone)]
pub struct OrdersClient {
    http: Arc<HttpClient>,
}

impl OrdersClient {
    pub(crate) fn new(http: Arc<HttpClient>) -> Self {
        Self { http }
    }

    /// Get an unsigned order transaction
    ///
    /// The returned transaction must be signed by `user_public_key` and sent
    /// to the ledger; see [`crate::ledger::sign_send_and_confirm`].
    pub async fn get_order(&self, params: &OrderParams) -> Result<OrderResponse> {
        self.http.get("/order", &params.to_query_params()).await
    }

    /// Get the status of a submitted order by transaction signature
    pub async fn get_order_status(&self, signature: &str) -> Result<OrderStatusResponse> {
        self.http
            .get("/order-status", &[("signature", signature.to_string())])
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::USDC_MINT;
    use std::time::Duration;

    #[test]
    fn test_order_query_defaults_slippage() {
        let http = HttpClient::new("https://quote.example.com", Some("key"), Duration::from_secs(5))
            .unwrap();
        let params = OrderParams::new(USDC_MINT, "YesMint", 1_000_000, "Wallet");
        let req = http.build_get("/order", &params.to_query_params()).unwrap();
        let query = req.url().query().unwrap_or_default().to_string();
        assert!(query.contains("slippageBps=50"));
        assert!(query.contains("amount=1000000"));
        assert!(!query.contains("platformFee"));
        assert_eq!(req.headers()["x-api-key"], "key");
    }
}
