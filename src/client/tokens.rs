use std::sync::Arc;

use crate::config::USDC_MINT;
use crate::error::Result;
use crate::http::HttpClient;
use crate::types::{PredictionMarketInitResponse, Token, TokenWithDecimals, Venue};

/// Client for supported tokens and trading venues
#[derive(Debug, Clone)]
pub struct TokensClient {
    http: Arc<HttpClient>,
}

impl TokensClient {
    pub(crate) fn new(http: Arc<HttpClient>) -> Self {
        Self { http }
    }

    pub async fn get_tokens(&self) -> Result<Vec<Token>> {
        self.http.get("/tokens", &[]).await
    }

    pub async fn get_tokens_with_decimals(&self) -> Result<Vec<TokenWithDecimals>> {
        self.http.get("/tokens-with-decimals", &[]).await
    }

    pub async fn get_venues(&self) -> Result<Vec<Venue>> {
        self.http.get("/venues", &[]).await
    }
}

/// Client for creating prediction markets on-chain
#[derive(Debug, Clone)]
pub struct PredictionMarketClient {
    http: Arc<HttpClient>,
}

impl PredictionMarketClient {
    pub(crate) fn new(http: Arc<HttpClient>) -> Self {
        Self { http }
    }

    /// Get the transaction that creates the YES/NO mints of `market_ticker`
    ///
    /// # Arguments
    /// * `market_ticker` - Ticker of the market to initialize
    /// * `user_public_key` - Wallet paying for and signing the transaction
    /// * `settlement_mint` - Settlement token; USDC when `None`
    pub async fn initialize_market(
        &self,
        market_ticker: &str,
        user_public_key: &str,
        settlement_mint: Option<&str>,
    ) -> Result<PredictionMarketInitResponse> {
        let query = [
            ("marketTicker", market_ticker.to_string()),
            ("userPublicKey", user_public_key.to_string()),
            ("settlementMint", settlement_mint.unwrap_or(USDC_MINT).to_string()),
        ];
        self.http.get("/prediction-market-init", &query).await
    }
}
