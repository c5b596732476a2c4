use std::sync::Arc;

use crate::config::{MAX_BATCH_SIZE, MAX_FILTER_ADDRESSES};
use crate::error::{Error, Result};
use crate::http::HttpClient;
use crate::pagination::AsyncPaginator;
use crate::request::{AddressesBody, BatchBody, CandlestickParams, MarketsParams};
use crate::types::{
    Candlestick, CandlesticksBody, FilterOutcomeMintsBody, Market, MarketsBatchBody,
    MarketsResponse, OutcomeMintsBody,
};

/// Client for market metadata, outcome mints and market candlesticks
#[derive(Debug, Clone)]
pub struct MarketsClient {
    http: Arc<HttpClient>,
}

impl MarketsClient {
    pub(crate) fn new(http: Arc<HttpClient>) -> Self {
        Self { http }
    }

    /// Get a market by ticker
    pub async fn get_market(&self, ticker: &str) -> Result<Market> {
        self.http.get(&format!("/market/{}", ticker), &[]).await
    }

    /// Get a market by any of its mints (ledger or outcome)
    pub async fn get_market_by_mint(&self, mint: &str) -> Result<Market> {
        self.http
            .get(&format!("/market/by-mint/{}", mint), &[])
            .await
    }

    /// Get one page of markets
    pub async fn get_markets(&self, params: &MarketsParams) -> Result<MarketsResponse> {
        self.http.get("/markets", &params.to_query_params()).await
    }

    /// Walk every market matching `params`, fetching pages on demand
    ///
    /// # Example
    ///
    /// ```no_run
    /// use dflow_rs::{ClientConfig, DFlowClient, MarketStatus, MarketsParams};
    ///
    /// # async fn run() -> dflow_rs::Result<()> {
    /// let client = DFlowClient::new(ClientConfig::default())?;
    /// let active = client
    ///     .markets()
    ///     .paginate_markets(MarketsParams::new().with_status(MarketStatus::Active))
    ///     .page_size(50)
    ///     .max_items(200)
    ///     .collect_all()
    ///     .await?;
    /// println!("{} active markets", active.len());
    /// # Ok(())
    /// # }
    /// ```
    pub fn paginate_markets(
        &self,
        params: MarketsParams,
    ) -> AsyncPaginator<'static, MarketsResponse, Market, u64, Error> {
        let http = self.http.clone();
        AsyncPaginator::new(
            move |page| {
                let http = http.clone();
                let query = params.clone().with_page(page).to_query_params();
                async move { http.get::<MarketsResponse>("/markets", &query).await }
            },
            |response: MarketsResponse| response.markets,
        )
    }

    /// Get up to 100 markets by ticker and/or mint in one request
    pub async fn get_markets_batch(
        &self,
        tickers: &[String],
        mints: &[String],
    ) -> Result<Vec<Market>> {
        check_batch_size(tickers.len() + mints.len())?;
        let body: MarketsBatchBody = self
            .http
            .post("/markets/batch", &BatchBody { tickers, mints })
            .await?;
        Ok(body.into_markets())
    }

    /// Get every outcome mint, optionally only for markets closing after `min_close_ts`
    pub async fn get_outcome_mints(&self, min_close_ts: Option<i64>) -> Result<Vec<String>> {
        let query: Vec<(&str, String)> = min_close_ts
            .map(|ts| vec![("minCloseTs", ts.to_string())])
            .unwrap_or_default();
        let body: OutcomeMintsBody = self.http.get("/outcome_mints", &query).await?;
        Ok(body.mints)
    }

    /// Keep only the addresses that are outcome mints (at most 200 addresses)
    pub async fn filter_outcome_mints(&self, addresses: &[String]) -> Result<Vec<String>> {
        if addresses.len() > MAX_FILTER_ADDRESSES {
            return Err(Error::InvalidParameter(format!(
                "Address count exceeds maximum of {} items",
                MAX_FILTER_ADDRESSES
            )));
        }
        let body: FilterOutcomeMintsBody = self
            .http
            .post("/filter_outcome_mints", &AddressesBody { addresses })
            .await?;
        Ok(body.outcome_mints)
    }

    /// Get candlesticks for a market by ticker
    pub async fn get_market_candlesticks(
        &self,
        ticker: &str,
        params: &CandlestickParams,
    ) -> Result<Vec<Candlestick>> {
        let path = format!("/market/{}/candlesticks", ticker);
        let body: CandlesticksBody = self.http.get(&path, &params.to_query_params()).await?;
        Ok(body.candlesticks)
    }

    /// Get candlesticks for a market by mint
    pub async fn get_market_candlesticks_by_mint(
        &self,
        mint: &str,
        params: &CandlestickParams,
    ) -> Result<Vec<Candlestick>> {
        let path = format!("/market/by-mint/{}/candlesticks", mint);
        let body: CandlesticksBody = self.http.get(&path, &params.to_query_params()).await?;
        Ok(body.candlesticks)
    }
}

fn check_batch_size(total: usize) -> Result<()> {
    if total > MAX_BATCH_SIZE {
        return Err(Error::InvalidParameter(format!(
            "Batch size exceeds maximum of {} items",
            MAX_BATCH_SIZE
        )));
    }
    Ok(())
}
