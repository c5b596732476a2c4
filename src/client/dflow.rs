use std::sync::Arc;

use tracing::info;

use super::{
    EventsClient, IntentClient, LiveDataClient, MarketsClient, OrderbookClient, OrdersClient,
    PredictionMarketClient, ProofClient, SearchClient, SeriesClient, SwapClient, TokensClient, TradesClient,
};
use crate::config::ClientConfig;
use crate::error::Result;
use crate::http::HttpClient;
use crate::websocket::{StreamClient, StreamConfig};

/// Entry point bundling every API surface
///
/// Metadata endpoints (events, markets, orderbook, trades, series, search,
/// live data) share one HTTP client; trade endpoints (orders, swaps, intents,
/// market initialization, tokens) share another. Proof KYC verification has
/// its own host. The streaming client is created disconnected.
///
/// # Example
///
/// ```no_run
/// use dflow_rs::{ClientConfig, DFlowClient, EventsParams};
///
/// # async fn run() -> dflow_rs::Result<()> {
/// let client = DFlowClient::new(ClientConfig::from_env()?)?;
/// let page = client.events().get_events(&EventsParams::new().with_nested_markets(true)).await?;
/// for event in &page.events {
///     println!("{}: {}", event.ticker, event.title);
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct DFlowClient {
    metadata_http: Arc<HttpClient>,
    trade_http: Arc<HttpClient>,
    proof_http: Arc<HttpClient>,
    events: EventsClient,
    markets: MarketsClient,
    orderbook: OrderbookClient,
    trades: TradesClient,
    series: SeriesClient,
    search: SearchClient,
    live_data: LiveDataClient,
    orders: OrdersClient,
    swap: SwapClient,
    intent: IntentClient,
    prediction_market: PredictionMarketClient,
    tokens: TokensClient,
    proof: ProofClient,
    stream: StreamClient,
}

impl DFlowClient {
    pub fn new(config: ClientConfig) -> Result<Self> {
        let api_key = config.api_key.as_deref();
        let metadata_http = Arc::new(HttpClient::new(
            config.resolved_metadata_url(),
            api_key,
            config.timeout,
        )?);
        let trade_http = Arc::new(HttpClient::new(
            config.resolved_trade_url(),
            api_key,
            config.timeout,
        )?);
        let proof_http = Arc::new(HttpClient::new(
            config.resolved_proof_url(),
            api_key,
            config.timeout,
        )?);
        let stream = StreamClient::new(StreamConfig::new(config.resolved_ws_url()));

        info!(
            environment = ?config.environment,
            metadata_url = metadata_http.base_url(),
            trade_url = trade_http.base_url(),
            authenticated = api_key.is_some(),
            "client created"
        );

        Ok(Self {
            events: EventsClient::new(metadata_http.clone()),
            markets: MarketsClient::new(metadata_http.clone()),
            orderbook: OrderbookClient::new(metadata_http.clone()),
            trades: TradesClient::new(metadata_http.clone()),
            series: SeriesClient::new(metadata_http.clone()),
            search: SearchClient::new(metadata_http.clone()),
            live_data: LiveDataClient::new(metadata_http.clone()),
            orders: OrdersClient::new(trade_http.clone()),
            swap: SwapClient::new(trade_http.clone()),
            intent: IntentClient::new(trade_http.clone()),
            prediction_market: PredictionMarketClient::new(trade_http.clone()),
            tokens: TokensClient::new(trade_http.clone()),
            proof: ProofClient::new(proof_http.clone()),
            metadata_http,
            trade_http,
            proof_http,
            stream,
        })
    }

    /// Replace the API key on every REST surface
    ///
    /// Takes effect for requests built after the call. The streaming client is
    /// unaffected.
    pub fn set_api_key(&self, api_key: &str) -> Result<()> {
        self.metadata_http.set_api_key(api_key)?;
        self.trade_http.set_api_key(api_key)?;
        self.proof_http.set_api_key(api_key)
    }

    pub fn metadata_base_url(&self) -> &str {
        self.metadata_http.base_url()
    }

    pub fn trade_base_url(&self) -> &str {
        self.trade_http.base_url()
    }

    pub fn events(&self) -> &EventsClient {
        &self.events
    }

    pub fn markets(&self) -> &MarketsClient {
        &self.markets
    }

    pub fn orderbook(&self) -> &OrderbookClient {
        &self.orderbook
    }

    pub fn trades(&self) -> &TradesClient {
        &self.trades
    }

    pub fn series(&self) -> &SeriesClient {
        &self.series
    }

    pub fn search(&self) -> &SearchClient {
        &self.search
    }

    pub fn live_data(&self) -> &LiveDataClient {
        &self.live_data
    }

    pub fn orders(&self) -> &OrdersClient {
        &self.orders
    }

    pub fn swap(&self) -> &SwapClient {
        &self.swap
    }

    pub fn intent(&self) -> &IntentClient {
        &self.intent
    }

    pub fn prediction_market(&self) -> &PredictionMarketClient {
        &self.prediction_market
    }

    pub fn tokens(&self) -> &TokensClient {
        &self.tokens
    }

    pub fn proof(&self) -> &ProofClient {
        &self.proof
    }

    pub fn stream(&self) -> &StreamClient {
        &self.stream
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Environment, API_KEY_HEADER, PROD_METADATA_API_BASE_URL};

    #[test]
    fn test_environment_and_overrides() {
        let client = DFlowClient::new(ClientConfig::production("key")).unwrap();
        assert_eq!(client.metadata_base_url(), PROD_METADATA_API_BASE_URL);

        let client = DFlowClient::new(
            ClientConfig::default()
                .with_environment(Environment::Production)
                .with_trade_url("http://localhost:8080/"),
        )
        .unwrap();
        assert_eq!(client.trade_base_url(), "http://localhost:8080");
        assert_eq!(client.metadata_base_url(), PROD_METADATA_API_BASE_URL);
    }

    #[test]
    fn test_set_api_key_updates_every_surface() {
        let client = DFlowClient::new(ClientConfig::default()).unwrap();
        client.set_api_key("fresh").unwrap();
        let metadata = client.metadata_http.build_get("/events", &[]).unwrap();
        let trade = client.trade_http.build_get("/tokens", &[]).unwrap();
        assert_eq!(metadata.headers()[API_KEY_HEADER], "fresh");
        assert_eq!(trade.headers()[API_KEY_HEADER], "fresh");
        let proof = client.proof_http.build_get("/verify/w", &[]).unwrap();
        assert_eq!(proof.headers()[API_KEY_HEADER], "fresh");
        assert_eq!(proof.url().as_str(), "https://proof.dflow.net/verify/w");
    }
}
