//! # dflow-rs
//!
//! A Rust client library for the DFlow prediction markets APIs on Solana.
//!
//! This library provides a type-safe interface for:
//! - Event, market, orderbook, trade, series and live data queries (metadata API)
//! - Orders, swaps, intents and market initialization (trade API)
//! - Proof KYC wallet verification
//! - Real-time WebSocket streaming of prices, trades and orderbook changes
//! - Signing, sending and confirming the transactions those APIs return
//! - Position tracking for a wallet's outcome tokens
//!
//! ## Features
//!
//! - **Cursor pagination**: lazy sync iterators and async streams over any paginated endpoint
//! - **Retry policy**: bounded exponential backoff with jitter and a pluggable predicate
//! - **Resilient streaming**: automatic reconnection that restores subscriptions
//! - **Proper Error Handling**: No panics, one error type carrying HTTP status and body
//! - **Decimal Precision**: Accurate decimal math for scalar payouts and orderbook levels
//!
//! ## Example
//!
//! ```no_run
//! use dflow_rs::{ClientConfig, DFlowClient, MarketStatus, MarketsParams};
//!
//! #[tokio::main]
//! async fn main() -> dflow_rs::Result<()> {
//!     let client = DFlowClient::new(ClientConfig::default())?;
//!     let page = client
//!         .markets()
//!         .get_markets(&MarketsParams::new().with_status(MarketStatus::Active))
//!         .await?;
//!     for market in page.markets {
//!         println!("{} yes={:?}", market.ticker, market.yes_price());
//!     }
//!     Ok(())
//! }
//! ```

// Public modules
pub mod client;
pub mod config;
pub mod error;
pub mod ledger;
pub mod pagination;
pub mod request;
pub mod retry;
pub mod types;
pub mod websocket;

// Internal modules
mod http;

// Re-export commonly used types
pub use config::{
    ClientConfig, Environment, PROOF_API_BASE_URL, PROOF_DEEP_LINK_BASE_URL,
    PROOF_SIGNATURE_MESSAGE_PREFIX, SOL_MINT, USDC_MINT,
};
pub use error::{Error, Result};
pub use request::{
    CandlestickParams, EventsParams, ForecastParams, IntentParams, LiveDataFilter,
    MarketsParams, OrderParams, QuoteParams, SearchParams, SeriesParams, SubmitIntentParams,
    SwapParams, TradesParams,
};
pub use types::{
    Channel, Commitment, DeepLinkParams, Event, Market, MarketStatus, Orderbook, PeriodInterval,
    PositionKind, Trade, UserPosition, VerifyAddressResponse,
};

// Re-export clients
pub use client::{
    DFlowClient, EventsClient, IntentClient, LiveDataClient, MarketsClient, OrderbookClient,
    OrdersClient, PredictionMarketClient, ProofClient, SearchClient, SeriesClient, SwapClient,
    TokensClient, TradesClient,
};

// Re-export the streaming client
pub use websocket::{StreamClient, StreamConfig};

// Re-export pagination and retry helpers
pub use pagination::{AsyncPaginator, CursorPage, PageCursor, PageRequest, Paginator};
pub use retry::{with_retry, with_retry_blocking, RetryConfig, RetryPolicy};
