//! Typed request parameters.
//!
//! Every `to_query_params` serializes only the values that are present, under
//! the exact (camelCase) names the endpoints expect. List filters are
//! comma-joined unless noted otherwise.

use serde::Serialize;

use crate::config::DEFAULT_SLIPPAGE_BPS;
use crate::pagination::PageRequest;
use crate::types::{
    IntentMode, IntentQuote, MarketStatus, PeriodInterval, PriorityFee, SortField, SortOrder,
    SwapQuote,
};

/// Query parameters in wire order
pub type QueryParams = Vec<(&'static str, String)>;

fn push<T: ToString>(params: &mut QueryParams, key: &'static str, value: Option<T>) {
    if let Some(value) = value {
        params.push((key, value.to_string()));
    }
}

fn push_list(params: &mut QueryParams, key: &'static str, values: Option<&[String]>) {
    if let Some(values) = values.filter(|v| !v.is_empty()) {
        params.push((key, values.join(",")));
    }
}

/// Filters for `GET /events`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EventsParams {
    pub status: Option<MarketStatus>,
    pub series_tickers: Option<Vec<String>>,
    pub with_nested_markets: Option<bool>,
    pub is_initialized: Option<bool>,
    pub sort: Option<SortField>,
    pub limit: Option<u32>,
    pub cursor: Option<u64>,
}

impl EventsParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_status(mut self, status: MarketStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn with_series_tickers(mut self, tickers: Vec<String>) -> Self {
        self.series_tickers = Some(tickers);
        self
    }

    pub fn with_nested_markets(mut self, nested: bool) -> Self {
        self.with_nested_markets = Some(nested);
        self
    }

    pub fn with_sort(mut self, sort: SortField) -> Self {
        self.sort = Some(sort);
        self
    }

    /// Apply the cursor and limit of a page request
    pub fn with_page(mut self, page: PageRequest<u64>) -> Self {
        self.cursor = page.cursor.or(self.cursor);
        self.limit = page.limit.or(self.limit);
        self
    }

    pub fn to_query_params(&self) -> QueryParams {
        let mut params = Vec::new();
        push(&mut params, "status", self.status.map(|s| s.as_str()));
        push_list(&mut params, "seriesTickers", self.series_tickers.as_deref());
        push(&mut params, "withNestedMarkets", self.with_nested_markets);
        push(&mut params, "isInitialized", self.is_initialized);
        push(&mut params, "sort", self.sort.map(|s| s.as_str()));
        push(&mut params, "limit", self.limit);
        push(&mut params, "cursor", self.cursor);
        params
    }
}

/// Filters for `GET /markets`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MarketsParams {
    pub status: Option<MarketStatus>,
    pub is_initialized: Option<bool>,
    pub sort: Option<SortField>,
    pub tickers: Option<Vec<String>>,
    pub event_ticker: Option<String>,
    pub series_ticker: Option<String>,
    pub max_close_ts: Option<i64>,
    pub min_close_ts: Option<i64>,
    pub limit: Option<u32>,
    pub cursor: Option<u64>,
}

impl MarketsParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_status(mut self, status: MarketStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn with_event_ticker(mut self, ticker: impl Into<String>) -> Self {
        self.event_ticker = Some(ticker.into());
        self
    }

    pub fn with_series_ticker(mut self, ticker: impl Into<String>) -> Self {
        self.series_ticker = Some(ticker.into());
        self
    }

    pub fn with_sort(mut self, sort: SortField) -> Self {
        self.sort = Some(sort);
        self
    }

    pub fn with_page(mut self, page: PageRequest<u64>) -> Self {
        self.cursor = page.cursor.or(self.cursor);
        self.limit = page.limit.or(self.limit);
        self
    }

    pub fn to_query_params(&self) -> QueryParams {
        let mut params = Vec::new();
        push(&mut params, "status", self.status.map(|s| s.as_str()));
        push(&mut params, "isInitialized", self.is_initialized);
        push(&mut params, "sort", self.sort.map(|s| s.as_str()));
        push_list(&mut params, "tickers", self.tickers.as_deref());
        push(&mut params, "eventTicker", self.event_ticker.as_deref());
        push(&mut params, "seriesTicker", self.series_ticker.as_deref());
        push(&mut params, "maxCloseTs", self.max_close_ts);
        push(&mut params, "minCloseTs", self.min_close_ts);
        push(&mut params, "limit", self.limit);
        push(&mut params, "cursor", self.cursor);
        params
    }
}

/// Filters for `GET /trades` and `GET /trades/by-mint/{mint}`
///
/// `ticker` is ignored by the by-mint endpoint.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TradesParams {
    pub ticker: Option<String>,
    pub start_timestamp: Option<i64>,
    pub end_timestamp: Option<i64>,
    pub limit: Option<u32>,
    pub cursor: Option<String>,
}

impl TradesParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_ticker(mut self, ticker: impl Into<String>) -> Self {
        self.ticker = Some(ticker.into());
        self
    }

    pub fn with_time_range(mut self, start: i64, end: i64) -> Self {
        self.start_timestamp = Some(start);
        self.end_timestamp = Some(end);
        self
    }

    pub fn with_page(mut self, page: PageRequest<String>) -> Self {
        self.cursor = page.cursor.or(self.cursor);
        self.limit = page.limit.or(self.limit);
        self
    }

    pub fn to_query_params(&self) -> QueryParams {
        let mut params = Vec::new();
        push(&mut params, "marketTicker", self.ticker.as_deref());
        self.push_window(&mut params);
        params
    }

    pub(crate) fn to_query_params_by_mint(&self) -> QueryParams {
        let mut params = Vec::new();
        self.push_window(&mut params);
        params
    }

    fn push_window(&self, params: &mut QueryParams) {
        push(params, "startTimestamp", self.start_timestamp);
        push(params, "endTimestamp", self.end_timestamp);
        push(params, "limit", self.limit);
        push(params, "cursor", self.cursor.as_deref());
    }
}

/// Filters for `GET /series`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SeriesParams {
    pub category: Option<String>,
    pub tags: Option<Vec<String>>,
    pub is_initialized: Option<bool>,
    pub status: Option<MarketStatus>,
}

impl SeriesParams {
    pub fn to_query_params(&self) -> QueryParams {
        let mut params = Vec::new();
        push(&mut params, "category", self.category.as_deref());
        push_list(&mut params, "tags", self.tags.as_deref());
        push(&mut params, "isInitialized", self.is_initialized);
        push(&mut params, "status", self.status.map(|s| s.as_str()));
        params
    }
}

/// Full-text search over events
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchParams {
    pub query: String,
    pub sort: Option<SortField>,
    pub order: Option<SortOrder>,
    pub limit: Option<u32>,
    pub cursor: Option<u64>,
    pub with_nested_markets: Option<bool>,
    pub with_market_accounts: Option<bool>,
    pub status: Option<MarketStatus>,
    /// Entity kind to search for; passed through verbatim
    pub entity_type: Option<String>,
}

impl SearchParams {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            ..Self::default()
        }
    }

    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn with_page(mut self, page: PageRequest<u64>) -> Self {
        self.cursor = page.cursor.or(self.cursor);
        self.limit = page.limit.or(self.limit);
        self
    }

    pub fn to_query_params(&self) -> QueryParams {
        let mut params = vec![("q", self.query.clone())];
        push(&mut params, "sort", self.sort.map(|s| s.as_str()));
        push(&mut params, "order", self.order.map(|o| o.as_str()));
        push(&mut params, "limit", self.limit);
        push(&mut params, "cursor", self.cursor);
        push(&mut params, "withNestedMarkets", self.with_nested_markets);
        push(&mut params, "withMarketAccounts", self.with_market_accounts);
        push(&mut params, "status", self.status.map(|s| s.as_str()));
        push(&mut params, "entityType", self.entity_type.as_deref());
        params
    }
}

/// Time window for candlestick endpoints
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CandlestickParams {
    pub start_ts: i64,
    pub end_ts: i64,
    pub period_interval: PeriodInterval,
}

impl CandlestickParams {
    pub fn new(start_ts: i64, end_ts: i64, period_interval: PeriodInterval) -> Self {
        Self {
            start_ts,
            end_ts,
            period_interval,
        }
    }

    pub fn to_query_params(&self) -> QueryParams {
        vec![
            ("startTs", self.start_ts.to_string()),
            ("endTs", self.end_ts.to_string()),
            ("periodInterval", self.period_interval.minutes().to_string()),
        ]
    }
}

/// Window and percentiles for forecast history endpoints
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForecastParams {
    pub percentiles: Vec<u32>,
    pub start_ts: i64,
    pub end_ts: i64,
    pub period_interval: PeriodInterval,
}

impl ForecastParams {
    pub fn to_query_params(&self) -> QueryParams {
        let percentiles: Vec<String> = self.percentiles.iter().map(u32::to_string).collect();
        vec![
            ("percentiles", percentiles.join(",")),
            ("startTs", self.start_ts.to_string()),
            ("endTs", self.end_ts.to_string()),
            ("periodInterval", self.period_interval.minutes().to_string()),
        ]
    }
}

/// Milestone filters for the live data by-event and by-mint endpoints
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LiveDataFilter {
    /// RFC 3339 lower bound on milestone start
    pub minimum_start_date: Option<String>,
    pub category: Option<String>,
    pub competition: Option<String>,
    pub source_id: Option<String>,
    pub milestone_type: Option<String>,
}

impl LiveDataFilter {
    pub fn to_query_params(&self) -> QueryParams {
        let mut params = Vec::new();
        push(&mut params, "minimumStartDate", self.minimum_start_date.as_deref());
        push(&mut params, "category", self.category.as_deref());
        push(&mut params, "competition", self.competition.as_deref());
        push(&mut params, "sourceId", self.source_id.as_deref());
        push(&mut params, "type", self.milestone_type.as_deref());
        params
    }
}

/// Order request for `GET /order`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderParams {
    pub input_mint: String,
    pub output_mint: String,
    /// Amount in base units of `input_mint`
    pub amount: u64,
    pub slippage_bps: u32,
    pub user_public_key: String,
    pub platform_fee_bps: Option<u32>,
    pub platform_fee_account: Option<String>,
}

impl OrderParams {
    pub fn new(
        input_mint: impl Into<String>,
        output_mint: impl Into<String>,
        amount: u64,
        user_public_key: impl Into<String>,
    ) -> Self {
        Self {
            input_mint: input_mint.into(),
            output_mint: output_mint.into(),
            amount,
            slippage_bps: DEFAULT_SLIPPAGE_BPS,
            user_public_key: user_public_key.into(),
            platform_fee_bps: None,
            platform_fee_account: None,
        }
    }

    pub fn with_slippage_bps(mut self, slippage_bps: u32) -> Self {
        self.slippage_bps = slippage_bps;
        self
    }

    pub fn with_platform_fee(mut self, fee_bps: u32, account: impl Into<String>) -> Self {
        self.platform_fee_bps = Some(fee_bps);
        self.platform_fee_account = Some(account.into());
        self
    }

    pub fn to_query_params(&self) -> QueryParams {
        let mut params = vec![
            ("inputMint", self.input_mint.clone()),
            ("outputMint", self.output_mint.clone()),
            ("amount", self.amount.to_string()),
            ("slippageBps", self.slippage_bps.to_string()),
            ("userPublicKey", self.user_public_key.clone()),
        ];
        push(&mut params, "platformFeeBps", self.platform_fee_bps);
        push(&mut params, "platformFeeAccount", self.platform_fee_account.as_deref());
        params
    }
}

/// Quote request for `GET /quote`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuoteParams {
    pub input_mint: String,
    pub output_mint: String,
    pub amount: u64,
    pub slippage_bps: Option<u32>,
}

impl QuoteParams {
    pub fn new(input_mint: impl Into<String>, output_mint: impl Into<String>, amount: u64) -> Self {
        Self {
            input_mint: input_mint.into(),
            output_mint: output_mint.into(),
            amount,
            slippage_bps: None,
        }
    }

    pub fn with_slippage_bps(mut self, slippage_bps: u32) -> Self {
        self.slippage_bps = Some(slippage_bps);
        self
    }

    pub fn to_query_params(&self) -> QueryParams {
        let mut params = vec![
            ("inputMint", self.input_mint.clone()),
            ("outputMint", self.output_mint.clone()),
            ("amount", self.amount.to_string()),
        ];
        push(&mut params, "slippageBps", self.slippage_bps);
        params
    }
}

/// Swap request: quotes first, then builds a transaction for `user_public_key`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SwapParams {
    pub quote: QuoteParams,
    pub user_public_key: String,
    pub wrap_unwrap_sol: Option<bool>,
    pub priority_fee: Option<PriorityFee>,
}

impl SwapParams {
    pub fn new(quote: QuoteParams, user_public_key: impl Into<String>) -> Self {
        Self {
            quote,
            user_public_key: user_public_key.into(),
            wrap_unwrap_sol: None,
            priority_fee: None,
        }
    }

    pub fn with_wrap_unwrap_sol(mut self, wrap: bool) -> Self {
        self.wrap_unwrap_sol = Some(wrap);
        self
    }

    pub fn with_priority_fee(mut self, fee: PriorityFee) -> Self {
        self.priority_fee = Some(fee);
        self
    }

    pub(crate) fn body<'a>(&'a self, quote: &'a SwapQuote) -> SwapBody<'a> {
        SwapBody {
            quote_response: quote,
            user_public_key: &self.user_public_key,
            wrap_unwrap_sol: self.wrap_unwrap_sol,
            priority_fee: self.priority_fee,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SwapBody<'a> {
    pub quote_response: &'a SwapQuote,
    pub user_public_key: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wrap_unwrap_sol: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority_fee: Option<PriorityFee>,
}

/// Intent quote request for `GET /intent`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntentParams {
    pub input_mint: String,
    pub output_mint: String,
    pub amount: u64,
    pub mode: IntentMode,
}

impl IntentParams {
    pub fn new(
        input_mint: impl Into<String>,
        output_mint: impl Into<String>,
        amount: u64,
        mode: IntentMode,
    ) -> Self {
        Self {
            input_mint: input_mint.into(),
            output_mint: output_mint.into(),
            amount,
            mode,
        }
    }

    pub fn to_query_params(&self) -> QueryParams {
        vec![
            ("inputMint", self.input_mint.clone()),
            ("outputMint", self.output_mint.clone()),
            ("amount", self.amount.to_string()),
            ("mode", self.mode.as_str().to_string()),
        ]
    }
}

/// Intent submission: quotes first, then submits for `user_public_key`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitIntentParams {
    pub intent: IntentParams,
    pub user_public_key: String,
    pub slippage_bps: Option<u32>,
    pub priority_fee: Option<PriorityFee>,
}

impl SubmitIntentParams {
    pub fn new(intent: IntentParams, user_public_key: impl Into<String>) -> Self {
        Self {
            intent,
            user_public_key: user_public_key.into(),
            slippage_bps: None,
            priority_fee: None,
        }
    }

    pub fn with_slippage_bps(mut self, slippage_bps: u32) -> Self {
        self.slippage_bps = Some(slippage_bps);
        self
    }

    pub fn with_priority_fee(mut self, fee: PriorityFee) -> Self {
        self.priority_fee = Some(fee);
        self
    }

    pub(crate) fn body<'a>(&'a self, quote: &'a IntentQuote) -> SubmitIntentBody<'a> {
        SubmitIntentBody {
            quote_response: quote,
            user_public_key: &self.user_public_key,
            slippage_bps: self.slippage_bps,
            priority_fee: self.priority_fee,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SubmitIntentBody<'a> {
    pub quote_response: &'a IntentQuote,
    pub user_public_key: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slippage_bps: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority_fee: Option<PriorityFee>,
}

#[derive(Debug, Serialize)]
pub(crate) struct BatchBody<'a> {
    pub tickers: &'a [String],
    pub mints: &'a [String],
}

#[derive(Debug, Serialize)]
pub(crate) struct AddressesBody<'a> {
    pub addresses: &'a [String],
}
