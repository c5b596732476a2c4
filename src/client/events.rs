use std::collections::HashMap;
use std::sync::Arc;

use crate::error::{Error, Result};
use crate::http::HttpClient;
use crate::pagination::AsyncPaginator;
use crate::request::{CandlestickParams, EventsParams, ForecastParams};
use crate::types::{
    Event, EventCandlesticksBody, EventsResponse, ForecastHistory, MarketCandlestick,
};

/// Client for event metadata
///
/// Events group related markets under one question.
#[derive(Debug, Clone)]
pub struct EventsClient {
    http: Arc<HttpClient>,
}

impl EventsClient {
    pub(crate) fn new(http: Arc<HttpClient>) -> Self {
        Self { http }
    }

    /// Get a single event by ticker
    ///
    /// # Arguments
    /// * `event_id` - The event ticker
    /// * `with_nested_markets` - Include the event's markets in the response
    pub async fn get_event(&self, event_id: &str, with_nested_markets: bool) -> Result<Event> {
        let query = [("withNestedMarkets", with_nested_markets.to_string())];
        self.http.get(&format!("/event/{}", event_id), &query).await
    }

    /// Get one page of events
    pub async fn get_events(&self, params: &EventsParams) -> Result<EventsResponse> {
        self.http.get("/events", &params.to_query_params()).await
    }

    /// Walk every event matching `params`, fetching pages on demand
    pub fn paginate_events(
        &self,
        params: EventsParams,
    ) -> AsyncPaginator<'static, EventsResponse, Event, u64, Error> {
        let http = self.http.clone();
        AsyncPaginator::new(
            move |page| {
                let http = http.clone();
                let query = params.clone().with_page(page).to_query_params();
                async move { http.get::<EventsResponse>("/events", &query).await }
            },
            |response: EventsResponse| response.events,
        )
    }

    /// Get forecast percentile history for an event
    ///
    /// # Arguments
    /// * `series_ticker` - Series the event belongs to
    /// * `event_id` - The event identifier within the series
    pub async fn get_event_forecast_history(
        &self,
        series_ticker: &str,
        event_id: &str,
        params: &ForecastParams,
    ) -> Result<ForecastHistory> {
        let path = format!(
            "/event/{}/{}/forecast_percentile_history",
            series_ticker, event_id
        );
        self.http.get(&path, &params.to_query_params()).await
    }

    /// Get forecast percentile history for the event owning `mint`
    pub async fn get_event_forecast_by_mint(
        &self,
        mint: &str,
        params: &ForecastParams,
    ) -> Result<ForecastHistory> {
        let path = format!("/event/by-mint/{}/forecast_percentile_history", mint);
        self.http.get(&path, &params.to_query_params()).await
    }

    /// Get candlesticks for every market of an event, keyed by market ticker
    ///
    /// Markets without candle data are left out of the map.
    pub async fn get_event_candlesticks(
        &self,
        event_ticker: &str,
        params: &CandlestickParams,
    ) -> Result<HashMap<String, Vec<MarketCandlestick>>> {
        let path = format!("/event/{}/candlesticks", event_ticker);
        let body: EventCandlesticksBody = self.http.get(&path, &params.to_query_params()).await?;
        Ok(zip_candlesticks(body))
    }
}

fn zip_candlesticks(body: EventCandlesticksBody) -> HashMap<String, Vec<MarketCandlestick>> {
    body.market_tickers
        .into_iter()
        .zip(body.market_candlesticks)
        .filter_map(|(ticker, candles)| candles.map(|candles| (ticker, candles)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_zip_skips_missing_candles() {
        let body: EventCandlesticksBody = serde_json::from_str(
            r#"{"marketTickers":["A","B","C"],"marketCandlesticks":[[],null,[]]}"#,
        )
        .unwrap();
        let map = zip_candlesticks(body);
        assert_eq!(map.len(), 2);
        assert!(map.contains_key("A"));
        assert!(!map.contains_key("B"));
    }

    #[test]
    fn test_event_request_sends_nested_flag() {
        let http = HttpClient::new("https://api.example.com/api/v1", None, Duration::from_secs(5))
            .unwrap();
        let req = http
            .build_get("/event/EVT-1", &[("withNestedMarkets", true.to_string())])
            .unwrap();
        assert_eq!(
            req.url().as_str(),
            "https://api.example.com/api/v1/event/EVT-1?withNestedMarkets=true"
        );
    }
}
