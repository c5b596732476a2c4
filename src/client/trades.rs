use std::sync::Arc;

use crate::error::{Error, Result};
use crate::http::HttpClient;
use crate::pagination::AsyncPaginator;
use crate::request::TradesParams;
use crate::types::{Trade, TradesResponse};

/// Client for executed trades; pages are addressed by an opaque string cursor
#[derive(Debug, Clone)]
pub struct TradesClient {
    http: Arc<HttpClient>,
}

impl TradesClient {
    pub(crate) fn new(http: Arc<HttpClient>) -> Self {
        Self { http }
    }

    pub async fn get_trades(&self, params: &TradesParams) -> Result<TradesResponse> {
        self.http.get("/trades", &params.to_query_params()).await
    }

    /// Trades of the market owning `mint`; `params.ticker` is ignored
    pub async fn get_trades_by_mint(
        &self,
        mint: &str,
        params: &TradesParams,
    ) -> Result<TradesResponse> {
        self.http
            .get(
                &format!("/trades/by-mint/{}", mint),
                &params.to_query_params_by_mint(),
            )
            .await
    }

    pub fn paginate_trades(
        &self,
        params: TradesParams,
    ) -> AsyncPaginator<'static, TradesResponse, Trade, String, Error> {
        let http = self.http.clone();
        AsyncPaginator::new(
            move |page| {
                let http = http.clone();
                let query = params.clone().with_page(page).to_query_params();
                async move { http.get::<TradesResponse>("/trades", &query).await }
            },
            |response: TradesResponse| response.trades,
        )
    }
}
