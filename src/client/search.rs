use std::sync::Arc;

use crate::error::{Error, Result};
use crate::http::HttpClient;
use crate::pagination::AsyncPaginator;
use crate::request::SearchParams;
use crate::types::{Event, SearchResponse};

/// Full-text search over events and their markets
#[derive(Debug, Clone)]
pub struct SearchClient {
    http: Arc<HttpClient>,
}

impl SearchClient {
    pub(crate) fn new(http: Arc<HttpClient>) -> Self {
        Self { http }
    }

    pub async fn search(&self, params: &SearchParams) -> Result<SearchResponse> {
        self.http.get("/search", &params.to_query_params()).await
    }

    pub fn paginate_search(
        &self,
        params: SearchParams,
    ) -> AsyncPaginator<'static, SearchResponse, Event, u64, Error> {
        let http = self.http.clone();
        AsyncPaginator::new(
            move |page| {
                let http = http.clone();
                let query = params.clone().with_page(page).to_query_params();
                async move { http.get::<SearchResponse>("/search", &query).await }
            },
            |response: SearchResponse| response.events,
        )
    }
}
