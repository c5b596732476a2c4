use std::sync::Arc;

use crate::error::Result;
use crate::http::HttpClient;
use crate::request::SeriesParams;
use crate::types::{CategoryTags, Series, SeriesBody, SportsFilters, TagsByCategoriesBody};

/// Client for series templates and the category/sport taxonomies used to filter them
#[derive(Debug, Clone)]
pub struct SeriesClient {
    http: Arc<HttpClient>,
}

impl SeriesClient {
    pub(crate) fn new(http: Arc<HttpClient>) -> Self {
        Self { http }
    }

    pub async fn get_series(&self, params: &SeriesParams) -> Result<Vec<Series>> {
        let body: SeriesBody = self.http.get("/series", &params.to_query_params()).await?;
        Ok(body.series)
    }

    pub async fn get_series_by_ticker(&self, ticker: &str) -> Result<Series> {
        self.http.get(&format!("/series/{}", ticker), &[]).await
    }

    /// Tags grouped by series category
    pub async fn get_tags_by_categories(&self) -> Result<CategoryTags> {
        let body: TagsByCategoriesBody = self.http.get("/tags_by_categories", &[]).await?;
        Ok(body.into_tags())
    }

    /// Filtering options per sport, with the preferred display order
    pub async fn get_filters_by_sports(&self) -> Result<SportsFilters> {
        self.http.get("/filters_by_sports", &[]).await
    }
}
