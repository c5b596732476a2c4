use std::sync::Arc;

use crate::config::MAX_MILESTONE_IDS;
use crate::error::{Error, Result};
use crate::http::HttpClient;
use crate::request::LiveDataFilter;
use crate::types::{LiveData, LiveDataBody};

/// Client for live milestone data relayed from the upstream exchange
#[derive(Debug, Clone)]
pub struct LiveDataClient {
    http: Arc<HttpClient>,
}

impl LiveDataClient {
    pub(crate) fn new(http: Arc<HttpClient>) -> Self {
        Self { http }
    }

    /// Get live data for up to 100 milestones
    pub async fn get_live_data(&self, milestone_ids: &[String]) -> Result<Vec<LiveData>> {
        let body: LiveDataBody = self
            .http
            .get("/live_data", &milestone_query(milestone_ids)?)
            .await?;
        Ok(body.data)
    }

    /// Get every milestone of an event, optionally filtered
    pub async fn get_live_data_by_event(
        &self,
        event_ticker: &str,
        filter: &LiveDataFilter,
    ) -> Result<LiveData> {
        self.http
            .get(
                &format!("/live_data/by-event/{}", event_ticker),
                &filter.to_query_params(),
            )
            .await
    }

    /// Get every milestone of the event owning `mint`, optionally filtered
    pub async fn get_live_data_by_mint(
        &self,
        mint: &str,
        filter: &LiveDataFilter,
    ) -> Result<LiveData> {
        self.http
            .get(
                &format!("/live_data/by-mint/{}", mint),
                &filter.to_query_params(),
            )
            .await
    }
}

// Ids go out as repeated `milestoneIds` keys.
fn milestone_query(milestone_ids: &[String]) -> Result<Vec<(&'static str, String)>> {
    if milestone_ids.len() > MAX_MILESTONE_IDS {
        return Err(Error::InvalidParameter(format!(
            "Milestone count exceeds maximum of {} items",
            MAX_MILESTONE_IDS
        )));
    }
    Ok(milestone_ids
        .iter()
        .map(|id| ("milestoneIds", id.clone()))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_milestone_ids_are_repeated_keys() {
        let http = HttpClient::new("https://api.example.com/api/v1", None, Duration::from_secs(5))
            .unwrap();
        let query = milestone_query(&["m1".to_string(), "m2".to_string()]).unwrap();
        let req = http.build_get("/live_data", &query).unwrap();
        assert_eq!(req.url().query(), Some("milestoneIds=m1&milestoneIds=m2"));
    }

    #[test]
    fn test_milestone_limit() {
        let ids: Vec<String> = (0..101).map(|i| i.to_string()).collect();
        assert!(matches!(
            milestone_query(&ids),
            Err(Error::InvalidParameter(_))
        ));
        assert!(milestone_query(&ids[..100]).is_ok());
    }
}
