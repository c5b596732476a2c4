use serde::{Deserialize, Serialize};

/// Milestone data point relayed from the upstream exchange
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LiveDataMilestone {
    pub id: String,
    pub name: String,
    /// Either a number or a string, depending on the milestone
    #[serde(default)]
    pub value: Option<serde_json::Value>,
    #[serde(default)]
    pub timestamp: Option<String>,
}

/// Live data for an event
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LiveData {
    #[serde(default, alias = "event_ticker")]
    pub event_ticker: Option<String>,
    #[serde(default)]
    pub milestones: Vec<LiveDataMilestone>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct LiveDataBody {
    #[serde(default)]
    pub data: Vec<LiveData>,
}
