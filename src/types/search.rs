use serde::{Deserialize, Serialize};

use super::events::Event;
use crate::pagination::CursorPage;

/// Events matching a search query
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub cursor: Option<u64>,
    #[serde(default)]
    pub events: Vec<Event>,
}

impl CursorPage for SearchResponse {
    type Cursor = u64;

    fn next_cursor(&self) -> Option<u64> {
        self.cursor
    }
}
