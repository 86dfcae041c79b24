//! Response DTOs.

use serde::{Deserialize, Serialize};

use crate::store::TimelineEntry;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimelinePost {
    pub id: i64,
    pub content: String,
    pub author_id: i64,
}

impl From<&TimelineEntry> for TimelinePost {
    fn from(entry: &TimelineEntry) -> Self {
        Self {
            id: entry.id.as_i64(),
            content: entry.content.clone(),
            author_id: entry.author_id.as_i64(),
        }
    }
}
