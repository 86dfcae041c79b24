//! Request/response DTOs.

use serde::{Deserialize, Serialize};

use crate::store::PostRecord;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostRequest {
    pub content: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostCreationResponse {
    pub id: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostResponse {
    pub id: i64,
    pub content: String,
    pub author_id: i64,
}

impl From<&PostRecord> for PostResponse {
    fn from(record: &PostRecord) -> Self {
        Self {
            id: record.id.as_i64(),
            content: record.content.clone(),
            author_id: record.author_id.as_i64(),
        }
    }
}
