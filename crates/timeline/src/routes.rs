//! HTTP handlers for the timeline surface.

use std::sync::Arc;

use axum::{extract::Extension, http::StatusCode, response::IntoResponse, Json};

use feed_auth::json_error;

use crate::dto::TimelinePost;
use crate::store::TimelineStore;

pub async fn health() -> StatusCode {
    StatusCode::OK
}

pub async fn timeline(
    Extension(store): Extension<Arc<dyn TimelineStore>>,
) -> axum::response::Response {
    match store.timeline().await {
        Ok(entries) => {
            let posts: Vec<TimelinePost> = entries.iter().map(Into::into).collect();
            (StatusCode::OK, Json(serde_json::json!({ "posts": posts }))).into_response()
        }
        Err(err) => {
            tracing::error!(error = %err, "timeline store failure");
            json_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                "store_error",
                "storage failure",
            )
        }
    }
}
