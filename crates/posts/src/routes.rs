//! HTTP handlers for the post surface.

use std::sync::Arc;

use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    Json,
};

use feed_auth::{json_error, RawBearer};
use feed_core::{DomainError, PostId};

use crate::dto::{PostCreationResponse, PostRequest, PostResponse};
use crate::service::{PostError, PostService};

pub async fn health() -> StatusCode {
    StatusCode::OK
}

pub async fn create_post(
    Extension(service): Extension<Arc<PostService>>,
    Extension(bearer): Extension<RawBearer>,
    Json(body): Json<PostRequest>,
) -> axum::response::Response {
    match service.create_post(&body.content, &bearer).await {
        Ok(record) => (
            StatusCode::CREATED,
            Json(PostCreationResponse {
                id: record.id.as_i64(),
            }),
        )
            .into_response(),
        Err(err) => post_error_to_response(err),
    }
}

pub async fn list_posts(
    Extension(service): Extension<Arc<PostService>>,
) -> axum::response::Response {
    match service.list_posts().await {
        Ok(posts) => {
            let items: Vec<PostResponse> = posts.iter().map(Into::into).collect();
            (StatusCode::OK, Json(serde_json::json!({ "posts": items }))).into_response()
        }
        Err(err) => post_error_to_response(err),
    }
}

pub async fn delete_post(
    Extension(service): Extension<Arc<PostService>>,
    Path(id): Path<i64>,
) -> axum::response::Response {
    match service.delete_post(PostId::new(id)).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => post_error_to_response(err),
    }
}

fn post_error_to_response(err: PostError) -> axum::response::Response {
    match err {
        PostError::Domain(DomainError::Validation(msg)) => {
            json_error(StatusCode::BAD_REQUEST, "validation_error", msg)
        }
        PostError::Domain(DomainError::Precondition(msg)) => {
            json_error(StatusCode::CONFLICT, "not_registered", msg)
        }
        PostError::Domain(DomainError::NotFound) => {
            json_error(StatusCode::NOT_FOUND, "not_found", "post not found")
        }
        PostError::Store(e) => {
            tracing::error!(error = %e, "post store failure");
            json_error(StatusCode::INTERNAL_SERVER_ERROR, "store_error", "storage failure")
        }
    }
}
