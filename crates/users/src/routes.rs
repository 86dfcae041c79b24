//! HTTP handlers for the registry surface.

use std::sync::Arc;

use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    Json,
};

use feed_auth::{json_error, Principal};
use feed_core::UserId;

use crate::dto::{SignupResponse, UserResponse};
use crate::store::{NewUser, StoreError, UserStore};

pub async fn health() -> StatusCode {
    StatusCode::OK
}

/// Registers the authenticated caller. Idempotent: concurrent or repeated
/// calls for the same subject all observe the same record, and exactly one
/// observes `created = true`.
pub async fn signup(
    Extension(store): Extension<Arc<dyn UserStore>>,
    Extension(principal): Extension<Principal>,
) -> axum::response::Response {
    let new_user = NewUser {
        subject: principal.subject().to_string(),
        username: principal.preferred_username().map(str::to_string),
        email: principal.email().map(str::to_string),
    };

    match store.create_or_get(new_user).await {
        Ok((record, created)) => {
            if created {
                tracing::info!(subject = principal.subject(), id = %record.id, "user registered");
            }
            (StatusCode::OK, Json(SignupResponse::from_record(&record, created))).into_response()
        }
        Err(err) => store_error_to_response(err),
    }
}

/// Resolves the caller's own credential to their internal identity.
/// This is the endpoint other services forward bearer tokens to.
pub async fn me(
    Extension(store): Extension<Arc<dyn UserStore>>,
    Extension(principal): Extension<Principal>,
) -> axum::response::Response {
    match store.find_by_subject(principal.subject()).await {
        Ok(Some(record)) => (StatusCode::OK, Json(UserResponse::from(&record))).into_response(),
        Ok(None) => json_error(StatusCode::NOT_FOUND, "not_found", "user not registered"),
        Err(err) => store_error_to_response(err),
    }
}

/// Looks up a user by internal id, e.g. to resolve a post's author for
/// display.
pub async fn by_id(
    Extension(store): Extension<Arc<dyn UserStore>>,
    Path(id): Path<i64>,
) -> axum::response::Response {
    match store.find_by_id(UserId::new(id)).await {
        Ok(Some(record)) => (StatusCode::OK, Json(UserResponse::from(&record))).into_response(),
        Ok(None) => json_error(StatusCode::NOT_FOUND, "not_found", "user not found"),
        Err(err) => store_error_to_response(err),
    }
}

fn store_error_to_response(err: StoreError) -> axum::response::Response {
    tracing::error!(error = %err, "registry store failure");
    json_error(StatusCode::INTERNAL_SERVER_ERROR, "store_error", "storage failure")
}
