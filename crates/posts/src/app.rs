//! Router wiring for the post service.

use std::sync::Arc;

use axum::http::Method;
use axum::{
    routing::{delete, get, post},
    Extension, Router,
};

use feed_auth::{authorization_gate, Access, AuthGate, Role, RoutePolicy, TokenVerifier};

use crate::routes;
use crate::service::PostService;

/// Internal-service policy, second layer of defense behind the gateway:
/// writes and reads need the standard user role, destructive operations need
/// moderator or admin, anything else merely needs a verified credential.
pub fn route_policy() -> RoutePolicy {
    RoutePolicy::new(Access::Authenticated)
        .rule(Method::OPTIONS, "/", Access::Permit)
        .any_method("/health", Access::Permit)
        .rule(
            Method::POST,
            "/api/v1/posts",
            Access::AnyRole(vec![Role::named("feed_user")]),
        )
        .rule(
            Method::GET,
            "/api/v1/posts",
            Access::AnyRole(vec![Role::named("feed_user")]),
        )
        .rule(
            Method::DELETE,
            "/api/v1/posts",
            Access::AnyRole(vec![Role::named("feed_moderator"), Role::named("feed_admin")]),
        )
}

/// Build the full post-service router (used by `main.rs` and black-box
/// tests).
pub fn build_app(service: Arc<PostService>, verifier: Arc<dyn TokenVerifier>) -> Router {
    let gate = AuthGate::new(verifier, route_policy());

    Router::new()
        .route("/health", get(routes::health))
        .route("/api/v1/posts", post(routes::create_post).get(routes::list_posts))
        .route("/api/v1/posts/:id", delete(routes::delete_post))
        .layer(Extension(service))
        .layer(axum::middleware::from_fn_with_state(
            gate,
            authorization_gate,
        ))
}
