//! Router wiring for the registry service.

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Extension, Router,
};

use feed_auth::{authorization_gate, Access, AuthGate, RoutePolicy, TokenVerifier};

use crate::routes;
use crate::store::UserStore;

/// Internal-service policy: health and preflight are public, everything else
/// requires a verified credential. Registry operations are not role-gated —
/// any authenticated subject may register and look itself up.
pub fn route_policy() -> RoutePolicy {
    RoutePolicy::new(Access::Authenticated)
        .rule(axum::http::Method::OPTIONS, "/", Access::Permit)
        .any_method("/health", Access::Permit)
}

/// Build the full registry router (used by `main.rs` and black-box tests).
pub fn build_app(store: Arc<dyn UserStore>, verifier: Arc<dyn TokenVerifier>) -> Router {
    let gate = AuthGate::new(verifier, route_policy());

    Router::new()
        .route("/health", get(routes::health))
        .route("/api/v1/users/signup", post(routes::signup))
        .route("/api/v1/users/me", get(routes::me))
        .route("/api/v1/users/:id", get(routes::by_id))
        .layer(Extension(store))
        .layer(axum::middleware::from_fn_with_state(
            gate,
            authorization_gate,
        ))
}
