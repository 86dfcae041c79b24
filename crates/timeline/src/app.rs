//! Router wiring for the timeline service.

use std::sync::Arc;

use axum::http::Method;
use axum::{routing::get, Extension, Router};

use feed_auth::{authorization_gate, Access, AuthGate, Role, RoutePolicy, TokenVerifier};

use crate::routes;
use crate::store::TimelineStore;

/// Internal-service policy: the timeline read needs the standard user role,
/// everything else merely needs a verified credential.
pub fn route_policy() -> RoutePolicy {
    RoutePolicy::new(Access::Authenticated)
        .rule(Method::OPTIONS, "/", Access::Permit)
        .any_method("/health", Access::Permit)
        .rule(
            Method::GET,
            "/api/v1/timelines",
            Access::AnyRole(vec![Role::named("feed_user")]),
        )
}

pub fn build_app(store: Arc<dyn TimelineStore>, verifier: Arc<dyn TokenVerifier>) -> Router {
    let gate = AuthGate::new(verifier, route_policy());

    Router::new()
        .route("/health", get(routes::health))
        .route("/api/v1/timelines", get(routes::timeline))
        .layer(Extension(store))
        .layer(axum::middleware::from_fn_with_state(
            gate,
            authorization_gate,
        ))
}
