//! Router wiring for the gateway.

use std::sync::Arc;
use std::time::Duration;

use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{HeaderValue, Method, StatusCode};
use axum::{routing::get, Extension, Router};
use tower_http::cors::CorsLayer;

use feed_auth::{authorization_gate, Access, AuthGate, RoutePolicy, TokenVerifier};

use crate::proxy::{self, Proxy};

/// Edge policy, allowlist posture: preflight and health pass, everything
/// under `/api/` needs a verified credential, all other paths are denied
/// outright.
pub fn edge_policy() -> RoutePolicy {
    RoutePolicy::new(Access::Deny)
        .rule(Method::OPTIONS, "/", Access::Permit)
        .any_method("/health", Access::Permit)
        .any_method("/api/", Access::Authenticated)
}

/// Browser CORS for the configured origins. Cross-origin credentials stay
/// disallowed; the bearer token travels in the Authorization header.
fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "ignoring unparseable allowed origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([AUTHORIZATION, CONTENT_TYPE])
        .max_age(Duration::from_secs(3600))
}

async fn health() -> StatusCode {
    StatusCode::OK
}

pub fn build_app(
    proxy: Arc<Proxy>,
    verifier: Arc<dyn TokenVerifier>,
    allowed_origins: &[String],
) -> Router {
    let gate = AuthGate::new(verifier, edge_policy());

    Router::new()
        .route("/health", get(health))
        .fallback(proxy::forward)
        .layer(Extension(proxy))
        .layer(axum::middleware::from_fn_with_state(
            gate,
            authorization_gate,
        ))
        .layer(cors_layer(allowed_origins))
}
