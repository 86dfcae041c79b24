//! Authorization gate middleware.
//!
//! Per-request state machine with terminal states allowed/denied:
//! match the policy rule first (so preflight and health pass before any
//! credential work, and denylisted paths fail before any credential work),
//! then verify the credential, map roles, and enforce the rule. On success
//! the request carries [`Principal`] and [`RawBearer`] extensions into the
//! handlers.

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{HeaderMap, StatusCode},
    middleware::Next,
    response::Response,
};

use crate::policy::{Access, Denial, RoutePolicy};
use crate::principal::{Principal, RawBearer};
use crate::response::json_error;
use crate::verifier::TokenVerifier;

/// State for [`authorization_gate`]: the service's verifier and policy.
#[derive(Clone)]
pub struct AuthGate {
    pub verifier: Arc<dyn TokenVerifier>,
    pub policy: Arc<RoutePolicy>,
}

impl AuthGate {
    pub fn new(verifier: Arc<dyn TokenVerifier>, policy: RoutePolicy) -> Self {
        Self {
            verifier,
            policy: Arc::new(policy),
        }
    }
}

pub async fn authorization_gate(
    State(gate): State<AuthGate>,
    mut req: Request,
    next: Next,
) -> Response {
    let method = req.method().clone();
    let path = req.uri().path().to_string();
    let access = gate.policy.access_for(&method, &path).clone();

    // Terminal rules are decided before touching the authorization header.
    match access {
        Access::Permit => return next.run(req).await,
        Access::Deny => {
            tracing::debug!(%method, %path, "request denied by policy");
            return json_error(StatusCode::FORBIDDEN, "forbidden", "access denied");
        }
        _ => {}
    }

    let token = match extract_bearer(req.headers()) {
        Ok(token) => token.to_string(),
        Err(_) => {
            return json_error(
                StatusCode::UNAUTHORIZED,
                "unauthenticated",
                "missing or malformed bearer credential",
            )
        }
    };

    let verified = match gate.verifier.verify(&token) {
        Ok(v) => v,
        Err(err) => {
            // Log the specific reason; callers only ever see "unauthenticated".
            tracing::debug!(%method, %path, error = %err, "credential verification failed");
            return json_error(StatusCode::UNAUTHORIZED, "unauthenticated", "invalid credential");
        }
    };

    let principal = Principal::from_claims(&verified);

    if let Err(denial) = access.evaluate(Some(&principal)) {
        let (status, code) = match denial {
            Denial::Unauthenticated => (StatusCode::UNAUTHORIZED, "unauthenticated"),
            Denial::Forbidden => (StatusCode::FORBIDDEN, "forbidden"),
        };
        tracing::debug!(%method, %path, subject = principal.subject(), "request denied by policy");
        return json_error(status, code, "insufficient role for this route");
    }

    req.extensions_mut().insert(principal);
    req.extensions_mut().insert(RawBearer::new(token));

    next.run(req).await
}

fn extract_bearer(headers: &HeaderMap) -> Result<&str, StatusCode> {
    let header = headers
        .get(axum::http::header::AUTHORIZATION)
        .ok_or(StatusCode::UNAUTHORIZED)?;

    let header = header.to_str().map_err(|_| StatusCode::UNAUTHORIZED)?;

    let header = header
        .strip_prefix("Bearer ")
        .ok_or(StatusCode::UNAUTHORIZED)?;

    let token = header.trim();
    if token.is_empty() {
        return Err(StatusCode::UNAUTHORIZED);
    }

    Ok(token)
}
