//! Reverse proxy to the owning internal services.

use std::sync::Arc;
use std::time::Duration;

use axum::body::{to_bytes, Body};
use axum::extract::{Extension, Request};
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use feed_auth::json_error;

/// Request bodies above this size are rejected rather than buffered.
const MAX_BODY_BYTES: usize = 2 * 1024 * 1024;

/// Base URLs of the services the gateway fronts.
#[derive(Debug, Clone)]
pub struct Upstreams {
    pub users: String,
    pub posts: String,
    pub timeline: String,
}

#[derive(Debug, Clone)]
pub struct Proxy {
    client: reqwest::Client,
    upstreams: Upstreams,
}

impl Proxy {
    pub fn new(upstreams: Upstreams) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()?;
        Ok(Self { client, upstreams })
    }

    /// Longest-prefix routing table. Paths outside it are not proxied.
    fn upstream_for(&self, path: &str) -> Option<&str> {
        if path.starts_with("/api/v1/users") {
            Some(&self.upstreams.users)
        } else if path.starts_with("/api/v1/posts") {
            Some(&self.upstreams.posts)
        } else if path.starts_with("/api/v1/timelines") {
            Some(&self.upstreams.timeline)
        } else {
            None
        }
    }
}

/// Fallback handler: everything the gateway does not serve itself is
/// forwarded. Runs behind the edge gate, so only permitted requests land
/// here.
pub async fn forward(Extension(proxy): Extension<Arc<Proxy>>, req: Request) -> Response {
    let path_and_query = req
        .uri()
        .path_and_query()
        .map(|pq| pq.as_str().to_string())
        .unwrap_or_else(|| req.uri().path().to_string());
    let path = req.uri().path().to_string();

    let Some(base) = proxy.upstream_for(&path) else {
        return json_error(StatusCode::NOT_FOUND, "not_found", "no such route");
    };
    let url = format!("{}{}", base, path_and_query);

    let method = req.method().clone();
    let authorization = req.headers().get(AUTHORIZATION).cloned();
    let content_type = req.headers().get(CONTENT_TYPE).cloned();

    let body = match to_bytes(req.into_body(), MAX_BODY_BYTES).await {
        Ok(bytes) => bytes,
        Err(_) => {
            return json_error(
                StatusCode::PAYLOAD_TOO_LARGE,
                "payload_too_large",
                "request body too large",
            );
        }
    };

    let mut upstream_req = proxy.client.request(method, &url).body(body);
    // The credential crosses the proxy byte-for-byte; the upstream verifies
    // it again itself.
    if let Some(value) = authorization {
        upstream_req = upstream_req.header(AUTHORIZATION, value);
    }
    if let Some(value) = content_type {
        upstream_req = upstream_req.header(CONTENT_TYPE, value);
    }

    let upstream_res = match upstream_req.send().await {
        Ok(res) => res,
        Err(err) => {
            tracing::error!(error = %err, url = %url, "upstream unreachable");
            return json_error(StatusCode::BAD_GATEWAY, "bad_gateway", "upstream unavailable");
        }
    };

    let status = upstream_res.status();
    let content_type = upstream_res.headers().get(CONTENT_TYPE).cloned();
    let bytes = match upstream_res.bytes().await {
        Ok(bytes) => bytes,
        Err(err) => {
            tracing::error!(error = %err, url = %url, "upstream body read failed");
            return json_error(StatusCode::BAD_GATEWAY, "bad_gateway", "upstream unavailable");
        }
    };

    let mut response = (status, Body::from(bytes)).into_response();
    if let Some(value) = content_type {
        response.headers_mut().insert(CONTENT_TYPE, value);
    }
    response
}
