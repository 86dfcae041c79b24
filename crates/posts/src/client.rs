//! Identity resolution client.
//!
//! Converts the caller's credential into the registry's internal identity by
//! forwarding the exact bearer value to the registry's self-lookup endpoint.
//! Nothing is re-derived or re-signed here; the registry independently
//! re-verifies the token (defense in depth).

use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

use feed_core::UserId;

/// The registry's view of the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedUser {
    pub id: UserId,
    pub subject: String,
    pub username: String,
}

/// Identity resolution failed.
///
/// Deliberately a single outcome: registry said unauthenticated, registry
/// said not-registered, and registry unreachable all collapse here. The
/// caller must treat it as a rejectable precondition, never as a retry
/// target — retry storms against a down registry are worse than a clear
/// rejection, and the distinction buys no correctness.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("identity resolution failed")]
pub struct Unresolved;

#[derive(Debug, Deserialize)]
struct UserBody {
    id: i64,
    subject: String,
    username: String,
}

pub struct UserServiceClient {
    http: reqwest::Client,
    base_url: String,
}

impl UserServiceClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(3))
            .build()?;
        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    /// Resolve the forwarded credential to an internal identity.
    ///
    /// 200 with a body is the only success; 401, 404, any other status,
    /// transport errors and timeouts all map to [`Unresolved`].
    pub async fn resolve(&self, bearer: &str) -> Result<ResolvedUser, Unresolved> {
        let url = format!("{}/api/v1/users/me", self.base_url);

        let response = match self.http.get(&url).bearer_auth(bearer).send().await {
            Ok(response) => response,
            Err(err) => {
                tracing::warn!(error = %err, "registry unreachable during identity resolution");
                return Err(Unresolved);
            }
        };

        if response.status() != reqwest::StatusCode::OK {
            tracing::debug!(status = %response.status(), "identity resolution denied");
            return Err(Unresolved);
        }

        let body: UserBody = response.json().await.map_err(|err| {
            tracing::warn!(error = %err, "malformed identity resolution response");
            Unresolved
        })?;

        Ok(ResolvedUser {
            id: UserId::new(body.id),
            subject: body.subject,
            username: body.username,
        })
    }
}
