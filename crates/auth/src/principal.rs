//! Per-request authenticated caller.

use std::collections::HashSet;

use crate::roles::{realm_roles, Role};
use crate::verifier::VerifiedClaims;

/// The authenticated caller of the current request.
///
/// Derived fresh from a verified credential by each service's gate, carried
/// in request extensions, and discarded at end of request. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    subject: String,
    roles: HashSet<Role>,
    preferred_username: Option<String>,
    email: Option<String>,
}

impl Principal {
    pub fn from_claims(verified: &VerifiedClaims) -> Self {
        Self {
            subject: verified.subject.clone(),
            roles: realm_roles(&verified.claims),
            preferred_username: verified
                .string_claim("preferred_username")
                .map(str::to_string),
            email: verified.string_claim("email").map(str::to_string),
        }
    }

    /// Stable external identifier embedded in the credential; opaque here.
    pub fn subject(&self) -> &str {
        &self.subject
    }

    pub fn roles(&self) -> &HashSet<Role> {
        &self.roles
    }

    pub fn has_any_role(&self, required: &[Role]) -> bool {
        required.iter().any(|r| self.roles.contains(r))
    }

    pub fn preferred_username(&self) -> Option<&str> {
        self.preferred_username.as_deref()
    }

    pub fn email(&self) -> Option<&str> {
        self.email.as_deref()
    }
}

/// The exact bearer value the caller presented, kept for forwarding.
///
/// Downstream identity resolution must forward this byte-for-byte; services
/// never re-derive or re-sign anything on the caller's behalf.
#[derive(Debug, Clone)]
pub struct RawBearer(String);

impl RawBearer {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}
