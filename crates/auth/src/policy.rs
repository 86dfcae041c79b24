//! Ordered route-policy table.
//!
//! A policy is an ordered list of `{matcher, access}` rules evaluated in
//! declaration order; the first matching rule decides and rules are never
//! merged. Every policy carries an explicit default for unmatched requests,
//! which is where the gateway (deny) and the internal services
//! (authenticated) deliberately differ.

use axum::http::Method;

use crate::principal::Principal;
use crate::roles::Role;

/// What a matched rule requires of the request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Access {
    /// Allowed unconditionally, before any credential verification.
    /// Used for CORS preflight and health probes.
    Permit,
    /// Any successfully verified credential, regardless of roles.
    Authenticated,
    /// A verified credential holding at least one of these roles.
    AnyRole(Vec<Role>),
    /// Denied outright, independent of authentication.
    Deny,
}

/// Why a request was denied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Denial {
    Unauthenticated,
    Forbidden,
}

impl Access {
    /// Decide for an (optionally authenticated) caller.
    ///
    /// `Permit` and `Deny` are terminal regardless of the principal; the
    /// gate is expected to resolve them before verifying any credential.
    pub fn evaluate(&self, principal: Option<&Principal>) -> Result<(), Denial> {
        match self {
            Access::Permit => Ok(()),
            Access::Deny => Err(Denial::Forbidden),
            Access::Authenticated => match principal {
                Some(_) => Ok(()),
                None => Err(Denial::Unauthenticated),
            },
            Access::AnyRole(required) => match principal {
                Some(p) if p.has_any_role(required) => Ok(()),
                Some(_) => Err(Denial::Forbidden),
                None => Err(Denial::Unauthenticated),
            },
        }
    }
}

/// One ordered entry: method (or any) + path prefix.
#[derive(Debug, Clone)]
pub struct PolicyRule {
    method: Option<Method>,
    prefix: String,
    access: Access,
}

impl PolicyRule {
    fn matches(&self, method: &Method, path: &str) -> bool {
        if let Some(m) = &self.method {
            if m != method {
                return false;
            }
        }
        path.starts_with(&self.prefix)
    }
}

/// Ordered, first-match-wins route policy with an explicit default.
#[derive(Debug, Clone)]
pub struct RoutePolicy {
    rules: Vec<PolicyRule>,
    default: Access,
}

impl RoutePolicy {
    pub fn new(default: Access) -> Self {
        Self {
            rules: Vec::new(),
            default,
        }
    }

    /// Append a rule matching a method + path prefix. Declaration order is
    /// evaluation order.
    pub fn rule(mut self, method: Method, prefix: impl Into<String>, access: Access) -> Self {
        self.rules.push(PolicyRule {
            method: Some(method),
            prefix: prefix.into(),
            access,
        });
        self
    }

    /// Append a rule matching any method under a path prefix.
    pub fn any_method(mut self, prefix: impl Into<String>, access: Access) -> Self {
        self.rules.push(PolicyRule {
            method: None,
            prefix: prefix.into(),
            access,
        });
        self
    }

    /// The access requirement for this request: first matching rule, or the
    /// policy default.
    pub fn access_for(&self, method: &Method, path: &str) -> &Access {
        self.rules
            .iter()
            .find(|rule| rule.matches(method, path))
            .map(|rule| &rule.access)
            .unwrap_or(&self.default)
    }
}
