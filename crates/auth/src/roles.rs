//! Role model and extraction from provider claims.

use std::borrow::Cow;
use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Normalized role used for route authorization decisions.
///
/// Roles are opaque strings at this layer: the gate only checks membership,
/// never an exhaustive enum, so role names unknown to this codebase are
/// admitted and simply never match a policy rule.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Role(Cow<'static, str>);

impl Role {
    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        Self(name.into())
    }

    /// Normalize a provider role claim into the internal namespace.
    ///
    /// Claim strings map 1:1 onto internal roles via a fixed prefix, so
    /// `feed_user` in the token becomes `ROLE_feed_user` here. Policies are
    /// declared with the same constructor and therefore always agree.
    pub fn named(claim: &str) -> Self {
        Self(Cow::Owned(format!("ROLE_{claim}")))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Display for Role {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Extract realm roles from a raw claim map.
///
/// The provider embeds roles as `{"realm_access": {"roles": ["feed_user"]}}`.
/// A missing container, missing list, or wrong shape yields the empty set:
/// an authenticated caller with no roles is valid and will simply fail any
/// role-gated policy rule later.
pub fn realm_roles(claims: &Value) -> HashSet<Role> {
    let Some(list) = claims
        .get("realm_access")
        .and_then(|access| access.get("roles"))
        .and_then(Value::as_array)
    else {
        return HashSet::new();
    };

    list.iter()
        .filter_map(Value::as_str)
        .map(Role::named)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn extracts_roles_from_realm_access() {
        let claims = json!({
            "sub": "s",
            "realm_access": { "roles": ["feed_user", "feed_admin"] }
        });

        let roles = realm_roles(&claims);
        assert_eq!(roles.len(), 2);
        assert!(roles.contains(&Role::named("feed_user")));
        assert!(roles.contains(&Role::named("feed_admin")));
    }

    #[test]
    fn missing_container_yields_empty_set() {
        let claims = json!({ "sub": "s" });
        assert!(realm_roles(&claims).is_empty());
    }

    #[test]
    fn missing_list_yields_empty_set() {
        let claims = json!({ "realm_access": {} });
        assert!(realm_roles(&claims).is_empty());
    }

    #[test]
    fn wrong_shape_yields_empty_set() {
        let claims = json!({ "realm_access": { "roles": "feed_user" } });
        assert!(realm_roles(&claims).is_empty());

        let claims = json!({ "realm_access": ["feed_user"] });
        assert!(realm_roles(&claims).is_empty());
    }

    #[test]
    fn non_string_entries_are_skipped() {
        let claims = json!({ "realm_access": { "roles": ["feed_user", 42, null] } });
        let roles = realm_roles(&claims);
        assert_eq!(roles.len(), 1);
    }

    #[test]
    fn unknown_role_names_are_admitted() {
        let claims = json!({ "realm_access": { "roles": ["some_future_role"] } });
        let roles = realm_roles(&claims);
        assert!(roles.contains(&Role::named("some_future_role")));
    }

    #[test]
    fn prefix_convention_is_stable() {
        assert_eq!(Role::named("feed_user").as_str(), "ROLE_feed_user");
    }
}
