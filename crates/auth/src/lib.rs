//! `feed-auth` — credential verification, role mapping and route-policy
//! enforcement, shared by the gateway and every downstream service.
//!
//! Each service runs its own [`gate::authorization_gate`] with its own
//! [`RoutePolicy`]: the same bearer token is re-verified independently at
//! every layer, so bypassing one layer never bypasses the others.

pub mod gate;
pub mod policy;
pub mod principal;
pub mod response;
pub mod roles;
pub mod verifier;

pub use gate::{authorization_gate, AuthGate};
pub use policy::{Access, RoutePolicy};
pub use principal::{Principal, RawBearer};
pub use response::json_error;
pub use roles::{realm_roles, Role};
pub use verifier::{Hs256Verifier, TokenVerifier, VerificationError, VerifiedClaims};
