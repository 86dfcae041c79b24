//! `feed-users` — the identity registry service.
//!
//! Owns the durable `subject → internal user id` mapping every other service
//! depends on. The whole public surface is three operations: idempotent
//! signup (create-or-get), self lookup by forwarded credential, and lookup
//! by internal id.

pub mod app;
pub mod dto;
pub mod routes;
pub mod store;

pub use app::build_app;
pub use store::{InMemoryUserStore, NewUser, StoreError, UserRecord, UserStore};
