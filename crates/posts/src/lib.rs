//! `feed-posts` — the post service.
//!
//! Writes are identity-bearing: the author reference persisted with each
//! post is the registry's internal user id, never the raw credential
//! subject. The service obtains it by forwarding the caller's bearer token
//! to the registry (`client` module) before anything touches the store.

pub mod app;
pub mod client;
pub mod dto;
pub mod routes;
pub mod service;
pub mod store;

pub use app::build_app;
pub use client::{ResolvedUser, Unresolved, UserServiceClient};
pub use service::{PostError, PostService};
pub use store::{InMemoryPostStore, PostRecord, PostStore, StoreError};
