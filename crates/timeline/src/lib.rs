//! `feed-timeline` — the timeline read service.
//!
//! A read-only view over the shared posts table, newest first. Author
//! references stay as internal user ids; display names are the caller's
//! problem to resolve against the registry.

pub mod app;
pub mod dto;
pub mod routes;
pub mod store;

pub use app::build_app;
pub use store::{InMemoryTimelineStore, StoreError, TimelineEntry, TimelineStore};
