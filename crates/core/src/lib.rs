//! `feed-core` — shared identifiers and the domain error model.
//!
//! This crate is intentionally decoupled from HTTP and storage.

pub mod error;
pub mod id;

pub use error::{DomainError, DomainResult};
pub use id::{PostId, UserId};
