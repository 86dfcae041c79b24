//! `feed-gateway` — the edge service.
//!
//! Enforces the allowlist edge policy (deny by default), answers CORS, and
//! reverse-proxies everything under `/api` to the owning service with the
//! caller's `Authorization` header forwarded unchanged. The gateway adds no
//! trust: every internal service re-verifies the credential itself.

pub mod app;
pub mod proxy;

pub use app::{build_app, edge_policy};
pub use proxy::{Proxy, Upstreams};
