//! Shared tracing/logging setup for all feed services.

use tracing_subscriber::EnvFilter;

/// Initialize tracing/logging for the process.
///
/// JSON logs, filterable via `RUST_LOG`. Safe to call multiple times
/// (subsequent calls are no-ops), which keeps integration tests that spawn
/// several services in one process from fighting over the subscriber.
pub fn init(service: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .json()
        .with_timer(tracing_subscriber::fmt::time::SystemTime)
        .with_target(false)
        .try_init();

    tracing::info!(service, "observability initialized");
}
