//! Read-only timeline storage contract.

use async_trait::async_trait;
use thiserror::Error;

use feed_core::{PostId, UserId};

mod in_memory;
mod postgres;

pub use in_memory::InMemoryTimelineStore;
pub use postgres::PostgresTimelineStore;

/// One post as seen by the timeline. The author reference is the registry's
/// internal user id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimelineEntry {
    pub id: PostId,
    pub content: String,
    pub author_id: UserId,
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("storage backend failure: {0}")]
    Backend(String),
}

/// The timeline never writes; it observes whatever the post service has
/// persisted.
#[async_trait]
pub trait TimelineStore: Send + Sync {
    /// All posts, newest first.
    async fn timeline(&self) -> Result<Vec<TimelineEntry>, StoreError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn empty_store_yields_empty_timeline() {
        let store = InMemoryTimelineStore::new();
        assert!(store.timeline().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn timeline_is_newest_first() {
        let store = InMemoryTimelineStore::new();
        store.seed(1, "first", 7);
        store.seed(2, "second", 8);

        let entries = store.timeline().await.unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].content, "second");
        assert_eq!(entries[0].author_id, UserId::new(8));
        assert_eq!(entries[1].content, "first");
    }
}
