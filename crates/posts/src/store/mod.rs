//! Post storage contract.

use async_trait::async_trait;
use thiserror::Error;

use feed_core::{PostId, UserId};

mod in_memory;
mod postgres;

pub use in_memory::InMemoryPostStore;
pub use postgres::PostgresPostStore;

/// A persisted post. Immutable after creation; `author_id` references the
/// registry's internal user id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostRecord {
    pub id: PostId,
    pub content: String,
    pub author_id: UserId,
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("storage backend failure: {0}")]
    Backend(String),
}

#[async_trait]
pub trait PostStore: Send + Sync {
    async fn insert(&self, content: &str, author_id: UserId) -> Result<PostRecord, StoreError>;

    /// All posts, newest first.
    async fn list_all(&self) -> Result<Vec<PostRecord>, StoreError>;

    /// Returns whether a row was actually removed.
    async fn delete(&self, id: PostId) -> Result<bool, StoreError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn insert_assigns_monotonic_ids() {
        let store = InMemoryPostStore::new();
        let a = store.insert("first", UserId::new(1)).await.unwrap();
        let b = store.insert("second", UserId::new(1)).await.unwrap();
        assert!(b.id > a.id);
    }

    #[tokio::test]
    async fn list_is_newest_first() {
        let store = InMemoryPostStore::new();
        store.insert("first", UserId::new(1)).await.unwrap();
        store.insert("second", UserId::new(2)).await.unwrap();

        let posts = store.list_all().await.unwrap();
        assert_eq!(posts.len(), 2);
        assert_eq!(posts[0].content, "second");
        assert_eq!(posts[1].content, "first");
    }

    #[tokio::test]
    async fn delete_reports_whether_a_row_existed() {
        let store = InMemoryPostStore::new();
        let record = store.insert("gone soon", UserId::new(1)).await.unwrap();

        assert!(store.delete(record.id).await.unwrap());
        assert!(!store.delete(record.id).await.unwrap());
        assert!(store.list_all().await.unwrap().is_empty());
    }
}
