//! Registry storage contract.
//!
//! The subject-uniqueness invariant is the only concurrency-sensitive shared
//! resource in this service, and it belongs to the store: `create_or_get`
//! must be atomic under concurrent first-time callers for the same subject.
//! Read-then-conditionally-write is not an acceptable implementation.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;

use feed_core::UserId;

mod in_memory;
mod postgres;

pub use in_memory::InMemoryUserStore;
pub use postgres::PostgresUserStore;

/// Durable internal identity: exactly one row per distinct subject.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserRecord {
    pub id: UserId,
    pub subject: String,
    pub username: String,
    pub email: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Input to registration. `username`/`email` are hints from the credential;
/// a missing or empty username falls back to the subject itself.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub subject: String,
    pub username: Option<String>,
    pub email: Option<String>,
}

impl NewUser {
    /// The display name to persist: never empty.
    pub fn effective_username(&self) -> &str {
        match self.username.as_deref() {
            Some(name) if !name.trim().is_empty() => name,
            _ => &self.subject,
        }
    }
}

/// Store operation error.
///
/// A unique violation on subject never escapes here: implementations must
/// recover it internally by re-reading the winning row.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("storage backend failure: {0}")]
    Backend(String),
}

#[async_trait]
pub trait UserStore: Send + Sync {
    /// Insert the subject's identity if absent, or return the existing one.
    ///
    /// Safe under concurrent first-time calls: at most one record is ever
    /// persisted per subject, every caller observes a valid record, and
    /// exactly one caller observes `created = true`.
    async fn create_or_get(&self, new_user: NewUser) -> Result<(UserRecord, bool), StoreError>;

    async fn find_by_subject(&self, subject: &str) -> Result<Option<UserRecord>, StoreError>;

    async fn find_by_id(&self, id: UserId) -> Result<Option<UserRecord>, StoreError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn new_user(subject: &str) -> NewUser {
        NewUser {
            subject: subject.to_string(),
            username: Some("alice".to_string()),
            email: Some("alice@example.com".to_string()),
        }
    }

    #[tokio::test]
    async fn create_then_get_is_idempotent() {
        let store = InMemoryUserStore::new();

        let (first, created) = store.create_or_get(new_user("sub-1")).await.unwrap();
        assert!(created);

        let (second, created) = store.create_or_get(new_user("sub-1")).await.unwrap();
        assert!(!created);
        assert_eq!(first.id, second.id);
        assert_eq!(first.subject, second.subject);
    }

    #[tokio::test]
    async fn find_by_subject_roundtrips_the_same_id() {
        let store = InMemoryUserStore::new();
        let (record, _) = store.create_or_get(new_user("sub-2")).await.unwrap();

        for _ in 0..3 {
            let found = store.find_by_subject("sub-2").await.unwrap().unwrap();
            assert_eq!(found.id, record.id);
        }
    }

    #[tokio::test]
    async fn find_by_id_returns_the_record() {
        let store = InMemoryUserStore::new();
        let (record, _) = store.create_or_get(new_user("sub-3")).await.unwrap();

        let found = store.find_by_id(record.id).await.unwrap().unwrap();
        assert_eq!(found.subject, "sub-3");
        assert!(store.find_by_id(feed_core::UserId::new(9999)).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn empty_username_falls_back_to_subject() {
        let store = InMemoryUserStore::new();
        let (record, _) = store
            .create_or_get(NewUser {
                subject: "sub-4".to_string(),
                username: Some("   ".to_string()),
                email: None,
            })
            .await
            .unwrap();

        assert_eq!(record.username, "sub-4");
    }

    #[tokio::test]
    async fn concurrent_first_signups_create_exactly_one_record() {
        let store = Arc::new(InMemoryUserStore::new());

        let mut handles = Vec::new();
        for _ in 0..16 {
            let store = Arc::clone(&store);
            handles.push(tokio::spawn(async move {
                store.create_or_get(new_user("sub-racy")).await.unwrap()
            }));
        }

        let mut created_count = 0;
        let mut ids = Vec::new();
        for handle in handles {
            let (record, created) = handle.await.unwrap();
            if created {
                created_count += 1;
            }
            ids.push(record.id);
        }

        assert_eq!(created_count, 1);
        ids.dedup();
        assert_eq!(ids.len(), 1);
    }
}
