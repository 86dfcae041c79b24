use std::sync::Mutex;

use async_trait::async_trait;

use feed_core::{PostId, UserId};

use super::{PostRecord, PostStore, StoreError};

#[derive(Debug, Default)]
struct Inner {
    posts: Vec<PostRecord>,
    next_id: i64,
}

/// In-memory post store for tests/dev.
#[derive(Debug, Default)]
pub struct InMemoryPostStore {
    inner: Mutex<Inner>,
}

impl InMemoryPostStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PostStore for InMemoryPostStore {
    async fn insert(&self, content: &str, author_id: UserId) -> Result<PostRecord, StoreError> {
        let mut inner = self
            .inner
            .lock()
            .map_err(|_| StoreError::Backend("lock poisoned".to_string()))?;

        inner.next_id += 1;
        let record = PostRecord {
            id: PostId::new(inner.next_id),
            content: content.to_string(),
            author_id,
        };
        inner.posts.push(record.clone());

        Ok(record)
    }

    async fn list_all(&self) -> Result<Vec<PostRecord>, StoreError> {
        let inner = self
            .inner
            .lock()
            .map_err(|_| StoreError::Backend("lock poisoned".to_string()))?;
        let mut posts = inner.posts.clone();
        posts.reverse();
        Ok(posts)
    }

    async fn delete(&self, id: PostId) -> Result<bool, StoreError> {
        let mut inner = self
            .inner
            .lock()
            .map_err(|_| StoreError::Backend("lock poisoned".to_string()))?;
        let before = inner.posts.len();
        inner.posts.retain(|p| p.id != id);
        Ok(inner.posts.len() != before)
    }
}
