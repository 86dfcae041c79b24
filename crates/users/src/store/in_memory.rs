use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;

use feed_core::UserId;

use super::{NewUser, StoreError, UserRecord, UserStore};

#[derive(Debug, Default)]
struct Inner {
    by_subject: HashMap<String, UserRecord>,
    next_id: i64,
}

/// In-memory registry store.
///
/// Intended for tests/dev. Create-or-get is atomic because every operation
/// runs under the single map lock, which gives the same observable guarantee
/// as the Postgres unique constraint.
#[derive(Debug, Default)]
pub struct InMemoryUserStore {
    inner: Mutex<Inner>,
}

impl InMemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for InMemoryUserStore {
    async fn create_or_get(&self, new_user: NewUser) -> Result<(UserRecord, bool), StoreError> {
        let mut inner = self
            .inner
            .lock()
            .map_err(|_| StoreError::Backend("lock poisoned".to_string()))?;

        if let Some(existing) = inner.by_subject.get(&new_user.subject) {
            return Ok((existing.clone(), false));
        }

        inner.next_id += 1;
        let record = UserRecord {
            id: UserId::new(inner.next_id),
            subject: new_user.subject.clone(),
            username: new_user.effective_username().to_string(),
            email: new_user.email.clone(),
            created_at: Utc::now(),
        };
        inner.by_subject.insert(new_user.subject, record.clone());

        Ok((record, true))
    }

    async fn find_by_subject(&self, subject: &str) -> Result<Option<UserRecord>, StoreError> {
        let inner = self
            .inner
            .lock()
            .map_err(|_| StoreError::Backend("lock poisoned".to_string()))?;
        Ok(inner.by_subject.get(subject).cloned())
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<UserRecord>, StoreError> {
        let inner = self
            .inner
            .lock()
            .map_err(|_| StoreError::Backend("lock poisoned".to_string()))?;
        Ok(inner.by_subject.values().find(|u| u.id == id).cloned())
    }
}
