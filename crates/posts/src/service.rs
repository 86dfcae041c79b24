//! Post business logic.
//!
//! Intra-request ordering is fixed: the gate has already verified the
//! credential before these methods run, resolution happens before any
//! store write, and a write never happens unless resolution succeeded.
//! Resolution has no side effect on this service's state, so a failure
//! after it means nothing was created and the caller may safely retry.

use std::sync::Arc;

use thiserror::Error;

use feed_auth::RawBearer;
use feed_core::{DomainError, PostId};

use crate::client::UserServiceClient;
use crate::store::{PostRecord, PostStore, StoreError};

#[derive(Debug, Error)]
pub enum PostError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

pub struct PostService {
    store: Arc<dyn PostStore>,
    users: Arc<UserServiceClient>,
}

impl PostService {
    pub fn new(store: Arc<dyn PostStore>, users: Arc<UserServiceClient>) -> Self {
        Self { store, users }
    }

    /// Create a post on behalf of the verified caller.
    ///
    /// The author reference is obtained by forwarding the caller's bearer
    /// token to the registry; an unresolvable identity rejects the whole
    /// operation before anything is persisted.
    pub async fn create_post(
        &self,
        content: &str,
        bearer: &RawBearer,
    ) -> Result<PostRecord, PostError> {
        let content = content.trim();
        if content.is_empty() {
            return Err(DomainError::validation("content must not be empty").into());
        }

        let author = self.users.resolve(bearer.as_str()).await.map_err(|_| {
            DomainError::precondition(
                "user not registered; complete registration before posting",
            )
        })?;

        let record = self.store.insert(content, author.id).await?;
        tracing::info!(post_id = %record.id, author_id = %record.author_id, "post created");

        Ok(record)
    }

    pub async fn list_posts(&self) -> Result<Vec<PostRecord>, PostError> {
        Ok(self.store.list_all().await?)
    }

    pub async fn delete_post(&self, id: PostId) -> Result<(), PostError> {
        if self.store.delete(id).await? {
            tracing::info!(post_id = %id, "post deleted");
            Ok(())
        } else {
            Err(DomainError::NotFound.into())
        }
    }
}
