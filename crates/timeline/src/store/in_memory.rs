use std::sync::Mutex;

use async_trait::async_trait;

use feed_core::{PostId, UserId};

use super::{StoreError, TimelineEntry, TimelineStore};

/// In-memory timeline store for tests/dev. Seeded directly since the
/// timeline itself never writes.
#[derive(Debug, Default)]
pub struct InMemoryTimelineStore {
    entries: Mutex<Vec<TimelineEntry>>,
}

impl InMemoryTimelineStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn seed(&self, id: i64, content: &str, author_id: i64) {
        self.entries
            .lock()
            .expect("lock poisoned")
            .push(TimelineEntry {
                id: PostId::new(id),
                content: content.to_string(),
                author_id: UserId::new(author_id),
            });
    }
}

#[async_trait]
impl TimelineStore for InMemoryTimelineStore {
    async fn timeline(&self) -> Result<Vec<TimelineEntry>, StoreError> {
        let entries = self
            .entries
            .lock()
            .map_err(|_| StoreError::Backend("lock poisoned".to_string()))?;
        let mut out = entries.clone();
        out.sort_by(|a, b| b.id.cmp(&a.id));
        Ok(out)
    }
}
