//! Postgres-backed timeline store reading the shared `posts` table.

use async_trait::async_trait;
use sqlx::{FromRow, PgPool};

use feed_core::{PostId, UserId};

use super::{StoreError, TimelineEntry, TimelineStore};

#[derive(Debug, FromRow)]
struct EntryRow {
    id: i64,
    content: String,
    author_id: i64,
}

impl From<EntryRow> for TimelineEntry {
    fn from(row: EntryRow) -> Self {
        Self {
            id: PostId::new(row.id),
            content: row.content,
            author_id: UserId::new(row.author_id),
        }
    }
}

#[derive(Debug, Clone)]
pub struct PostgresTimelineStore {
    pool: PgPool,
}

impl PostgresTimelineStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TimelineStore for PostgresTimelineStore {
    async fn timeline(&self) -> Result<Vec<TimelineEntry>, StoreError> {
        let rows = sqlx::query_as::<_, EntryRow>(
            r#"
            SELECT id, content, author_id
            FROM posts
            ORDER BY id DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|err| StoreError::Backend(err.to_string()))?;

        Ok(rows.into_iter().map(Into::into).collect())
    }
}
