//! Postgres-backed post store over the shared `posts` table.

use async_trait::async_trait;
use sqlx::{FromRow, PgPool};

use feed_core::{PostId, UserId};

use super::{PostRecord, PostStore, StoreError};

#[derive(Debug, FromRow)]
struct PostRow {
    id: i64,
    content: String,
    author_id: i64,
}

impl From<PostRow> for PostRecord {
    fn from(row: PostRow) -> Self {
        Self {
            id: PostId::new(row.id),
            content: row.content,
            author_id: UserId::new(row.author_id),
        }
    }
}

#[derive(Debug, Clone)]
pub struct PostgresPostStore {
    pool: PgPool,
}

impl PostgresPostStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create the `posts` table if it does not exist yet.
    pub async fn ensure_schema(pool: &PgPool) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS posts (
                id BIGSERIAL PRIMARY KEY,
                content TEXT NOT NULL,
                author_id BIGINT NOT NULL
            )
            "#,
        )
        .execute(pool)
        .await
        .map_err(backend_error)?;

        Ok(())
    }
}

#[async_trait]
impl PostStore for PostgresPostStore {
    async fn insert(&self, content: &str, author_id: UserId) -> Result<PostRecord, StoreError> {
        let row = sqlx::query_as::<_, PostRow>(
            r#"
            INSERT INTO posts (content, author_id)
            VALUES ($1, $2)
            RETURNING id, content, author_id
            "#,
        )
        .bind(content)
        .bind(author_id.as_i64())
        .fetch_one(&self.pool)
        .await
        .map_err(backend_error)?;

        Ok(row.into())
    }

    async fn list_all(&self) -> Result<Vec<PostRecord>, StoreError> {
        let rows = sqlx::query_as::<_, PostRow>(
            r#"
            SELECT id, content, author_id
            FROM posts
            ORDER BY id DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(backend_error)?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn delete(&self, id: PostId) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM posts WHERE id = $1")
            .bind(id.as_i64())
            .execute(&self.pool)
            .await
            .map_err(backend_error)?;

        Ok(result.rows_affected() > 0)
    }
}

fn backend_error(err: sqlx::Error) -> StoreError {
    StoreError::Backend(err.to_string())
}
