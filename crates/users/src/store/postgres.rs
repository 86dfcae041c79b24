//! Postgres-backed registry store.
//!
//! Create-or-get rides on the unique constraint over `subject`:
//! `INSERT .. ON CONFLICT (subject) DO NOTHING RETURNING ..` either wins the
//! race (row returned, `created = true`) or yields to the concurrent winner,
//! in which case the existing row is read back. The constraint, not
//! application locking, is the source of idempotency.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};

use feed_core::UserId;

use super::{NewUser, StoreError, UserRecord, UserStore};

#[derive(Debug, FromRow)]
struct UserRow {
    id: i64,
    subject: String,
    username: String,
    email: Option<String>,
    created_at: DateTime<Utc>,
}

impl From<UserRow> for UserRecord {
    fn from(row: UserRow) -> Self {
        Self {
            id: UserId::new(row.id),
            subject: row.subject,
            username: row.username,
            email: row.email,
            created_at: row.created_at,
        }
    }
}

#[derive(Debug, Clone)]
pub struct PostgresUserStore {
    pool: PgPool,
}

impl PostgresUserStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create the `users` table if it does not exist yet.
    pub async fn ensure_schema(pool: &PgPool) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS users (
                id BIGSERIAL PRIMARY KEY,
                subject TEXT NOT NULL UNIQUE,
                username TEXT NOT NULL,
                email TEXT,
                created_at TIMESTAMPTZ NOT NULL
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
impl UserStore for PostgresUserStore {
    async fn create_or_get(&self, new_user: NewUser) -> Result<(UserRecord, bool), StoreError> {
        let inserted = sqlx::query_as::<_, UserRow>(
            r#"
            INSERT INTO users (subject, username, email, created_at)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (subject) DO NOTHING
            RETURNING id, subject, username, email, created_at
            "#,
        )
        .bind(&new_user.subject)
        .bind(new_user.effective_username())
        .bind(&new_user.email)
        .bind(Utc::now())
        .fetch_optional(&self.pool)
        .await
        .map_err(backend_error)?;

        if let Some(row) = inserted {
            return Ok((row.into(), true));
        }

        // A concurrent caller won the insert; read back the winning row.
        // Rows are never deleted, so this read can only miss if the backend
        // is broken.
        match self.find_by_subject(&new_user.subject).await? {
            Some(existing) => Ok((existing, false)),
            None => Err(StoreError::Backend(
                "create_or_get: conflicting row not readable".to_string(),
            )),
        }
    }

    async fn find_by_subject(&self, subject: &str) -> Result<Option<UserRecord>, StoreError> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, subject, username, email, created_at
            FROM users
            WHERE subject = $1
            "#,
        )
        .bind(subject)
        .fetch_optional(&self.pool)
        .await
        .map_err(backend_error)?;

        Ok(row.map(Into::into))
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<UserRecord>, StoreError> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, subject, username, email, created_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id.as_i64())
        .fetch_optional(&self.pool)
        .await
        .map_err(backend_error)?;

        Ok(row.map(Into::into))
    }
}

fn backend_error(err: sqlx::Error) -> StoreError {
    StoreError::Backend(err.to_string())
}
