//! Request/response DTOs and JSON mapping helpers.

use serde::{Deserialize, Serialize};

use crate::store::UserRecord;

/// Body of `POST /api/v1/users/signup`. All identity fields come from the
/// verified credential, never from a request body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignupResponse {
    pub id: i64,
    pub subject: String,
    pub username: String,
    pub created: bool,
}

/// Body of `GET /api/v1/users/me` and `GET /api/v1/users/{id}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserResponse {
    pub id: i64,
    pub subject: String,
    pub username: String,
    pub email: Option<String>,
}

impl SignupResponse {
    pub fn from_record(record: &UserRecord, created: bool) -> Self {
        Self {
            id: record.id.as_i64(),
            subject: record.subject.clone(),
            username: record.username.clone(),
            created,
        }
    }
}

impl From<&UserRecord> for UserResponse {
    fn from(record: &UserRecord) -> Self {
        Self {
            id: record.id.as_i64(),
            subject: record.subject.clone(),
            username: record.username.clone(),
            email: record.email.clone(),
        }
    }
}
