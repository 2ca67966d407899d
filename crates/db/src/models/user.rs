//! User row model and DTO.

use ohq_core::types::Timestamp;
use ohq_core::user::{Presence, User};
use serde::Deserialize;
use sqlx::FromRow;
use uuid::Uuid;

/// Full row from the `users` table.
#[derive(Debug, Clone, FromRow)]
pub struct UserRow {
    pub id: Uuid,
    pub email: String,
    pub emails: Vec<String>,
    pub name: Option<String>,
    pub online: bool,
    pub idle: bool,
    pub created_at: Timestamp,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        User {
            id: row.id,
            email: row.email,
            emails: row.emails,
            name: row.name,
            presence: Presence {
                online: row.online,
                idle: row.idle,
            },
            created_at: row.created_at,
        }
    }
}

/// DTO for creating a user with a known profile. Emails must already be
/// normalized.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateUser {
    pub email: String,
    #[serde(default)]
    pub emails: Vec<String>,
    pub name: Option<String>,
}
