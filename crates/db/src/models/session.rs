//! Session row model and DTO.

use ohq_core::queue::Session;
use ohq_core::types::Timestamp;
use serde::Deserialize;
use sqlx::FromRow;
use uuid::Uuid;

/// Full row from the `sessions` table. Contains the shared secret; never
/// serialize it to responses.
#[derive(Debug, Clone, FromRow)]
pub struct SessionRow {
    pub id: Uuid,
    pub course_id: Uuid,
    pub secret: String,
    pub created_at: Timestamp,
}

impl From<SessionRow> for Session {
    fn from(row: SessionRow) -> Self {
        Session {
            id: row.id,
            course_id: row.course_id,
            secret: row.secret,
        }
    }
}

/// DTO for creating a session.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateSession {
    pub course_id: Uuid,
    pub secret: String,
}
