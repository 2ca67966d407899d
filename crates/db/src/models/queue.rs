//! Queue row model and DTO.

use ohq_core::queue::Queue;
use ohq_core::types::Timestamp;
use serde::Deserialize;
use sqlx::FromRow;
use uuid::Uuid;

/// Full row from the `queues` table.
#[derive(Debug, Clone, FromRow)]
pub struct QueueRow {
    pub id: Uuid,
    pub course_id: Uuid,
    pub name: String,
    pub ticket_ids: Vec<Uuid>,
    pub restricted_session_ids: Vec<Uuid>,
    pub created_at: Timestamp,
}

impl From<QueueRow> for Queue {
    fn from(row: QueueRow) -> Self {
        Queue {
            id: row.id,
            course_id: row.course_id,
            name: row.name,
            ticket_ids: row.ticket_ids,
            restricted_session_ids: row.restricted_session_ids,
        }
    }
}

/// DTO for creating a queue.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateQueue {
    pub course_id: Uuid,
    pub name: String,
    #[serde(default)]
    pub restricted_session_ids: Vec<Uuid>,
}
