//! Ticket row model.

use ohq_core::error::CoreError;
use ohq_core::notifications::NotificationSettings;
use ohq_core::ticket::{Stamp, Ticket, TicketStatus};
use ohq_core::types::{Timestamp, UserId};
use sqlx::types::Json;
use sqlx::FromRow;
use uuid::Uuid;

/// Full row from the `tickets` table.
#[derive(Debug, Clone, FromRow)]
pub struct TicketRow {
    pub id: Uuid,
    pub course_id: Uuid,
    pub queue_id: Uuid,
    pub student_ids: Vec<Uuid>,
    pub question: Option<String>,
    pub notifications: Json<NotificationSettings>,
    pub status: String,
    pub created_at: Timestamp,
    pub created_by: Uuid,
    pub claimed_at: Option<Timestamp>,
    pub claimed_by: Option<Uuid>,
    pub marked_as_missing_at: Option<Timestamp>,
    pub marked_as_missing_by: Option<Uuid>,
    pub marked_as_done_at: Option<Timestamp>,
    pub marked_as_done_by: Option<Uuid>,
    pub deleted_at: Option<Timestamp>,
    pub deleted_by: Option<Uuid>,
}

fn stamp(at: Option<Timestamp>, by: Option<UserId>) -> Option<Stamp> {
    Some(Stamp { at: at?, by: by? })
}

impl TryFrom<TicketRow> for Ticket {
    type Error = CoreError;

    fn try_from(row: TicketRow) -> Result<Self, Self::Error> {
        let status: TicketStatus = row.status.parse()?;
        Ok(Ticket {
            id: row.id,
            course_id: row.course_id,
            queue_id: row.queue_id,
            student_ids: row.student_ids,
            question: row.question,
            notifications: row.notifications.0,
            status,
            created: Stamp {
                at: row.created_at,
                by: row.created_by,
            },
            claimed: stamp(row.claimed_at, row.claimed_by),
            marked_as_missing: stamp(row.marked_as_missing_at, row.marked_as_missing_by),
            marked_as_done: stamp(row.marked_as_done_at, row.marked_as_done_by),
            deleted: stamp(row.deleted_at, row.deleted_by),
        })
    }
}
