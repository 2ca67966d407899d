//! Repository for the `queues` table, including roster membership.

use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use crate::models::queue::{CreateQueue, QueueRow};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, course_id, name, ticket_ids, restricted_session_ids, created_at";

pub struct QueueRepo;

impl QueueRepo {
    /// Insert a new queue with an empty roster, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateQueue) -> Result<QueueRow, sqlx::Error> {
        let query = format!(
            "INSERT INTO queues (id, course_id, name, restricted_session_ids)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, QueueRow>(&query)
            .bind(Uuid::now_v7())
            .bind(input.course_id)
            .bind(&input.name)
            .bind(&input.restricted_session_ids)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<QueueRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM queues WHERE id = $1");
        sqlx::query_as::<_, QueueRow>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Append `ticket_id` to the queue's roster unless it is already there.
    ///
    /// Runs on a caller-supplied connection so it can share the ticket
    /// insert's transaction. Returns `false` if the queue does not exist.
    pub async fn append_ticket(
        conn: &mut PgConnection,
        queue_id: Uuid,
        ticket_id: Uuid,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE queues SET ticket_ids = CASE
                WHEN $2 = ANY(ticket_ids) THEN ticket_ids
                ELSE array_append(ticket_ids, $2)
             END
             WHERE id = $1",
        )
        .bind(queue_id)
        .bind(ticket_id)
        .execute(conn)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
