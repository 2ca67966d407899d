//! Repository for the `tickets` table.
//!
//! Status changes are single conditional `UPDATE`s so concurrent staff
//! actions on one ticket never lose an update to a read-then-write race.

use ohq_core::ticket::{NewTicket, Stamp, Transition};
use sqlx::types::Json;
use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use crate::models::ticket::TicketRow;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, course_id, queue_id, student_ids, question, notifications, status, \
    created_at, created_by, claimed_at, claimed_by, marked_as_missing_at, marked_as_missing_by, \
    marked_as_done_at, marked_as_done_by, deleted_at, deleted_by";

/// `SET` clause for a transition, and whether it binds the stamp as `$2, $3`.
fn set_clause(transition: Transition) -> (&'static str, bool) {
    match transition {
        Transition::Claim => (
            "status = 'claimed', claimed_at = $2, claimed_by = $3",
            true,
        ),
        Transition::Release => (
            "status = 'open', claimed_at = NULL, claimed_by = NULL",
            false,
        ),
        Transition::MarkAsMissing => (
            "status = 'markedAsMissing',
             marked_as_missing_by = CASE WHEN marked_as_missing_at IS NULL THEN $3 ELSE marked_as_missing_by END,
             marked_as_missing_at = COALESCE(marked_as_missing_at, $2)",
            true,
        ),
        Transition::MarkAsDone => (
            "status = 'markedAsDone',
             marked_as_done_by = CASE WHEN marked_as_done_at IS NULL THEN $3 ELSE marked_as_done_by END,
             marked_as_done_at = COALESCE(marked_as_done_at, $2)",
            true,
        ),
        Transition::Delete => (
            "status = 'deleted',
             deleted_by = CASE WHEN deleted_at IS NULL THEN $3 ELSE deleted_by END,
             deleted_at = COALESCE(deleted_at, $2)",
            true,
        ),
    }
}

pub struct TicketRepo;

impl TicketRepo {
    /// Insert a ticket in `open` on a caller-supplied connection.
    pub async fn insert(conn: &mut PgConnection, input: &NewTicket) -> Result<TicketRow, sqlx::Error> {
        let query = format!(
            "INSERT INTO tickets
                (id, course_id, queue_id, student_ids, question, notifications, status, created_at, created_by)
             VALUES ($1, $2, $3, $4, $5, $6, 'open', $7, $8)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, TicketRow>(&query)
            .bind(input.id)
            .bind(input.course_id)
            .bind(input.queue_id)
            .bind(&input.student_ids)
            .bind(&input.question)
            .bind(Json(&input.notifications))
            .bind(input.created.at)
            .bind(input.created.by)
            .fetch_one(conn)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<TicketRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM tickets WHERE id = $1");
        sqlx::query_as::<_, TicketRow>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Apply a transition as one conditional update.
    ///
    /// Unless the transition may act on deleted tickets, rows whose status is
    /// `deleted` do not match. Returns `None` when no row matched.
    pub async fn apply_transition(
        pool: &PgPool,
        id: Uuid,
        transition: Transition,
        stamp: Stamp,
    ) -> Result<Option<TicketRow>, sqlx::Error> {
        let (set, binds_stamp) = set_clause(transition);
        let guard = if transition.allowed_on_deleted() {
            ""
        } else {
            " AND status <> 'deleted'"
        };
        let query = format!("UPDATE tickets SET {set} WHERE id = $1{guard} RETURNING {COLUMNS}");

        let mut q = sqlx::query_as::<_, TicketRow>(&query).bind(id);
        if binds_stamp {
            q = q.bind(stamp.at).bind(stamp.by);
        }
        q.fetch_optional(pool).await
    }

    /// List tickets on a queue, oldest first.
    pub async fn list_by_queue(pool: &PgPool, queue_id: Uuid) -> Result<Vec<TicketRow>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM tickets WHERE queue_id = $1 ORDER BY created_at, id"
        );
        sqlx::query_as::<_, TicketRow>(&query)
            .bind(queue_id)
            .fetch_all(pool)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn release_binds_no_stamp() {
        let (set, binds) = set_clause(Transition::Release);
        assert!(!binds);
        assert!(!set.contains('$'));
    }

    #[test]
    fn stamped_transitions_reference_both_params() {
        for t in [
            Transition::Claim,
            Transition::MarkAsMissing,
            Transition::MarkAsDone,
            Transition::Delete,
        ] {
            let (set, binds) = set_clause(t);
            assert!(binds);
            assert!(set.contains("$2") && set.contains("$3"), "{t}");
        }
    }

    #[test]
    fn first_entry_stamps_are_coalesced() {
        for t in [Transition::MarkAsMissing, Transition::MarkAsDone, Transition::Delete] {
            assert!(set_clause(t).0.contains("COALESCE"), "{t}");
        }
        assert!(!set_clause(Transition::Claim).0.contains("COALESCE"));
    }
}
