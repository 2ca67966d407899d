//! Identifier and timestamp aliases shared by every layer.

/// All store identifiers (tickets, queues, sessions, users, courses) are UUIDs.
pub type Id = uuid::Uuid;

pub type TicketId = Id;
pub type QueueId = Id;
pub type SessionId = Id;
pub type UserId = Id;
pub type CourseId = Id;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// Generate a fresh, time-ordered identifier.
pub fn new_id() -> Id {
    uuid::Uuid::now_v7()
}
