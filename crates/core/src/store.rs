//! Storage ports consumed by the lifecycle engine and the projections.
//!
//! Implementations: [`crate::memory::MemoryStore`] and the PostgreSQL
//! store in `ohq-db`. Every method surfaces storage failures as
//! [`CoreError`]; none retries on its own.

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::CoreError;
use crate::queue::{Queue, Session};
use crate::roles::Role;
use crate::ticket::{NewTicket, Stamp, Ticket, Transition};
use crate::types::{CourseId, QueueId, SessionId, TicketId, UserId};
use crate::user::User;

#[async_trait]
pub trait TicketStore: Send + Sync {
    async fn find_ticket(&self, id: TicketId) -> Result<Option<Ticket>, CoreError>;

    /// Insert the ticket and append its id to the owning queue's roster as
    /// one atomic unit.
    ///
    /// Fails with `NotFound` (and writes nothing) if the queue no longer
    /// exists. The roster append is set-like.
    async fn create_ticket(&self, ticket: NewTicket) -> Result<Ticket, CoreError>;

    /// Apply `transition` as a conditional update.
    ///
    /// Unless the transition is allowed on deleted tickets, the update only
    /// matches a ticket whose status is not `deleted`. Returns `None` when
    /// nothing matched.
    async fn apply_transition(
        &self,
        id: TicketId,
        transition: Transition,
        stamp: Stamp,
    ) -> Result<Option<Ticket>, CoreError>;
}

#[async_trait]
pub trait QueueStore: Send + Sync {
    async fn find_queue(&self, id: QueueId) -> Result<Option<Queue>, CoreError>;
}

#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn find_session(&self, id: SessionId) -> Result<Option<Session>, CoreError>;
}

#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// Find a user by primary or secondary email (normalized).
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, CoreError>;

    /// Create a minimal account for `email`, or return the existing one.
    ///
    /// Must be safe under concurrent calls for the same email: exactly one
    /// user ends up owning the address.
    async fn provision(&self, email: &str) -> Result<UserId, CoreError>;

    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, CoreError>;

    /// Users with any of `ids`, ordered by id. Unknown ids are skipped.
    async fn find_by_ids(&self, ids: &[UserId]) -> Result<Vec<User>, CoreError>;

    /// Users whose primary or secondary email is in `emails`, ordered by id.
    async fn find_by_emails(&self, emails: &[String]) -> Result<Vec<User>, CoreError>;
}

#[async_trait]
pub trait RoleOracle: Send + Sync {
    /// Whether `user` holds any of `roles` in `course` (or globally).
    async fn has_role(
        &self,
        user: UserId,
        roles: &[Role],
        course: CourseId,
    ) -> Result<bool, CoreError>;

    /// Ids of users holding any of `roles` in `course` (or globally).
    async fn users_in_roles(
        &self,
        roles: &[Role],
        course: CourseId,
    ) -> Result<Vec<UserId>, CoreError>;
}

/// The full set of collaborators, shared behind `Arc`s.
#[derive(Clone)]
pub struct Stores {
    pub tickets: Arc<dyn TicketStore>,
    pub queues: Arc<dyn QueueStore>,
    pub sessions: Arc<dyn SessionStore>,
    pub users: Arc<dyn UserDirectory>,
    pub roles: Arc<dyn RoleOracle>,
}

impl Stores {
    /// Use one backend for every port.
    pub fn from_backend<B>(backend: Arc<B>) -> Self
    where
        B: TicketStore + QueueStore + SessionStore + UserDirectory + RoleOracle + 'static,
    {
        Self {
            tickets: backend.clone(),
            queues: backend.clone(),
            sessions: backend.clone(),
            users: backend.clone(),
            roles: backend,
        }
    }
}
