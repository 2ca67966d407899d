//! PostgreSQL implementation of the `ohq_core` storage ports.

use async_trait::async_trait;
use ohq_core::error::CoreError;
use ohq_core::queue::{Queue, Session};
use ohq_core::roles::Role;
use ohq_core::store::{QueueStore, RoleOracle, SessionStore, TicketStore, UserDirectory};
use ohq_core::ticket::{NewTicket, Stamp, Ticket, Transition};
use ohq_core::types::{CourseId, QueueId, SessionId, TicketId, UserId};
use ohq_core::user::User;

use crate::error::db_error;
use crate::repositories::{QueueRepo, RoleRepo, SessionRepo, TicketRepo, UserRepo};
use crate::DbPool;

#[derive(Clone)]
pub struct PgStore {
    pool: DbPool,
}

impl PgStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TicketStore for PgStore {
    async fn find_ticket(&self, id: TicketId) -> Result<Option<Ticket>, CoreError> {
        TicketRepo::find_by_id(&self.pool, id)
            .await
            .map_err(db_error)?
            .map(Ticket::try_from)
            .transpose()
    }

    async fn create_ticket(&self, ticket: NewTicket) -> Result<Ticket, CoreError> {
        let mut tx = self.pool.begin().await.map_err(db_error)?;

        // Appending first locks the queue row and detects a vanished queue
        // before the ticket's foreign key is checked.
        let appended = QueueRepo::append_ticket(&mut *tx, ticket.queue_id, ticket.id)
            .await
            .map_err(db_error)?;
        if !appended {
            return Err(CoreError::not_found("queue", ticket.queue_id));
        }
        let row = TicketRepo::insert(&mut *tx, &ticket)
            .await
            .map_err(db_error)?;

        tx.commit().await.map_err(db_error)?;
        Ticket::try_from(row)
    }

    async fn apply_transition(
        &self,
        id: TicketId,
        transition: Transition,
        stamp: Stamp,
    ) -> Result<Option<Ticket>, CoreError> {
        TicketRepo::apply_transition(&self.pool, id, transition, stamp)
            .await
            .map_err(db_error)?
            .map(Ticket::try_from)
            .transpose()
    }
}

#[async_trait]
impl QueueStore for PgStore {
    async fn find_queue(&self, id: QueueId) -> Result<Option<Queue>, CoreError> {
        Ok(QueueRepo::find_by_id(&self.pool, id)
            .await
            .map_err(db_error)?
            .map(Queue::from))
    }
}

#[async_trait]
impl SessionStore for PgStore {
    async fn find_session(&self, id: SessionId) -> Result<Option<Session>, CoreError> {
        Ok(SessionRepo::find_by_id(&self.pool, id)
            .await
            .map_err(db_error)?
            .map(Session::from))
    }
}

#[async_trait]
impl UserDirectory for PgStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, CoreError> {
        Ok(UserRepo::find_by_email(&self.pool, email)
            .await
            .map_err(db_error)?
            .map(User::from))
    }

    async fn provision(&self, email: &str) -> Result<UserId, CoreError> {
        if let Some(existing) = self.find_by_email(email).await? {
            return Ok(existing.id);
        }
        if let Some(id) = UserRepo::insert_if_absent(&self.pool, email)
            .await
            .map_err(db_error)?
        {
            return Ok(id);
        }
        // Lost the insert race: the winner's row is visible now.
        self.find_by_email(email)
            .await?
            .map(|u| u.id)
            .ok_or_else(|| CoreError::Internal(format!("Provisioned user for {email} vanished")))
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, CoreError> {
        Ok(UserRepo::find_by_id(&self.pool, id)
            .await
            .map_err(db_error)?
            .map(User::from))
    }

    async fn find_by_ids(&self, ids: &[UserId]) -> Result<Vec<User>, CoreError> {
        let rows = UserRepo::find_by_ids(&self.pool, ids)
            .await
            .map_err(db_error)?;
        Ok(rows.into_iter().map(User::from).collect())
    }

    async fn find_by_emails(&self, emails: &[String]) -> Result<Vec<User>, CoreError> {
        let rows = UserRepo::find_by_emails(&self.pool, emails)
            .await
            .map_err(db_error)?;
        Ok(rows.into_iter().map(User::from).collect())
    }
}

#[async_trait]
impl RoleOracle for PgStore {
    async fn has_role(
        &self,
        user: UserId,
        roles: &[Role],
        course: CourseId,
    ) -> Result<bool, CoreError> {
        RoleRepo::user_has_role(&self.pool, user, roles, course)
            .await
            .map_err(db_error)
    }

    async fn users_in_roles(
        &self,
        roles: &[Role],
        course: CourseId,
    ) -> Result<Vec<UserId>, CoreError> {
        RoleRepo::users_in_roles(&self.pool, roles, course)
            .await
            .map_err(db_error)
    }
}
