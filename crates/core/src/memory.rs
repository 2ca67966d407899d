//! In-memory implementation of every storage port.
//!
//! Backs the `memory` storage backend for local runs and the test suites.
//! All state sits behind one mutex, so each port call is atomic.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use chrono::Utc;

use crate::error::CoreError;
use crate::queue::{append_to_roster, Queue, Session};
use crate::roles::{Role, RoleGrant, RoleScope};
use crate::store::{QueueStore, RoleOracle, SessionStore, TicketStore, UserDirectory};
use crate::ticket::{NewTicket, Stamp, Ticket, Transition};
use crate::types::{new_id, CourseId, QueueId, SessionId, TicketId, UserId};
use crate::user::{Presence, User};
use crate::validation::normalize_email;

#[derive(Default)]
struct Inner {
    tickets: HashMap<TicketId, Ticket>,
    queues: HashMap<QueueId, Queue>,
    sessions: HashMap<SessionId, Session>,
    users: HashMap<UserId, User>,
    grants: Vec<(UserId, RoleGrant)>,
}

#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    // ── Seeding ─────────────────────────────────────────────────────

    pub fn add_user(&self, email: &str, secondary: &[&str], name: Option<&str>) -> UserId {
        let user = User {
            id: new_id(),
            email: normalize_email(email),
            emails: secondary.iter().map(|e| normalize_email(e)).collect(),
            name: name.map(str::to_string),
            presence: Presence::default(),
            created_at: Utc::now(),
        };
        let id = user.id;
        self.lock().users.insert(id, user);
        id
    }

    pub fn set_presence(&self, user: UserId, presence: Presence) {
        if let Some(u) = self.lock().users.get_mut(&user) {
            u.presence = presence;
        }
    }

    pub fn add_queue(&self, course: CourseId, name: &str, restricted: &[SessionId]) -> QueueId {
        let queue = Queue {
            id: new_id(),
            course_id: course,
            name: name.to_string(),
            ticket_ids: Vec::new(),
            restricted_session_ids: restricted.to_vec(),
        };
        let id = queue.id;
        self.lock().queues.insert(id, queue);
        id
    }

    pub fn remove_queue(&self, id: QueueId) {
        self.lock().queues.remove(&id);
    }

    pub fn add_session(&self, course: CourseId, secret: &str) -> SessionId {
        let session = Session {
            id: new_id(),
            course_id: course,
            secret: secret.to_string(),
        };
        let id = session.id;
        self.lock().sessions.insert(id, session);
        id
    }

    pub fn grant_role(&self, user: UserId, role: Role, scope: RoleScope) {
        let grant = RoleGrant { role, scope };
        let mut inner = self.lock();
        if !inner.grants.contains(&(user, grant)) {
            inner.grants.push((user, grant));
        }
    }

    // ── Inspection ──────────────────────────────────────────────────

    pub fn ticket(&self, id: TicketId) -> Option<Ticket> {
        self.lock().tickets.get(&id).cloned()
    }

    pub fn queue(&self, id: QueueId) -> Option<Queue> {
        self.lock().queues.get(&id).cloned()
    }

    pub fn ticket_count(&self) -> usize {
        self.lock().tickets.len()
    }

    pub fn user_count(&self) -> usize {
        self.lock().users.len()
    }
}

fn sorted_by_id(mut users: Vec<User>) -> Vec<User> {
    users.sort_by_key(|u| u.id);
    users
}

#[async_trait]
impl TicketStore for MemoryStore {
    async fn find_ticket(&self, id: TicketId) -> Result<Option<Ticket>, CoreError> {
        Ok(self.ticket(id))
    }

    async fn create_ticket(&self, ticket: NewTicket) -> Result<Ticket, CoreError> {
        let mut inner = self.lock();
        let queue = inner
            .queues
            .get_mut(&ticket.queue_id)
            .ok_or_else(|| CoreError::not_found("queue", ticket.queue_id))?;
        append_to_roster(&mut queue.ticket_ids, ticket.id);

        let ticket = ticket.into_ticket();
        inner.tickets.insert(ticket.id, ticket.clone());
        Ok(ticket)
    }

    async fn apply_transition(
        &self,
        id: TicketId,
        transition: Transition,
        stamp: Stamp,
    ) -> Result<Option<Ticket>, CoreError> {
        let mut inner = self.lock();
        let Some(ticket) = inner.tickets.get_mut(&id) else {
            return Ok(None);
        };
        if ticket.is_deleted() && !transition.allowed_on_deleted() {
            return Ok(None);
        }
        transition.apply(ticket, stamp);
        Ok(Some(ticket.clone()))
    }
}

#[async_trait]
impl QueueStore for MemoryStore {
    async fn find_queue(&self, id: QueueId) -> Result<Option<Queue>, CoreError> {
        Ok(self.queue(id))
    }
}

#[async_trait]
impl SessionStore for MemoryStore {
    async fn find_session(&self, id: SessionId) -> Result<Option<Session>, CoreError> {
        Ok(self.lock().sessions.get(&id).cloned())
    }
}

#[async_trait]
impl UserDirectory for MemoryStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, CoreError> {
        let email = normalize_email(email);
        Ok(self
            .lock()
            .users
            .values()
            .find(|u| u.has_email(&email))
            .cloned())
    }

    async fn provision(&self, email: &str) -> Result<UserId, CoreError> {
        let email = normalize_email(email);
        let mut inner = self.lock();
        if let Some(existing) = inner.users.values().find(|u| u.has_email(&email)) {
            return Ok(existing.id);
        }
        let user = User {
            id: new_id(),
            email,
            emails: Vec::new(),
            name: None,
            presence: Presence::default(),
            created_at: Utc::now(),
        };
        let id = user.id;
        inner.users.insert(id, user);
        Ok(id)
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, CoreError> {
        Ok(self.lock().users.get(&id).cloned())
    }

    async fn find_by_ids(&self, ids: &[UserId]) -> Result<Vec<User>, CoreError> {
        let inner = self.lock();
        let users = inner
            .users
            .values()
            .filter(|u| ids.contains(&u.id))
            .cloned()
            .collect();
        Ok(sorted_by_id(users))
    }

    async fn find_by_emails(&self, emails: &[String]) -> Result<Vec<User>, CoreError> {
        let emails: Vec<String> = emails.iter().map(|e| normalize_email(e)).collect();
        let inner = self.lock();
        let users = inner
            .users
            .values()
            .filter(|u| emails.iter().any(|e| u.has_email(e)))
            .cloned()
            .collect();
        Ok(sorted_by_id(users))
    }
}

#[async_trait]
impl RoleOracle for MemoryStore {
    async fn has_role(
        &self,
        user: UserId,
        roles: &[Role],
        course: CourseId,
    ) -> Result<bool, CoreError> {
        Ok(self
            .lock()
            .grants
            .iter()
            .any(|(holder, grant)| *holder == user && grant.satisfies(roles, course)))
    }

    async fn users_in_roles(
        &self,
        roles: &[Role],
        course: CourseId,
    ) -> Result<Vec<UserId>, CoreError> {
        let mut ids: Vec<UserId> = self
            .lock()
            .grants
            .iter()
            .filter(|(_, grant)| grant.satisfies(roles, course))
            .map(|(holder, _)| *holder)
            .collect();
        ids.sort();
        ids.dedup();
        Ok(ids)
    }
}
