//! Ticket lifecycle engine: the only writer of ticket records.
//!
//! Every operation validates, consults its collaborators, and then performs
//! exactly one storage write. Creation writes the ticket and the queue
//! roster entry atomically; the other operations are conditional updates
//! guarded on the ticket not being deleted.

use std::fmt;
use std::str::FromStr;

use chrono::Utc;
use validator::Validate;

use crate::error::CoreError;
use crate::identity::IdentityResolver;
use crate::notifications::NotificationSettings;
use crate::roles::TA_OR_ABOVE;
use crate::store::Stores;
use crate::ticket::{CreateTicketRequest, NewTicket, Stamp, Ticket, Transition};
use crate::types::{new_id, TicketId, UserId};
use crate::validation::normalize_question;

/// What deleting an already deleted ticket does.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RedeletePolicy {
    /// Succeed without touching the record; the first deletion stamp stays.
    #[default]
    Idempotent,
    /// Fail with `NotFound`, like every other operation on a deleted ticket.
    Reject,
}

impl FromStr for RedeletePolicy {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "idempotent" => Ok(RedeletePolicy::Idempotent),
            "reject" => Ok(RedeletePolicy::Reject),
            other => Err(CoreError::Validation(format!(
                "Unknown re-delete policy '{other}'. Must be one of: idempotent, reject"
            ))),
        }
    }
}

impl fmt::Display for RedeletePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            RedeletePolicy::Idempotent => "idempotent",
            RedeletePolicy::Reject => "reject",
        })
    }
}

#[derive(Clone)]
pub struct TicketEngine {
    stores: Stores,
    identities: IdentityResolver,
    redelete: RedeletePolicy,
}

impl TicketEngine {
    pub fn new(stores: Stores, redelete: RedeletePolicy) -> Self {
        let identities = IdentityResolver::new(stores.users.clone());
        Self {
            stores,
            identities,
            redelete,
        }
    }

    // ── Creation ────────────────────────────────────────────────────

    /// Create a ticket in `open` and add it to its queue's roster.
    ///
    /// `actor` is `None` for self-service signups, in which case the first
    /// student becomes the creator.
    pub async fn create_ticket(
        &self,
        actor: Option<UserId>,
        request: CreateTicketRequest,
    ) -> Result<TicketId, CoreError> {
        request.validate()?;

        let queue = self
            .stores
            .queues
            .find_queue(request.queue_id)
            .await?
            .ok_or_else(|| CoreError::not_found("queue", request.queue_id))?;

        let session = match request.session_id {
            Some(id) => Some(
                self.stores
                    .sessions
                    .find_session(id)
                    .await?
                    .ok_or_else(|| CoreError::not_found("session", id))?,
            ),
            None => None,
        };

        if let Err(e) = queue.check_signup(
            request.session_id,
            session.as_ref(),
            request.secret.as_deref(),
        ) {
            tracing::warn!(queue_id = %queue.id, error = %e, "Rejected restricted signup");
            return Err(e);
        }

        let student_ids = self.identities.resolve_all(&request.student_emails).await?;
        let first_student = *student_ids
            .first()
            .ok_or_else(|| CoreError::Validation("studentEmails must not be empty".into()))?;

        let ticket = NewTicket {
            id: new_id(),
            course_id: queue.course_id,
            queue_id: queue.id,
            student_ids,
            question: normalize_question(request.question.as_deref()),
            notifications: NotificationSettings::normalized(request.notifications),
            created: Stamp {
                at: Utc::now(),
                by: actor.unwrap_or(first_student),
            },
        };

        let ticket = self.stores.tickets.create_ticket(ticket).await?;

        tracing::info!(
            ticket_id = %ticket.id,
            queue_id = %ticket.queue_id,
            course_id = %ticket.course_id,
            created_by = %ticket.created.by,
            students = ticket.student_ids.len(),
            "Ticket created",
        );

        Ok(ticket.id)
    }

    // ── Transitions ─────────────────────────────────────────────────

    pub async fn claim_ticket(&self, actor: UserId, id: TicketId) -> Result<Ticket, CoreError> {
        self.transition(actor, id, Transition::Claim).await
    }

    pub async fn release_ticket(&self, actor: UserId, id: TicketId) -> Result<Ticket, CoreError> {
        self.transition(actor, id, Transition::Release).await
    }

    pub async fn mark_ticket_as_missing(
        &self,
        actor: UserId,
        id: TicketId,
    ) -> Result<Ticket, CoreError> {
        self.transition(actor, id, Transition::MarkAsMissing).await
    }

    pub async fn mark_ticket_as_done(
        &self,
        actor: UserId,
        id: TicketId,
    ) -> Result<Ticket, CoreError> {
        self.transition(actor, id, Transition::MarkAsDone).await
    }

    /// Delete a ticket. Allowed for the ticket's own students and for
    /// TAs and above.
    pub async fn delete_ticket(&self, actor: UserId, id: TicketId) -> Result<Ticket, CoreError> {
        self.transition(actor, id, Transition::Delete).await
    }

    async fn transition(
        &self,
        actor: UserId,
        id: TicketId,
        transition: Transition,
    ) -> Result<Ticket, CoreError> {
        let ticket = self
            .stores
            .tickets
            .find_ticket(id)
            .await?
            .filter(|t| transition.allowed_on_deleted() || !t.is_deleted())
            .ok_or_else(|| CoreError::not_found("ticket", id))?;

        self.authorize(actor, &ticket, transition).await?;

        if ticket.is_deleted() {
            // Only reachable for deletion.
            return match self.redelete {
                RedeletePolicy::Idempotent => {
                    tracing::debug!(ticket_id = %id, user_id = %actor, "Ticket already deleted");
                    Ok(ticket)
                }
                RedeletePolicy::Reject => Err(CoreError::not_found("ticket", id)),
            };
        }

        let stamp = Stamp {
            at: Utc::now(),
            by: actor,
        };
        let updated = self
            .stores
            .tickets
            .apply_transition(id, transition, stamp)
            .await?
            .ok_or_else(|| CoreError::not_found("ticket", id))?;

        tracing::info!(
            ticket_id = %id,
            user_id = %actor,
            transition = %transition,
            status = %updated.status,
            "Ticket transitioned",
        );

        Ok(updated)
    }

    async fn authorize(
        &self,
        actor: UserId,
        ticket: &Ticket,
        transition: Transition,
    ) -> Result<(), CoreError> {
        if transition == Transition::Delete && ticket.belongs_to_user(actor) {
            return Ok(());
        }

        let staff = self
            .stores
            .roles
            .has_role(actor, TA_OR_ABOVE, ticket.course_id)
            .await?;
        if staff {
            return Ok(());
        }

        tracing::warn!(
            ticket_id = %ticket.id,
            user_id = %actor,
            transition = %transition,
            "Unauthorized ticket operation",
        );
        Err(CoreError::Unauthorized(unauthorized_message(transition).into()))
    }
}

fn unauthorized_message(transition: Transition) -> &'static str {
    match transition {
        Transition::Claim => "Only TAs and above can claim tickets.",
        Transition::Release => "Only TAs and above can release tickets.",
        Transition::MarkAsMissing => "Only TAs and above can mark tickets as missing.",
        Transition::MarkAsDone => "Only TAs and above can mark tickets as done.",
        Transition::Delete => "Only ticket owners or TAs and above can delete tickets.",
    }
}
