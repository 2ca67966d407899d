//! Queue and session fields consumed by ticket creation, plus the
//! restricted-signup gate.

use constant_time_eq::constant_time_eq;
use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::{CourseId, QueueId, SessionId, TicketId};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Queue {
    pub id: QueueId,
    pub course_id: CourseId,
    pub name: String,
    pub ticket_ids: Vec<TicketId>,
    pub restricted_session_ids: Vec<SessionId>,
}

impl Queue {
    /// A queue is restricted when signup is limited to specific sessions.
    pub fn is_restricted(&self) -> bool {
        !self.restricted_session_ids.is_empty()
    }

    /// Gate a signup against this queue.
    ///
    /// Unrestricted queues accept any caller. Restricted queues require a
    /// session from the restricted set and, independently, the matching
    /// session secret. `session` is the stored session for `session_id`.
    pub fn check_signup(
        &self,
        session_id: Option<SessionId>,
        session: Option<&Session>,
        secret: Option<&str>,
    ) -> Result<(), CoreError> {
        if !self.is_restricted() {
            return Ok(());
        }

        let session_id = match session_id {
            Some(id) if self.restricted_session_ids.contains(&id) => id,
            Some(id) => return Err(CoreError::InvalidSession(id.to_string())),
            None => return Err(CoreError::InvalidSession("(none)".into())),
        };

        let session = session.filter(|s| s.id == session_id);
        match (session, secret) {
            (Some(session), Some(secret)) if session.secret_matches(secret) => Ok(()),
            _ => Err(CoreError::InvalidSecret),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub id: SessionId,
    pub course_id: CourseId,
    /// Shared secret handed out in the room. Never serialized to clients.
    #[serde(skip_serializing)]
    pub secret: String,
}

impl Session {
    pub fn secret_matches(&self, candidate: &str) -> bool {
        constant_time_eq(self.secret.as_bytes(), candidate.as_bytes())
    }
}

/// Append `ticket_id` to a roster unless already present.
///
/// Returns `true` when the roster changed.
pub fn append_to_roster(roster: &mut Vec<TicketId>, ticket_id: TicketId) -> bool {
    if roster.contains(&ticket_id) {
        return false;
    }
    roster.push(ticket_id);
    true
}
