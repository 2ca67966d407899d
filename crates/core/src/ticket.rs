//! Ticket record, status lifecycle, and the create-ticket request.
//!
//! Transitions are permissive: apart from creation the only hard guard is
//! that a ticket is not deleted. Which state a transition starts from is not
//! checked, so claiming a claimed ticket simply re-stamps it.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::error::CoreError;
use crate::notifications::NotificationSettings;
use crate::types::{CourseId, QueueId, SessionId, TicketId, Timestamp, UserId};
use crate::validation::{
    field_error, is_valid_secret, validate_student_emails, MAX_QUESTION_LENGTH,
};

// ---------------------------------------------------------------------------
// Status
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TicketStatus {
    Open,
    Claimed,
    MarkedAsMissing,
    MarkedAsDone,
    Deleted,
}

impl TicketStatus {
    pub const fn as_str(self) -> &'static str {
        match self {
            TicketStatus::Open => "open",
            TicketStatus::Claimed => "claimed",
            TicketStatus::MarkedAsMissing => "markedAsMissing",
            TicketStatus::MarkedAsDone => "markedAsDone",
            TicketStatus::Deleted => "deleted",
        }
    }
}

impl fmt::Display for TicketStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TicketStatus {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "open" => Ok(TicketStatus::Open),
            "claimed" => Ok(TicketStatus::Claimed),
            "markedAsMissing" => Ok(TicketStatus::MarkedAsMissing),
            "markedAsDone" => Ok(TicketStatus::MarkedAsDone),
            "deleted" => Ok(TicketStatus::Deleted),
            other => Err(CoreError::Internal(format!("Unknown ticket status '{other}'"))),
        }
    }
}

// ---------------------------------------------------------------------------
// Record
// ---------------------------------------------------------------------------

/// A paired timestamp and actor recorded when a state is entered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stamp {
    pub at: Timestamp,
    pub by: UserId,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ticket {
    pub id: TicketId,
    pub course_id: CourseId,
    pub queue_id: QueueId,
    pub student_ids: Vec<UserId>,
    pub question: Option<String>,
    pub notifications: NotificationSettings,
    pub status: TicketStatus,
    pub created: Stamp,
    pub claimed: Option<Stamp>,
    pub marked_as_missing: Option<Stamp>,
    pub marked_as_done: Option<Stamp>,
    pub deleted: Option<Stamp>,
}

impl Ticket {
    /// Whether `user` is one of the ticket's students.
    pub fn belongs_to_user(&self, user: UserId) -> bool {
        self.student_ids.contains(&user)
    }

    pub fn is_deleted(&self) -> bool {
        self.status == TicketStatus::Deleted
    }
}

/// A fully resolved ticket ready to be written. Always born `open`.
#[derive(Debug, Clone, PartialEq)]
pub struct NewTicket {
    pub id: TicketId,
    pub course_id: CourseId,
    pub queue_id: QueueId,
    pub student_ids: Vec<UserId>,
    pub question: Option<String>,
    pub notifications: NotificationSettings,
    pub created: Stamp,
}

impl NewTicket {
    pub fn into_ticket(self) -> Ticket {
        Ticket {
            id: self.id,
            course_id: self.course_id,
            queue_id: self.queue_id,
            student_ids: self.student_ids,
            question: self.question,
            notifications: self.notifications,
            status: TicketStatus::Open,
            created: self.created,
            claimed: None,
            marked_as_missing: None,
            marked_as_done: None,
            deleted: None,
        }
    }
}

// ---------------------------------------------------------------------------
// Transitions
// ---------------------------------------------------------------------------

/// A status-changing operation applied to an existing ticket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Transition {
    Claim,
    Release,
    MarkAsMissing,
    MarkAsDone,
    Delete,
}

impl Transition {
    pub const fn target(self) -> TicketStatus {
        match self {
            Transition::Claim => TicketStatus::Claimed,
            Transition::Release => TicketStatus::Open,
            Transition::MarkAsMissing => TicketStatus::MarkedAsMissing,
            Transition::MarkAsDone => TicketStatus::MarkedAsDone,
            Transition::Delete => TicketStatus::Deleted,
        }
    }

    /// Whether the transition may be applied to a deleted ticket.
    pub const fn allowed_on_deleted(self) -> bool {
        matches!(self, Transition::Delete)
    }

    pub const fn name(self) -> &'static str {
        match self {
            Transition::Claim => "claim",
            Transition::Release => "release",
            Transition::MarkAsMissing => "markAsMissing",
            Transition::MarkAsDone => "markAsDone",
            Transition::Delete => "delete",
        }
    }

    /// Apply the transition's field effects in place.
    ///
    /// Claim stamps are overwritten on every claim; release clears them.
    /// Missing, done, and deleted stamps keep their first value.
    pub fn apply(self, ticket: &mut Ticket, stamp: Stamp) {
        ticket.status = self.target();
        match self {
            Transition::Claim => ticket.claimed = Some(stamp),
            Transition::Release => ticket.claimed = None,
            Transition::MarkAsMissing => {
                ticket.marked_as_missing.get_or_insert(stamp);
            }
            Transition::MarkAsDone => {
                ticket.marked_as_done.get_or_insert(stamp);
            }
            Transition::Delete => {
                ticket.deleted.get_or_insert(stamp);
            }
        }
    }
}

impl fmt::Display for Transition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ---------------------------------------------------------------------------
// Create request
// ---------------------------------------------------------------------------

/// Typed payload of the create-ticket operation.
///
/// Ids are UUIDs, so malformed identifiers never deserialize.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
#[validate(schema(function = "validate_create_ticket"))]
pub struct CreateTicketRequest {
    pub queue_id: QueueId,
    pub student_emails: Vec<String>,
    #[serde(default)]
    pub question: Option<String>,
    pub notifications: NotificationSettings,
    #[serde(default)]
    pub session_id: Option<SessionId>,
    #[serde(default)]
    pub secret: Option<String>,
}

fn validate_create_ticket(req: &CreateTicketRequest) -> Result<(), ValidationError> {
    validate_student_emails(&req.student_emails).map_err(|e| match e {
        CoreError::Validation(msg) => field_error("student_emails", msg),
        other => field_error("student_emails", other.to_string()),
    })?;

    if let Some(question) = &req.question {
        if question.trim().chars().count() > MAX_QUESTION_LENGTH {
            return Err(field_error(
                "question",
                format!("question may be at most {MAX_QUESTION_LENGTH} characters"),
            ));
        }
    }

    if let Some(secret) = &req.secret {
        if !is_valid_secret(secret) {
            return Err(field_error(
                "secret",
                "secret must be 6-64 alphanumeric characters".into(),
            ));
        }
    }

    req.notifications
        .check()
        .map_err(|msg| field_error("notifications", msg))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::new_id;
    use chrono::Utc;
    use serde_json::json;

    fn open_ticket() -> Ticket {
        let student = new_id();
        NewTicket {
            id: new_id(),
            course_id: new_id(),
            queue_id: new_id(),
            student_ids: vec![student],
            question: None,
            notifications: NotificationSettings::default(),
            created: Stamp {
                at: Utc::now(),
                by: student,
            },
        }
        .into_ticket()
    }

    fn stamp() -> Stamp {
        Stamp {
            at: Utc::now(),
            by: new_id(),
        }
    }

    #[test]
    fn status_names_round_trip() {
        for status in [
            TicketStatus::Open,
            TicketStatus::Claimed,
            TicketStatus::MarkedAsMissing,
            TicketStatus::MarkedAsDone,
            TicketStatus::Deleted,
        ] {
            assert_eq!(status.as_str().parse::<TicketStatus>().unwrap(), status);
        }
        assert!("closed".parse::<TicketStatus>().is_err());
    }

    #[test]
    fn new_ticket_is_open_without_stamps() {
        let ticket = open_ticket();
        assert_eq!(ticket.status, TicketStatus::Open);
        assert!(ticket.claimed.is_none());
        assert!(ticket.deleted.is_none());
    }

    #[test]
    fn release_clears_claim_stamps() {
        let mut ticket = open_ticket();
        Transition::Claim.apply(&mut ticket, stamp());
        assert_eq!(ticket.status, TicketStatus::Claimed);
        assert!(ticket.claimed.is_some());

        Transition::Release.apply(&mut ticket, stamp());
        assert_eq!(ticket.status, TicketStatus::Open);
        assert!(ticket.claimed.is_none());
    }

    #[test]
    fn reclaim_overwrites_claim_stamp() {
        let mut ticket = open_ticket();
        let first = stamp();
        let second = stamp();
        Transition::Claim.apply(&mut ticket, first);
        Transition::Claim.apply(&mut ticket, second);
        assert_eq!(ticket.claimed, Some(second));
    }

    #[test]
    fn terminal_stamps_keep_first_value() {
        let mut ticket = open_ticket();
        let first = stamp();
        Transition::MarkAsDone.apply(&mut ticket, first);
        Transition::Release.apply(&mut ticket, stamp());
        Transition::MarkAsDone.apply(&mut ticket, stamp());
        assert_eq!(ticket.status, TicketStatus::MarkedAsDone);
        assert_eq!(ticket.marked_as_done, Some(first));
    }

    #[test]
    fn history_accumulates_across_states() {
        let mut ticket = open_ticket();
        Transition::MarkAsMissing.apply(&mut ticket, stamp());
        Transition::Claim.apply(&mut ticket, stamp());
        Transition::MarkAsDone.apply(&mut ticket, stamp());
        assert_eq!(ticket.status, TicketStatus::MarkedAsDone);
        assert!(ticket.marked_as_missing.is_some());
        assert!(ticket.claimed.is_some());
    }

    #[test]
    fn only_delete_is_allowed_on_deleted() {
        assert!(Transition::Delete.allowed_on_deleted());
        for t in [
            Transition::Claim,
            Transition::Release,
            Transition::MarkAsMissing,
            Transition::MarkAsDone,
        ] {
            assert!(!t.allowed_on_deleted());
        }
    }

    #[test]
    fn ownership_checks_student_ids() {
        let ticket = open_ticket();
        assert!(ticket.belongs_to_user(ticket.student_ids[0]));
        assert!(!ticket.belongs_to_user(new_id()));
    }

    fn request(value: serde_json::Value) -> Result<CreateTicketRequest, serde_json::Error> {
        serde_json::from_value(value)
    }

    #[test]
    fn valid_request_passes() {
        let req = request(json!({
            "queueId": new_id(),
            "studentEmails": ["ada@example.edu"],
            "question": "Segfault in part 2",
            "notifications": { "email": { "address": "ada@example.edu" } },
            "sessionId": new_id(),
            "secret": "abc123"
        }))
        .unwrap();
        assert!(req.validate().is_ok());
    }

    #[test]
    fn malformed_queue_id_does_not_deserialize() {
        let result = request(json!({
            "queueId": "not-a-uuid",
            "studentEmails": ["ada@example.edu"],
            "notifications": {}
        }));
        assert!(result.is_err());
    }

    #[test]
    fn empty_student_list_fails_validation() {
        let req = request(json!({
            "queueId": new_id(),
            "studentEmails": [],
            "notifications": {}
        }))
        .unwrap();
        let err = CoreError::from(req.validate().unwrap_err());
        match err {
            CoreError::Validation(msg) => {
                assert_eq!(msg, "studentEmails must contain at least one address");
            }
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn large_student_lists_pass_validation() {
        let emails: Vec<String> = (0..11).map(|i| format!("s{i}@example.edu")).collect();
        let req = request(json!({
            "queueId": new_id(),
            "studentEmails": emails,
            "notifications": {}
        }))
        .unwrap();
        assert!(req.validate().is_ok());
    }

    #[test]
    fn malformed_secret_fails_validation() {
        let req = request(json!({
            "queueId": new_id(),
            "studentEmails": ["ada@example.edu"],
            "notifications": {},
            "secret": "no spaces allowed"
        }))
        .unwrap();
        assert!(req.validate().is_err());
    }

    #[test]
    fn oversized_question_fails_validation() {
        let req = request(json!({
            "queueId": new_id(),
            "studentEmails": ["ada@example.edu"],
            "notifications": {},
            "question": "x".repeat(MAX_QUESTION_LENGTH + 1)
        }))
        .unwrap();
        assert!(req.validate().is_err());
    }
}
