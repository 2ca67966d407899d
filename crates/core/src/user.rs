//! User directory record and the field-level disclosure policy.
//!
//! Disclosure breadth is ordered `Private ⊇ Protected ⊇ Public`. Presence
//! subfields are never part of a field set; only the online-staff projection
//! attaches them.

use serde::{Deserialize, Serialize};

use crate::types::{Timestamp, UserId};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: UserId,
    /// Primary email, unique across the directory.
    pub email: String,
    /// Secondary addresses that also resolve to this user.
    pub emails: Vec<String>,
    pub name: Option<String>,
    pub presence: Presence,
    pub created_at: Timestamp,
}

impl User {
    /// Whether `email` (already normalized) is this user's primary or a
    /// secondary address.
    pub fn has_email(&self, email: &str) -> bool {
        self.email == email || self.emails.iter().any(|e| e == email)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Presence {
    pub online: bool,
    pub idle: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum FieldSet {
    Public,
    Protected,
    Private,
}

/// A field-redacted view of a [`User`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserView {
    pub id: UserId,
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub emails: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<Timestamp>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<Presence>,
}

impl UserView {
    pub fn project(user: &User, fields: FieldSet) -> Self {
        let protected = fields >= FieldSet::Protected;
        let private = fields >= FieldSet::Private;
        Self {
            id: user.id,
            name: user.name.clone(),
            email: protected.then(|| user.email.clone()),
            emails: protected.then(|| user.emails.clone()),
            created_at: private.then_some(user.created_at),
            status: None,
        }
    }

    pub fn with_presence(mut self, presence: Presence) -> Self {
        self.status = Some(presence);
        self
    }
}
