//! Course-scoped staff roles.
//!
//! Students hold no grant; every other permission level is a [`Role`] granted
//! either for one course or globally (a global grant applies to every course).

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::CourseId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Mta,
    Hta,
    Ta,
}

/// Roles allowed to act on tickets ("TA or above").
pub const TA_OR_ABOVE: &[Role] = &[Role::Admin, Role::Mta, Role::Hta, Role::Ta];

/// Roles listed as course staff by the staff projections.
pub const COURSE_STAFF: &[Role] = &[Role::Hta, Role::Ta];

impl Role {
    pub const fn as_str(self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Mta => "mta",
            Role::Hta => "hta",
            Role::Ta => "ta",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(Role::Admin),
            "mta" => Ok(Role::Mta),
            "hta" => Ok(Role::Hta),
            "ta" => Ok(Role::Ta),
            other => Err(CoreError::Validation(format!("Unknown role '{other}'"))),
        }
    }
}

/// Where a role grant applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "course_id", rename_all = "lowercase")]
pub enum RoleScope {
    Global,
    Course(CourseId),
}

impl RoleScope {
    /// Whether a grant with this scope applies to `course`.
    pub fn covers(self, course: CourseId) -> bool {
        match self {
            RoleScope::Global => true,
            RoleScope::Course(id) => id == course,
        }
    }

    /// The course id, or `None` for global grants (the storage encoding).
    pub fn course_id(self) -> Option<CourseId> {
        match self {
            RoleScope::Global => None,
            RoleScope::Course(id) => Some(id),
        }
    }
}

impl From<Option<CourseId>> for RoleScope {
    fn from(course: Option<CourseId>) -> Self {
        course.map_or(RoleScope::Global, RoleScope::Course)
    }
}

/// A single role grant held by a user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RoleGrant {
    pub role: Role,
    pub scope: RoleScope,
}

impl RoleGrant {
    /// Whether this grant satisfies a check for any of `roles` in `course`.
    pub fn satisfies(&self, roles: &[Role], course: CourseId) -> bool {
        roles.contains(&self.role) && self.scope.covers(course)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::new_id;

    #[test]
    fn role_names_round_trip() {
        for role in TA_OR_ABOVE {
            assert_eq!(role.as_str().parse::<Role>().unwrap(), *role);
        }
    }

    #[test]
    fn unknown_role_is_rejected() {
        assert!("student".parse::<Role>().is_err());
        assert!("".parse::<Role>().is_err());
    }

    #[test]
    fn course_grant_only_covers_its_course() {
        let course = new_id();
        let grant = RoleGrant {
            role: Role::Ta,
            scope: RoleScope::Course(course),
        };
        assert!(grant.satisfies(TA_OR_ABOVE, course));
        assert!(!grant.satisfies(TA_OR_ABOVE, new_id()));
    }

    #[test]
    fn global_grant_covers_every_course() {
        let grant = RoleGrant {
            role: Role::Admin,
            scope: RoleScope::Global,
        };
        assert!(grant.satisfies(TA_OR_ABOVE, new_id()));
        assert!(!grant.satisfies(COURSE_STAFF, new_id()));
    }

    #[test]
    fn scope_storage_encoding() {
        let course = new_id();
        assert_eq!(RoleScope::from(Some(course)), RoleScope::Course(course));
        assert_eq!(RoleScope::from(None), RoleScope::Global);
        assert_eq!(RoleScope::Global.course_id(), None);
    }
}
