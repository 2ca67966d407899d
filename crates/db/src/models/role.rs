//! Role assignment row model.

use ohq_core::error::CoreError;
use ohq_core::roles::{RoleGrant, RoleScope};
use ohq_core::types::Timestamp;
use sqlx::FromRow;
use uuid::Uuid;

/// Full row from the `role_assignments` table. `course_id = NULL` is a
/// global grant.
#[derive(Debug, Clone, FromRow)]
pub struct RoleAssignmentRow {
    pub id: i64,
    pub user_id: Uuid,
    pub role: String,
    pub course_id: Option<Uuid>,
    pub created_at: Timestamp,
}

impl TryFrom<&RoleAssignmentRow> for RoleGrant {
    type Error = CoreError;

    fn try_from(row: &RoleAssignmentRow) -> Result<Self, Self::Error> {
        Ok(RoleGrant {
            role: row
                .role
                .parse()
                .map_err(|_| CoreError::Internal(format!("Unknown stored role '{}'", row.role)))?,
            scope: RoleScope::from(row.course_id),
        })
    }
}
