//! Repository for the `role_assignments` table.

use ohq_core::roles::{Role, RoleScope};
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::role::RoleAssignmentRow;

const COLUMNS: &str = "id, user_id, role, course_id, created_at";

/// Role names as stored, for `= ANY($n)` binds.
fn role_names(roles: &[Role]) -> Vec<String> {
    roles.iter().map(|r| r.as_str().to_string()).collect()
}

pub struct RoleRepo;

impl RoleRepo {
    /// Grant `role` to `user` in `scope`. Granting twice is a no-op.
    pub async fn grant(
        pool: &PgPool,
        user_id: Uuid,
        role: Role,
        scope: RoleScope,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            "INSERT INTO role_assignments (user_id, role, course_id)
             VALUES ($1, $2, $3)
             ON CONFLICT DO NOTHING",
        )
        .bind(user_id)
        .bind(role.as_str())
        .bind(scope.course_id())
        .execute(pool)
        .await?;
        Ok(())
    }

    /// List every grant held by a user.
    pub async fn list_by_user(
        pool: &PgPool,
        user_id: Uuid,
    ) -> Result<Vec<RoleAssignmentRow>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM role_assignments WHERE user_id = $1 ORDER BY created_at"
        );
        sqlx::query_as::<_, RoleAssignmentRow>(&query)
            .bind(user_id)
            .fetch_all(pool)
            .await
    }

    /// Whether `user_id` holds any of `roles` in `course_id` or globally.
    pub async fn user_has_role(
        pool: &PgPool,
        user_id: Uuid,
        roles: &[Role],
        course_id: Uuid,
    ) -> Result<bool, sqlx::Error> {
        let row: (bool,) = sqlx::query_as(
            "SELECT EXISTS (
                SELECT 1 FROM role_assignments
                WHERE user_id = $1
                  AND role = ANY($2)
                  AND (course_id = $3 OR course_id IS NULL)
             )",
        )
        .bind(user_id)
        .bind(role_names(roles))
        .bind(course_id)
        .fetch_one(pool)
        .await?;
        Ok(row.0)
    }

    /// Distinct ids of users holding any of `roles` in `course_id` or
    /// globally, ordered by id.
    pub async fn users_in_roles(
        pool: &PgPool,
        roles: &[Role],
        course_id: Uuid,
    ) -> Result<Vec<Uuid>, sqlx::Error> {
        let rows: Vec<(Uuid,)> = sqlx::query_as(
            "SELECT DISTINCT user_id FROM role_assignments
             WHERE role = ANY($1)
               AND (course_id = $2 OR course_id IS NULL)
             ORDER BY user_id",
        )
        .bind(role_names(roles))
        .bind(course_id)
        .fetch_all(pool)
        .await?;
        Ok(rows.into_iter().map(|(id,)| id).collect())
    }
}
