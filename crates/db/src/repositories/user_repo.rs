//! Repository for the `users` table.

use sqlx::PgPool;
use uuid::Uuid;

use crate::models::user::{CreateUser, UserRow};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, email, emails, name, online, idle, created_at";

pub struct UserRepo;

impl UserRepo {
    /// Insert a new user, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateUser) -> Result<UserRow, sqlx::Error> {
        let query = format!(
            "INSERT INTO users (id, email, emails, name)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, UserRow>(&query)
            .bind(Uuid::now_v7())
            .bind(&input.email)
            .bind(&input.emails)
            .bind(&input.name)
            .fetch_one(pool)
            .await
    }

    /// Insert a minimal account for `email` unless the address is taken.
    ///
    /// Returns the new id, or `None` when another row already owns the
    /// primary email (the unique constraint arbitrates concurrent inserts).
    pub async fn insert_if_absent(pool: &PgPool, email: &str) -> Result<Option<Uuid>, sqlx::Error> {
        let row: Option<(Uuid,)> = sqlx::query_as(
            "INSERT INTO users (id, email) VALUES ($1, $2)
             ON CONFLICT (email) DO NOTHING
             RETURNING id",
        )
        .bind(Uuid::now_v7())
        .bind(email)
        .fetch_optional(pool)
        .await?;
        Ok(row.map(|(id,)| id))
    }

    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<UserRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE id = $1");
        sqlx::query_as::<_, UserRow>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a user by primary or secondary email. Primary matches win.
    pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<UserRow>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM users
             WHERE email = $1 OR $1 = ANY(emails)
             ORDER BY (email = $1) DESC, created_at
             LIMIT 1"
        );
        sqlx::query_as::<_, UserRow>(&query)
            .bind(email)
            .fetch_optional(pool)
            .await
    }

    pub async fn find_by_ids(pool: &PgPool, ids: &[Uuid]) -> Result<Vec<UserRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE id = ANY($1) ORDER BY id");
        sqlx::query_as::<_, UserRow>(&query)
            .bind(ids)
            .fetch_all(pool)
            .await
    }

    /// Users whose primary or any secondary email is in `emails`.
    pub async fn find_by_emails(
        pool: &PgPool,
        emails: &[String],
    ) -> Result<Vec<UserRow>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM users
             WHERE email = ANY($1) OR emails && $1
             ORDER BY id"
        );
        sqlx::query_as::<_, UserRow>(&query)
            .bind(emails)
            .fetch_all(pool)
            .await
    }

    /// Record presence flags for a user. Returns `true` if the row exists.
    pub async fn set_presence(
        pool: &PgPool,
        id: Uuid,
        online: bool,
        idle: bool,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("UPDATE users SET online = $2, idle = $3 WHERE id = $1")
            .bind(id)
            .bind(online)
            .bind(idle)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
