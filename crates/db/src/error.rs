//! Classification of `sqlx` errors into domain errors.

use ohq_core::error::CoreError;

/// PostgreSQL `unique_violation`.
const UNIQUE_VIOLATION: &str = "23505";

/// Map a `sqlx` error onto [`CoreError`].
///
/// - Unique constraint violations (constraint name starting with `uq_`)
///   become `Conflict`.
/// - Everything else becomes `Internal` and is logged; the message handed
///   back to callers carries no driver detail.
pub fn db_error(err: sqlx::Error) -> CoreError {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.code().as_deref() == Some(UNIQUE_VIOLATION) {
            let constraint = db_err.constraint().unwrap_or("unknown");
            if constraint.starts_with("uq_") {
                return CoreError::Conflict(format!(
                    "Duplicate value violates unique constraint: {constraint}"
                ));
            }
        }
    }
    tracing::error!(error = %err, "Database error");
    CoreError::Internal("storage failure".into())
}
