//! Route definitions for user lookups and course staff listings.

use axum::routing::get;
use axum::Router;

use crate::handlers::users;
use crate::state::AppState;

/// User lookup routes.
///
/// ```text
/// GET /users/self       -> get_self
/// GET /users/by-ids     -> get_by_ids
/// GET /users/by-emails  -> get_by_emails
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/users/self", get(users::get_self))
        .route("/users/by-ids", get(users::get_by_ids))
        .route("/users/by-emails", get(users::get_by_emails))
}

/// Course staff routes.
///
/// ```text
/// GET /courses/{course_id}/staff         -> list_course_staff
/// GET /courses/{course_id}/staff/online  -> list_online_course_staff
/// ```
pub fn course_router() -> Router<AppState> {
    Router::new()
        .route("/courses/{course_id}/staff", get(users::list_course_staff))
        .route(
            "/courses/{course_id}/staff/online",
            get(users::list_online_course_staff),
        )
}
