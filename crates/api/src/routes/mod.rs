pub mod health;
pub mod tickets;
pub mod users;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /tickets                                 create (optional auth)
/// /tickets/{id}                            delete
/// /tickets/{id}/claim                      claim
/// /tickets/{id}/release                    release
/// /tickets/{id}/mark-as-missing            mark as missing
/// /tickets/{id}/mark-as-done               mark as done
///
/// /users/self                              caller's own profile
/// /users/by-ids                            lookup by id (optional auth)
/// /users/by-emails                         lookup by email
///
/// /courses/{course_id}/staff               HTAs and TAs
/// /courses/{course_id}/staff/online        online HTAs and TAs
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(tickets::router())
        .merge(users::router())
        .merge(users::course_router())
}
