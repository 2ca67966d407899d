//! Route definitions for tickets.

use axum::routing::{delete, post};
use axum::Router;

use crate::handlers::tickets;
use crate::state::AppState;

/// Ticket routes.
///
/// ```text
/// POST   /tickets                        -> create_ticket
/// DELETE /tickets/{id}                   -> delete_ticket
/// POST   /tickets/{id}/claim             -> claim_ticket
/// POST   /tickets/{id}/release           -> release_ticket
/// POST   /tickets/{id}/mark-as-missing   -> mark_ticket_as_missing
/// POST   /tickets/{id}/mark-as-done      -> mark_ticket_as_done
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/tickets", post(tickets::create_ticket))
        .route("/tickets/{id}", delete(tickets::delete_ticket))
        .route("/tickets/{id}/claim", post(tickets::claim_ticket))
        .route("/tickets/{id}/release", post(tickets::release_ticket))
        .route(
            "/tickets/{id}/mark-as-missing",
            post(tickets::mark_ticket_as_missing),
        )
        .route("/tickets/{id}/mark-as-done", post(tickets::mark_ticket_as_done))
}
