//! Handlers for ticket creation and lifecycle transitions.
//!
//! Authorization lives in [`ohq_core::lifecycle::TicketEngine`]; these
//! handlers only authenticate the caller and shape the response.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use ohq_core::ticket::CreateTicketRequest;
use ohq_core::types::TicketId;
use serde::Serialize;

use crate::error::AppResult;
use crate::extract::{ApiJson, ApiPath};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct CreatedTicket {
    pub id: TicketId,
}

/// POST /api/v1/tickets
///
/// Sign up for a queue. Anonymous callers are allowed; the first student
/// then becomes the ticket's creator.
pub async fn create_ticket(
    user: Option<AuthUser>,
    State(state): State<AppState>,
    ApiJson(input): ApiJson<CreateTicketRequest>,
) -> AppResult<impl IntoResponse> {
    let id = state
        .engine
        .create_ticket(user.map(|u| u.user_id), input)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            data: CreatedTicket { id },
        }),
    ))
}

/// POST /api/v1/tickets/{id}/claim
pub async fn claim_ticket(
    user: AuthUser,
    State(state): State<AppState>,
    ApiPath(id): ApiPath<TicketId>,
) -> AppResult<StatusCode> {
    state.engine.claim_ticket(user.user_id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/tickets/{id}/release
pub async fn release_ticket(
    user: AuthUser,
    State(state): State<AppState>,
    ApiPath(id): ApiPath<TicketId>,
) -> AppResult<StatusCode> {
    state.engine.release_ticket(user.user_id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/tickets/{id}/mark-as-missing
pub async fn mark_ticket_as_missing(
    user: AuthUser,
    State(state): State<AppState>,
    ApiPath(id): ApiPath<TicketId>,
) -> AppResult<StatusCode> {
    state.engine.mark_ticket_as_missing(user.user_id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/tickets/{id}/mark-as-done
pub async fn mark_ticket_as_done(
    user: AuthUser,
    State(state): State<AppState>,
    ApiPath(id): ApiPath<TicketId>,
) -> AppResult<StatusCode> {
    state.engine.mark_ticket_as_done(user.user_id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /api/v1/tickets/{id}
///
/// Staff may delete any ticket; students only tickets they are on.
pub async fn delete_ticket(
    user: AuthUser,
    State(state): State<AppState>,
    ApiPath(id): ApiPath<TicketId>,
) -> AppResult<StatusCode> {
    state.engine.delete_ticket(user.user_id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
