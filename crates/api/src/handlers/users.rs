//! Handlers for user lookups. Which fields each caller sees is decided by
//! [`ohq_core::projections::Projections`].

use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use ohq_core::types::CourseId;

use crate::error::AppResult;
use crate::extract::{ApiPath, ApiQuery};
use crate::middleware::auth::AuthUser;
use crate::query::{UserEmailsParams, UserIdsParams};
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// User lookups
// ---------------------------------------------------------------------------

/// GET /api/v1/users/self
pub async fn get_self(
    user: AuthUser,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let view = state.projections.own_profile(user.user_id).await?;
    Ok(Json(DataResponse { data: view }))
}

/// GET /api/v1/users/by-ids?ids=a,b&course_id=c
///
/// TAs and above in the course see email addresses; everyone else sees
/// names only.
pub async fn get_by_ids(
    user: Option<AuthUser>,
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery<UserIdsParams>,
) -> AppResult<impl IntoResponse> {
    let ids = params.user_ids()?;
    let views = state
        .projections
        .users_by_ids(user.map(|u| u.user_id), &ids, params.course_id)
        .await?;
    Ok(Json(DataResponse { data: views }))
}

/// GET /api/v1/users/by-emails?emails=a,b
pub async fn get_by_emails(
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery<UserEmailsParams>,
) -> AppResult<impl IntoResponse> {
    let views = state.projections.users_by_emails(&params.emails()).await?;
    Ok(Json(DataResponse { data: views }))
}

// ---------------------------------------------------------------------------
// Course staff
// ---------------------------------------------------------------------------

/// GET /api/v1/courses/{course_id}/staff
pub async fn list_course_staff(
    State(state): State<AppState>,
    ApiPath(course_id): ApiPath<CourseId>,
) -> AppResult<impl IntoResponse> {
    let views = state.projections.staff_by_course(course_id).await?;
    Ok(Json(DataResponse { data: views }))
}

/// GET /api/v1/courses/{course_id}/staff/online
pub async fn list_online_course_staff(
    State(state): State<AppState>,
    ApiPath(course_id): ApiPath<CourseId>,
) -> AppResult<impl IntoResponse> {
    let views = state.projections.online_staff_by_course(course_id).await?;
    Ok(Json(DataResponse { data: views }))
}
