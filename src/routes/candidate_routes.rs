use axum::{
    extract::{Path, Query, State},
    response::{IntoResponse, Json},
    Extension,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    dto::candidate_dto::{
        CandidateListResponse, CandidateResponse, CandidateSearchQuery, UpdateProfilePayload,
    },
    error::Result,
    models::session::Session,
    AppState,
};

#[utoipa::path(
    get,
    path = "/api/candidates",
    params(
        ("query" = Option<String>, Query, description = "Case-insensitive match on name or email"),
        ("status" = Option<String>, Query, description = "Status filter, administrators only"),
        ("sort" = Option<String>, Query, description = "name or created_at")
    ),
    responses(
        (status = 200, description = "Visible candidates", body = CandidateListResponse),
        (status = 403, description = "Candidates cannot search")
    )
)]
#[axum::debug_handler]
pub async fn search_candidates(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    Query(query): Query<CandidateSearchQuery>,
) -> Result<impl IntoResponse> {
    let candidates = state.candidate_service.search(&session, query).await?;
    Ok(Json(CandidateListResponse::from(candidates)))
}

#[utoipa::path(
    get,
    path = "/api/candidates/{id}",
    params(
        ("id" = Uuid, Path, description = "Candidate ID")
    ),
    responses(
        (status = 200, description = "Candidate", body = CandidateResponse),
        (status = 403, description = "Not visible to this caller"),
        (status = 404, description = "Candidate not found")
    )
)]
#[axum::debug_handler]
pub async fn get_candidate(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    let candidate = state.candidate_service.get_candidate(&session, id).await?;
    Ok(Json(CandidateResponse::from(candidate)))
}

#[utoipa::path(
    get,
    path = "/api/candidate/profile",
    responses(
        (status = 200, description = "Own profile", body = CandidateResponse),
        (status = 403, description = "Not a candidate")
    )
)]
#[axum::debug_handler]
pub async fn get_profile(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
) -> Result<impl IntoResponse> {
    let candidate = state.candidate_service.get_own_profile(&session).await?;
    Ok(Json(CandidateResponse::from(candidate)))
}

#[utoipa::path(
    patch,
    path = "/api/candidate/profile",
    request_body = UpdateProfilePayload,
    responses(
        (status = 200, description = "Profile updated", body = CandidateResponse),
        (status = 400, description = "Invalid payload"),
        (status = 403, description = "Not a candidate")
    )
)]
#[axum::debug_handler]
pub async fn update_profile(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    Json(payload): Json<UpdateProfilePayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let candidate = state
        .candidate_service
        .update_profile(&session, payload)
        .await?;
    Ok(Json(CandidateResponse::from(candidate)))
}

#[utoipa::path(
    post,
    path = "/api/candidate/profile/submit",
    responses(
        (status = 200, description = "Profile sent for review", body = CandidateResponse),
        (status = 409, description = "Profile is not draft or rejected")
    )
)]
#[axum::debug_handler]
pub async fn submit_profile(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
) -> Result<impl IntoResponse> {
    let candidate = state.candidate_service.submit_profile(&session).await?;
    Ok(Json(CandidateResponse::from(candidate)))
}

#[utoipa::path(
    post,
    path = "/api/candidate/profile/withdraw",
    responses(
        (status = 200, description = "Submission withdrawn", body = CandidateResponse),
        (status = 409, description = "Profile is not pending")
    )
)]
#[axum::debug_handler]
pub async fn withdraw_profile(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
) -> Result<impl IntoResponse> {
    let candidate = state
        .candidate_service
        .withdraw_submission(&session)
        .await?;
    Ok(Json(CandidateResponse::from(candidate)))
}
