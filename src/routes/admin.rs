use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    Extension,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    dto::{
        candidate_dto::{
            CandidateListResponse, CandidateResponse, ReviewQuery, UpdateCandidateStatusPayload,
        },
        church_dto::{ChurchListResponse, CreateChurchPayload, CreateChurchResponse},
        job_dto::{JobListQuery, JobListResponse, JobResponse, UpdateJobStatusPayload},
        SetActivePayload,
    },
    error::Result,
    models::session::Session,
    AppState,
};

#[utoipa::path(
    get,
    path = "/api/admin/candidates",
    params(
        ("status" = Option<String>, Query, description = "Defaults to pending")
    ),
    responses(
        (status = 200, description = "Review queue", body = CandidateListResponse)
    )
)]
#[axum::debug_handler]
pub async fn list_review_queue(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    Query(query): Query<ReviewQuery>,
) -> Result<impl IntoResponse> {
    let candidates = state
        .candidate_service
        .list_for_review(&session, query.status)
        .await?;
    Ok(Json(CandidateListResponse::from(candidates)))
}

#[utoipa::path(
    post,
    path = "/api/admin/candidates/{id}/status",
    params(
        ("id" = Uuid, Path, description = "Candidate ID")
    ),
    request_body = UpdateCandidateStatusPayload,
    responses(
        (status = 200, description = "Status updated", body = CandidateResponse),
        (status = 404, description = "Candidate not found"),
        (status = 409, description = "Transition not allowed or raced")
    )
)]
#[axum::debug_handler]
pub async fn set_candidate_status(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateCandidateStatusPayload>,
) -> Result<impl IntoResponse> {
    let candidate = state
        .candidate_service
        .set_status(&session, id, payload.status)
        .await?;
    Ok(Json(CandidateResponse::from(candidate)))
}

#[utoipa::path(
    get,
    path = "/api/admin/churches",
    responses(
        (status = 200, description = "All churches by name", body = ChurchListResponse)
    )
)]
#[axum::debug_handler]
pub async fn list_churches(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
) -> Result<impl IntoResponse> {
    let items = state.church_service.list_churches(&session).await?;
    Ok(Json(ChurchListResponse { items }))
}

#[utoipa::path(
    post,
    path = "/api/admin/churches",
    request_body = CreateChurchPayload,
    responses(
        (status = 201, description = "Church and its account created", body = CreateChurchResponse),
        (status = 400, description = "Invalid payload"),
        (status = 409, description = "Email already registered")
    )
)]
#[axum::debug_handler]
pub async fn create_church(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    Json(payload): Json<CreateChurchPayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let created = state.church_service.create_church(&session, payload).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

#[utoipa::path(
    post,
    path = "/api/admin/churches/{id}/active",
    params(
        ("id" = Uuid, Path, description = "Church ID")
    ),
    request_body = SetActivePayload,
    responses(
        (status = 200, description = "Church with its new activation"),
        (status = 404, description = "Church not found")
    )
)]
#[axum::debug_handler]
pub async fn set_church_active(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    Path(id): Path<Uuid>,
    Json(payload): Json<SetActivePayload>,
) -> Result<impl IntoResponse> {
    let church = state
        .church_service
        .set_active(&session, id, payload.is_active)
        .await?;
    Ok(Json(church))
}

#[utoipa::path(
    get,
    path = "/api/admin/jobs",
    params(
        ("status" = Option<String>, Query, description = "Status filter")
    ),
    responses(
        (status = 200, description = "Job postings, newest first", body = JobListResponse)
    )
)]
#[axum::debug_handler]
pub async fn list_jobs(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    Query(query): Query<JobListQuery>,
) -> Result<impl IntoResponse> {
    let jobs = state.job_service.list_all(&session, query.status).await?;
    Ok(Json(JobListResponse::from(jobs)))
}

#[utoipa::path(
    post,
    path = "/api/admin/jobs/{id}/status",
    params(
        ("id" = Uuid, Path, description = "Job ID")
    ),
    request_body = UpdateJobStatusPayload,
    responses(
        (status = 200, description = "Job reviewed", body = JobResponse),
        (status = 404, description = "Job not found"),
        (status = 409, description = "Transition not allowed")
    )
)]
#[axum::debug_handler]
pub async fn set_job_status(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateJobStatusPayload>,
) -> Result<impl IntoResponse> {
    let job = state
        .job_service
        .set_status(&session, id, payload.status)
        .await?;
    Ok(Json(JobResponse::from(job)))
}
