use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    Extension,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    dto::job_dto::{CreateJobPayload, JobListResponse, JobResponse, UpdateJobPayload},
    error::Result,
    models::session::Session,
    AppState,
};

#[utoipa::path(
    get,
    path = "/api/jobs",
    responses(
        (status = 200, description = "Approved job postings", body = JobListResponse),
        (status = 409, description = "Candidate profile not approved")
    )
)]
#[axum::debug_handler]
pub async fn list_open_jobs(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
) -> Result<impl IntoResponse> {
    let jobs = state.job_service.list_open(&session).await?;
    Ok(Json(JobListResponse::from(jobs)))
}

#[utoipa::path(
    get,
    path = "/api/church/jobs",
    responses(
        (status = 200, description = "The church's own postings", body = JobListResponse),
        (status = 403, description = "Not a church")
    )
)]
#[axum::debug_handler]
pub async fn list_own_jobs(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
) -> Result<impl IntoResponse> {
    let jobs = state.job_service.list_own(&session).await?;
    Ok(Json(JobListResponse::from(jobs)))
}

#[utoipa::path(
    post,
    path = "/api/church/jobs",
    request_body = CreateJobPayload,
    responses(
        (status = 201, description = "Job posted for review", body = JobResponse),
        (status = 400, description = "Invalid payload")
    )
)]
#[axum::debug_handler]
pub async fn create_job(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    Json(payload): Json<CreateJobPayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let job = state.job_service.create(&session, payload).await?;
    Ok((StatusCode::CREATED, Json(JobResponse::from(job))))
}

#[utoipa::path(
    patch,
    path = "/api/church/jobs/{id}",
    params(
        ("id" = Uuid, Path, description = "Job ID")
    ),
    request_body = UpdateJobPayload,
    responses(
        (status = 200, description = "Job updated", body = JobResponse),
        (status = 403, description = "Job belongs to another church"),
        (status = 404, description = "Job not found"),
        (status = 409, description = "Job is closed")
    )
)]
#[axum::debug_handler]
pub async fn update_job(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateJobPayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let job = state.job_service.update(&session, id, payload).await?;
    Ok(Json(JobResponse::from(job)))
}

#[utoipa::path(
    post,
    path = "/api/church/jobs/{id}/close",
    params(
        ("id" = Uuid, Path, description = "Job ID")
    ),
    responses(
        (status = 200, description = "Job closed", body = JobResponse),
        (status = 403, description = "Job belongs to another church"),
        (status = 409, description = "Job already closed")
    )
)]
#[axum::debug_handler]
pub async fn close_job(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    let job = state.job_service.close(&session, id).await?;
    Ok(Json(JobResponse::from(job)))
}
