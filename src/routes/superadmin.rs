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
        auth_dto::{
            CreateUserPayload, ProvisionedAccountResponse, UserListQuery, UserListResponse,
            UserSummary,
        },
        SetActivePayload,
    },
    error::Result,
    models::session::Session,
    AppState,
};

#[utoipa::path(
    get,
    path = "/api/superadmin/users",
    params(
        ("role" = Option<String>, Query, description = "Role filter")
    ),
    responses(
        (status = 200, description = "Accounts", body = UserListResponse),
        (status = 403, description = "Super administrator access required")
    )
)]
#[axum::debug_handler]
pub async fn list_users(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    Query(query): Query<UserListQuery>,
) -> Result<impl IntoResponse> {
    let users = state.auth_service.list_users(&session, query.role).await?;
    Ok(Json(UserListResponse {
        items: users.into_iter().map(Into::into).collect(),
    }))
}

#[utoipa::path(
    post,
    path = "/api/superadmin/users",
    request_body = CreateUserPayload,
    responses(
        (status = 201, description = "Account provisioned with a temporary password", body = ProvisionedAccountResponse),
        (status = 400, description = "Role must be admin or superadmin"),
        (status = 409, description = "Email already registered")
    )
)]
#[axum::debug_handler]
pub async fn create_user(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    Json(payload): Json<CreateUserPayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let created = state.auth_service.create_user(&session, payload).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

#[utoipa::path(
    post,
    path = "/api/superadmin/users/{id}/active",
    params(
        ("id" = Uuid, Path, description = "User ID")
    ),
    request_body = SetActivePayload,
    responses(
        (status = 200, description = "Activation updated", body = UserSummary),
        (status = 400, description = "Cannot deactivate your own account"),
        (status = 404, description = "User not found")
    )
)]
#[axum::debug_handler]
pub async fn set_user_active(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    Path(id): Path<Uuid>,
    Json(payload): Json<SetActivePayload>,
) -> Result<impl IntoResponse> {
    let user = state
        .auth_service
        .set_user_active(&session, id, payload.is_active)
        .await?;
    Ok(Json(UserSummary::from(user)))
}
