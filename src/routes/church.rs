use axum::{
    extract::{Path, State},
    response::{IntoResponse, Json},
};
use uuid::Uuid;

use crate::{error::Result, AppState};

#[utoipa::path(
    get,
    path = "/api/churches/{id}",
    params(
        ("id" = Uuid, Path, description = "Church ID")
    ),
    responses(
        (status = 200, description = "Church"),
        (status = 404, description = "Church not found")
    )
)]
#[axum::debug_handler]
pub async fn get_church(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    let church = state.church_service.get_church(id).await?;
    Ok(Json(church))
}
