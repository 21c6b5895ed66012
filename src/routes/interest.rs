use axum::{
    extract::{Path, State},
    response::{IntoResponse, Json},
    Extension,
};
use uuid::Uuid;

use crate::{
    dto::interest_dto::{
        InterestListResponse, InterestResponse, MutualMatchListResponse, SetInterestPayload,
    },
    error::{Error, Result},
    models::session::Session,
    AppState,
};

#[utoipa::path(
    post,
    path = "/api/interests",
    request_body = SetInterestPayload,
    responses(
        (status = 200, description = "Flag stored; `mutual` reflects the pair after the write", body = InterestResponse),
        (status = 403, description = "Caller does not own this flag"),
        (status = 404, description = "Church or candidate not found"),
        (status = 409, description = "Candidate not approved or church inactive")
    )
)]
#[axum::debug_handler]
pub async fn set_interest(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    Json(payload): Json<SetInterestPayload>,
) -> Result<impl IntoResponse> {
    let command = state.interest_service.resolve(&session, payload)?;
    let outcome = state.interest_service.set_interest(&session, command).await?;
    Ok(Json(InterestResponse {
        matched_at: outcome.interest.matched_at(),
        mutual: outcome.mutual,
        interest: outcome.interest,
    }))
}

#[utoipa::path(
    get,
    path = "/api/interests",
    responses(
        (status = 200, description = "Interest records the caller is party to", body = InterestListResponse)
    )
)]
#[axum::debug_handler]
pub async fn list_interests(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
) -> Result<impl IntoResponse> {
    let interests = state.interest_service.list_own(&session).await?;
    Ok(Json(InterestListResponse::from(interests)))
}

#[utoipa::path(
    get,
    path = "/api/interests/mutual",
    responses(
        (status = 200, description = "Mutual matches, most recent first", body = MutualMatchListResponse),
        (status = 403, description = "Only churches and candidates have matches")
    )
)]
#[axum::debug_handler]
pub async fn list_mutual(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
) -> Result<impl IntoResponse> {
    let (side, party_id) = match (session.interest_side(), session.party_id) {
        (Some(side), Some(party_id)) => (side, party_id),
        _ => {
            return Err(Error::Forbidden(
                "Only churches and candidates have matches".into(),
            ))
        }
    };
    let items = state
        .matching_service
        .list_mutual_matches(side, party_id)
        .await?;
    Ok(Json(MutualMatchListResponse { items }))
}

#[utoipa::path(
    get,
    path = "/api/interests/{church_id}/{candidate_id}",
    params(
        ("church_id" = Uuid, Path, description = "Church ID"),
        ("candidate_id" = Uuid, Path, description = "Candidate ID")
    ),
    responses(
        (status = 200, description = "Interest record for the pair", body = InterestResponse),
        (status = 403, description = "Not a party to this pair")
    )
)]
#[axum::debug_handler]
pub async fn get_interest(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    Path((church_id, candidate_id)): Path<(Uuid, Uuid)>,
) -> Result<impl IntoResponse> {
    let interest = state
        .interest_service
        .get_interest(&session, church_id, candidate_id)
        .await?;
    Ok(Json(InterestResponse::from(interest)))
}
