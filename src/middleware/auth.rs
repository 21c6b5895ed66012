use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, HeaderMap, StatusCode},
    middleware::Next,
    response::{IntoResponse, Json, Response},
};
use serde_json::json;

use crate::models::session::Session;
use crate::utils::token::decode_token;
use crate::AppState;

fn bearer_token(headers: &HeaderMap) -> Result<&str, &'static str> {
    let auth_header = headers
        .get(AUTHORIZATION)
        .ok_or("missing_authorization")?;
    let auth_str = auth_header.to_str().map_err(|_| "bad_authorization")?;
    auth_str.strip_prefix("Bearer ").ok_or("unsupported_scheme")
}

fn reject(status: StatusCode, code: &str) -> Response {
    (status, Json(json!({ "error": code }))).into_response()
}

/// Decodes the bearer token and attaches the caller's [`Session`] to the request.
pub async fn require_session(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Response {
    let decoded = bearer_token(req.headers()).and_then(|token| {
        decode_token(&state.config.jwt_secret, token).map_err(|_| "invalid_token")
    });
    match decoded {
        Ok(session) => {
            tracing::debug!(user_id = %session.user_id, role = %session.role, "session resolved");
            req.extensions_mut().insert(session);
            next.run(req).await
        }
        Err(code) => reject(StatusCode::UNAUTHORIZED, code),
    }
}

/// Must run inside [`require_session`].
pub async fn require_admin(req: Request, next: Next) -> Response {
    match req.extensions().get::<Session>() {
        Some(session) if session.role.is_admin() => next.run(req).await,
        Some(_) => reject(StatusCode::FORBIDDEN, "forbidden"),
        None => reject(StatusCode::UNAUTHORIZED, "missing_authorization"),
    }
}

/// Must run inside [`require_session`].
pub async fn require_superadmin(req: Request, next: Next) -> Response {
    match req.extensions().get::<Session>() {
        Some(session) if session.require_superadmin().is_ok() => next.run(req).await,
        Some(_) => reject(StatusCode::FORBIDDEN, "forbidden"),
        None => reject(StatusCode::UNAUTHORIZED, "missing_authorization"),
    }
}
