pub mod admin;
pub mod auth;
pub mod candidate_routes;
pub mod church;
pub mod health;
pub mod interest;
pub mod job;
pub mod openapi;
pub mod superadmin;

use axum::{
    extract::DefaultBodyLimit,
    middleware::{from_fn, from_fn_with_state},
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

use crate::middleware::{
    auth::{require_admin, require_session, require_superadmin},
    cors::api_cors,
    rate_limit::{rps_middleware, RateLimiter},
};
use crate::AppState;

const MAX_BODY_BYTES: usize = 1024 * 1024;

pub fn build_router(state: AppState) -> Router {
    let config = state.config.clone();

    let public_api = Router::new()
        .route("/api/auth/login", post(auth::login))
        .route("/api/auth/register", post(auth::register))
        .layer(from_fn_with_state(
            RateLimiter::new(config.public_rps, config.trust_forwarded_for),
            rps_middleware,
        ));

    let admin_api = Router::new()
        .route("/api/admin/candidates", get(admin::list_review_queue))
        .route(
            "/api/admin/candidates/:id/status",
            post(admin::set_candidate_status),
        )
        .route(
            "/api/admin/churches",
            get(admin::list_churches).post(admin::create_church),
        )
        .route(
            "/api/admin/churches/:id/active",
            post(admin::set_church_active),
        )
        .route("/api/admin/jobs", get(admin::list_jobs))
        .route("/api/admin/jobs/:id/status", post(admin::set_job_status))
        .route_layer(from_fn(require_admin));

    let superadmin_api = Router::new()
        .route(
            "/api/superadmin/users",
            get(superadmin::list_users).post(superadmin::create_user),
        )
        .route(
            "/api/superadmin/users/:id/active",
            post(superadmin::set_user_active),
        )
        .route_layer(from_fn(require_superadmin));

    let session_api = Router::new()
        .route("/api/auth/session", get(auth::session))
        .route("/api/auth/change-password", post(auth::change_password))
        .route("/api/candidates", get(candidate_routes::search_candidates))
        .route("/api/candidates/:id", get(candidate_routes::get_candidate))
        .route(
            "/api/candidate/profile",
            get(candidate_routes::get_profile).patch(candidate_routes::update_profile),
        )
        .route(
            "/api/candidate/profile/submit",
            post(candidate_routes::submit_profile),
        )
        .route(
            "/api/candidate/profile/withdraw",
            post(candidate_routes::withdraw_profile),
        )
        .route("/api/jobs", get(job::list_open_jobs))
        .route("/api/churches/:id", get(church::get_church))
        .route(
            "/api/church/jobs",
            get(job::list_own_jobs).post(job::create_job),
        )
        .route(
            "/api/church/jobs/:id",
            axum::routing::patch(job::update_job),
        )
        .route("/api/church/jobs/:id/close", post(job::close_job))
        .route(
            "/api/interests",
            get(interest::list_interests).post(interest::set_interest),
        )
        .route("/api/interests/mutual", get(interest::list_mutual))
        .route(
            "/api/interests/:church_id/:candidate_id",
            get(interest::get_interest),
        )
        .merge(admin_api)
        .merge(superadmin_api)
        .route_layer(from_fn_with_state(state.clone(), require_session))
        .layer(from_fn_with_state(
            RateLimiter::new(config.api_rps, config.trust_forwarded_for),
            rps_middleware,
        ));

    Router::new()
        .route("/health", get(health::health))
        .route("/api/openapi.json", get(openapi::openapi_json))
        .merge(public_api)
        .merge(session_api)
        .with_state(state)
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(api_cors())
        .layer(TraceLayer::new_for_http())
}
