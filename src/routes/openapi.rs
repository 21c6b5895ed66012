use axum::Json;
use utoipa::OpenApi;

use crate::routes::{admin, auth, candidate_routes, church, health, interest, job, superadmin};

#[derive(OpenApi)]
#[openapi(
    info(title = "Minister Connect API"),
    paths(
        health::health,
        auth::login,
        auth::register,
        auth::session,
        auth::change_password,
        candidate_routes::search_candidates,
        candidate_routes::get_candidate,
        candidate_routes::get_profile,
        candidate_routes::update_profile,
        candidate_routes::submit_profile,
        candidate_routes::withdraw_profile,
        church::get_church,
        job::list_open_jobs,
        job::list_own_jobs,
        job::create_job,
        job::update_job,
        job::close_job,
        interest::set_interest,
        interest::list_interests,
        interest::list_mutual,
        interest::get_interest,
        admin::list_review_queue,
        admin::set_candidate_status,
        admin::list_churches,
        admin::create_church,
        admin::set_church_active,
        admin::list_jobs,
        admin::set_job_status,
        superadmin::list_users,
        superadmin::create_user,
        superadmin::set_user_active,
    )
)]
pub struct ApiDoc;

#[axum::debug_handler]
pub async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
