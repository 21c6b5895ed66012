use axum::{
    body::{to_bytes, Body},
    http::{header, Request, StatusCode},
    Router,
};
use minister_connect::{
    config::{BootstrapAccount, Config},
    database::Stores,
    routes::build_router,
    AppState,
};
use serde_json::{json, Value as JsonValue};
use tower::ServiceExt;

async fn setup_app() -> Router {
    let state = AppState::new(Config::for_memory("test_secret_key"), Stores::in_memory());
    state
        .auth_service
        .ensure_superadmin(&BootstrapAccount {
            email: "root@example.com".into(),
            password: "root-password".into(),
        })
        .await
        .expect("bootstrap superadmin");
    build_router(state)
}

async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<JsonValue>,
) -> (StatusCode, JsonValue) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    let req = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    let resp = app.clone().oneshot(req).await.unwrap();
    let status = resp.status();
    let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    let json = if bytes.is_empty() {
        JsonValue::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

async fn token_for(app: &Router, email: &str, password: &str) -> String {
    let (status, body) = send(
        app,
        "POST",
        "/api/auth/login",
        None,
        Some(json!({ "email": email, "password": password })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{}", body);
    body["token"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn health_and_openapi_are_public() {
    let app = setup_app().await;
    let (status, body) = send(&app, "GET", "/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");

    let (status, doc) = send(&app, "GET", "/api/openapi.json", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(doc["paths"]["/api/interests"].is_object());
}

#[tokio::test]
async fn session_echo_reports_role_and_home() {
    let app = setup_app().await;
    let token = token_for(&app, "root@example.com", "root-password").await;
    let (status, body) = send(&app, "GET", "/api/auth/session", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["role"], "superadmin");
    assert_eq!(body["home"], "/superadmin");
}

#[tokio::test]
async fn wrong_password_is_unauthorized() {
    let app = setup_app().await;
    let (status, body) = send(
        &app,
        "POST",
        "/api/auth/login",
        None,
        Some(json!({ "email": "root@example.com", "password": "guess" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Invalid email or password");
}

#[tokio::test]
async fn registration_validates_and_rejects_duplicates() {
    let app = setup_app().await;
    let (status, _) = send(
        &app,
        "POST",
        "/api/auth/register",
        None,
        Some(json!({ "name": "Jane", "email": "not-an-email", "password": "correct horse" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let payload = json!({ "name": "Jane", "email": "jane@example.com", "password": "correct horse" });
    let (status, body) = send(&app, "POST", "/api/auth/register", None, Some(payload.clone())).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["role"], "candidate");
    let (status, _) = send(&app, "POST", "/api/auth/register", None, Some(payload)).await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn provisioned_admin_changes_password_then_lands_home() {
    let app = setup_app().await;
    let root = token_for(&app, "root@example.com", "root-password").await;

    let (status, created) = send(
        &app,
        "POST",
        "/api/superadmin/users",
        Some(&root),
        Some(json!({ "name": "Ops", "email": "ops@example.com", "role": "admin" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{}", created);
    let temporary = created["temporary_password"].as_str().unwrap().to_string();

    let (_, first) = send(
        &app,
        "POST",
        "/api/auth/login",
        None,
        Some(json!({ "email": "ops@example.com", "password": temporary })),
    )
    .await;
    assert_eq!(first["redirect"], "/auth/force-password-change");
    let ops = first["token"].as_str().unwrap().to_string();

    let (status, _) = send(
        &app,
        "POST",
        "/api/auth/change-password",
        Some(&ops),
        Some(json!({ "current_password": temporary, "new_password": "a much better one" })),
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (_, second) = send(
        &app,
        "POST",
        "/api/auth/login",
        None,
        Some(json!({ "email": "ops@example.com", "password": "a much better one" })),
    )
    .await;
    assert_eq!(second["redirect"], "/admin");

    let (status, _) = send(&app, "GET", "/api/superadmin/users", Some(&ops), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    let (status, _) = send(&app, "GET", "/api/admin/candidates", Some(&ops), None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn candidates_are_kept_out_of_admin_routes() {
    let app = setup_app().await;
    send(
        &app,
        "POST",
        "/api/auth/register",
        None,
        Some(json!({ "name": "Jane", "email": "jane@example.com", "password": "correct horse" })),
    )
    .await;
    let jane = token_for(&app, "jane@example.com", "correct horse").await;
    let (status, body) = send(&app, "GET", "/api/admin/churches", Some(&jane), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "forbidden");
}

#[tokio::test]
async fn church_job_lifecycle_over_http() {
    let app = setup_app().await;
    let root = token_for(&app, "root@example.com", "root-password").await;
    let (_, created) = send(
        &app,
        "POST",
        "/api/admin/churches",
        Some(&root),
        Some(json!({ "name": "Grace Fellowship", "email": "office@grace.org" })),
    )
    .await;
    let church = token_for(
        &app,
        "office@grace.org",
        created["account"]["temporary_password"].as_str().unwrap(),
    )
    .await;

    let (status, job) = send(
        &app,
        "POST",
        "/api/church/jobs",
        Some(&church),
        Some(json!({ "title": "Worship Pastor", "salary_from": "40000", "salary_to": "55000" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{}", job);
    assert_eq!(job["status"], "pending");
    let job_id = job["id"].as_str().unwrap().to_string();

    let (status, reviewed) = send(
        &app,
        "POST",
        &format!("/api/admin/jobs/{}/status", job_id),
        Some(&root),
        Some(json!({ "status": "approved" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(reviewed["status"], "approved");

    let (status, closed) = send(
        &app,
        "POST",
        &format!("/api/church/jobs/{}/close", job_id),
        Some(&church),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(closed["status"], "closed");

    let (status, _) = send(
        &app,
        "PATCH",
        &format!("/api/church/jobs/{}", job_id),
        Some(&church),
        Some(json!({ "title": "Too late" })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn deactivated_account_is_refused_at_login() {
    let app = setup_app().await;
    let root = token_for(&app, "root@example.com", "root-password").await;
    let (status, registered) = send(
        &app,
        "POST",
        "/api/auth/register",
        None,
        Some(json!({ "name": "Jane", "email": "jane@example.com", "password": "correct horse" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let user_id = registered["id"].as_str().unwrap().to_string();

    let (status, user) = send(
        &app,
        "POST",
        &format!("/api/superadmin/users/{}/active", user_id),
        Some(&root),
        Some(json!({ "is_active": false })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{}", user);
    assert_eq!(user["is_active"], false);

    let (status, body) = send(
        &app,
        "POST",
        "/api/auth/login",
        None,
        Some(json!({ "email": "jane@example.com", "password": "correct horse" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Invalid email or password");

    send(
        &app,
        "POST",
        &format!("/api/superadmin/users/{}/active", user_id),
        Some(&root),
        Some(json!({ "is_active": true })),
    )
    .await;
    token_for(&app, "jane@example.com", "correct horse").await;
}
