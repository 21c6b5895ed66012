use axum::http::{header, Method};
use tower_http::cors::{Any, CorsLayer};

/// The browser client sends bearer tokens, not cookies, so any origin may call in.
pub fn api_cors() -> CorsLayer {
    CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PATCH, Method::OPTIONS])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
        .allow_origin(Any)
}
