//! Campus server library logic.
//!
//! Wires the catalog and enrollment services into an axum router. Handlers
//! receive explicit inputs (search term, form payload) and hand them to the
//! service crates; rendering is JSON throughout.

pub mod api;
pub mod api_catalog;
pub mod api_enrollment;
pub mod config;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Extension, Json, Router,
};
use campus_db::DbPool;
use serde_json::{json, Value};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

/// Application state shared across all request handlers.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: DbPool,
}

/// Maximum request body size (1 MiB). Form submissions are small; anything
/// larger is rejected before it reaches a handler.
const MAX_REQUEST_BODY_BYTES: usize = 1024 * 1024;

/// Health check handler.
///
/// Returns `200 OK` with server status and version. Used by load balancers,
/// monitoring, and CI to verify the server is running.
async fn health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// Builds the application router with all routes.
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route(
            "/api/courses",
            get(api_catalog::list_courses_handler).post(api_catalog::create_course_handler),
        )
        .route("/api/courses/{id}", get(api_catalog::get_course_handler))
        .route(
            "/api/teachers",
            get(api_catalog::list_teachers_handler).post(api_catalog::create_teacher_handler),
        )
        .route("/api/teachers/{id}", get(api_catalog::get_teacher_handler))
        .route(
            "/api/students",
            post(api_enrollment::enroll_student_handler),
        )
        .route(
            "/api/students/{id}",
            get(api_enrollment::get_student_handler),
        )
        .layer(DefaultBodyLimit::max(MAX_REQUEST_BODY_BYTES))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(Extension(Arc::new(state)))
}
