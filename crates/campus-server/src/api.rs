//! Shared API error type and helpers for request handlers.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use campus_enrollment::ValidationError;
use thiserror::Error;

/// Errors surfaced to API clients as JSON bodies.
///
/// `Validation` keeps the originating [`ValidationError`] so the response can
/// name the failing form field alongside the message.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("invalid input: {0}")]
    BadRequest(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("internal server error: {0}")]
    InternalServerError(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message, field) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg, None),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg, None),
            ApiError::Validation(err) => {
                (StatusCode::BAD_REQUEST, err.to_string(), Some(err.field()))
            }
            ApiError::InternalServerError(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg, None),
        };

        let body = match field {
            Some(field) => Json(serde_json::json!({
                "error": message,
                "field": field,
            })),
            None => Json(serde_json::json!({
                "error": message
            })),
        };

        (status, body).into_response()
    }
}

/// Runs a closure against a pooled connection on the blocking thread pool.
///
/// Every handler funnels database work through here: rusqlite calls are
/// synchronous and must not run on the async executor threads.
pub(crate) async fn with_conn<T, F>(state: &crate::AppState, f: F) -> Result<T, ApiError>
where
    T: Send + 'static,
    F: FnOnce(&rusqlite::Connection) -> Result<T, ApiError> + Send + 'static,
{
    let pool = state.pool.clone();
    tokio::task::spawn_blocking(move || {
        let conn = pool.get().map_err(|e| {
            tracing::error!(error = %e, "failed to get db connection");
            ApiError::InternalServerError("database unavailable".to_string())
        })?;
        f(&conn)
    })
    .await
    .map_err(|e| {
        tracing::error!(error = %e, "blocking task join error");
        ApiError::InternalServerError("task join error".to_string())
    })?
}
