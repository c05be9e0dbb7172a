//! Locally generated responses.
//!
//! Everything the proxy answers itself, without a backend call, uses the same
//! `{ "message": ... }` JSON shape the storefront client expects.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

/// A JSON `{ "message": ... }` response.
pub fn message(status: StatusCode, text: &str) -> Response {
    (status, Json(json!({ "message": text }))).into_response()
}

/// Fallback for paths outside the route table.
pub async fn not_found() -> Response {
    message(StatusCode::NOT_FOUND, "Not found")
}

/// Liveness probe answered locally.
pub async fn health() -> Response {
    (StatusCode::OK, Json(json!({ "status": "ok" }))).into_response()
}
