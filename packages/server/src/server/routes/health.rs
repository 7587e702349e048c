use axum::Json;
use serde::Serialize;

#[derive(Serialize)]
pub struct HealthResponse {
    status: &'static str,
}

/// Health check endpoint
///
/// The server holds no connections of its own, so being able to answer
/// is the whole check.
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse { status: "healthy" })
}
