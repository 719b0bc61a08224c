//! Liveness endpoint.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;
use tracing::warn;

use crate::AppState;

#[derive(Debug, Serialize)]
pub(crate) struct HealthResponse {
    status: &'static str,
    message: &'static str,
}

/// `GET /health`
///
/// 503 when the database stops answering queries.
pub(crate) async fn health(
    State(state): State<AppState>,
) -> (StatusCode, Json<HealthResponse>) {
    if state.db.health_check().await {
        return (
            StatusCode::OK,
            Json(HealthResponse {
                status: "ok",
                message: "Pizza Billing API is running",
            }),
        );
    }

    warn!("Health check failed: database unreachable");
    (
        StatusCode::SERVICE_UNAVAILABLE,
        Json(HealthResponse {
            status: "unavailable",
            message: "Database is unreachable",
        }),
    )
}
