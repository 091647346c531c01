use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use serde_json::json;

use super::AppState;

/// GET /health - Liveness probe
pub async fn health() -> impl IntoResponse {
    (StatusCode::OK, Json(json!({"status": "ok"})))
}

/// GET /ready - Readiness probe
/// Ready once the office of education and school codes are configured.
/// The API key is optional, NEIS serves sample rows without it.
pub async fn ready(State(state): State<AppState>) -> impl IntoResponse {
    let neis = &state.config.neis;

    if !neis.is_configured() {
        tracing::warn!("Readiness check failed: school is not configured");
        return (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({
                "status": "not_ready",
                "reason": "school_not_configured"
            })),
        );
    }

    (
        StatusCode::OK,
        Json(json!({
            "status": "ready",
            "upstream": neis.base_url,
            "atpt_code": neis.atpt_code,
            "school_code": neis.school_code,
            "api_key": !neis.key.is_empty(),
        })),
    )
}
