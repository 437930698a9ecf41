//! Health endpoint reporting whether Gmail access is configured

use super::AppState;
use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let (status, label) = if state.is_configured() {
        (StatusCode::OK, "healthy")
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "not_configured")
    };
    (
        status,
        Json(json!({ "status": label, "service": "gmail-integration" })),
    )
}
