use crate::startup::AppState;
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::json;

/// Liveness: the process is up, whether or not a provider is configured.
pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "service": "poem-service",
        "version": env!("CARGO_PKG_VERSION"),
        "provider_configured": state.generator.is_configured(),
    }))
}

/// Readiness: only ready to generate once a provider is configured.
pub async fn readiness_check(State(state): State<AppState>) -> StatusCode {
    if state.generator.is_configured() {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    }
}
