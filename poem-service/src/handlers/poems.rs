use crate::models::{PoemOptions, PoemRequest, PoemResponse};
use crate::services::metrics;
use crate::startup::AppState;
use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use service_core::error::AppError;

pub async fn generate_poem(
    State(state): State<AppState>,
    payload: Result<Json<PoemRequest>, JsonRejection>,
) -> Result<Json<PoemResponse>, AppError> {
    let Json(request) = payload.map_err(|rejection| {
        metrics::record_poem_request("rejected");
        AppError::UnprocessableEntity(rejection.body_text())
    })?;

    match state.generator.generate(&request).await {
        Ok(poem) => {
            metrics::record_poem_request("ok");
            Ok(Json(PoemResponse { poem }))
        }
        Err(e) => {
            metrics::record_poem_request(e.kind());
            tracing::error!(error = %e, kind = e.kind(), "Poem generation failed");
            Err(e.into())
        }
    }
}

pub async fn poem_options() -> Json<PoemOptions> {
    Json(PoemOptions::presets())
}
