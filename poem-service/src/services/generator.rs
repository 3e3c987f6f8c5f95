//! Poem generation: prompt, one provider call, text extraction.

use crate::models::PoemRequest;
use crate::services::metrics;
use crate::services::prompt::build_prompt;
use crate::services::providers::{GenerationParams, ProviderResponse, TextProvider};
use service_core::error::AppError;
use std::sync::Arc;
use std::time::Instant;
use thiserror::Error;

/// Failures surfaced to the HTTP layer. All map to a 500 with the message as
/// `detail`.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PoemError {
    #[error("No AI service available")]
    NoServiceConfigured,

    #[error("Poem generation failed: {0}")]
    GenerationFailed(String),

    #[error("No valid poem generated")]
    EmptyResult,
}

impl PoemError {
    pub fn kind(&self) -> &'static str {
        match self {
            PoemError::NoServiceConfigured => "no_service_configured",
            PoemError::GenerationFailed(_) => "generation_failed",
            PoemError::EmptyResult => "empty_result",
        }
    }
}

impl From<PoemError> for AppError {
    fn from(err: PoemError) -> Self {
        AppError::UpstreamError(err.to_string())
    }
}

/// Owns the provider handle for the lifetime of the process.
pub struct PoemGenerator {
    provider: Option<Arc<dyn TextProvider>>,
    params: GenerationParams,
}

impl PoemGenerator {
    pub fn new(provider: Arc<dyn TextProvider>) -> Self {
        Self {
            provider: Some(provider),
            params: GenerationParams::poem_defaults(),
        }
    }

    /// A generator with no provider; every call fails with
    /// [`PoemError::NoServiceConfigured`].
    pub fn unconfigured() -> Self {
        Self {
            provider: None,
            params: GenerationParams::poem_defaults(),
        }
    }

    pub fn is_configured(&self) -> bool {
        self.provider.is_some()
    }

    #[tracing::instrument(skip_all, fields(provider, model))]
    pub async fn generate(&self, request: &PoemRequest) -> Result<String, PoemError> {
        let provider = self.provider.as_ref().ok_or(PoemError::NoServiceConfigured)?;

        let span = tracing::Span::current();
        span.record("provider", provider.name());
        span.record("model", provider.model());

        let prompt = build_prompt(request);

        let start = Instant::now();
        let result = provider.generate(&prompt, &self.params).await;
        metrics::record_provider_latency(
            provider.name(),
            provider.model(),
            start.elapsed().as_secs_f64(),
        );

        let response = result.map_err(|e| {
            metrics::record_provider_error(provider.name(), e.kind());
            tracing::warn!(error = %e, "Provider call failed");
            PoemError::GenerationFailed(e.to_string())
        })?;

        metrics::record_tokens(
            provider.model(),
            response.input_tokens,
            response.output_tokens,
        );

        let finish_reason = response.finish_reason;
        let poem = extract_poem(response)?;
        tracing::info!(
            poem_len = poem.len(),
            finish_reason = finish_reason.as_str(),
            "Poem generated"
        );
        Ok(poem)
    }
}

/// Prefer the direct text, fall back to the first candidate. Whitespace-only
/// text counts as empty.
fn extract_poem(response: ProviderResponse) -> Result<String, PoemError> {
    if let Some(text) = response.text.as_deref().map(str::trim) {
        if !text.is_empty() {
            return Ok(text.to_string());
        }
    }

    response
        .candidates
        .first()
        .map(|candidate| candidate.trim())
        .filter(|text| !text.is_empty())
        .map(str::to_string)
        .ok_or(PoemError::EmptyResult)
}
