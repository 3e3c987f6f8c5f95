//! Text-generation provider abstraction.
//!
//! The poem generator talks to a single `TextProvider`. Gemini is the only
//! production backend; `mock` is a scripted stand-in for tests.

pub mod gemini;
pub mod mock;

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;

/// Error type for provider operations.
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("Provider not configured: {0}")]
    NotConfigured(String),

    #[error("API error: {0}")]
    ApiError(String),

    #[error("Rate limited: {0}")]
    RateLimited(String),

    #[error("Content blocked: {0}")]
    ContentBlocked(String),

    #[error("Network error: {0}")]
    NetworkError(String),
}

impl ProviderError {
    /// Short label used as a metrics dimension.
    pub fn kind(&self) -> &'static str {
        match self {
            ProviderError::NotConfigured(_) => "not_configured",
            ProviderError::ApiError(_) => "api_error",
            ProviderError::RateLimited(_) => "rate_limited",
            ProviderError::ContentBlocked(_) => "content_blocked",
            ProviderError::NetworkError(_) => "network_error",
        }
    }
}

/// What a provider handed back for one generation call.
#[derive(Debug, Clone, Default)]
pub struct ProviderResponse {
    /// Primary text of the response, when the provider exposes one.
    pub text: Option<String>,

    /// Text of each returned candidate, in provider order.
    pub candidates: Vec<String>,

    /// Input tokens consumed.
    pub input_tokens: i32,

    /// Output tokens generated.
    pub output_tokens: i32,

    pub finish_reason: FinishReason,
}

/// Reason why generation stopped.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FinishReason {
    #[default]
    Complete,
    Length,
    ContentFilter,
    Other,
}

impl FinishReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            FinishReason::Complete => "complete",
            FinishReason::Length => "length",
            FinishReason::ContentFilter => "content_filter",
            FinishReason::Other => "other",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum HarmCategory {
    HarmCategorySexuallyExplicit,
    HarmCategoryHateSpeech,
    HarmCategoryHarassment,
    HarmCategoryDangerousContent,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum HarmBlockThreshold {
    BlockNone,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SafetySetting {
    pub category: HarmCategory,
    pub threshold: HarmBlockThreshold,
}

/// Generation parameters for a provider call.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GenerationParams {
    pub temperature: Option<f32>,

    /// Nucleus-sampling threshold.
    pub top_p: Option<f32>,

    pub max_output_tokens: Option<i32>,

    pub safety_settings: Vec<SafetySetting>,
}

impl GenerationParams {
    /// The fixed settings every poem is generated with: moderate creativity,
    /// a 300 token ceiling, and all four harm filters disabled.
    pub fn poem_defaults() -> Self {
        let safety_settings = [
            HarmCategory::HarmCategorySexuallyExplicit,
            HarmCategory::HarmCategoryHateSpeech,
            HarmCategory::HarmCategoryHarassment,
            HarmCategory::HarmCategoryDangerousContent,
        ]
        .into_iter()
        .map(|category| SafetySetting {
            category,
            threshold: HarmBlockThreshold::BlockNone,
        })
        .collect();

        Self {
            temperature: Some(0.7),
            top_p: Some(0.9),
            max_output_tokens: Some(300),
            safety_settings,
        }
    }
}

/// Trait for text generation providers (e.g., Gemini).
#[async_trait]
pub trait TextProvider: Send + Sync {
    /// Provider name for logs and metrics.
    fn name(&self) -> &'static str;

    /// Model identifier requests are bound to.
    fn model(&self) -> &str;

    /// Generate a response for a single prompt. Implementations make at most
    /// one outbound call.
    async fn generate(
        &self,
        prompt: &str,
        params: &GenerationParams,
    ) -> Result<ProviderResponse, ProviderError>;
}
