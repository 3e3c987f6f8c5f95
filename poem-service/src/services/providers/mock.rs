//! Mock provider implementation for testing.

use super::{FinishReason, GenerationParams, ProviderError, ProviderResponse, TextProvider};
use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

/// What the mock hands back on every call.
#[derive(Debug, Clone)]
pub enum MockReply {
    /// Direct text, no candidates.
    Text(String),
    /// Empty direct text with the given candidate texts.
    Candidates(Vec<String>),
    /// Neither text nor candidates.
    Empty,
    /// The call itself fails with this description.
    Fail(String),
}

/// Mock text provider that replays a fixed reply and records what it was
/// asked.
pub struct MockTextProvider {
    reply: MockReply,
    calls: AtomicUsize,
    last_request: Mutex<Option<(String, GenerationParams)>>,
}

impl MockTextProvider {
    pub fn new(reply: MockReply) -> Self {
        Self {
            reply,
            calls: AtomicUsize::new(0),
            last_request: Mutex::new(None),
        }
    }

    pub fn text(text: impl Into<String>) -> Self {
        Self::new(MockReply::Text(text.into()))
    }

    /// Number of `generate` calls made so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_prompt(&self) -> Option<String> {
        self.last_request
            .lock()
            .ok()
            .and_then(|guard| guard.as_ref().map(|(prompt, _)| prompt.clone()))
    }

    pub fn last_params(&self) -> Option<GenerationParams> {
        self.last_request
            .lock()
            .ok()
            .and_then(|guard| guard.as_ref().map(|(_, params)| params.clone()))
    }
}

#[async_trait]
impl TextProvider for MockTextProvider {
    fn name(&self) -> &'static str {
        "mock"
    }

    fn model(&self) -> &str {
        "mock-model"
    }

    async fn generate(
        &self,
        prompt: &str,
        params: &GenerationParams,
    ) -> Result<ProviderResponse, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut last) = self.last_request.lock() {
            *last = Some((prompt.to_string(), params.clone()));
        }

        let (text, candidates) = match &self.reply {
            MockReply::Text(text) => (Some(text.clone()), Vec::new()),
            MockReply::Candidates(candidates) => (Some(String::new()), candidates.clone()),
            MockReply::Empty => (None, Vec::new()),
            MockReply::Fail(message) => return Err(ProviderError::ApiError(message.clone())),
        };

        Ok(ProviderResponse {
            text,
            candidates,
            input_tokens: prompt.len() as i32 / 4,
            output_tokens: 10,
            finish_reason: FinishReason::Complete,
        })
    }
}
