use async_trait::async_trait;
use thiserror::Error;

/// Shape the caller expects the completion to take.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ResponseFormat {
    /// Free-form text.
    #[default]
    Text,
    /// A single JSON object. Providers that support a JSON mode are asked to
    /// enforce it; the prompt itself must still describe the object.
    Json,
}

/// One system + user exchange sent to a model.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CompletionRequest {
    pub system: String,
    pub user: String,
    pub format: ResponseFormat,
}

impl CompletionRequest {
    pub fn new(system: impl Into<String>, user: impl Into<String>) -> Self {
        Self {
            system: system.into(),
            user: user.into(),
            format: ResponseFormat::Text,
        }
    }

    pub fn with_format(mut self, format: ResponseFormat) -> Self {
        self.format = format;
        self
    }
}

#[derive(Debug, Error)]
pub enum LLMError {
    #[error("network error: {0}")]
    Network(String),
    #[error("request timed out")]
    Timeout,
    #[error("provider returned {status}: {body}")]
    Status { status: u16, body: String },
    #[error("invalid response: {0}")]
    InvalidResponse(String),
    #[error("empty completion")]
    EmptyCompletion,
    #[error("invalid client configuration: {0}")]
    Config(String),
}

/// A language model that answers one prompt with one completion.
///
/// Implementations make exactly one attempt per call and never retry.
#[async_trait]
pub trait LLMClient: Send + Sync {
    /// Model identifier used for every request.
    fn model(&self) -> &str;

    async fn complete(&self, request: &CompletionRequest) -> Result<String, LLMError>;
}
