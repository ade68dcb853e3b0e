//! The prompt → completion → parse pipeline behind every endpoint.

use std::{fmt, sync::Arc, time::Instant};

use llm::{CompletionRequest, LLMClient, LLMError};
use thiserror::Error;
use tracing::debug;

use crate::{
    parse::{ParseError, parse_completion},
    prompt::{self, Prompt},
    schema::{
        ChatRequest, ChatResponse, PostRequest, PostResponse, ReplyRequest, ReplyResponse,
    },
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Variant {
    Chat,
    Post,
    Reply,
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Variant::Chat => "chat",
            Variant::Post => "post",
            Variant::Reply => "reply",
        })
    }
}

/// The model call failed or its output could not be used.
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("{variant} generation failed: {source}")]
    Completion {
        variant: Variant,
        #[source]
        source: LLMError,
    },
    #[error("{variant} generation failed: {source}")]
    Parse {
        variant: Variant,
        #[source]
        source: ParseError,
    },
}

impl GenerationError {
    pub fn variant(&self) -> Variant {
        match self {
            GenerationError::Completion { variant, .. } | GenerationError::Parse { variant, .. } => {
                *variant
            }
        }
    }
}

/// Turns requests into responses using one shared client.
#[derive(Clone)]
pub struct Generator {
    client: Arc<dyn LLMClient>,
}

impl Generator {
    pub fn new(client: Arc<dyn LLMClient>) -> Self {
        Self { client }
    }

    pub fn model(&self) -> &str {
        self.client.model()
    }

    pub async fn chat(&self, req: &ChatRequest) -> Result<ChatResponse, GenerationError> {
        let content = self.complete(Variant::Chat, prompt::chat_prompt(req)).await?;
        Ok(ChatResponse { content })
    }

    pub async fn post(&self, req: &PostRequest) -> Result<PostResponse, GenerationError> {
        let raw = self.complete(Variant::Post, prompt::post_prompt(req)).await?;
        parse_completion(&raw).map_err(|source| GenerationError::Parse {
            variant: Variant::Post,
            source,
        })
    }

    pub async fn reply(&self, req: &ReplyRequest) -> Result<ReplyResponse, GenerationError> {
        let raw = self.complete(Variant::Reply, prompt::reply_prompt(req)).await?;
        parse_completion(&raw).map_err(|source| GenerationError::Parse {
            variant: Variant::Reply,
            source,
        })
    }

    async fn complete(&self, variant: Variant, prompt: Prompt) -> Result<String, GenerationError> {
        let request: CompletionRequest = prompt.into();
        let started = Instant::now();
        let raw = self
            .client
            .complete(&request)
            .await
            .map_err(|source| GenerationError::Completion { variant, source })?;
        debug!(
            %variant,
            model = self.client.model(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            chars = raw.chars().count(),
            "completion received"
        );
        Ok(raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use llm::{ResponseFormat, StubClient};

    fn post_request() -> PostRequest {
        PostRequest {
            clone_id: None,
            clone_description: "persona".into(),
            post_history: vec![],
            reply_history: vec![],
            board_description: "board".into(),
        }
    }

    #[tokio::test]
    async fn post_asks_for_json_and_parses() {
        let stub = Arc::new(StubClient::replying(r#"{"title":"T","content":"C"}"#));
        let generator = Generator::new(stub.clone());
        let res = generator.post(&post_request()).await.unwrap();
        assert_eq!(res.title, "T");
        assert_eq!(res.content, "C");
        assert_eq!(stub.last_request().unwrap().format, ResponseFormat::Json);
    }

    #[tokio::test]
    async fn parse_failure_keeps_variant() {
        let generator = Generator::new(Arc::new(StubClient::replying("not json")));
        let err = generator.post(&post_request()).await.unwrap_err();
        assert_eq!(err.variant(), Variant::Post);
        assert!(matches!(err, GenerationError::Parse { .. }));
        assert!(err.to_string().starts_with("post generation failed"));
    }

    #[tokio::test]
    async fn client_failure_is_reported() {
        let generator = Generator::new(Arc::new(StubClient::failing("refused")));
        let err = generator
            .chat(&ChatRequest {
                message: "hi".into(),
            })
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            GenerationError::Completion {
                variant: Variant::Chat,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn chat_returns_raw_text() {
        let generator = Generator::new(Arc::new(StubClient::replying("안녕하세요")));
        let res = generator
            .chat(&ChatRequest {
                message: "hi".into(),
            })
            .await
            .unwrap();
        assert_eq!(res.content, "안녕하세요");
    }
}
