//! Client for a local Ollama language model server.
//!
//! [`OllamaClient`] implements [`LLMClient`] by sending the system and user
//! prompts as a two-message chat to a running Ollama instance.

use crate::traits::{CompletionRequest, LLMClient, LLMError, ResponseFormat};
use async_trait::async_trait;
use tracing::debug;

use ollama_rs::{
    generation::{
        chat::{request::ChatMessageRequest, ChatMessage},
        parameters::FormatType,
    },
    Ollama,
};

pub struct OllamaClient {
    inner: Ollama,
    model: String,
}

impl OllamaClient {
    pub fn new(base_url: impl AsRef<str>, model: impl Into<String>) -> Result<Self, LLMError> {
        let inner =
            Ollama::try_new(base_url.as_ref()).map_err(|e| LLMError::Config(e.to_string()))?;
        Ok(Self {
            inner,
            model: model.into(),
        })
    }
}

#[async_trait]
impl LLMClient for OllamaClient {
    fn model(&self) -> &str {
        &self.model
    }

    async fn complete(&self, request: &CompletionRequest) -> Result<String, LLMError> {
        let messages = vec![
            ChatMessage::system(request.system.clone()),
            ChatMessage::user(request.user.clone()),
        ];
        let mut chat = ChatMessageRequest::new(self.model.clone(), messages);
        if request.format == ResponseFormat::Json {
            chat = chat.format(FormatType::Json);
        }
        debug!(model = %self.model, format = ?request.format, "sending chat to ollama");
        let res = self
            .inner
            .send_chat_messages(chat)
            .await
            .map_err(|e| LLMError::Network(e.to_string()))?;
        let content = res.message.content;
        if content.trim().is_empty() {
            return Err(LLMError::EmptyCompletion);
        }
        Ok(content)
    }
}
