//! Abstractions for interacting with large language model providers.
//!
//! The `llm` crate defines a [`LLMClient`] trait that turns one
//! [`CompletionRequest`] into one completion string, along with concrete
//! implementations: [`OpenAIClient`] for OpenAI-compatible endpoints,
//! [`OllamaClient`] for a local Ollama server and [`StubClient`] for tests.

pub mod client;
pub mod openai;
pub mod stub;
pub mod traits;

pub use client::OllamaClient;
pub use openai::OpenAIClient;
pub use stub::StubClient;
pub use traits::{CompletionRequest, LLMClient, LLMError, ResponseFormat};
