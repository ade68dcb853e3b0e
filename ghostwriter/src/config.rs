//! Command line and environment configuration.
//!
//! Every flag falls back to an environment variable, so a `.env` file loaded
//! before parsing is enough to configure a deployment.

use std::{net::SocketAddr, sync::Arc, time::Duration};

use clap::{Parser, ValueEnum};
use llm::{LLMClient, LLMError, OllamaClient, OpenAIClient};
use thiserror::Error;

/// Which provider serves completions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum Provider {
    Openai,
    Ollama,
}

#[derive(Parser, Debug, Clone)]
#[command(
    name = "ghostwriter",
    version,
    about = "Write board posts and replies in the voice of a persona"
)]
pub struct Config {
    /// Address to bind the HTTP server
    #[arg(long, env = "GHOSTWRITER_ADDR", default_value = "0.0.0.0:8000")]
    pub addr: SocketAddr,

    /// Completion provider
    #[arg(long, env = "LLM_PROVIDER", value_enum, default_value_t = Provider::Openai)]
    pub provider: Provider,

    /// OpenAI API key, required when the provider is `openai`
    #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true)]
    pub openai_api_key: Option<String>,

    /// Base URL of the OpenAI-compatible API
    #[arg(long, env = "OPENAI_BASE_URL", default_value = llm::openai::DEFAULT_BASE_URL)]
    pub openai_base_url: String,

    /// Base URL of the Ollama server
    #[arg(long, env = "OLLAMA_URL", default_value = "http://localhost:11434")]
    pub ollama_url: String,

    /// Model name passed to the provider
    #[arg(long, env = "LLM_MODEL", default_value = "gpt-4o-mini")]
    pub model: String,

    /// Seconds to wait for a single completion
    #[arg(long, env = "LLM_TIMEOUT_SECS", default_value_t = 30)]
    pub timeout_secs: u64,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("OPENAI_API_KEY is not set in the environment or .env file")]
    MissingCredential,
    #[error("could not build the {provider:?} client: {source}")]
    Client {
        provider: Provider,
        #[source]
        source: LLMError,
    },
}

impl Config {
    /// Build the completion client once for the lifetime of the process.
    pub fn build_client(&self) -> Result<Arc<dyn LLMClient>, ConfigError> {
        let provider = self.provider;
        let client: Arc<dyn LLMClient> = match provider {
            Provider::Openai => {
                let key = self
                    .openai_api_key
                    .as_deref()
                    .map(str::trim)
                    .filter(|k| !k.is_empty())
                    .ok_or(ConfigError::MissingCredential)?;
                let client = OpenAIClient::new(key, &self.model, self.timeout())
                    .map_err(|source| ConfigError::Client { provider, source })?
                    .with_base_url(&self.openai_base_url);
                Arc::new(client)
            }
            Provider::Ollama => {
                let client = OllamaClient::new(&self.ollama_url, &self.model)
                    .map_err(|source| ConfigError::Client { provider, source })?;
                Arc::new(client)
            }
        };
        Ok(client)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Config {
        let mut argv = vec!["ghostwriter"];
        argv.extend_from_slice(args);
        Config::try_parse_from(argv).unwrap()
    }

    #[test]
    fn blank_key_is_fatal() {
        let config = parse(&["--provider", "openai", "--openai-api-key", "  "]);
        let err = config.build_client().err().unwrap();
        assert!(matches!(err, ConfigError::MissingCredential));
    }

    #[test]
    fn absent_key_is_fatal() {
        let mut config = parse(&["--provider", "openai"]);
        config.openai_api_key = None;
        let err = config.build_client().err().unwrap();
        assert!(matches!(err, ConfigError::MissingCredential));
        assert!(err.to_string().contains("OPENAI_API_KEY"));
    }

    #[test]
    fn openai_client_uses_configured_model() {
        let config = parse(&[
            "--provider",
            "openai",
            "--openai-api-key",
            "sk-test",
            "--model",
            "gpt-4o-mini",
        ]);
        let client = config.build_client().unwrap();
        assert_eq!(client.model(), "gpt-4o-mini");
    }

    #[test]
    fn ollama_needs_no_key() {
        let config = parse(&[
            "--provider",
            "ollama",
            "--ollama-url",
            "http://localhost:11434",
            "--model",
            "mistral",
        ]);
        assert_eq!(config.build_client().unwrap().model(), "mistral");
    }

    #[test]
    fn bad_ollama_url_is_reported() {
        let config = parse(&["--provider", "ollama", "--ollama-url", "not a url"]);
        let err = config.build_client().err().unwrap();
        assert!(matches!(
            err,
            ConfigError::Client {
                provider: Provider::Ollama,
                ..
            }
        ));
    }

    #[test]
    fn timeout_is_in_seconds() {
        let config = parse(&["--timeout-secs", "5"]);
        assert_eq!(config.timeout(), Duration::from_secs(5));
    }
}
