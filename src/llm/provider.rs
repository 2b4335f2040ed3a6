use crate::llm::message::{ChatMessage, GenerateOptions, GenerationResult};
use async_trait::async_trait;
use thiserror::Error;

/// Errors that can occur while talking to an LLM backend
#[derive(Debug, Error)]
pub enum LlmError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("{provider} API error: {status} - {body}")]
    Api {
        provider: &'static str,
        status: u16,
        body: String,
    },

    #[error("{provider} request failed: {message}")]
    Network {
        provider: &'static str,
        message: String,
    },

    #[error("{provider} request timed out after {secs}s")]
    Timeout { provider: &'static str, secs: u64 },

    #[error("{provider} returned an unreadable response: {message}")]
    Parse {
        provider: &'static str,
        message: String,
    },
}

impl LlmError {
    /// HTTP status reported by the upstream, if the failure carried one
    pub fn status(&self) -> Option<u16> {
        match self {
            LlmError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// The single capability every backend adapter implements
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Replay `messages` to the backend and return the generated text
    async fn chat(
        &self,
        messages: &[ChatMessage],
        options: Option<&GenerateOptions>,
    ) -> Result<GenerationResult, LlmError>;

    /// Short adapter identifier, used in logs and error messages
    fn name(&self) -> &'static str;

    /// Model the adapter was built with
    fn model(&self) -> &str;
}
