use super::{build_client, endpoint, post_json, text_at};
use crate::llm::message::{ChatMessage, GenerateOptions, GenerationResult};
use crate::llm::provider::{LlmError, LlmProvider};
use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;

pub const OLLAMA_DEFAULT_URL: &str = "http://localhost:11434";
pub const OLLAMA_DEFAULT_MODEL: &str = "llama3";
const PROVIDER: &str = "Ollama";

/// Native Ollama `/api/chat` adapter
pub struct OllamaProvider {
    client: Client,
    endpoint: String,
    model: String,
    timeout_secs: Option<u64>,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    stream: bool,
}

impl OllamaProvider {
    pub fn new(base_url: &str, model: String, timeout_secs: Option<u64>) -> Result<Self, LlmError> {
        Ok(Self {
            client: build_client(PROVIDER, timeout_secs)?,
            endpoint: endpoint(base_url, "/api/chat"),
            model,
            timeout_secs,
        })
    }
}

#[async_trait]
impl LlmProvider for OllamaProvider {
    /// Generation options are not forwarded; the server's model defaults apply.
    async fn chat(
        &self,
        messages: &[ChatMessage],
        _options: Option<&GenerateOptions>,
    ) -> Result<GenerationResult, LlmError> {
        let body = ChatRequest {
            model: &self.model,
            messages,
            stream: false,
        };

        tracing::debug!(
            "Sending request to {}: model={}, messages_count={}",
            PROVIDER,
            self.model,
            messages.len()
        );

        let request = self.client.post(&self.endpoint);
        let raw = post_json(PROVIDER, request, &body, self.timeout_secs).await?;
        let text = text_at(&raw, "/message/content");

        Ok(GenerationResult { text, raw })
    }

    fn name(&self) -> &'static str {
        "ollama"
    }

    fn model(&self) -> &str {
        &self.model
    }
}
