use super::{build_client, endpoint, post_json, text_at, CHOICES_CONTENT};
use crate::llm::message::{ChatMessage, GenerateOptions, GenerationResult};
use crate::llm::provider::{LlmError, LlmProvider};
use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;

pub const GROQ_API_BASE: &str = "https://api.groq.com/openai/v1";
pub const GROQ_DEFAULT_MODEL: &str = "llama-3.1-8b-instant";
pub const LMSTUDIO_DEFAULT_URL: &str = "http://localhost:1234";
pub const LMSTUDIO_DEFAULT_MODEL: &str = "meta-llama-3.1-8b-instruct";
const DEFAULT_TEMPERATURE: f32 = 0.7;

/// Adapter for servers speaking the OpenAI chat completions dialect.
///
/// Groq (cloud, bearer token) and LM Studio (local, no auth) share this
/// implementation and differ only in endpoint, credentials and default model.
pub struct OpenAiCompatibleProvider {
    name: &'static str,
    label: &'static str,
    client: Client,
    endpoint: String,
    api_key: Option<String>,
    model: String,
    timeout_secs: Option<u64>,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    stream: bool,
}

impl OpenAiCompatibleProvider {
    /// GroqCloud; the API key is mandatory
    pub fn groq(
        api_key: String,
        model: String,
        api_base: Option<&str>,
        timeout_secs: Option<u64>,
    ) -> Result<Self, LlmError> {
        if api_key.trim().is_empty() {
            return Err(LlmError::Config(
                "GROQ_API_KEY is required for the groq provider".to_string(),
            ));
        }

        Ok(Self {
            name: "groq",
            label: "Groq",
            client: build_client("Groq", timeout_secs)?,
            endpoint: endpoint(api_base.unwrap_or(GROQ_API_BASE), "/chat/completions"),
            api_key: Some(api_key),
            model,
            timeout_secs,
        })
    }

    /// Local LM Studio (or any unauthenticated OpenAI-compatible server)
    pub fn lm_studio(base_url: &str, model: String, timeout_secs: Option<u64>) -> Result<Self, LlmError> {
        Ok(Self {
            name: "lmstudio",
            label: "LM Studio",
            client: build_client("LM Studio", timeout_secs)?,
            endpoint: endpoint(base_url, "/v1/chat/completions"),
            api_key: None,
            model,
            timeout_secs,
        })
    }

    #[cfg(test)]
    fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl LlmProvider for OpenAiCompatibleProvider {
    async fn chat(
        &self,
        messages: &[ChatMessage],
        options: Option<&GenerateOptions>,
    ) -> Result<GenerationResult, LlmError> {
        let body = ChatRequest {
            model: &self.model,
            messages,
            temperature: options
                .and_then(|o| o.temperature)
                .unwrap_or(DEFAULT_TEMPERATURE),
            max_tokens: options.and_then(|o| o.max_tokens),
            stream: false,
        };

        tracing::debug!(
            "Sending request to {}: model={}, messages_count={}",
            self.label,
            self.model,
            messages.len()
        );

        let mut request = self.client.post(&self.endpoint);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let raw = post_json(self.label, request, &body, self.timeout_secs).await?;
        let text = text_at(&raw, CHOICES_CONTENT);

        Ok(GenerationResult { text, raw })
    }

    fn name(&self) -> &'static str {
        self.name
    }

    fn model(&self) -> &str {
        &self.model
    }
}
