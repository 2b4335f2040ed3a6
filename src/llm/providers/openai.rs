use super::{build_client, endpoint, post_json, text_at, CHOICES_CONTENT};
use crate::llm::message::{ChatMessage, GenerateOptions, GenerationResult};
use crate::llm::provider::{LlmError, LlmProvider};
use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;

pub const OPENAI_API_BASE: &str = "https://api.openai.com/v1";
pub const DEFAULT_MODEL: &str = "gpt-4.1-mini";
const DEFAULT_TEMPERATURE: f32 = 0.2;
const PROVIDER: &str = "OpenAI";

/// Canonical OpenAI chat completions adapter
pub struct OpenAiProvider {
    client: Client,
    endpoint: String,
    api_key: String,
    model: String,
    timeout_secs: Option<u64>,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    temperature: f32,
}

impl OpenAiProvider {
    pub fn new(api_key: String, model: String) -> Result<Self, LlmError> {
        Self::with_options(api_key, model, None, None)
    }

    /// Create the adapter with an optional API base override and request timeout
    pub fn with_options(
        api_key: String,
        model: String,
        api_base: Option<&str>,
        timeout_secs: Option<u64>,
    ) -> Result<Self, LlmError> {
        if api_key.trim().is_empty() {
            return Err(LlmError::Config(
                "OPENAI_API_KEY is required for the openai provider".to_string(),
            ));
        }

        Ok(Self {
            client: build_client(PROVIDER, timeout_secs)?,
            endpoint: endpoint(api_base.unwrap_or(OPENAI_API_BASE), "/chat/completions"),
            api_key,
            model,
            timeout_secs,
        })
    }
}

#[async_trait]
impl LlmProvider for OpenAiProvider {
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
        };

        tracing::debug!(
            "Sending request to {}: model={}, messages_count={}",
            PROVIDER,
            self.model,
            messages.len()
        );

        let request = self.client.post(&self.endpoint).bearer_auth(&self.api_key);
        let raw = post_json(PROVIDER, request, &body, self.timeout_secs).await?;
        let text = text_at(&raw, CHOICES_CONTENT);

        Ok(GenerationResult { text, raw })
    }

    fn name(&self) -> &'static str {
        "openai"
    }

    fn model(&self) -> &str {
        &self.model
    }
}
