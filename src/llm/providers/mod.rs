//! Backend adapters translating the chat capability into vendor wire formats.

pub mod ollama;
pub mod openai;
pub mod openai_compatible;

pub use ollama::OllamaProvider;
pub use openai::OpenAiProvider;
pub use openai_compatible::OpenAiCompatibleProvider;

use crate::llm::provider::LlmError;
use reqwest::{Client, RequestBuilder};
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;

/// JSON pointer to the reply text in OpenAI-style responses
pub(crate) const CHOICES_CONTENT: &str = "/choices/0/message/content";

pub(crate) fn build_client(provider: &'static str, timeout_secs: Option<u64>) -> Result<Client, LlmError> {
    let mut builder = Client::builder();
    if let Some(secs) = timeout_secs {
        builder = builder.timeout(Duration::from_secs(secs));
    }

    builder
        .build()
        .map_err(|e| LlmError::Config(format!("failed to build HTTP client for {}: {}", provider, e)))
}

pub(crate) fn endpoint(base_url: &str, path: &str) -> String {
    format!("{}{}", base_url.trim_end_matches('/'), path)
}

/// Send one JSON POST and return the decoded body of a successful reply.
///
/// Non-success statuses fail immediately with the status and body text.
pub(crate) async fn post_json<T: Serialize + ?Sized>(
    provider: &'static str,
    request: RequestBuilder,
    body: &T,
    timeout_secs: Option<u64>,
) -> Result<Value, LlmError> {
    let response = request
        .json(body)
        .send()
        .await
        .map_err(|e| transport_error(provider, e, timeout_secs))?;

    let status = response.status();
    let text = response
        .text()
        .await
        .map_err(|e| transport_error(provider, e, timeout_secs))?;

    if !status.is_success() {
        tracing::debug!("{} responded with HTTP {}", provider, status);
        return Err(LlmError::Api {
            provider,
            status: status.as_u16(),
            body: text,
        });
    }

    serde_json::from_str(&text).map_err(|e| LlmError::Parse {
        provider,
        message: e.to_string(),
    })
}

/// Reply text at `pointer`, or empty when the field is missing
pub(crate) fn text_at(raw: &Value, pointer: &str) -> String {
    raw.pointer(pointer)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

fn transport_error(provider: &'static str, err: reqwest::Error, timeout_secs: Option<u64>) -> LlmError {
    match timeout_secs {
        Some(secs) if err.is_timeout() => LlmError::Timeout { provider, secs },
        _ => LlmError::Network {
            provider,
            message: err.to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_endpoint_trims_trailing_slash() {
        assert_eq!(
            endpoint("http://localhost:1234/", "/v1/chat/completions"),
            "http://localhost:1234/v1/chat/completions"
        );
        assert_eq!(endpoint("http://localhost:11434", "/api/chat"), "http://localhost:11434/api/chat");
    }

    #[test]
    fn test_text_at_defaults_to_empty() {
        let raw = json!({"choices": []});
        assert_eq!(text_at(&raw, CHOICES_CONTENT), "");

        let raw = json!({"choices": [{"message": {"content": null}}]});
        assert_eq!(text_at(&raw, CHOICES_CONTENT), "");

        let raw = json!({"choices": [{"message": {"content": "hi"}}]});
        assert_eq!(text_at(&raw, CHOICES_CONTENT), "hi");
    }
}
