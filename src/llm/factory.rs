use crate::llm::config::{ProviderKind, ProviderSettings};
use crate::llm::provider::{LlmError, LlmProvider};
use crate::llm::providers::ollama::OLLAMA_DEFAULT_URL;
use crate::llm::providers::openai_compatible::LMSTUDIO_DEFAULT_URL;
use crate::llm::providers::{OllamaProvider, OpenAiCompatibleProvider, OpenAiProvider};
use std::sync::Arc;
use tracing::info;

/// Build the one provider adapter this process will use.
///
/// Credentials are checked here, so a missing API key fails startup rather
/// than the first request.
pub fn create_provider(settings: &ProviderSettings) -> Result<Arc<dyn LlmProvider>, LlmError> {
    let api_key = settings.api_key.clone().unwrap_or_default();
    let model = settings.model.clone();
    let base_url = settings.base_url.as_deref();
    let timeout = settings.timeout_secs;

    let provider: Arc<dyn LlmProvider> = match settings.kind {
        ProviderKind::OpenAi => Arc::new(OpenAiProvider::with_options(api_key, model, base_url, timeout)?),
        ProviderKind::Groq => Arc::new(OpenAiCompatibleProvider::groq(api_key, model, base_url, timeout)?),
        ProviderKind::LmStudio => Arc::new(OpenAiCompatibleProvider::lm_studio(
            base_url.unwrap_or(LMSTUDIO_DEFAULT_URL),
            model,
            timeout,
        )?),
        ProviderKind::Ollama => Arc::new(OllamaProvider::new(
            base_url.unwrap_or(OLLAMA_DEFAULT_URL),
            model,
            timeout,
        )?),
    };

    info!(
        "LLM provider: {} (model: {})",
        provider.name(),
        provider.model()
    );
    if let Some(secs) = timeout {
        info!("  Request timeout: {} seconds", secs);
    }

    Ok(provider)
}
