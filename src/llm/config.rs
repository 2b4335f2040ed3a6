use crate::llm::providers::ollama::{OLLAMA_DEFAULT_MODEL, OLLAMA_DEFAULT_URL};
use crate::llm::providers::openai::DEFAULT_MODEL as OPENAI_DEFAULT_MODEL;
use crate::llm::providers::openai_compatible::{
    GROQ_DEFAULT_MODEL, LMSTUDIO_DEFAULT_MODEL, LMSTUDIO_DEFAULT_URL,
};
use serde::{Deserialize, Serialize};
use std::env;

/// Backend families the gateway can talk to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    OpenAi,
    Groq,
    LmStudio,
    Ollama,
}

/// Accepted values of `LLM_PROVIDER`. `llama` is an alias for LM Studio.
const PROVIDER_TAGS: &[(&str, ProviderKind)] = &[
    ("openai", ProviderKind::OpenAi),
    ("groq", ProviderKind::Groq),
    ("lmstudio", ProviderKind::LmStudio),
    ("llama", ProviderKind::LmStudio),
    ("ollama", ProviderKind::Ollama),
];

impl ProviderKind {
    /// Every tag `from_tag` recognizes, aliases included
    pub fn supported_tags() -> impl Iterator<Item = &'static str> {
        PROVIDER_TAGS.iter().map(|(name, _)| *name)
    }

    /// Resolve a provider tag; absent or unknown tags select OpenAI
    pub fn from_tag(tag: Option<&str>) -> Self {
        tag.map(|t| t.trim().to_lowercase())
            .and_then(|t| {
                PROVIDER_TAGS
                    .iter()
                    .find(|(name, _)| *name == t)
                    .map(|(_, kind)| *kind)
            })
            .unwrap_or(ProviderKind::OpenAi)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderKind::OpenAi => "openai",
            ProviderKind::Groq => "groq",
            ProviderKind::LmStudio => "lmstudio",
            ProviderKind::Ollama => "ollama",
        }
    }

    /// Whether the provider needs an API key to be constructed
    pub fn requires_api_key(&self) -> bool {
        matches!(self, ProviderKind::OpenAi | ProviderKind::Groq)
    }
}

/// Connection settings for the selected LLM provider
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderSettings {
    pub kind: ProviderKind,

    /// Bearer token, only used by the cloud providers
    pub api_key: Option<String>,

    pub model: String,

    /// Base URL; `None` keeps the provider's fixed endpoint
    pub base_url: Option<String>,

    /// Request timeout in seconds; `None` waits indefinitely
    pub timeout_secs: Option<u64>,
}

impl Default for ProviderSettings {
    fn default() -> Self {
        Self {
            kind: ProviderKind::OpenAi,
            api_key: None,
            model: OPENAI_DEFAULT_MODEL.to_string(),
            base_url: None,
            timeout_secs: None,
        }
    }
}

impl ProviderSettings {
    /// Load settings from the process environment
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load settings from an arbitrary key lookup. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let kind = ProviderKind::from_tag(var("LLM_PROVIDER").as_deref());

        let timeout_secs = var("LLM_REQUEST_TIMEOUT")
            .and_then(|v| v.parse::<u64>().ok())
            .filter(|secs| *secs > 0);

        let (api_key, model, base_url) = match kind {
            ProviderKind::OpenAi => (
                var("OPENAI_API_KEY"),
                var("OPENAI_MODEL").unwrap_or_else(|| OPENAI_DEFAULT_MODEL.to_string()),
                var("OPENAI_API_BASE"),
            ),
            ProviderKind::Groq => (
                var("GROQ_API_KEY"),
                var("GROQ_MODEL").unwrap_or_else(|| GROQ_DEFAULT_MODEL.to_string()),
                var("GROQ_API_BASE"),
            ),
            ProviderKind::LmStudio => (
                None,
                var("LMSTUDIO_MODEL")
                    .or_else(|| var("OLLAMA_MODEL"))
                    .unwrap_or_else(|| LMSTUDIO_DEFAULT_MODEL.to_string()),
                Some(
                    var("LMSTUDIO_URL")
                        .or_else(|| var("OLLAMA_URL"))
                        .unwrap_or_else(|| LMSTUDIO_DEFAULT_URL.to_string()),
                ),
            ),
            ProviderKind::Ollama => (
                None,
                var("OLLAMA_MODEL").unwrap_or_else(|| OLLAMA_DEFAULT_MODEL.to_string()),
                Some(var("OLLAMA_URL").unwrap_or_else(|| OLLAMA_DEFAULT_URL.to_string())),
            ),
        };

        Self {
            kind,
            api_key,
            model,
            base_url,
            timeout_secs,
        }
    }
}
