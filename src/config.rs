use crate::llm::ProviderSettings;
use std::collections::HashSet;
use std::env;

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_RATE_LIMIT_RPM: u32 = 30;

/// Settings for the HTTP surface
#[derive(Debug, Clone, PartialEq)]
pub struct ServerSettings {
    pub port: u16,

    /// Accepted bearer tokens; empty disables authentication
    pub api_keys: HashSet<String>,

    /// Requests allowed per client per minute
    pub rate_limit_rpm: u32,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            api_keys: HashSet::new(),
            rate_limit_rpm: DEFAULT_RATE_LIMIT_RPM,
        }
    }
}

impl ServerSettings {
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut settings = Self::default();

        if let Some(port) = lookup("PORT").and_then(|v| v.trim().parse::<u16>().ok()) {
            settings.port = port;
        }

        if let Some(keys) = lookup("API_KEYS") {
            settings.api_keys = parse_api_keys(&keys);
        }

        if let Some(rpm) = lookup("RATE_LIMIT_RPM").and_then(|v| v.trim().parse::<u32>().ok()) {
            settings.rate_limit_rpm = rpm;
        }

        settings
    }
}

/// Split a comma-separated key list, dropping blanks
pub fn parse_api_keys(raw: &str) -> HashSet<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|k| !k.is_empty())
        .map(str::to_string)
        .collect()
}

/// Everything the gateway needs, resolved once at startup
#[derive(Debug, Clone, PartialEq)]
pub struct GatewayConfig {
    pub provider: ProviderSettings,
    pub server: ServerSettings,
}

impl GatewayConfig {
    /// Load configuration from `.env` (if present) and the environment
    pub fn from_env() -> Self {
        let _ = dotenv::dotenv();
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        Self {
            provider: ProviderSettings::from_lookup(&lookup),
            server: ServerSettings::from_lookup(&lookup),
        }
    }
}
