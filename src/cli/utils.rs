use crate::cli::commands::LogFormat;
use crate::llm::ProviderKind;
use anyhow::{anyhow, Result};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// `RUST_LOG` wins unless `--verbose` forces debug output
fn log_filter(verbose: bool) -> EnvFilter {
    if verbose {
        return EnvFilter::new("debug");
    }
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
}

pub fn init_logging(verbose: bool, log_format: LogFormat) -> Result<()> {
    let fmt_layer = match log_format {
        LogFormat::Json => fmt::layer().json().flatten_event(true).with_current_span(false).boxed(),
        LogFormat::Text => fmt::layer().with_target(false).compact().boxed(),
    };

    tracing_subscriber::registry()
        .with(log_filter(verbose))
        .with(fmt_layer)
        .try_init()
        .map_err(|e| anyhow!("Failed to initialize tracing subscriber: {}", e))
}

pub fn print_info() {
    println!("control-advisor v{}", env!("CARGO_PKG_VERSION"));
    println!("{}", env!("CARGO_PKG_DESCRIPTION"));
    println!();
    let tags: Vec<&str> = ProviderKind::supported_tags().collect();
    println!("LLM providers (LLM_PROVIDER): {}", tags.join(", "));
    println!("Endpoints: GET /api/health, POST /api/analyze-control, POST /api/test-connection");
    println!();
    println!("{} | {}", env!("CARGO_PKG_LICENSE"), env!("CARGO_PKG_REPOSITORY"));
}

/// Show only the last four characters of a secret
pub fn mask_secret(secret: &str) -> String {
    let chars: Vec<char> = secret.chars().collect();
    if chars.len() <= 8 {
        return "*".repeat(chars.len());
    }
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{}{}", "*".repeat(chars.len() - 4), tail)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mask_secret() {
        assert_eq!(mask_secret(""), "");
        assert_eq!(mask_secret("short"), "*****");
        assert_eq!(mask_secret("sk-1234567890abcd"), "*************abcd");
    }

    #[test]
    fn test_verbose_forces_debug_filter() {
        assert_eq!(log_filter(true).to_string(), "debug");
    }
}
