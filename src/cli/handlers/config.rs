use crate::cli::utils::mask_secret;
use crate::config::GatewayConfig;
use anyhow::Result;
use colored::Colorize;

pub fn handle_config_command() -> Result<()> {
    let config = GatewayConfig::from_env();
    let provider = &config.provider;
    let server = &config.server;

    println!("🔧 control-advisor Configuration");
    println!("═══════════════════════════════════════");
    println!();

    println!("🤖 LLM Provider:");
    println!("  • Provider: {}", provider.kind.as_str());
    println!("  • Model: {}", provider.model);
    match &provider.base_url {
        Some(url) => println!("  • Base URL: {}", url),
        None => println!("  • Base URL: provider default"),
    }
    match &provider.api_key {
        Some(key) => println!("  • API key: ✅ {}", mask_secret(key)),
        None if provider.kind.requires_api_key() => {
            println!("  • API key: {}", "❌ Not set (required)".red())
        }
        None => println!("  • API key: not required"),
    }
    match provider.timeout_secs {
        Some(secs) => println!("  • Request timeout: {}s", secs),
        None => println!("  • Request timeout: none"),
    }
    println!();

    println!("🌐 Server:");
    println!("  • Port: {}", server.port);
    if server.api_keys.is_empty() {
        println!("  • Auth: {}", "DISABLED (no API_KEYS set)".yellow());
    } else {
        println!("  • Auth: enabled ({} key(s))", server.api_keys.len());
    }
    println!("  • Rate limit: {} requests/minute", server.rate_limit_rpm);

    Ok(())
}
