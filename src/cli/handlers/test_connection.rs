use crate::analysis::ControlAnalysisService;
use crate::config::GatewayConfig;
use crate::llm::create_provider;
use anyhow::{Context, Result};
use colored::Colorize;

pub async fn handle_test_connection_command() -> Result<()> {
    let config = GatewayConfig::from_env();

    println!("🔍 LLM Connectivity Test");
    println!("═══════════════════════════════════════");

    let provider = create_provider(&config.provider).context("Failed to initialize LLM provider")?;
    println!("Provider: {} (model: {})", provider.name(), provider.model());

    let service = ControlAnalysisService::new(provider);
    match service.test_connection().await {
        Ok(result) => {
            println!("Status:   {}", "✅ Connected".green());
            println!("Reply:    {}", result.ai_suggestion);
            Ok(())
        }
        Err(e) => {
            println!("Status:   {}", "❌ Failed".red());
            Err(e.into())
        }
    }
}
