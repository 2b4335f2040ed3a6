use crate::config::GatewayConfig;
use crate::server::run_server;
use anyhow::Result;

pub async fn handle_serve_command(port: Option<u16>) -> Result<()> {
    let mut config = GatewayConfig::from_env();
    if let Some(port) = port {
        config.server.port = port;
    }

    run_server(config).await
}
