use anyhow::Result;
use clap::Parser;
use control_advisor::cli::commands::{Cli, Commands};
use control_advisor::cli::handlers::{
    handle_config_command, handle_serve_command, handle_test_connection_command,
};
use control_advisor::cli::utils::{init_logging, print_info};

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Initialize logging
    init_logging(cli.verbose, cli.log_format)?;

    // Execute command
    match cli.command {
        Commands::Serve { port } => handle_serve_command(port).await,

        Commands::TestConnection => handle_test_connection_command().await,

        Commands::Config => handle_config_command(),

        Commands::Info => {
            print_info();
            Ok(())
        }
    }
}
