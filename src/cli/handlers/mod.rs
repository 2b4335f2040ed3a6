pub mod config;
pub mod serve;
pub mod test_connection;

// Re-export handler functions for convenience
pub use config::handle_config_command;
pub use serve::handle_serve_command;
pub use test_connection::handle_test_connection_command;
