//! # Chat Relay
//!
//! A real-time multi-user chat relay over WebSocket.
//!
//! This is the application entry point that initializes:
//! - Tracing/logging subsystem
//! - Configuration loading
//! - HTTP/WebSocket server

use anyhow::Result;
use tracing::info;

use chat_relay::config::Settings;
use chat_relay::startup::Application;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing subscriber for structured logging
    chat_relay::telemetry::init_tracing();

    info!("Starting Chat Relay...");

    // Load configuration from environment and config files
    let settings = Settings::load()?;
    info!(
        host = %settings.server.host,
        port = %settings.server.port,
        environment = %settings.environment,
        "Configuration loaded"
    );

    // Build and run the application
    let application = Application::build(settings).await?;

    info!("Server ready to accept connections");
    application.run_until_stopped().await?;

    Ok(())
}
