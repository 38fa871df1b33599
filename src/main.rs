mod config;
mod error;
mod filter;
mod format;
mod llm_client;
mod log_entry;
mod pipeline;
mod prompts;
mod samples;
mod session;
mod web;

use anyhow::{Context, Result};
use clap::Parser;
use log::{info, warn};
use simple_logger::SimpleLogger;
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command-line arguments
    let cli = config::Cli::parse();

    // Load configuration
    let config = config::load_config(&cli)?;

    SimpleLogger::new()
        .with_level(config.log_level()?)
        .env()
        .init()
        .map_err(|e| anyhow::anyhow!("Failed to initialize logger: {}", e))?;

    info!("Starting satlog-analyzer");
    info!(
        "Configuration loaded: model {} at {}",
        config.model, config.api_url
    );

    let api_key = config.api_key().unwrap_or_else(|| {
        warn!(
            "{} is not set; requests to the text-generation service will fail",
            config.api_key_env
        );
        String::new()
    });

    let client = llm_client::ChatCompletionClient::new(&config, api_key)
        .context("Failed to build HTTP client")?;

    let state = web::AppState {
        sessions: session::SessionStore::new(),
        generator: Arc::new(client),
    };

    web::start_server(state, &config.listen_addr).await
}
