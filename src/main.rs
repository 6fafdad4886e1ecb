//! Svar CLI entry point.

use anyhow::Result;
use clap::Parser;
use svar::cli::{Cli, Commands, Output};
use svar::config::Settings;
use svar::{openai, server};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env before anything reads the environment
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    // Initialize logging
    let log_level = match cli.verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };

    tracing_subscriber::registry()
        .with(EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| format!("svar={}", log_level)),
        ))
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    // The LLM key is required for every pipeline stage past transcript
    // fetching; refuse to start without it.
    if let Err(e) = openai::require_api_key() {
        Output::error(&e.to_string());
        std::process::exit(1);
    }

    // Load configuration
    let settings = match &cli.config {
        Some(path) => Settings::load_from(Some(&std::path::PathBuf::from(path)))?,
        None => Settings::load()?,
    };

    // Execute command
    match &cli.command {
        Commands::Serve { host, port } => {
            let host = host.clone().unwrap_or_else(|| settings.server.host.clone());
            let port = (*port).unwrap_or(settings.server.port);
            server::run_serve(&host, port, settings).await?;
        }
    }

    Ok(())
}
