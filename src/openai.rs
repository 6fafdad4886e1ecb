//! OpenAI client configuration with sensible defaults.

use crate::error::{Result, SvarError};
use async_openai::{config::OpenAIConfig, Client};
use std::time::Duration;

/// Environment variable holding the API key.
pub const API_KEY_VAR: &str = "OPENAI_API_KEY";

/// Create an OpenAI client whose requests are bounded by `timeout`.
///
/// Every chat and embedding call in the service goes through a client built
/// here, so no external call can hang past the configured timeout.
pub fn create_client(timeout: Duration) -> Client<OpenAIConfig> {
    let http_client = reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .expect("Failed to create HTTP client");

    Client::with_config(OpenAIConfig::default()).with_http_client(http_client)
}

/// Verify the API key is present in the environment.
///
/// Called once at startup; the process refuses to start without it.
pub fn require_api_key() -> Result<()> {
    match std::env::var(API_KEY_VAR) {
        Ok(key) if !key.trim().is_empty() => Ok(()),
        _ => Err(SvarError::Config(format!(
            "{} is not set. Export it or add it to a .env file before starting the server.",
            API_KEY_VAR
        ))),
    }
}
