// Entry point for the Drive chat assistant.
//
// **Architecture Overview:**
// - `core/` = Link parsing, aggregation, prompt building, chat sessions
// - `infra/` = Implementations of core traits (Drive REST, OAuth, chat API)
// - `cli/` = Terminal adapter
//
// This file's job is to:
// 1. Load configuration
// 2. Check the Drive credentials
// 3. Wire the session together (dependency injection)
// 4. Hand control to the REPL

// These attrs point each module declaration at a more descriptive root file
// so we don't end up with several mod.rs files that all look the same.
#[path = "cli/cli_layer.rs"]
mod cli;
mod config;
#[path = "core/core_layer.rs"]
mod core;
#[path = "infra/infra_layer.rs"]
mod infra;

use crate::config::{AppConfig, AuthConfig};
use crate::core::ai::ChatSession;
use crate::core::auth::{AuthError, AuthProvider};
use crate::infra::ai::OpenAiClient;
use crate::infra::auth::{ServiceAccountAuth, StaticTokenAuth};
use crate::infra::drive::GoogleDriveClient;
use anyhow::Context;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

async fn build_auth_provider(auth: &AuthConfig) -> Result<Box<dyn AuthProvider>, AuthError> {
    let provider: Box<dyn AuthProvider> = match auth {
        AuthConfig::AccessToken(token) => Box::new(StaticTokenAuth::new(token.clone())),
        AuthConfig::ServiceAccountFile(path) => {
            Box::new(ServiceAccountAuth::from_file(path).await?)
        }
        AuthConfig::ServiceAccountJson(json) => Box::new(ServiceAccountAuth::from_json(json)?),
    };
    Ok(provider)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logs go to stderr so they never interleave with the conversation.
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    // Load environment variables from .env file (if it exists)
    dotenv::dotenv().ok();

    let config = AppConfig::from_env().context("Invalid configuration")?;

    // ========================================================================
    // DEPENDENCY INJECTION
    // ========================================================================

    let auth = build_auth_provider(&config.auth)
        .await
        .context("Failed to set up Google authentication")?;
    // Fail fast on bad credentials. The session asks again before each Drive
    // operation, so service account tokens are refreshed as they expire.
    auth.request_token()
        .await
        .context("Failed to obtain a Google Drive access token")?;

    let drive = Arc::new(GoogleDriveClient::new());
    let ai_client = OpenAiClient::new(config.openai_api_key.clone(), &config.openai_base_url);

    let session = ChatSession::new(
        ai_client,
        drive,
        config.aggregator.clone(),
        config.session.clone(),
        auth,
    );

    tracing::info!(model = %config.session.ai.model, "Chat session ready");

    cli::run(&session, config.initial_link.clone())
        .await
        .context("Terminal I/O failed")?;

    Ok(())
}
