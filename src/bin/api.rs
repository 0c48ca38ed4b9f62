//! Mock Credential API Server
//!
//! Run with: cargo run --bin bi-tool-api
//!
//! # Configuration
//!
//! Read from `config.toml` (see `bi-tool config`), then environment:
//! - `BI_TOOL_API_HOST`: Host to bind to (default: 0.0.0.0)
//! - `BI_TOOL_API_PORT`: Port to listen on (default: 8082)
//! - `BI_TOOL_DB_PATH`: JSON file to persist users to (default: in-memory)
//! - `RUST_LOG`: Log filter (default: bi_tool=info,tower_http=debug)

use anyhow::Context;
use bi_tool::api::{serve, AppState};
use bi_tool::config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::load_default();
    bi_tool::telemetry::init_tracing(&config.logging)
        .context("Failed to install tracing subscriber")?;

    tracing::info!("Starting mock credential API v{}", env!("CARGO_PKG_VERSION"));

    match &config.api.db_path {
        Some(path) => tracing::info!("User database: {}", path),
        None => tracing::info!("User database: in-memory (set BI_TOOL_DB_PATH to persist)"),
    }

    let state = AppState::from_config(config.api.clone())
        .await
        .context("Failed to open user database")?;

    serve(state, &config.api)
        .await
        .with_context(|| format!("Server on {} failed", config.api.addr()))?;

    tracing::info!("Mock credential API stopped");
    Ok(())
}
