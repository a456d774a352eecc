//! Fahrplan MCP server
//!
//! Speaks JSON-RPC/MCP on stdin/stdout; all logging goes to stderr so
//! the protocol channel stays clean.

use std::sync::Arc;

use presentation_http::AppConfig;
use presentation_mcp::McpServer;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use transit::{DbRestClient, TransitService};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // stdout carries the protocol; logs must go to stderr
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "presentation_mcp=info,transit=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = AppConfig::load().unwrap_or_else(|e| {
        tracing::warn!("Failed to load config, using defaults: {}", e);
        AppConfig::default()
    });
    config
        .transit
        .validate()
        .map_err(|e| anyhow::anyhow!("Invalid transit configuration: {e}"))?;

    info!(
        upstream = %config.transit.base_url,
        "Fahrplan MCP server v{} starting on stdio",
        env!("CARGO_PKG_VERSION")
    );

    let client = DbRestClient::new(&config.transit)
        .map_err(|e| anyhow::anyhow!("Failed to initialize transit client: {e}"))?;
    let service = TransitService::new(Arc::new(client));

    let server = McpServer::new(Arc::new(service));
    server.run(tokio::io::stdin(), tokio::io::stdout()).await?;

    info!("stdin closed, shutting down");
    Ok(())
}
