//! mcp-webfetch server entry point.
//!
//! Boots the MCP server on stdio transport with a background sweeper for
//! expired continuations. Logging goes to stderr to avoid interfering with
//! the JSON-RPC protocol on stdout.

use std::sync::Arc;

use anyhow::Result;
use rmcp::service::serve_server;
use rmcp::transport::io::stdio;
use tracing_subscriber::EnvFilter;
use webfetch_client::{FetchConfig, ReqwestTransport, WebFetcher};
use webfetch_core::AppConfig;

mod handler;
mod tools;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .json()
        .init();

    let config = AppConfig::load()?;
    let transport = ReqwestTransport::new(FetchConfig { max_redirects: config.max_redirects })?;
    let fetcher = WebFetcher::builder().transport(transport).config(&config).build()?;
    let sweeper = fetcher.store().spawn_sweeper(config.sweep_interval());

    tracing::info!(
        ttl_secs = config.continuation_ttl_secs,
        sweep_secs = config.sweep_interval_secs,
        "Starting mcp-webfetch server on stdio transport"
    );

    let handler = handler::McpWebFetchServer::new(Arc::new(fetcher));
    let server = serve_server(handler, stdio()).await?;

    server.waiting().await?;
    sweeper.shutdown().await;

    Ok(())
}
