//! Daemon entry point for the KIS API search MCP server.
//!
//! Loads configuration from CLI arguments and the environment, loads the API
//! catalog, and serves the MCP protocol over stdio or streamable HTTP.

mod config;

use kis_core::control::ApiSearcher;
use kis_core::services::CatalogHandle;
use kis_core::source::{SourceFetcher, SourceFetcherConfig};
use kis_mcp::KisMcp;
use kis_mcp::server::{McpHttpServerConfig, serve_stdio, serve_streamable_http};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::config::KisConfig;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    // stdout carries the stdio transport, so logs go to stderr.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let config = KisConfig::from_args()?;

    let catalog = CatalogHandle::new();
    let outcome = catalog.load(&config.data_path);
    if !outcome.is_loaded() {
        warn!("starting without a catalog; searches will report an error");
    }

    let fetcher = SourceFetcher::new(
        SourceFetcherConfig::new(config.source_base_url.clone())
            .with_timeout(config.fetch_timeout)
            .with_request_delay(config.fetch_delay),
    )?;
    let service = KisMcp::new(ApiSearcher::new(catalog), fetcher);

    if config.enable_stdio {
        serve_stdio(service).await?;
    } else if config.mcp_serve {
        serve_streamable_http(service, McpHttpServerConfig::new(config.mcp_http_addr)).await?;
    } else {
        info!("no transport enabled; exiting");
    }
    Ok(())
}
