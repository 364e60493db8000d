//! sitesnap server entry point.
//!
//! This is the main binary that boots the MCP server on stdio transport.
//! Logging goes to stderr to avoid interfering with the JSON-RPC protocol on stdout.

use std::sync::Arc;

use anyhow::Result;
use rmcp::service::serve_server;
use rmcp::transport::io::stdio;
use sitesnap_client::{FetchClient, FetchConfig};
use sitesnap_core::{AppConfig, CacheDb, RecordSchema, Resolver, TimedStore};
use tracing_subscriber::EnvFilter;

mod handler;
mod tools;
mod validator;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .json()
        .init();

    let config = AppConfig::load()?;

    let schema = RecordSchema::new(config.table.clone(), config.field_names.clone())?;
    let db = CacheDb::open(&config.db_path, schema).await?;
    let store = TimedStore::new(db, config.store_timeout());
    let fetcher = FetchClient::new(FetchConfig::from(&config))?;
    let resolver = Resolver::new(Arc::new(store), Arc::new(fetcher), config.resolver_config());

    tracing::info!(
        db_path = %config.db_path.display(),
        recency_window_secs = config.recency_window_secs,
        max_urls_count = config.max_urls_count,
        "Starting mcp-sitesnap server on stdio transport"
    );

    let handler = handler::SitesnapServer::new(resolver, config);
    let transport = stdio();
    let server = serve_server(handler, transport).await?;

    server.waiting().await?;

    tracing::info!("server stopped");

    Ok(())
}
