// Category Stdio Server: Screaming Frog SEO Spider Tools
//
// This binary serves the SEO Spider tools over the MCP stdio transport.
// stdout carries protocol frames, so all logging goes to stderr.

use anyhow::{Context, Result};
use kodegen_tools_seo_spider::utils::ensure_private_dir;
use kodegen_tools_seo_spider::{SeoSpiderServer, SpiderConfig};
use rmcp::ServiceExt;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // .env is optional; real environment variables win
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();

    let config = Arc::new(SpiderConfig::from_env().context("Invalid SF_* configuration")?);
    ensure_private_dir(config.export_root()).with_context(|| {
        format!("Failed to create export directory {}", config.export_root().display())
    })?;
    tracing::info!(
        data_dir = %config.data_dir().display(),
        export_root = %config.export_root().display(),
        "Starting Screaming Frog SEO Spider MCP server"
    );

    let server = SeoSpiderServer::new(Arc::clone(&config));

    // Cleanup tasks start before serving; the first pass runs immediately
    let _cleanup = server.janitor().start_cleanup_task();

    let service = server
        .serve(rmcp::transport::stdio())
        .await
        .context("Failed to start MCP stdio transport")?;
    service.waiting().await?;

    Ok(())
}
