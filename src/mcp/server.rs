//! MCP server exposing the Screaming Frog tools over rmcp

use rmcp::handler::server::router::tool::ToolRouter;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::{
    CallToolResult, Content, Implementation, ListResourcesResult, PaginatedRequestParam,
    ReadResourceRequestParam, ReadResourceResult, ServerCapabilities, ServerInfo,
};
use rmcp::service::RequestContext;
use rmcp::{ErrorData as McpError, RoleServer, ServerHandler, tool, tool_handler, tool_router};
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::debug;

use super::errors::to_mcp_error;
use super::resources;
use super::types::{
    CrawlSiteArgs, CrawlStatusArgs, DeleteCrawlArgs, ExportCrawlArgs, ListCrawlsOutput,
    ReadCrawlDataArgs,
};
use crate::cli::{LockDetector, check_installation};
use crate::config::SpiderConfig;
use crate::crawl::{CrawlLauncher, CrawlRequest};
use crate::database::CrawlDatabase;
use crate::error::SpiderResult;
use crate::export::{ExportDriver, read_csv, resolve_export_path};
use crate::storage::StorageJanitor;
use crate::utils::DEFAULT_READ_LIMIT;

const INSTRUCTIONS: &str = "Drives the Screaming Frog SEO Spider CLI. Typical flow: sf_check, \
crawl_site, poll crawl_status until completed, list_crawls, export_crawl, then page through the \
CSVs with read_crawl_data. The crawl database accepts one accessor at a time: if the Screaming \
Frog GUI is open, exports and deletes fail until it is closed. Export names are listed in the \
screaming-frog://export-reference resource.";

/// MCP server over the Screaming Frog CLI and crawl database
#[derive(Clone)]
pub struct SeoSpiderServer {
    config: Arc<SpiderConfig>,
    lock: LockDetector,
    database: CrawlDatabase,
    launcher: CrawlLauncher,
    exports: ExportDriver,
    janitor: Arc<StorageJanitor>,
    tool_router: ToolRouter<Self>,
}

fn json_result<T: Serialize>(value: &T) -> Result<CallToolResult, McpError> {
    Ok(CallToolResult::success(vec![Content::json(value)?]))
}

fn respond<T: Serialize>(operation: &str, result: SpiderResult<T>) -> Result<CallToolResult, McpError> {
    match result {
        Ok(value) => json_result(&value),
        Err(e) => {
            debug!(operation, kind = %e.kind(), "Tool call failed: {e}");
            Err(to_mcp_error(operation, &e))
        }
    }
}

#[tool_router]
impl SeoSpiderServer {
    /// Server backed by the OS process table for GUI detection
    #[must_use]
    pub fn new(config: Arc<SpiderConfig>) -> Self {
        Self::with_lock_detector(config, LockDetector::system())
    }

    #[must_use]
    pub fn with_lock_detector(config: Arc<SpiderConfig>, lock: LockDetector) -> Self {
        Self {
            database: CrawlDatabase::new(config.data_dir()),
            launcher: CrawlLauncher::new(Arc::clone(&config), lock.clone()),
            exports: ExportDriver::new(Arc::clone(&config), lock.clone()),
            janitor: Arc::new(StorageJanitor::new(Arc::clone(&config), lock.clone())),
            config,
            lock,
            tool_router: Self::tool_router(),
        }
    }

    #[must_use]
    pub fn janitor(&self) -> Arc<StorageJanitor> {
        Arc::clone(&self.janitor)
    }

    #[tool(
        description = "Verify that Screaming Frog SEO Spider is installed and the CLI is reachable. \
                       Returns the CLI path, version, licence status and whether the GUI is running.",
        annotations(read_only_hint = true, destructive_hint = false)
    )]
    async fn sf_check(&self) -> Result<CallToolResult, McpError> {
        respond(
            "Check installation",
            check_installation(&self.config, &self.lock).await,
        )
    }

    #[tool(
        description = "Start a headless crawl of a website in the background. Returns a crawl_id \
                       immediately; poll crawl_status until it reports completed or failed. The \
                       crawl is saved into Screaming Frog's database on completion. Fails if the \
                       Screaming Frog GUI is open.",
        annotations(read_only_hint = false, destructive_hint = false)
    )]
    async fn crawl_site(
        &self,
        Parameters(args): Parameters<CrawlSiteArgs>,
    ) -> Result<CallToolResult, McpError> {
        let request = CrawlRequest {
            url: args.url,
            max_urls: args.max_urls,
            config_file: args
                .config_file
                .filter(|f| !f.trim().is_empty())
                .map(PathBuf::from),
            label: args.label,
        };
        respond("Start crawl", self.launcher.start_crawl(request).await)
    }

    #[tool(
        description = "Report whether a crawl started with crawl_site is running, completed or \
                       failed, with elapsed seconds, the latest progress line and, on failure, the \
                       CLI output tail. A finished handle is reported once and then forgotten.",
        annotations(read_only_hint = true, destructive_hint = false)
    )]
    async fn crawl_status(
        &self,
        Parameters(args): Parameters<CrawlStatusArgs>,
    ) -> Result<CallToolResult, McpError> {
        respond("Crawl status", self.launcher.get_status(&args.crawl_id).await)
    }

    #[tool(
        description = "List crawls saved in Screaming Frog's database, most recent first, with id, \
                       path, modification time and size. Use the crawl_id with export_crawl or \
                       delete_crawl.",
        annotations(read_only_hint = true, destructive_hint = false)
    )]
    async fn list_crawls(&self) -> Result<CallToolResult, McpError> {
        let result = ListCrawlsOutput::collect(&self.database, &self.lock).await;
        respond("List crawls", result)
    }

    #[tool(
        description = "Export data from a saved crawl to CSV. Provide at least one of export_tabs \
                       (Tab:Filter pairs, e.g. 'Internal:All,Response Codes:4xx'), bulk_export \
                       (e.g. 'All Inlinks') or save_report (e.g. 'Crawl Overview'). Names are \
                       listed in the screaming-frog://export-reference resource. Blocks until \
                       the export finishes and returns the produced CSV paths with row counts. \
                       Fails if the Screaming Frog GUI is open.",
        annotations(read_only_hint = false, destructive_hint = false)
    )]
    async fn export_crawl(
        &self,
        Parameters(args): Parameters<ExportCrawlArgs>,
    ) -> Result<CallToolResult, McpError> {
        let result = self
            .exports
            .export_crawl(
                &args.crawl_id,
                args.export_tabs.as_deref(),
                args.bulk_export.as_deref(),
                args.save_report.as_deref(),
            )
            .await;
        respond("Export crawl", result)
    }

    #[tool(
        description = "Read rows from an exported CSV. path is a CSV path returned by \
                       export_crawl. Supports offset/limit pagination (limit default 100, max \
                       1000) and an optional case-insensitive substring filter on one column. \
                       Returns the page plus the total number of matching rows.",
        annotations(read_only_hint = true, destructive_hint = false)
    )]
    async fn read_crawl_data(
        &self,
        Parameters(args): Parameters<ReadCrawlDataArgs>,
    ) -> Result<CallToolResult, McpError> {
        let filter_value = args.filter_text();
        let result = resolve_export_path(self.config.export_root(), &args.path).and_then(|path| {
            read_csv(
                &path,
                args.offset.unwrap_or(0),
                args.limit.unwrap_or(DEFAULT_READ_LIMIT),
                args.filter_column.as_deref(),
                filter_value.as_deref(),
            )
        });
        respond("Read crawl data", result)
    }

    #[tool(
        description = "Permanently delete a saved crawl from Screaming Frog's database. This \
                       cannot be undone: confirm with the user first. Fails if the Screaming Frog \
                       GUI is open.",
        annotations(read_only_hint = false, destructive_hint = true)
    )]
    async fn delete_crawl(
        &self,
        Parameters(args): Parameters<DeleteCrawlArgs>,
    ) -> Result<CallToolResult, McpError> {
        respond("Delete crawl", self.janitor.delete_crawl(&args.crawl_id).await)
    }

    #[tool(
        description = "Report disk usage of Screaming Frog's crawl database and of the temporary \
                       export directory, with a per-crawl breakdown.",
        annotations(read_only_hint = true, destructive_hint = false)
    )]
    async fn storage_summary(&self) -> Result<CallToolResult, McpError> {
        respond("Storage summary", self.janitor.storage_summary())
    }
}

#[tool_handler]
impl ServerHandler for SeoSpiderServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(INSTRUCTIONS.to_string()),
            capabilities: ServerCapabilities::builder()
                .enable_tools()
                .enable_resources()
                .build(),
            server_info: Implementation::from_build_env(),
            ..Default::default()
        }
    }

    async fn list_resources(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListResourcesResult, McpError> {
        Ok(ListResourcesResult::with_all_items(resources::list()))
    }

    async fn read_resource(
        &self,
        request: ReadResourceRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> Result<ReadResourceResult, McpError> {
        resources::read(&request.uri)
    }
}
