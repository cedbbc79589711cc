//! Argument and output types of the MCP tools

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::cli::LockDetector;
use crate::database::{CrawlDatabase, CrawlEntry};
use crate::error::SpiderResult;

/// Arguments for `crawl_site`
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct CrawlSiteArgs {
    /// Seed URL (http or https, public host)
    pub url: String,
    /// Stop after this many URLs (1 to the configured maximum)
    #[serde(default)]
    pub max_urls: Option<i64>,
    /// Path to a `.seospiderconfig` file exported from the GUI
    #[serde(default)]
    pub config_file: Option<String>,
    /// Human-readable label; defaults to the URL host
    #[serde(default)]
    pub label: Option<String>,
}

/// Arguments for `crawl_status`
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct CrawlStatusArgs {
    /// Handle id returned by `crawl_site`
    #[serde(alias = "handle_id")]
    pub crawl_id: String,
}

/// Arguments for `export_crawl`
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct ExportCrawlArgs {
    /// Crawl id from `list_crawls`
    #[serde(alias = "db_id")]
    pub crawl_id: String,
    /// Comma-separated `Tab:Filter` pairs, e.g. `Internal:All,Response Codes:4xx`
    #[serde(default)]
    pub export_tabs: Option<String>,
    /// Comma-separated bulk exports, e.g. `All Inlinks,All Outlinks`
    #[serde(default)]
    pub bulk_export: Option<String>,
    /// Comma-separated reports, e.g. `Crawl Overview`
    #[serde(default)]
    pub save_report: Option<String>,
}

/// Arguments for `read_crawl_data`
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct ReadCrawlDataArgs {
    /// CSV path from `export_crawl`, absolute or relative to the export directory
    pub path: String,
    /// Rows to skip after filtering
    #[serde(default)]
    pub offset: Option<usize>,
    /// Rows to return (default 100, max 1000)
    #[serde(default)]
    pub limit: Option<usize>,
    /// Column to filter on
    #[serde(default)]
    pub filter_column: Option<String>,
    /// Case-insensitive substring to match in `filter_column`; numbers are accepted
    #[serde(default)]
    pub filter_value: Option<serde_json::Value>,
}

impl ReadCrawlDataArgs {
    /// `filter_value` as text, whatever JSON scalar the client sent
    #[must_use]
    pub fn filter_text(&self) -> Option<String> {
        match self.filter_value.as_ref()? {
            serde_json::Value::Null => None,
            serde_json::Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }
}

/// Arguments for `delete_crawl`
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct DeleteCrawlArgs {
    /// Crawl id from `list_crawls`
    #[serde(alias = "db_id")]
    pub crawl_id: String,
}

/// Output of `list_crawls`
#[derive(Debug, Clone, Serialize)]
pub struct ListCrawlsOutput {
    pub data_dir: PathBuf,
    pub count: usize,
    pub crawls: Vec<CrawlEntry>,
    /// Set while the GUI is running
    pub warning: Option<String>,
}

impl ListCrawlsOutput {
    /// List the database, attaching the GUI warning when it is open.
    ///
    /// Never invokes the Screaming Frog CLI.
    ///
    /// # Errors
    ///
    /// Returns an IO error if the data directory cannot be read.
    pub async fn collect(database: &CrawlDatabase, lock: &LockDetector) -> SpiderResult<Self> {
        let crawls = database.list_crawls()?;
        Ok(Self {
            data_dir: database.data_dir().to_path_buf(),
            count: crawls.len(),
            crawls,
            warning: lock.gui_warning().await,
        })
    }
}
