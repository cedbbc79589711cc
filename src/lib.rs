pub mod cli;
pub mod config;
pub mod crawl;
pub mod database;
pub mod error;
pub mod export;
pub mod mcp;
pub mod storage;
pub mod utils;

pub use cli::{GuiProbe, LockDetector, ProcessTableProbe, resolve_cli_path};
pub use config::{SpiderConfig, SpiderConfigBuilder};
pub use crawl::{CrawlLauncher, CrawlRequest, CrawlStatus, CrawlStatusReport};
pub use database::{CrawlDatabase, CrawlEntry};
pub use error::{ErrorKind, SpiderError, SpiderResult};
pub use export::{CsvPage, ExportDriver, ExportResult, ExportSpec, read_csv};
pub use storage::{StorageJanitor, StorageSummary};

// MCP server
pub use mcp::SeoSpiderServer;
