//! MCP (Model Context Protocol) server for the Screaming Frog SEO Spider
//!
//! ## Tools
//!
//! | Tool | Blocks | Touches the crawl database |
//! |------|--------|----------------------------|
//! | `sf_check` | `--help` run | no |
//! | `crawl_site` | no, returns a handle | saves on completion |
//! | `crawl_status` | no | reads |
//! | `list_crawls` | no | reads |
//! | `export_crawl` | up to the export timeout | loads |
//! | `read_crawl_data` | no | no, reads scratch CSVs |
//! | `delete_crawl` | up to the command timeout | deletes |
//! | `storage_summary` | no | reads |
//!
//! `crawl_site`, `export_crawl` and `delete_crawl` refuse to run while the
//! Screaming Frog GUI is open.
//!
//! ## Resources
//!
//! `screaming-frog://export-reference` lists every export tab, bulk export and
//! report name accepted by `export_crawl`.
//!
//! ## Errors
//!
//! Failures are returned as `ErrorData` whose `data` holds
//! `{"kind": ..., "remediation": ...}`; see [`to_mcp_error`].

pub mod errors;
pub mod resources;
pub mod server;
pub mod types;
pub mod validation;

pub use errors::to_mcp_error;
pub use server::SeoSpiderServer;
pub use types::{
    CrawlSiteArgs, CrawlStatusArgs, DeleteCrawlArgs, ExportCrawlArgs, ListCrawlsOutput,
    ReadCrawlDataArgs,
};
pub use validation::ErrorContext;
