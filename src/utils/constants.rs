//! Shared configuration constants for the SEO Spider tools
//!
//! Default values used throughout the codebase so limits and timeouts live in
//! one place instead of as magic numbers.

/// Environment variable naming the Screaming Frog CLI launcher
pub const CLI_PATH_ENV: &str = "SF_CLI_PATH";

/// Default scratch retention: 1 hour
///
/// Exported CSVs older than this are removed by the storage janitor.
pub const DEFAULT_EXPORT_TTL_SECS: u64 = 3600;

/// Default export timeout: 10 minutes
///
/// Exports load the whole crawl into the CLI before writing CSVs, which
/// takes minutes for crawls in the 100k URL range.
pub const DEFAULT_EXPORT_TIMEOUT_SECS: u64 = 600;

/// Default timeout for short CLI invocations (`--help`, `--delete-crawl`)
pub const DEFAULT_COMMAND_TIMEOUT_SECS: u64 = 60;

/// Interval between periodic scratch cleanups
pub const DEFAULT_CLEANUP_INTERVAL_SECS: u64 = 600;

/// Maximum number of crawls running at once
pub const DEFAULT_MAX_CONCURRENT_CRAWLS: usize = 2;

/// Maximum number of export directories kept in the scratch root
pub const DEFAULT_MAX_ACTIVE_EXPORTS: usize = 10;

/// Upper bound accepted for `max_urls`
pub const DEFAULT_MAX_CRAWL_SIZE: u32 = 100_000;

/// Default page size for `read_crawl_data`
pub const DEFAULT_READ_LIMIT: usize = 100;

/// Hard cap on rows returned by one `read_crawl_data` call
pub const MAX_READ_LIMIT: usize = 1000;

/// Cells longer than this are truncated in `read_crawl_data` output
pub const CELL_DISPLAY_MAX_CHARS: usize = 80;

/// Output lines kept per subprocess for failure diagnostics
pub const OUTPUT_TAIL_LINES: usize = 50;

/// Output lines included in a crawl failure report
pub const CRAWL_FAILURE_TAIL_LINES: usize = 20;

/// Output lines included in an export or delete failure report
pub const COMMAND_FAILURE_TAIL_LINES: usize = 15;

/// Prefix of export directories created under the scratch root
pub const EXPORT_DIR_PREFIX: &str = "export-";

/// Prefix of crawl handle ids
pub const CRAWL_ID_PREFIX: &str = "crawl-";

/// Extension required for `--config` files
pub const CONFIG_FILE_EXTENSION: &str = "seospiderconfig";

/// Tabs suggested in the export reference as a first audit
pub const RECOMMENDED_EXPORT_TABS: &str = "Internal:All,Response Codes:All,Page Titles:All,\
Meta Description:All,H1:All,H2:All,Images:All,Canonicals:All,Directives:All";
