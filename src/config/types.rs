//! Core configuration types for the SEO Spider tools

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use super::builder::SpiderConfigBuilder;

/// Main configuration struct for the Screaming Frog integration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpiderConfig {
    /// Explicitly configured CLI launcher (`SF_CLI_PATH`).
    ///
    /// `None` means "use the per-OS default table". Resolution happens at call
    /// time so an installation added after startup is picked up.
    pub(crate) cli_path: Option<PathBuf>,

    /// Screaming Frog's crawl database directory
    /// (`~/.ScreamingFrogSEOSpider/ProjectInstanceData` by default).
    pub(crate) data_dir: PathBuf,

    /// Scratch root holding one subdirectory per export.
    ///
    /// **INVARIANT:** Always an absolute path (normalized in builder).
    pub(crate) export_root: PathBuf,

    /// Budget for one `--load-crawl` export run.
    ///
    /// Default: 600 seconds
    pub(crate) export_timeout: Duration,

    /// Budget for short CLI invocations (`--help`, `--delete-crawl`).
    ///
    /// Default: 60 seconds
    pub(crate) command_timeout: Duration,

    /// Scratch files older than this are removed by the janitor.
    ///
    /// Default: 3600 seconds
    pub(crate) export_ttl: Duration,

    /// Interval of the periodic janitor sweep.
    ///
    /// Default: 600 seconds
    pub(crate) cleanup_interval: Duration,

    /// Maximum number of crawls running at once.
    ///
    /// Default: 2
    pub(crate) max_concurrent_crawls: usize,

    /// Maximum number of export directories kept under the scratch root.
    ///
    /// Default: 10
    pub(crate) max_active_exports: usize,

    /// Upper bound accepted for `max_urls`.
    ///
    /// Default: 100000
    pub(crate) max_crawl_size: u32,
}

impl SpiderConfig {
    /// Start building a configuration from the per-OS defaults
    #[must_use]
    pub fn builder() -> SpiderConfigBuilder {
        SpiderConfigBuilder::default()
    }
}
