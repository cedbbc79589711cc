//! Getter methods for `SpiderConfig`

use std::path::{Path, PathBuf};
use std::time::Duration;

use super::types::SpiderConfig;

impl SpiderConfig {
    #[must_use]
    pub fn cli_path(&self) -> Option<&Path> {
        self.cli_path.as_deref()
    }

    #[must_use]
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    #[must_use]
    pub fn export_root(&self) -> &Path {
        &self.export_root
    }

    #[must_use]
    pub fn export_timeout(&self) -> Duration {
        self.export_timeout
    }

    #[must_use]
    pub fn command_timeout(&self) -> Duration {
        self.command_timeout
    }

    #[must_use]
    pub fn export_ttl(&self) -> Duration {
        self.export_ttl
    }

    #[must_use]
    pub fn cleanup_interval(&self) -> Duration {
        self.cleanup_interval
    }

    #[must_use]
    pub fn max_concurrent_crawls(&self) -> usize {
        self.max_concurrent_crawls
    }

    #[must_use]
    pub fn max_active_exports(&self) -> usize {
        self.max_active_exports
    }

    #[must_use]
    pub fn max_crawl_size(&self) -> u32 {
        self.max_crawl_size
    }

    /// Path of a named export directory under the scratch root
    #[must_use]
    pub fn export_dir(&self, export_id: &str) -> PathBuf {
        self.export_root.join(export_id)
    }
}
