//! Builder for `SpiderConfig`
//!
//! Every field has a per-OS default, so `SpiderConfig::builder().build()` is a
//! working configuration. `from_env` layers the `SF_*` environment variables on
//! top of those defaults.

use anyhow::{Context, Result, anyhow};
use std::path::PathBuf;
use std::time::Duration;
use tracing::warn;

use super::types::SpiderConfig;
use crate::utils::{
    CLI_PATH_ENV, DEFAULT_CLEANUP_INTERVAL_SECS, DEFAULT_COMMAND_TIMEOUT_SECS,
    DEFAULT_EXPORT_TIMEOUT_SECS, DEFAULT_EXPORT_TTL_SECS, DEFAULT_MAX_ACTIVE_EXPORTS,
    DEFAULT_MAX_CONCURRENT_CRAWLS, DEFAULT_MAX_CRAWL_SIZE,
};

/// Screaming Frog's database directory below the user's home
fn default_data_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join(".ScreamingFrogSEOSpider")
        .join("ProjectInstanceData")
}

/// Scratch export root below the user's cache directory
fn default_export_root() -> PathBuf {
    match dirs::cache_dir() {
        Some(cache) => cache.join("kodegen").join("seo-spider").join("exports"),
        None => {
            let fallback = std::env::temp_dir().join("kodegen_seo_spider_exports");
            warn!(
                "Could not determine cache directory, using temp directory fallback: {}",
                fallback.display()
            );
            fallback
        }
    }
}

#[derive(Debug, Clone)]
pub struct SpiderConfigBuilder {
    pub(crate) cli_path: Option<PathBuf>,
    pub(crate) data_dir: Option<PathBuf>,
    pub(crate) export_root: Option<PathBuf>,
    pub(crate) export_timeout: Duration,
    pub(crate) command_timeout: Duration,
    pub(crate) export_ttl: Duration,
    pub(crate) cleanup_interval: Duration,
    pub(crate) max_concurrent_crawls: usize,
    pub(crate) max_active_exports: usize,
    pub(crate) max_crawl_size: u32,
}

impl Default for SpiderConfigBuilder {
    fn default() -> Self {
        Self {
            cli_path: None,
            data_dir: None,
            export_root: None,
            export_timeout: Duration::from_secs(DEFAULT_EXPORT_TIMEOUT_SECS),
            command_timeout: Duration::from_secs(DEFAULT_COMMAND_TIMEOUT_SECS),
            export_ttl: Duration::from_secs(DEFAULT_EXPORT_TTL_SECS),
            cleanup_interval: Duration::from_secs(DEFAULT_CLEANUP_INTERVAL_SECS),
            max_concurrent_crawls: DEFAULT_MAX_CONCURRENT_CRAWLS,
            max_active_exports: DEFAULT_MAX_ACTIVE_EXPORTS,
            max_crawl_size: DEFAULT_MAX_CRAWL_SIZE,
        }
    }
}

impl SpiderConfigBuilder {
    #[must_use]
    pub fn cli_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.cli_path = Some(path.into());
        self
    }

    #[must_use]
    pub fn data_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.data_dir = Some(path.into());
        self
    }

    #[must_use]
    pub fn export_root(mut self, path: impl Into<PathBuf>) -> Self {
        self.export_root = Some(path.into());
        self
    }

    #[must_use]
    pub fn export_timeout(mut self, timeout: Duration) -> Self {
        self.export_timeout = timeout;
        self
    }

    #[must_use]
    pub fn command_timeout(mut self, timeout: Duration) -> Self {
        self.command_timeout = timeout;
        self
    }

    #[must_use]
    pub fn export_ttl(mut self, ttl: Duration) -> Self {
        self.export_ttl = ttl;
        self
    }

    #[must_use]
    pub fn cleanup_interval(mut self, interval: Duration) -> Self {
        self.cleanup_interval = interval;
        self
    }

    #[must_use]
    pub fn max_concurrent_crawls(mut self, max: usize) -> Self {
        self.max_concurrent_crawls = max;
        self
    }

    #[must_use]
    pub fn max_active_exports(mut self, max: usize) -> Self {
        self.max_active_exports = max;
        self
    }

    #[must_use]
    pub fn max_crawl_size(mut self, max: u32) -> Self {
        self.max_crawl_size = max;
        self
    }

    /// Apply `SF_*` overrides from an arbitrary key lookup.
    ///
    /// `from_env` passes `std::env::var`; tests pass a map.
    ///
    /// # Errors
    ///
    /// Returns an error if a numeric variable does not parse.
    pub fn apply_lookup<F>(mut self, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(path) = non_empty(CLI_PATH_ENV) {
            self.cli_path = Some(PathBuf::from(path.trim()));
        }
        if let Some(path) = non_empty("SF_DATA_DIR") {
            self.data_dir = Some(PathBuf::from(path.trim()));
        }
        if let Some(path) = non_empty("SF_EXPORT_DIR") {
            self.export_root = Some(PathBuf::from(path.trim()));
        }
        if let Some(secs) = non_empty("SF_EXPORT_TIMEOUT_SECS") {
            self.export_timeout = Duration::from_secs(parse_number("SF_EXPORT_TIMEOUT_SECS", &secs)?);
        }
        if let Some(secs) = non_empty("SF_COMMAND_TIMEOUT_SECS") {
            self.command_timeout =
                Duration::from_secs(parse_number("SF_COMMAND_TIMEOUT_SECS", &secs)?);
        }
        if let Some(secs) = non_empty("SF_EXPORT_TTL_SECS") {
            self.export_ttl = Duration::from_secs(parse_number("SF_EXPORT_TTL_SECS", &secs)?);
        }
        if let Some(secs) = non_empty("SF_CLEANUP_INTERVAL_SECS") {
            self.cleanup_interval =
                Duration::from_secs(parse_number("SF_CLEANUP_INTERVAL_SECS", &secs)?);
        }
        if let Some(max) = non_empty("SF_MAX_CONCURRENT_CRAWLS") {
            self.max_concurrent_crawls = parse_number("SF_MAX_CONCURRENT_CRAWLS", &max)?;
        }
        if let Some(max) = non_empty("SF_MAX_ACTIVE_EXPORTS") {
            self.max_active_exports = parse_number("SF_MAX_ACTIVE_EXPORTS", &max)?;
        }
        if let Some(max) = non_empty("SF_MAX_CRAWL_SIZE") {
            self.max_crawl_size = parse_number("SF_MAX_CRAWL_SIZE", &max)?;
        }

        Ok(self)
    }

    /// Validate and build the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if a timeout or limit is zero, or if a relative path
    /// cannot be made absolute.
    pub fn build(self) -> Result<SpiderConfig> {
        if self.export_timeout.is_zero() {
            return Err(anyhow!("export timeout must be greater than zero"));
        }
        if self.command_timeout.is_zero() {
            return Err(anyhow!("command timeout must be greater than zero"));
        }
        if self.cleanup_interval.is_zero() {
            return Err(anyhow!("cleanup interval must be greater than zero"));
        }
        if self.max_concurrent_crawls == 0 {
            return Err(anyhow!("max concurrent crawls must be at least 1"));
        }
        if self.max_active_exports == 0 {
            return Err(anyhow!("max active exports must be at least 1"));
        }
        if self.max_crawl_size == 0 {
            return Err(anyhow!("max crawl size must be at least 1"));
        }

        let export_root = absolutize(self.export_root.unwrap_or_else(default_export_root))?;
        let data_dir = absolutize(self.data_dir.unwrap_or_else(default_data_dir))?;

        Ok(SpiderConfig {
            cli_path: self.cli_path,
            data_dir,
            export_root,
            export_timeout: self.export_timeout,
            command_timeout: self.command_timeout,
            export_ttl: self.export_ttl,
            cleanup_interval: self.cleanup_interval,
            max_concurrent_crawls: self.max_concurrent_crawls,
            max_active_exports: self.max_active_exports,
            max_crawl_size: self.max_crawl_size,
        })
    }
}

impl SpiderConfig {
    /// Build a configuration from the process environment (`SF_*` variables)
    ///
    /// # Errors
    ///
    /// Returns an error if a variable is malformed or a limit is zero.
    pub fn from_env() -> Result<Self> {
        SpiderConfigBuilder::default()
            .apply_lookup(|key| std::env::var(key).ok())?
            .build()
    }
}

fn parse_number<T>(key: &str, value: &str) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    value
        .trim()
        .parse::<T>()
        .with_context(|| format!("{key} must be a non-negative integer, got '{value}'"))
}

fn absolutize(path: PathBuf) -> Result<PathBuf> {
    if path.is_absolute() {
        return Ok(path);
    }
    let cwd = std::env::current_dir().context("Failed to get current directory")?;
    Ok(cwd.join(path))
}
