//! Launch headless crawls in the background and poll them

use chrono::Utc;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Instant, SystemTime};
use tracing::info;
use uuid::Uuid;

use super::registry::CrawlRegistry;
use super::types::{CrawlHandle, CrawlLaunch, CrawlRequest, CrawlStatusReport};
use crate::cli::{LockDetector, OutputTail, SpiderCommand, resolve_cli_path};
use crate::config::SpiderConfig;
use crate::database::CrawlDatabase;
use crate::error::{SpiderError, SpiderResult};
use crate::utils::{
    CONFIG_FILE_EXTENSION, CRAWL_ID_PREFIX, OUTPUT_TAIL_LINES, safe_truncate_chars,
    validate_crawl_url,
};

const MAX_LABEL_CHARS: usize = 100;

/// Starts crawls and reports their status
#[derive(Debug, Clone)]
pub struct CrawlLauncher {
    config: Arc<SpiderConfig>,
    lock: LockDetector,
    database: CrawlDatabase,
    registry: CrawlRegistry,
}

impl CrawlLauncher {
    #[must_use]
    pub fn new(config: Arc<SpiderConfig>, lock: LockDetector) -> Self {
        let database = CrawlDatabase::new(config.data_dir());
        Self {
            config,
            lock,
            database,
            registry: CrawlRegistry::new(),
        }
    }

    #[must_use]
    pub fn registry(&self) -> &CrawlRegistry {
        &self.registry
    }

    /// Start a headless crawl that saves into the database on completion.
    ///
    /// Returns as soon as the process is spawned.
    ///
    /// # Errors
    ///
    /// `InvalidArgument` for a bad URL, limit or config file (checked before
    /// anything else), `GuiLocked`, `CliNotFound`, `LimitReached` when the
    /// concurrent crawl cap is hit, or an IO error from spawning.
    pub async fn start_crawl(&self, request: CrawlRequest) -> SpiderResult<CrawlLaunch> {
        let url = validate_crawl_url(&request.url)?;
        let max_urls = validate_max_urls(request.max_urls, self.config.max_crawl_size())?;
        let config_file = request
            .config_file
            .as_deref()
            .map(validate_config_file)
            .transpose()?;
        let label = crawl_label(request.label.as_deref(), &url);

        self.lock.check_gui_not_running().await?;
        let program = resolve_cli_path(self.config.cli_path())?;

        let running = self.registry.running_count().await;
        if running >= self.config.max_concurrent_crawls() {
            return Err(SpiderError::LimitReached(format!(
                "Maximum of {} concurrent crawls reached ({running} running). Wait for one to \
                 finish; check progress with crawl_status.",
                self.config.max_concurrent_crawls()
            )));
        }

        let command =
            SpiderCommand::crawl(&program, url.as_str(), config_file.as_deref(), max_urls);
        let started_wall = SystemTime::now();
        let started = Instant::now();
        let mut child = command.spawn_detached()?;

        let output = OutputTail::new(OUTPUT_TAIL_LINES);
        let mut drains = Vec::with_capacity(2);
        if let Some(stdout) = child.stdout.take() {
            drains.push(output.drain(stdout));
        }
        if let Some(stderr) = child.stderr.take() {
            drains.push(output.drain(stderr));
        }

        let crawl_id = format!("{CRAWL_ID_PREFIX}{}", &Uuid::new_v4().simple().to_string()[..8]);
        let handle = CrawlHandle {
            crawl_id: crawl_id.clone(),
            url: url.to_string(),
            label: label.clone(),
            args: command.args().to_vec(),
            output_path: self.database.data_dir().to_path_buf(),
            pid: child.id(),
            started_at: Utc::now(),
            started_wall,
            started,
            child,
            output,
            drains,
            exit: None,
        };

        let launch = CrawlLaunch {
            crawl_id: crawl_id.clone(),
            pid: handle.pid,
            url: handle.url.clone(),
            label,
            args: handle.args.clone(),
            output_path: handle.output_path.clone(),
            started_at: handle.started_at,
        };
        self.registry.insert(handle).await;

        info!(crawl_id = %crawl_id, pid = launch.pid, url = %launch.url, "Crawl started");
        Ok(launch)
    }

    /// Current status of a launched crawl, derived live
    ///
    /// # Errors
    ///
    /// Returns `UnknownHandle` for ids not in the registry, including handles
    /// already reported as finished.
    pub async fn get_status(&self, crawl_id: &str) -> SpiderResult<CrawlStatusReport> {
        self.registry.poll(crawl_id.trim(), &self.database).await
    }
}

/// Accept a positive limit no larger than `ceiling`
///
/// # Errors
///
/// Returns `InvalidArgument` for zero, negative or oversized limits.
pub fn validate_max_urls(max_urls: Option<i64>, ceiling: u32) -> SpiderResult<Option<u32>> {
    let Some(max) = max_urls else {
        return Ok(None);
    };
    if max <= 0 {
        return Err(SpiderError::InvalidArgument(format!(
            "max_urls must be a positive integer, got {max}"
        )));
    }
    if max > i64::from(ceiling) {
        return Err(SpiderError::InvalidArgument(format!(
            "max_urls must be at most {ceiling}, got {max}"
        )));
    }
    Ok(u32::try_from(max).ok())
}

fn validate_config_file(path: &Path) -> SpiderResult<PathBuf> {
    let has_extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case(CONFIG_FILE_EXTENSION));
    if !has_extension {
        return Err(SpiderError::InvalidArgument(format!(
            "config_file must be a .{CONFIG_FILE_EXTENSION} file, got {}",
            path.display()
        )));
    }
    if !path.is_file() {
        return Err(SpiderError::InvalidArgument(format!(
            "config_file does not exist: {}",
            path.display()
        )));
    }
    Ok(path.canonicalize()?)
}

fn crawl_label(label: Option<&str>, url: &url::Url) -> String {
    match label.map(str::trim).filter(|l| !l.is_empty()) {
        Some(label) => safe_truncate_chars(label, MAX_LABEL_CHARS).to_string(),
        None => url.host_str().unwrap_or_default().to_string(),
    }
}
