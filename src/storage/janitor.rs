//! Disk usage reporting, crawl deletion and scratch cleanup

use chrono::{DateTime, Utc};
use jwalk::{Parallelism, WalkDir};
use log::{debug, info, warn};
use serde::Serialize;
use std::fs::Metadata;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, SystemTime};
use tokio::task::JoinHandle;

use crate::cli::{LockDetector, SpiderCommand, resolve_cli_path};
use crate::config::SpiderConfig;
use crate::database::{CrawlDatabase, EntryKind};
use crate::error::SpiderResult;
use crate::export::count_export_dirs;
use crate::utils::{COMMAND_FAILURE_TAIL_LINES, dir_size, format_size, validate_crawl_id};

/// Size of one saved crawl
#[derive(Debug, Clone, Serialize)]
pub struct EntryUsage {
    pub crawl_id: String,
    pub size_bytes: u64,
    pub size: String,
    pub modified: DateTime<Utc>,
}

/// Disk usage of the crawl database and the scratch export root
#[derive(Debug, Clone, Serialize)]
pub struct StorageSummary {
    pub data_dir: PathBuf,
    pub database_size_bytes: u64,
    pub database_size: String,
    pub entry_count: usize,
    /// Largest first
    pub entries: Vec<EntryUsage>,
    pub export_root: PathBuf,
    pub scratch_size_bytes: u64,
    pub scratch_size: String,
    pub export_dir_count: usize,
    pub total_size_bytes: u64,
    pub total_size: String,
}

/// How a deleted crawl was removed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DeleteMethod {
    /// `--delete-crawl` removed it
    Cli,
    /// Removed from disk, either a crawl file or a leftover after the CLI ran
    Filesystem,
}

/// Outcome of a successful `delete_crawl`
#[derive(Debug, Clone, Serialize)]
pub struct DeleteOutcome {
    pub crawl_id: String,
    pub path: PathBuf,
    pub freed_bytes: u64,
    pub freed: String,
    pub method: DeleteMethod,
}

/// Housekeeping over the crawl database and scratch root
#[derive(Debug, Clone)]
pub struct StorageJanitor {
    config: Arc<SpiderConfig>,
    lock: LockDetector,
    database: CrawlDatabase,
}

impl StorageJanitor {
    #[must_use]
    pub fn new(config: Arc<SpiderConfig>, lock: LockDetector) -> Self {
        let database = CrawlDatabase::new(config.data_dir());
        Self {
            config,
            lock,
            database,
        }
    }

    /// Walk both directories and sum file sizes
    ///
    /// # Errors
    ///
    /// Returns an IO error if the database directory exists but cannot be read.
    pub fn storage_summary(&self) -> SpiderResult<StorageSummary> {
        let mut entries: Vec<EntryUsage> = self
            .database
            .list_crawls()?
            .into_iter()
            .map(|entry| EntryUsage {
                size: format_size(entry.size_bytes),
                crawl_id: entry.crawl_id,
                size_bytes: entry.size_bytes,
                modified: entry.modified,
            })
            .collect();
        entries.sort_by(|a, b| {
            b.size_bytes
                .cmp(&a.size_bytes)
                .then_with(|| a.crawl_id.cmp(&b.crawl_id))
        });

        let database_size_bytes = dir_size(self.config.data_dir());
        let scratch_size_bytes = dir_size(self.config.export_root());
        let total_size_bytes = database_size_bytes + scratch_size_bytes;

        Ok(StorageSummary {
            data_dir: self.config.data_dir().to_path_buf(),
            database_size_bytes,
            database_size: format_size(database_size_bytes),
            entry_count: entries.len(),
            entries,
            export_root: self.config.export_root().to_path_buf(),
            scratch_size_bytes,
            scratch_size: format_size(scratch_size_bytes),
            export_dir_count: count_export_dirs(self.config.export_root()),
            total_size_bytes,
            total_size: format_size(total_size_bytes),
        })
    }

    /// Permanently delete a saved crawl.
    ///
    /// Database entries go through `--delete-crawl`; anything the CLI leaves
    /// behind, and standalone crawl files, are removed from disk.
    ///
    /// # Errors
    ///
    /// `NotFound` for unknown ids (nothing is touched), `GuiLocked` while the
    /// GUI is running, and `CliNotFound`, `SubprocessFailed` or `Timeout` from
    /// the CLI run.
    pub async fn delete_crawl(&self, crawl_id: &str) -> SpiderResult<DeleteOutcome> {
        validate_crawl_id(crawl_id)?;
        self.lock.check_gui_not_running().await?;
        let entry = self.database.find(crawl_id)?;

        let method = match entry.kind {
            EntryKind::Database => {
                let program = resolve_cli_path(self.config.cli_path())?;
                SpiderCommand::delete_crawl(&program, crawl_id)
                    .run("Delete crawl", self.config.command_timeout())
                    .await?
                    .into_success(COMMAND_FAILURE_TAIL_LINES)?;

                if entry.path.exists() {
                    debug!("CLI left {} behind; removing it", entry.path.display());
                    remove_path(&entry.path).await?;
                    DeleteMethod::Filesystem
                } else {
                    DeleteMethod::Cli
                }
            }
            EntryKind::CrawlFile => {
                remove_path(&entry.path).await?;
                DeleteMethod::Filesystem
            }
        };

        info!(
            "Deleted crawl {crawl_id} ({}) from {}",
            format_size(entry.size_bytes),
            entry.path.display()
        );
        Ok(DeleteOutcome {
            crawl_id: entry.crawl_id,
            path: entry.path,
            freed_bytes: entry.size_bytes,
            freed: format_size(entry.size_bytes),
            method,
        })
    }

    /// Delete every export directory whose newest file is at least `max_age`
    /// old, as a whole, and loose scratch files of the same age. Returns the
    /// number of files deleted.
    ///
    /// Never fails: individual errors are logged and skipped.
    pub fn cleanup_scratch(&self, max_age: Duration) -> usize {
        cleanup_dir(self.config.export_root(), max_age)
    }

    /// Run `cleanup_scratch` with the configured retention on the configured
    /// interval. The first pass runs immediately.
    pub fn start_cleanup_task(self: Arc<Self>) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(self.config.cleanup_interval());
            loop {
                interval.tick().await;
                let janitor = Arc::clone(&self);
                let ttl = janitor.config.export_ttl();
                match tokio::task::spawn_blocking(move || janitor.cleanup_scratch(ttl)).await {
                    Ok(0) => {}
                    Ok(deleted) => info!("Scratch cleanup removed {deleted} file(s)"),
                    Err(e) => warn!("Scratch cleanup task failed: {e}"),
                }
            }
        })
    }
}

fn cleanup_dir(root: &Path, max_age: Duration) -> usize {
    let read_dir = match std::fs::read_dir(root) {
        Ok(read_dir) => read_dir,
        Err(e) => {
            if root.exists() {
                warn!("Cannot read scratch root {}: {e}", root.display());
            }
            return 0;
        }
    };

    let mut deleted = 0;
    for entry in read_dir {
        let path = match entry {
            Ok(entry) => entry.path(),
            Err(e) => {
                warn!("Skipping unreadable scratch entry: {e}");
                continue;
            }
        };
        let Ok(metadata) = std::fs::symlink_metadata(&path) else {
            continue;
        };

        if metadata.is_dir() {
            let (newest, files) = newest_modification(&path, &metadata);
            if !is_expired(newest, max_age) {
                continue;
            }
            match std::fs::remove_dir_all(&path) {
                Ok(()) => {
                    debug!("Removed expired export {} ({files} file(s))", path.display());
                    deleted += files;
                }
                Err(e) => warn!("Failed to remove export {}: {e}", path.display()),
            }
        } else {
            let modified = metadata.modified().unwrap_or(SystemTime::UNIX_EPOCH);
            if !is_expired(modified, max_age) {
                continue;
            }
            match std::fs::remove_file(&path) {
                Ok(()) => {
                    debug!("Removed scratch file {}", path.display());
                    deleted += 1;
                }
                Err(e) => warn!("Failed to remove scratch file {}: {e}", path.display()),
            }
        }
    }

    deleted
}

/// Newest modification time of `dir` and everything below it, plus the
/// number of non-directory entries found
fn newest_modification(dir: &Path, metadata: &Metadata) -> (SystemTime, usize) {
    let mut newest = metadata.modified().unwrap_or(SystemTime::UNIX_EPOCH);
    let mut files = 0;
    for entry in WalkDir::new(dir)
        .skip_hidden(false)
        .follow_links(false)
        .parallelism(Parallelism::Serial)
        .min_depth(1)
    {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!("Skipping unreadable scratch entry: {e}");
                continue;
            }
        };
        if !entry.file_type().is_dir() {
            files += 1;
        }
        if let Ok(entry_metadata) = entry.metadata()
            && let Ok(modified) = entry_metadata.modified()
        {
            newest = newest.max(modified);
        }
    }
    (newest, files)
}

fn is_expired(modified: SystemTime, max_age: Duration) -> bool {
    let age = SystemTime::now()
        .duration_since(modified)
        .unwrap_or(Duration::ZERO);
    age >= max_age
}

async fn remove_path(path: &Path) -> std::io::Result<()> {
    let metadata = tokio::fs::symlink_metadata(path).await?;
    if metadata.is_dir() {
        tokio::fs::remove_dir_all(path).await
    } else {
        tokio::fs::remove_file(path).await
    }
}
