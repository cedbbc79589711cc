//! Lister for Screaming Frog's crawl database directory
//!
//! This module never writes to the database. Saves and deletes go through the
//! CLI; here we only enumerate what is on disk.

mod entry;

pub use entry::{CRAWL_FILE_EXTENSIONS, CrawlEntry, EntryKind};

use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use crate::error::{SpiderError, SpiderResult};
use crate::utils::{dir_size, modified_utc, validate_crawl_id};

/// Read-only view of the crawl database directory
#[derive(Debug, Clone)]
pub struct CrawlDatabase {
    data_dir: PathBuf,
}

impl CrawlDatabase {
    #[must_use]
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    #[must_use]
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// All saved crawls, most recently modified first, ties broken by id.
    ///
    /// A missing or empty directory yields an empty list.
    ///
    /// # Errors
    ///
    /// Returns an IO error if the directory exists but cannot be read.
    pub fn list_crawls(&self) -> SpiderResult<Vec<CrawlEntry>> {
        if !self.data_dir.is_dir() {
            return Ok(Vec::new());
        }

        let mut entries = Vec::new();
        for dir_entry in std::fs::read_dir(&self.data_dir)? {
            let dir_entry = match dir_entry {
                Ok(e) => e,
                Err(e) => {
                    log::warn!("Skipping unreadable database entry: {e}");
                    continue;
                }
            };
            if let Some(entry) = Self::entry_from_path(&dir_entry.path()) {
                entries.push(entry);
            }
        }

        entries.sort_by(|a, b| {
            b.modified
                .cmp(&a.modified)
                .then_with(|| a.crawl_id.cmp(&b.crawl_id))
        });
        Ok(entries)
    }

    /// Look up one crawl by id
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` for malformed ids and `NotFound` when no
    /// entry with that id exists.
    pub fn find(&self, crawl_id: &str) -> SpiderResult<CrawlEntry> {
        validate_crawl_id(crawl_id)?;

        Self::entry_from_path(&self.data_dir.join(crawl_id)).ok_or_else(|| SpiderError::NotFound {
            what: "Crawl",
            id: crawl_id.to_string(),
        })
    }

    /// Whether any crawl was written at or after `since`.
    ///
    /// Modification times are compared with one second of slack for
    /// filesystems that store whole seconds.
    #[must_use]
    pub fn has_save_since(&self, since: SystemTime) -> bool {
        let Ok(read_dir) = std::fs::read_dir(&self.data_dir) else {
            return false;
        };
        let since = since.checked_sub(Duration::from_secs(1)).unwrap_or(since);
        read_dir
            .filter_map(Result::ok)
            .filter_map(|e| e.metadata().ok())
            .filter_map(|m| m.modified().ok())
            .any(|modified| modified >= since)
    }

    fn entry_from_path(path: &Path) -> Option<CrawlEntry> {
        let name = path.file_name()?.to_str()?.to_string();
        if name.starts_with('.') {
            return None;
        }

        let metadata = std::fs::symlink_metadata(path).ok()?;
        let kind = if metadata.is_dir() {
            EntryKind::Database
        } else if metadata.is_file() && has_crawl_extension(path) {
            EntryKind::CrawlFile
        } else {
            return None;
        };

        Some(CrawlEntry {
            crawl_id: name,
            path: path.to_path_buf(),
            modified: modified_utc(&metadata),
            size_bytes: dir_size(path),
            kind,
        })
    }
}

fn has_crawl_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            CRAWL_FILE_EXTENSIONS
                .iter()
                .any(|known| ext.eq_ignore_ascii_case(known))
        })
}
