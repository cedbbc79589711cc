//! Read-only view of one saved crawl

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::path::PathBuf;

/// File extensions of crawls saved outside the database
pub const CRAWL_FILE_EXTENSIONS: &[&str] = &["seospider", "dbseospider"];

/// How a crawl is stored
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryKind {
    /// Directory inside the database, loaded by id
    Database,
    /// Standalone crawl file, loaded by path
    CrawlFile,
}

/// One saved crawl in Screaming Frog's storage directory
#[derive(Debug, Clone, Serialize)]
pub struct CrawlEntry {
    /// Identifier accepted by `export_crawl` and `delete_crawl`
    pub crawl_id: String,
    pub path: PathBuf,
    pub modified: DateTime<Utc>,
    pub size_bytes: u64,
    pub kind: EntryKind,
}

impl CrawlEntry {
    /// Value passed to `--load-crawl`
    #[must_use]
    pub fn load_target(&self) -> String {
        match self.kind {
            EntryKind::Database => self.crawl_id.clone(),
            EntryKind::CrawlFile => self.path.to_string_lossy().into_owned(),
        }
    }
}
