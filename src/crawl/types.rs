//! Crawl handle and status types

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::path::PathBuf;
use std::process::ExitStatus;
use std::time::{Duration, Instant, SystemTime};
use tokio::process::Child;
use tokio::task::JoinHandle;

use crate::cli::{OutputTail, crawl_summary_line};
use crate::database::CrawlDatabase;
use crate::utils::{CRAWL_FAILURE_TAIL_LINES, tail_lines};

/// Upper bound on waiting for output drains once the process has exited
const DRAIN_GRACE: Duration = Duration::from_millis(500);

/// Lifecycle state of a background crawl
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CrawlStatus {
    Running,
    Completed,
    Failed,
}

impl CrawlStatus {
    #[must_use]
    pub fn is_terminal(self) -> bool {
        !matches!(self, CrawlStatus::Running)
    }
}

/// Caller-supplied crawl parameters, validated by the launcher
#[derive(Debug, Clone, Default)]
pub struct CrawlRequest {
    pub url: String,
    pub max_urls: Option<i64>,
    pub config_file: Option<PathBuf>,
    pub label: Option<String>,
}

/// Returned by `start_crawl` once the process is running
#[derive(Debug, Clone, Serialize)]
pub struct CrawlLaunch {
    pub crawl_id: String,
    pub pid: Option<u32>,
    pub url: String,
    pub label: String,
    pub args: Vec<String>,
    pub output_path: PathBuf,
    pub started_at: DateTime<Utc>,
}

/// Live status of one crawl handle
#[derive(Debug, Clone, Serialize)]
pub struct CrawlStatusReport {
    pub crawl_id: String,
    pub status: CrawlStatus,
    pub url: String,
    pub label: String,
    pub pid: Option<u32>,
    pub started_at: DateTime<Utc>,
    pub elapsed_seconds: u64,
    /// `None` while running or when killed by a signal
    pub exit_code: Option<i32>,
    /// Last progress line printed by the CLI
    pub summary: Option<String>,
    /// Failure reason and captured output tail
    pub detail: Option<String>,
}

/// In-memory record of one launched crawl process
#[derive(Debug)]
pub struct CrawlHandle {
    pub(crate) crawl_id: String,
    pub(crate) url: String,
    pub(crate) label: String,
    pub(crate) args: Vec<String>,
    pub(crate) output_path: PathBuf,
    pub(crate) pid: Option<u32>,
    pub(crate) started_at: DateTime<Utc>,
    pub(crate) started_wall: SystemTime,
    pub(crate) started: Instant,
    pub(crate) child: Child,
    pub(crate) output: OutputTail,
    pub(crate) drains: Vec<JoinHandle<()>>,
    pub(crate) exit: Option<(ExitStatus, Duration)>,
}

impl CrawlHandle {
    #[must_use]
    pub fn crawl_id(&self) -> &str {
        &self.crawl_id
    }

    /// Whether the process has not exited yet
    pub fn is_alive(&mut self) -> bool {
        self.exit.is_none() && matches!(self.child.try_wait(), Ok(None))
    }

    /// Derive the current status from process liveness and the database.
    ///
    /// The exit status is remembered once observed; everything else is
    /// recomputed on every call.
    pub async fn poll(&mut self, database: &CrawlDatabase) -> CrawlStatusReport {
        let mut wait_error = None;
        if self.exit.is_none() {
            match self.child.try_wait() {
                Ok(Some(status)) => {
                    self.exit = Some((status, self.started.elapsed()));
                    for drain in self.drains.drain(..) {
                        let _ = tokio::time::timeout(DRAIN_GRACE, drain).await;
                    }
                }
                Ok(None) => {}
                Err(e) => wait_error = Some(e.to_string()),
            }
        }

        let output = self.output.snapshot();
        let elapsed = self
            .exit
            .map_or_else(|| self.started.elapsed(), |(_, elapsed)| elapsed);

        let (status, exit_code, detail) = match (&self.exit, wait_error) {
            (_, Some(e)) => (
                CrawlStatus::Failed,
                None,
                Some(format!("Could not query crawl process: {e}")),
            ),
            (None, None) => (CrawlStatus::Running, None, None),
            (Some((exit, _)), None) if exit.success() => {
                if database.has_save_since(self.started_wall) {
                    (CrawlStatus::Completed, Some(0), None)
                } else {
                    (
                        CrawlStatus::Failed,
                        Some(0),
                        Some(format!(
                            "Screaming Frog exited successfully but no saved crawl appeared in {}.\n{}",
                            database.data_dir().display(),
                            tail_lines(&output, CRAWL_FAILURE_TAIL_LINES)
                        )),
                    )
                }
            }
            (Some((exit, _)), None) => {
                let reason = match exit.code() {
                    Some(code) => format!("Crawl failed with exit code {code}"),
                    None => "Crawl process was terminated by a signal".to_string(),
                };
                (
                    CrawlStatus::Failed,
                    exit.code(),
                    Some(format!(
                        "{reason}. The free licence stops at 500 URLs.\n{}",
                        tail_lines(&output, CRAWL_FAILURE_TAIL_LINES)
                    )),
                )
            }
        };

        CrawlStatusReport {
            crawl_id: self.crawl_id.clone(),
            status,
            url: self.url.clone(),
            label: self.label.clone(),
            pid: self.pid,
            started_at: self.started_at,
            elapsed_seconds: elapsed.as_secs(),
            exit_code,
            summary: crawl_summary_line(&output),
            detail,
        }
    }
}
