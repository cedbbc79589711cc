//! Error types for SEO Spider operations
//!
//! Every failure surfaced to an MCP caller is a [`SpiderError`]. Each variant maps
//! to a coarse [`ErrorKind`] tag and carries a remediation hint naming the fix.

use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Result type alias for SEO Spider operations
pub type SpiderResult<T> = Result<T, SpiderError>;

/// Remediation shown whenever the Screaming Frog GUI holds the crawl database
pub const GUI_LOCKED_REMEDIATION: &str = "Quit Screaming Frog and try again";

/// Coarse error classification exposed to MCP clients as `data.kind`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    GuiLocked,
    CliNotFound,
    InvalidArgument,
    SubprocessFailed,
    Timeout,
    NotFound,
    ColumnNotFound,
    Unknown,
}

impl ErrorKind {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorKind::GuiLocked => "GuiLocked",
            ErrorKind::CliNotFound => "CliNotFound",
            ErrorKind::InvalidArgument => "InvalidArgument",
            ErrorKind::SubprocessFailed => "SubprocessFailed",
            ErrorKind::Timeout => "Timeout",
            ErrorKind::NotFound => "NotFound",
            ErrorKind::ColumnNotFound => "ColumnNotFound",
            ErrorKind::Unknown => "Unknown",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error types for SEO Spider operations
#[derive(Debug, Error)]
pub enum SpiderError {
    /// The Screaming Frog GUI is running and holds the crawl database
    #[error(
        "Screaming Frog GUI is already running ({detail}). The headless CLI cannot access \
         the crawl database while the GUI has it locked. Quit Screaming Frog and try again."
    )]
    GuiLocked { detail: String },

    /// No usable CLI executable was found
    #[error("Screaming Frog CLI not found (checked: {})", display_paths(.searched))]
    CliNotFound { searched: Vec<PathBuf> },

    /// Caller supplied a malformed or disallowed argument
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// `export_crawl` was called without tabs, bulk exports or reports
    #[error("No export specified: provide at least one of export_tabs, bulk_export or save_report")]
    NoExportSpecified,

    /// A requested export name is not in the static catalog
    #[error("Unknown {category} name '{name}'")]
    UnknownExportName { category: &'static str, name: String },

    /// The CLI exited unsuccessfully
    #[error("Screaming Frog CLI exited with {}:\n{output_tail}", display_exit(.exit_code))]
    SubprocessFailed {
        exit_code: Option<i32>,
        output_tail: String,
    },

    /// The CLI did not finish within its budget and was killed
    #[error("{operation} timed out after {}s", display_secs(.limit))]
    Timeout {
        operation: &'static str,
        limit: Duration,
    },

    /// Unknown crawl id, export file or path
    #[error("{what} not found: {id}")]
    NotFound { what: &'static str, id: String },

    /// Unknown crawl handle id
    #[error("Unknown crawl handle '{id}' (active: {})", display_active(.active))]
    UnknownHandle { id: String, active: Vec<String> },

    /// Filter column missing from the CSV header row
    #[error("Column '{column}' not found (available: {})", display_columns(.available))]
    ColumnNotFound {
        column: String,
        available: Vec<String>,
    },

    /// A configured capacity limit was reached
    #[error("{0}")]
    LimitReached(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV decoding error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Other errors
    #[error("{0}")]
    Other(String),
}

impl From<anyhow::Error> for SpiderError {
    fn from(error: anyhow::Error) -> Self {
        SpiderError::Other(error.to_string())
    }
}

impl SpiderError {
    /// Classification tag for MCP clients
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            SpiderError::GuiLocked { .. } => ErrorKind::GuiLocked,
            SpiderError::CliNotFound { .. } => ErrorKind::CliNotFound,
            SpiderError::InvalidArgument(_)
            | SpiderError::NoExportSpecified
            | SpiderError::UnknownExportName { .. }
            | SpiderError::LimitReached(_) => ErrorKind::InvalidArgument,
            SpiderError::SubprocessFailed { .. } => ErrorKind::SubprocessFailed,
            SpiderError::Timeout { .. } => ErrorKind::Timeout,
            SpiderError::NotFound { .. } | SpiderError::UnknownHandle { .. } => {
                ErrorKind::NotFound
            }
            SpiderError::ColumnNotFound { .. } => ErrorKind::ColumnNotFound,
            SpiderError::Io(_) | SpiderError::Csv(_) | SpiderError::Other(_) => {
                ErrorKind::Unknown
            }
        }
    }

    /// Actionable next step for the end user
    #[must_use]
    pub fn remediation(&self) -> &'static str {
        match self {
            SpiderError::GuiLocked { .. } => GUI_LOCKED_REMEDIATION,
            SpiderError::CliNotFound { .. } => {
                "Install Screaming Frog SEO Spider or set SF_CLI_PATH to the launcher executable"
            }
            SpiderError::InvalidArgument(_) => "Fix the argument and call the tool again",
            SpiderError::NoExportSpecified | SpiderError::UnknownExportName { .. } => {
                "Pick names from the screaming-frog://export-reference resource"
            }
            SpiderError::SubprocessFailed { .. } => {
                "Check the CLI output above; the free licence stops at 500 URLs"
            }
            SpiderError::Timeout { .. } => {
                "Export fewer tabs at once or raise SF_EXPORT_TIMEOUT_SECS / SF_COMMAND_TIMEOUT_SECS"
            }
            SpiderError::NotFound { .. } => "Use list_crawls to see valid crawl ids",
            SpiderError::UnknownHandle { .. } => {
                "Handles do not survive a server restart; use list_crawls to find saved crawls"
            }
            SpiderError::ColumnNotFound { .. } => "Use one of the available column names",
            SpiderError::LimitReached(_) => "Wait for running work to finish and retry",
            SpiderError::Io(_) | SpiderError::Csv(_) | SpiderError::Other(_) => {
                "Retry the operation; if it keeps failing check the server log"
            }
        }
    }
}

fn display_paths(paths: &[PathBuf]) -> String {
    if paths.is_empty() {
        return "no candidate paths".to_string();
    }
    paths
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

fn display_exit(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("exit code {code}"),
        None => "no exit code (terminated by signal)".to_string(),
    }
}

fn display_active(active: &[String]) -> String {
    if active.is_empty() {
        "none".to_string()
    } else {
        active.join(", ")
    }
}

fn display_secs(limit: &Duration) -> u64 {
    limit.as_secs()
}

fn display_columns(columns: &[String]) -> String {
    columns.join(", ")
}
