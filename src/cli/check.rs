//! Installation check behind `sf_check`

use serde::Serialize;
use std::path::PathBuf;
use tracing::debug;

use super::command::SpiderCommand;
use super::locator::resolve_cli_path;
use super::lock::LockDetector;
use super::output::parse_banner;
use crate::config::SpiderConfig;
use crate::error::SpiderResult;

/// What `sf_check` reports about the local install
#[derive(Debug, Clone, Serialize)]
pub struct InstallationReport {
    pub cli_path: PathBuf,
    pub version: String,
    pub license: String,
    pub gui_running: bool,
    pub data_dir: PathBuf,
    pub export_root: PathBuf,
    pub warning: Option<String>,
}

/// Locate the CLI and read its version and licence banner.
///
/// Runs `--headless --help`, which does not open the crawl database, so a
/// running GUI is reported rather than treated as an error. The banner is
/// parsed even when the CLI exits nonzero.
///
/// # Errors
///
/// Returns `CliNotFound` or `Timeout`, or an IO error if the CLI cannot start.
pub async fn check_installation(
    config: &SpiderConfig,
    lock: &LockDetector,
) -> SpiderResult<InstallationReport> {
    let cli_path = resolve_cli_path(config.cli_path())?;
    let output = SpiderCommand::help(&cli_path)
        .run("Installation check", config.command_timeout())
        .await?;
    debug!(status = %output.status, "Help banner captured");

    let banner = parse_banner(&output.combined());
    let warning = lock.gui_warning().await;

    Ok(InstallationReport {
        cli_path,
        version: banner.version,
        license: banner.license,
        gui_running: warning.is_some(),
        data_dir: config.data_dir().to_path_buf(),
        export_root: config.export_root().to_path_buf(),
        warning,
    })
}
