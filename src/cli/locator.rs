//! Locate the Screaming Frog CLI launcher
//!
//! An explicitly configured path wins when it points at an executable file.
//! Otherwise the per-OS install locations are tried in order. Nothing else is
//! searched: an unrelated `screamingfrog*` binary on `PATH` is never picked up.

use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::error::{SpiderError, SpiderResult};

/// Default install locations for the current platform, home-relative entries expanded
#[must_use]
pub fn default_cli_paths() -> Vec<PathBuf> {
    let candidates: &[&str] = if cfg!(target_os = "windows") {
        &[
            r"C:\Program Files (x86)\Screaming Frog SEO Spider\ScreamingFrogSEOSpiderCli.exe",
            r"C:\Program Files\Screaming Frog SEO Spider\ScreamingFrogSEOSpiderCli.exe",
        ]
    } else if cfg!(target_os = "macos") {
        &[
            "/Applications/Screaming Frog SEO Spider.app/Contents/MacOS/ScreamingFrogSEOSpiderLauncher",
            "~/Applications/Screaming Frog SEO Spider.app/Contents/MacOS/ScreamingFrogSEOSpiderLauncher",
        ]
    } else {
        // Linux
        &[
            "/usr/bin/screamingfrogseospider",
            "/usr/local/bin/screamingfrogseospider",
            "/opt/ScreamingFrogSEOSpider/bin/screamingfrogseospider",
        ]
    };

    candidates
        .iter()
        .filter_map(|candidate| match candidate.strip_prefix("~/") {
            Some(rest) => dirs::home_dir().map(|home| home.join(rest)),
            None => Some(PathBuf::from(candidate)),
        })
        .collect()
}

/// Resolve the CLI launcher from configuration, then the platform defaults.
///
/// # Errors
///
/// Returns [`SpiderError::CliNotFound`] listing every checked path when
/// neither the configured path nor any default is an executable file.
pub fn resolve_cli_path(configured: Option<&Path>) -> SpiderResult<PathBuf> {
    resolve_cli_path_from(configured, &default_cli_paths())
}

/// Same as [`resolve_cli_path`] with an explicit default table
pub fn resolve_cli_path_from(
    configured: Option<&Path>,
    defaults: &[PathBuf],
) -> SpiderResult<PathBuf> {
    let mut searched = Vec::with_capacity(defaults.len() + 1);

    if let Some(path) = configured {
        if is_executable_file(path) {
            info!("Using Screaming Frog CLI from configuration: {}", path.display());
            return Ok(path.to_path_buf());
        }
        warn!(
            "Configured Screaming Frog CLI path is not an executable file: {}",
            path.display()
        );
        searched.push(path.to_path_buf());
    }

    for path in defaults {
        if is_executable_file(path) {
            info!("Found Screaming Frog CLI at: {}", path.display());
            return Ok(path.clone());
        }
        searched.push(path.clone());
    }

    Err(SpiderError::CliNotFound { searched })
}

#[cfg(unix)]
fn is_executable_file(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;

    path.metadata()
        .map(|m| m.is_file() && m.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable_file(path: &Path) -> bool {
    path.is_file()
}
