//! Load-and-export runs of the Screaming Frog CLI

use jwalk::{Parallelism, WalkDir};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

use super::catalog::ExportSpec;
use super::reader::count_data_rows;
use crate::cli::{LockDetector, SpiderCommand, resolve_cli_path};
use crate::config::SpiderConfig;
use crate::database::CrawlDatabase;
use crate::error::{SpiderError, SpiderResult};
use crate::utils::{
    COMMAND_FAILURE_TAIL_LINES, EXPORT_DIR_PREFIX, ensure_private_dir, format_size,
};

/// One CSV produced by an export
#[derive(Debug, Clone, Serialize)]
pub struct ExportedFile {
    /// Absolute path, accepted by `read_crawl_data`
    pub path: PathBuf,
    /// Path relative to the scratch root
    pub relative_path: String,
    pub size_bytes: u64,
    pub size: String,
    /// Data rows excluding the header, `None` if the file could not be parsed
    pub data_rows: Option<u64>,
}

/// Outcome of one `export_crawl` call
#[derive(Debug, Clone, Serialize)]
pub struct ExportResult {
    pub export_id: String,
    pub crawl_id: String,
    pub output_dir: PathBuf,
    pub spec: ExportSpec,
    pub files: Vec<ExportedFile>,
    pub total_data_rows: u64,
    /// Set when no CSV was produced or every CSV is header-only
    pub warning: Option<String>,
}

/// Runs `--load-crawl` exports into fresh scratch directories
#[derive(Debug, Clone)]
pub struct ExportDriver {
    config: Arc<SpiderConfig>,
    lock: LockDetector,
    database: CrawlDatabase,
}

impl ExportDriver {
    #[must_use]
    pub fn new(config: Arc<SpiderConfig>, lock: LockDetector) -> Self {
        let database = CrawlDatabase::new(config.data_dir());
        Self {
            config,
            lock,
            database,
        }
    }

    /// Export tabs, bulk exports and reports of a saved crawl as CSV.
    ///
    /// Blocks until the CLI exits or the export timeout elapses; on timeout the
    /// subprocess is killed. Header-only CSVs are returned as a result with a
    /// warning attached, never as an error.
    ///
    /// # Errors
    ///
    /// Argument errors are returned before any subprocess is spawned.
    /// `GuiLocked`, `NotFound`, `CliNotFound`, `SubprocessFailed` and
    /// `Timeout` cover the remaining failure modes.
    pub async fn export_crawl(
        &self,
        crawl_id: &str,
        export_tabs: Option<&str>,
        bulk_export: Option<&str>,
        save_report: Option<&str>,
    ) -> SpiderResult<ExportResult> {
        crate::utils::validate_crawl_id(crawl_id)?;
        let spec = ExportSpec::parse(export_tabs, bulk_export, save_report)?;

        self.lock.check_gui_not_running().await?;
        let entry = self.database.find(crawl_id)?;
        let program = resolve_cli_path(self.config.cli_path())?;

        let export_root = self.config.export_root();
        ensure_private_dir(export_root)?;
        let active = count_export_dirs(export_root);
        if active >= self.config.max_active_exports() {
            return Err(SpiderError::LimitReached(format!(
                "Maximum of {} export directories reached ({active} on disk). Exports are \
                 removed {}s after their last write; retry after the next cleanup.",
                self.config.max_active_exports(),
                self.config.export_ttl().as_secs()
            )));
        }

        let export_id = format!("{EXPORT_DIR_PREFIX}{}", &Uuid::new_v4().simple().to_string()[..8]);
        let output_dir = self.config.export_dir(&export_id);
        tokio::fs::create_dir_all(&output_dir).await?;

        let mut command = SpiderCommand::headless(&program)
            .flag_value("--load-crawl", entry.load_target());
        if let Some(tabs) = spec.tabs_arg() {
            command = command.flag_value("--export-tabs", tabs);
        }
        command = command
            .flag_value("--output-folder", output_dir.to_string_lossy())
            .arg("--timestamped-output");
        if let Some(bulk) = spec.bulk_export_arg() {
            command = command.flag_value("--bulk-export", bulk);
        }
        if let Some(reports) = spec.save_report_arg() {
            command = command.flag_value("--save-report", reports);
        }

        let run = command
            .run("Export", self.config.export_timeout())
            .await
            .and_then(|output| output.into_success(COMMAND_FAILURE_TAIL_LINES));
        if let Err(e) = run {
            discard_export_dir(&output_dir).await;
            return Err(e);
        }

        let files = collect_csv_files(&output_dir, export_root);
        let total_data_rows = files.iter().filter_map(|f| f.data_rows).sum();
        let warning = self.export_warning(&files, total_data_rows).await;

        info!(
            export_id = %export_id,
            crawl_id,
            files = files.len(),
            total_data_rows,
            "Export completed"
        );

        Ok(ExportResult {
            export_id,
            crawl_id: crawl_id.to_string(),
            output_dir,
            spec,
            files,
            total_data_rows,
            warning,
        })
    }

    async fn export_warning(&self, files: &[ExportedFile], total_data_rows: u64) -> Option<String> {
        if files.is_empty() {
            return Some(
                "Export completed but no CSV files were generated. The crawl may have no data \
                 for the requested tabs; check the crawl id with list_crawls."
                    .to_string(),
            );
        }
        if total_data_rows > 0 {
            return None;
        }

        let mut warning = format!(
            "Export produced {} CSV file(s) but all are empty (headers only, 0 data rows). \
             This usually means the Screaming Frog GUI had the crawl database locked.",
            files.len()
        );
        if self.lock.is_gui_running().await {
            warning.push_str(
                " The GUI is running right now and is almost certainly the cause. Quit \
                 Screaming Frog and re-run the export.",
            );
        }
        Some(warning)
    }
}

/// Number of `export-*` directories currently under the scratch root
#[must_use]
pub fn count_export_dirs(export_root: &Path) -> usize {
    let Ok(read_dir) = std::fs::read_dir(export_root) else {
        return 0;
    };
    read_dir
        .filter_map(Result::ok)
        .filter(|e| e.file_type().is_ok_and(|t| t.is_dir()))
        .filter(|e| e.file_name().to_string_lossy().starts_with(EXPORT_DIR_PREFIX))
        .count()
}

fn collect_csv_files(output_dir: &Path, export_root: &Path) -> Vec<ExportedFile> {
    let mut paths: Vec<PathBuf> = WalkDir::new(output_dir)
        .skip_hidden(false)
        .follow_links(false)
        .parallelism(Parallelism::Serial)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.path())
        .filter(|path| {
            path.extension()
                .and_then(|ext| ext.to_str())
                .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"))
        })
        .collect();
    paths.sort();

    paths
        .into_iter()
        .map(|path| {
            let size_bytes = path.metadata().map(|m| m.len()).unwrap_or(0);
            let data_rows = match count_data_rows(&path) {
                Ok(rows) => Some(rows),
                Err(e) => {
                    warn!("Could not count rows in {}: {e}", path.display());
                    None
                }
            };
            let relative_path = path
                .strip_prefix(export_root)
                .unwrap_or(&path)
                .to_string_lossy()
                .into_owned();
            ExportedFile {
                relative_path,
                size_bytes,
                size: format_size(size_bytes),
                data_rows,
                path,
            }
        })
        .collect()
}

async fn discard_export_dir(output_dir: &Path) {
    if let Err(e) = tokio::fs::remove_dir_all(output_dir).await {
        warn!("Failed to remove export directory {}: {e}", output_dir.display());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn csv_files_are_collected_recursively() {
        let root = TempDir::new().unwrap();
        let out = root.path().join("export-0000abcd");
        let nested = out.join("2025.01.01.10.00.00");
        std::fs::create_dir_all(&nested).unwrap();
        std::fs::write(nested.join("internal_all.csv"), "Address\nhttps://a.test/\n").unwrap();
        std::fs::write(nested.join("h1_all.csv"), "Address\n").unwrap();
        std::fs::write(nested.join("crawl.log"), "ignored").unwrap();

        let files = collect_csv_files(&out, root.path());
        assert_eq!(files.len(), 2);
        assert_eq!(files[0].data_rows, Some(0));
        assert_eq!(files[1].data_rows, Some(1));
        assert!(files[1].relative_path.starts_with("export-0000abcd"));
    }

    #[test]
    fn only_export_dirs_are_counted() {
        let root = TempDir::new().unwrap();
        std::fs::create_dir(root.path().join("export-1")).unwrap();
        std::fs::create_dir(root.path().join("export-2")).unwrap();
        std::fs::create_dir(root.path().join("other")).unwrap();
        std::fs::write(root.path().join("export-file"), "x").unwrap();

        assert_eq!(count_export_dirs(root.path()), 2);
        assert_eq!(count_export_dirs(&root.path().join("missing")), 0);
    }
}
