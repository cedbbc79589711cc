//! Export runs against a stub Screaming Frog CLI
#![cfg(unix)]

use kodegen_tools_seo_spider::error::{ErrorKind, SpiderError};
use kodegen_tools_seo_spider::export::ExportDriver;
use std::sync::Arc;
use std::time::{Duration, Instant};

mod common;

use common::{
    CRAWL_SAVES, EXPORT_FAILS, EXPORT_HANGS, EXPORT_HEADERS_ONLY, EXPORT_ROWS,
    EXPORT_SPAWNS_WORKER, Workspace, gui_closed,
};

#[tokio::test]
async fn test_export_writes_csvs_and_counts_rows() {
    let ws = Workspace::new(CRAWL_SAVES, EXPORT_ROWS);
    ws.add_crawl("site-2025", 10);
    let driver = ExportDriver::new(ws.config(), gui_closed());

    let result = driver
        .export_crawl("site-2025", Some("internal:all"), None, Some("crawl overview"))
        .await
        .unwrap();

    assert!(result.export_id.starts_with("export-"));
    assert_eq!(result.output_dir, ws.export_root.join(&result.export_id));
    assert_eq!(result.files.len(), 1);
    assert_eq!(result.files[0].data_rows, Some(2));
    assert!(result.files[0].path.is_file());
    assert_eq!(result.total_data_rows, 2);
    assert!(result.warning.is_none());

    let calls = ws.invocations();
    assert_eq!(calls.len(), 1);
    assert!(calls[0].starts_with("--headless --load-crawl site-2025 --export-tabs Internal:All --output-folder"));
    assert!(calls[0].contains("--timestamped-output"));
    assert!(calls[0].ends_with("--save-report Crawl Overview"));
}

#[tokio::test]
async fn test_header_only_export_is_a_result_with_warning() {
    let ws = Workspace::new(CRAWL_SAVES, EXPORT_HEADERS_ONLY);
    ws.add_crawl("site-2025", 10);
    let driver = ExportDriver::new(ws.config(), gui_closed());

    let result = driver
        .export_crawl("site-2025", Some("Internal:All"), None, None)
        .await
        .unwrap();

    assert_eq!(result.files.len(), 1);
    assert_eq!(result.total_data_rows, 0);
    assert!(result.warning.unwrap().contains("headers only"));
}

#[tokio::test]
async fn test_empty_export_spec_is_rejected_before_spawn() {
    let ws = Workspace::happy();
    ws.add_crawl("site-2025", 10);
    let driver = ExportDriver::new(ws.config(), gui_closed());

    let err = driver
        .export_crawl("site-2025", None, Some(""), Some("  "))
        .await
        .unwrap_err();
    assert!(matches!(err, SpiderError::NoExportSpecified));
    assert_eq!(err.kind(), ErrorKind::InvalidArgument);
    assert!(!ws.stub_was_spawned());
}

#[tokio::test]
async fn test_unknown_tab_is_named_before_spawn() {
    let ws = Workspace::happy();
    ws.add_crawl("site-2025", 10);
    let driver = ExportDriver::new(ws.config(), gui_closed());

    let err = driver
        .export_crawl("site-2025", Some("Internal:All,Bogus:All"), None, None)
        .await
        .unwrap_err();
    assert!(err.to_string().contains("Bogus:All"));
    assert!(!ws.stub_was_spawned());
}

#[tokio::test]
async fn test_unknown_crawl_id_is_not_found() {
    let ws = Workspace::happy();
    let driver = ExportDriver::new(ws.config(), gui_closed());

    let err = driver
        .export_crawl("missing-crawl", Some("Internal:All"), None, None)
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
    assert!(!ws.stub_was_spawned());
}

#[tokio::test]
async fn test_nonzero_exit_is_subprocess_failure() {
    let ws = Workspace::new(CRAWL_SAVES, EXPORT_FAILS);
    ws.add_crawl("site-2025", 10);
    let driver = ExportDriver::new(ws.config(), gui_closed());

    let err = driver
        .export_crawl("site-2025", Some("Internal:All"), None, None)
        .await
        .unwrap_err();
    match err {
        SpiderError::SubprocessFailed {
            exit_code,
            output_tail,
        } => {
            assert_eq!(exit_code, Some(2));
            assert!(output_tail.contains("boom: crawl could not be loaded"));
        }
        other => panic!("expected SubprocessFailed, got {other:?}"),
    }
    assert_eq!(kodegen_tools_seo_spider::export::count_export_dirs(&ws.export_root), 0);
}

#[tokio::test]
async fn test_export_timeout_kills_subprocess() {
    let ws = Workspace::new(CRAWL_SAVES, EXPORT_HANGS);
    ws.add_crawl("site-2025", 10);
    let config = Arc::new(
        ws.builder()
            .export_timeout(Duration::from_secs(1))
            .build()
            .unwrap(),
    );
    let driver = ExportDriver::new(config, gui_closed());

    let started = Instant::now();
    let err = driver
        .export_crawl("site-2025", Some("Internal:All"), None, None)
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Timeout);
    assert!(started.elapsed() < Duration::from_secs(10));
    assert_eq!(kodegen_tools_seo_spider::export::count_export_dirs(&ws.export_root), 0);
}

/// True once `pid` is gone or only a zombie waiting to be reaped
#[cfg(target_os = "linux")]
fn process_is_dead(pid: &str) -> bool {
    match std::fs::read_to_string(format!("/proc/{pid}/stat")) {
        Ok(stat) => stat
            .rsplit_once(") ")
            .is_some_and(|(_, rest)| rest.starts_with('Z') || rest.starts_with('X')),
        Err(_) => true,
    }
}

#[cfg(target_os = "linux")]
#[tokio::test]
async fn test_export_timeout_kills_background_workers() {
    let ws = Workspace::new(CRAWL_SAVES, EXPORT_SPAWNS_WORKER);
    ws.add_crawl("site-2025", 10);
    let config = Arc::new(
        ws.builder()
            .export_timeout(Duration::from_secs(1))
            .build()
            .unwrap(),
    );
    let driver = ExportDriver::new(config, gui_closed());

    let err = driver
        .export_crawl("site-2025", Some("Internal:All"), None, None)
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Timeout);

    let pid_file = ws.root.path().join("worker.pid");
    let pid = std::fs::read_to_string(&pid_file).unwrap();
    let pid = pid.trim();
    assert!(!pid.is_empty());

    let deadline = Instant::now() + Duration::from_secs(2);
    while !process_is_dead(pid) && Instant::now() < deadline {
        tokio::time::sleep(Duration::from_millis(50)).await;
    }
    assert!(process_is_dead(pid), "worker {pid} outlived the export timeout");
}

#[tokio::test]
async fn test_active_export_cap() {
    let ws = Workspace::new(CRAWL_SAVES, EXPORT_ROWS);
    ws.add_crawl("site-2025", 10);
    let config = Arc::new(ws.builder().max_active_exports(1).build().unwrap());
    let driver = ExportDriver::new(config, gui_closed());

    driver
        .export_crawl("site-2025", Some("Internal:All"), None, None)
        .await
        .unwrap();
    let err = driver
        .export_crawl("site-2025", Some("Internal:All"), None, None)
        .await
        .unwrap_err();
    assert!(matches!(err, SpiderError::LimitReached(_)));
    assert_eq!(ws.invocations().len(), 1);
}
