//! Resolution of the Screaming Frog CLI launcher
#![cfg(unix)]

use kodegen_tools_seo_spider::cli::resolve_cli_path_from;
use kodegen_tools_seo_spider::error::SpiderError;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

fn write_launcher(path: &Path, mode: u32) -> PathBuf {
    std::fs::write(path, "#!/bin/sh\nexit 0\n").unwrap();
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(mode)).unwrap();
    path.to_path_buf()
}

#[test]
fn test_configured_path_wins_over_defaults() {
    let dir = TempDir::new().unwrap();
    let configured = write_launcher(&dir.path().join("configured"), 0o755);
    let default = write_launcher(&dir.path().join("default"), 0o755);

    let found = resolve_cli_path_from(Some(&configured), &[default]).unwrap();
    assert_eq!(found, configured);
}

#[test]
fn test_missing_configured_path_falls_back_to_defaults() {
    let dir = TempDir::new().unwrap();
    let default = write_launcher(&dir.path().join("default"), 0o755);

    let found = resolve_cli_path_from(Some(&dir.path().join("gone")), &[default.clone()]).unwrap();
    assert_eq!(found, default);
}

#[test]
fn test_defaults_tried_in_order() {
    let dir = TempDir::new().unwrap();
    let first = dir.path().join("first");
    let second = write_launcher(&dir.path().join("second"), 0o755);
    let third = write_launcher(&dir.path().join("third"), 0o755);

    let found = resolve_cli_path_from(None, &[first, second.clone(), third]).unwrap();
    assert_eq!(found, second);
}

#[test]
fn test_non_executable_file_is_skipped() {
    let dir = TempDir::new().unwrap();
    let plain = write_launcher(&dir.path().join("plain"), 0o644);
    let default = write_launcher(&dir.path().join("default"), 0o755);

    let found = resolve_cli_path_from(Some(&plain), &[default.clone()]).unwrap();
    assert_eq!(found, default);
}

#[test]
fn test_nothing_found_lists_every_searched_path() {
    let dir = TempDir::new().unwrap();
    let configured = dir.path().join("configured");
    let defaults = vec![dir.path().join("a"), dir.path().to_path_buf()];

    let err = resolve_cli_path_from(Some(&configured), &defaults).unwrap_err();
    match &err {
        SpiderError::CliNotFound { searched } => {
            assert_eq!(searched.len(), 3);
            assert_eq!(searched[0], configured);
        }
        other => panic!("expected CliNotFound, got {other:?}"),
    }
    assert!(err.to_string().contains("configured"));
}
