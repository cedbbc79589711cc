//! Pagination and filtering of exported CSV files

use kodegen_tools_seo_spider::error::{ErrorKind, SpiderError};
use kodegen_tools_seo_spider::export::{read_csv, resolve_export_path};
use tempfile::TempDir;

mod common;

use common::write_csv;

/// Ten rows; rows 3 and 7 are 404s
fn ten_row_export(dir: &TempDir) -> std::path::PathBuf {
    let rows: Vec<String> = (1..=10)
        .map(|i| {
            let status = if i == 3 || i == 7 { "404" } else { "200" };
            format!("https://example.com/page-{i},{status},Page {i}")
        })
        .collect();
    write_csv(
        &dir.path().join("export-0001"),
        "internal_all.csv",
        "Address,Status Code,Title 1",
        &rows,
    )
}

#[test]
fn test_offset_and_limit_return_requested_window() {
    let dir = TempDir::new().unwrap();
    let path = ten_row_export(&dir);

    let page = read_csv(&path, 5, 3, None, None).unwrap();

    assert_eq!(page.total_row_count, 10);
    assert_eq!(page.rows.len(), 3);
    assert_eq!(page.rows[0][0], "https://example.com/page-6");
    assert_eq!(page.rows[2][0], "https://example.com/page-8");
    assert!(page.has_more);
    assert_eq!(page.columns, vec!["Address", "Status Code", "Title 1"]);
}

#[test]
fn test_filter_counts_matches_before_pagination() {
    let dir = TempDir::new().unwrap();
    let path = ten_row_export(&dir);

    let page = read_csv(&path, 0, 100, Some("Status Code"), Some("404")).unwrap();

    assert_eq!(page.total_row_count, 2);
    assert_eq!(page.rows.len(), 2);
    assert_eq!(page.rows[0][0], "https://example.com/page-3");
    assert_eq!(page.rows[1][0], "https://example.com/page-7");
    assert!(!page.has_more);
}

#[test]
fn test_filter_is_case_insensitive_substring() {
    let dir = TempDir::new().unwrap();
    let path = ten_row_export(&dir);

    let page = read_csv(&path, 0, 100, Some("title 1"), Some("PAGE 1")).unwrap();

    // "Page 1" and "Page 10"
    assert_eq!(page.total_row_count, 2);
}

#[test]
fn test_offset_past_end_returns_empty_page() {
    let dir = TempDir::new().unwrap();
    let path = ten_row_export(&dir);

    let page = read_csv(&path, 50, 10, None, None).unwrap();
    assert!(page.rows.is_empty());
    assert_eq!(page.total_row_count, 10);
}

#[test]
fn test_unknown_filter_column() {
    let dir = TempDir::new().unwrap();
    let path = ten_row_export(&dir);

    let err = read_csv(&path, 0, 10, Some("Indexability"), Some("x")).unwrap_err();
    match &err {
        SpiderError::ColumnNotFound { column, available } => {
            assert_eq!(column, "Indexability");
            assert_eq!(available.len(), 3);
        }
        other => panic!("expected ColumnNotFound, got {other:?}"),
    }
    assert_eq!(err.kind(), ErrorKind::ColumnNotFound);
}

#[test]
fn test_missing_file_is_not_found() {
    let dir = TempDir::new().unwrap();
    let err = read_csv(&dir.path().join("nope.csv"), 0, 10, None, None).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
}

#[test]
fn test_zero_limit_is_invalid() {
    let dir = TempDir::new().unwrap();
    let path = ten_row_export(&dir);
    let err = read_csv(&path, 0, 0, None, None).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidArgument);
}

#[test]
fn test_paths_resolve_inside_export_root_only() {
    let dir = TempDir::new().unwrap();
    let export_root = dir.path().join("exports");
    let csv = write_csv(&export_root.join("export-0001"), "h1_all.csv", "Address", &[]);
    std::fs::write(dir.path().join("secret.csv"), "Address\n").unwrap();

    let relative = resolve_export_path(&export_root, "export-0001/h1_all.csv").unwrap();
    assert_eq!(relative.canonicalize().unwrap(), csv.canonicalize().unwrap());
    assert!(resolve_export_path(&export_root, csv.to_str().unwrap()).is_ok());

    let err = resolve_export_path(&export_root, "../secret.csv").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidArgument);

    let err = resolve_export_path(&export_root, "export-0001/missing.csv").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
}
