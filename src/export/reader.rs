//! Paginated, filterable reads of exported CSV files

use serde::Serialize;
use std::path::{Path, PathBuf};

use crate::error::{SpiderError, SpiderResult};
use crate::utils::{CELL_DISPLAY_MAX_CHARS, MAX_READ_LIMIT, path_is_contained, truncate_cell};

/// Byte order mark Screaming Frog writes at the start of every CSV
const UTF8_BOM: char = '\u{feff}';

/// One page of CSV rows
#[derive(Debug, Clone, Serialize)]
pub struct CsvPage {
    pub path: PathBuf,
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
    /// Rows matching the filter, before pagination
    pub total_row_count: usize,
    pub offset: usize,
    pub has_more: bool,
}

/// Resolve a caller-supplied CSV path against the scratch root.
///
/// Relative paths are joined onto `export_root`. The result must exist and
/// lie inside `export_root` after symlinks are resolved.
///
/// # Errors
///
/// Returns `NotFound` for missing files and `InvalidArgument` for paths that
/// escape the scratch root.
pub fn resolve_export_path(export_root: &Path, requested: &str) -> SpiderResult<PathBuf> {
    let requested = requested.trim();
    if requested.is_empty() {
        return Err(SpiderError::InvalidArgument("path must not be empty".to_string()));
    }

    let candidate = Path::new(requested);
    let path = if candidate.is_absolute() {
        candidate.to_path_buf()
    } else {
        export_root.join(candidate)
    };

    if !path.is_file() {
        return Err(SpiderError::NotFound {
            what: "Export file",
            id: requested.to_string(),
        });
    }
    if !path_is_contained(&path, export_root) {
        return Err(SpiderError::InvalidArgument(format!(
            "path '{requested}' is outside the export directory {}",
            export_root.display()
        )));
    }
    Ok(path)
}

/// Read `limit` rows starting at `offset`, optionally keeping only rows whose
/// `filter_column` contains `filter_value` (case-insensitive).
///
/// The filter applies only when both column and value are given; a column
/// alone is still checked against the header row. `limit` is capped at
/// [`MAX_READ_LIMIT`] and cells are truncated for display.
///
/// # Errors
///
/// Returns `NotFound` if the file does not exist, `ColumnNotFound` if the
/// filter column is not a header, `InvalidArgument` for a zero limit, and
/// CSV errors for malformed files.
pub fn read_csv(
    path: &Path,
    offset: usize,
    limit: usize,
    filter_column: Option<&str>,
    filter_value: Option<&str>,
) -> SpiderResult<CsvPage> {
    if limit == 0 {
        return Err(SpiderError::InvalidArgument("limit must be at least 1".to_string()));
    }
    let limit = limit.min(MAX_READ_LIMIT);

    if !path.is_file() {
        return Err(SpiderError::NotFound {
            what: "Export file",
            id: path.display().to_string(),
        });
    }

    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_path(path)?;

    let columns: Vec<String> = reader
        .headers()?
        .iter()
        .enumerate()
        .map(|(i, h)| {
            if i == 0 {
                h.trim_start_matches(UTF8_BOM).to_string()
            } else {
                h.to_string()
            }
        })
        .collect();

    let column_index = match filter_column.map(str::trim).filter(|c| !c.is_empty()) {
        Some(column) => Some(find_column(&columns, column)?),
        None => None,
    };
    let filter = match (column_index, filter_value) {
        (Some(index), Some(value)) => Some((index, value.to_lowercase())),
        _ => None,
    };

    let mut rows = Vec::new();
    let mut total_row_count = 0usize;

    for record in reader.records() {
        let record = record?;
        if let Some((index, needle)) = &filter {
            let matches = record
                .get(*index)
                .is_some_and(|cell| cell.to_lowercase().contains(needle.as_str()));
            if !matches {
                continue;
            }
        }

        if total_row_count >= offset && rows.len() < limit {
            rows.push(
                record
                    .iter()
                    .map(|cell| truncate_cell(cell, CELL_DISPLAY_MAX_CHARS))
                    .collect(),
            );
        }
        total_row_count += 1;
    }

    Ok(CsvPage {
        path: path.to_path_buf(),
        columns,
        has_more: offset.saturating_add(rows.len()) < total_row_count,
        rows,
        total_row_count,
        offset,
    })
}

/// Count data rows (excluding the header) in a CSV file
///
/// # Errors
///
/// Returns CSV or IO errors from reading the file.
pub fn count_data_rows(path: &Path) -> SpiderResult<u64> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_path(path)?;
    let mut count = 0u64;
    for record in reader.records() {
        record?;
        count += 1;
    }
    Ok(count)
}

fn find_column(columns: &[String], wanted: &str) -> SpiderResult<usize> {
    columns
        .iter()
        .position(|c| c == wanted)
        .or_else(|| columns.iter().position(|c| c.eq_ignore_ascii_case(wanted)))
        .ok_or_else(|| SpiderError::ColumnNotFound {
            column: wanted.to_string(),
            available: columns.to_vec(),
        })
}
