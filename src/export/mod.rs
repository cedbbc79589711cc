//! Export driver, export name catalog and CSV reader

pub mod catalog;
pub mod driver;
pub mod reader;

pub use catalog::{
    BULK_EXPORTS, EXPORT_REFERENCE_URI, EXPORT_TABS, ExportSpec, REPORTS, TabCatalogEntry,
    render_reference,
};
pub use driver::{ExportDriver, ExportResult, ExportedFile, count_export_dirs};
pub use reader::{CsvPage, count_data_rows, read_csv, resolve_export_path};
