//! Common test utilities: on-disk fixtures and handle helpers.
#![allow(
    dead_code,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::panic
)]

use std::io::Write;
use std::path::Path;

use tempfile::NamedTempFile;
use xlchunk::{CellValue, EngineConfig, Origin, Workbook};

// Re-export fixtures for convenience
pub use super::fixtures::*;

/// Write `bytes` to a temp file ending in `suffix` (".xlsx", ".csv", ...).
pub fn write_temp(bytes: &[u8], suffix: &str) -> NamedTempFile {
    let mut file = tempfile::Builder::new()
        .prefix("xlchunk-test-")
        .suffix(suffix)
        .tempfile()
        .unwrap();
    file.write_all(bytes).unwrap();
    file.flush().unwrap();
    file
}

/// Open a local file with the default configuration.
pub fn open(path: &Path) -> Workbook {
    Workbook::open(&Origin::Local(path.to_path_buf()), &EngineConfig::default())
        .expect("workbook opens")
}

/// Write an XLSX fixture to disk and open it. The temp file must outlive
/// the handle.
pub fn open_xlsx(bytes: &[u8]) -> (NamedTempFile, Workbook) {
    let file = write_temp(bytes, ".xlsx");
    let wb = open(file.path());
    (file, wb)
}

/// First-column values of `rows`, as numbers.
pub fn first_column(rows: &[Vec<CellValue>]) -> Vec<f64> {
    rows.iter()
        .map(|row| row[0].as_f64().expect("numeric first column"))
        .collect()
}

/// Expected first-column values of a [`SheetBuilder::grid`] for rows
/// `first..=last`.
pub fn grid_rows(first: u32, last: u32) -> Vec<f64> {
    (first..=last).map(|r| grid_value(r, 1)).collect()
}
