use serde::{Deserialize, Serialize};

use crate::advisor::SizeClass;

/// Container format detected when a source is opened.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SourceFormat {
    /// Office Open XML spreadsheet package (.xlsx / .xlsm).
    Xlsx,
    /// Comma separated text, exposed as a single sheet.
    Csv,
    /// Tab separated text, exposed as a single sheet.
    Tsv,
}

impl SourceFormat {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Xlsx => "xlsx",
            Self::Csv => "csv",
            Self::Tsv => "tsv",
        }
    }
}

/// Structural bounds of one sheet.
///
/// `row_count` is the number of the last used row and `col_count` the
/// number of the last used column, so leading blank rows/columns count.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct SheetDimensions {
    pub sheet_name: String,
    pub row_count: u32,
    pub col_count: u32,
    pub cell_count: u64,
}

impl SheetDimensions {
    /// Build dimensions; `cell_count` is always derived from the bounds.
    #[must_use]
    pub fn new(sheet_name: impl Into<String>, row_count: u32, col_count: u32) -> Self {
        Self {
            sheet_name: sheet_name.into(),
            row_count,
            col_count,
            cell_count: u64::from(row_count) * u64::from(col_count),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cell_count == 0
    }
}

/// Result of a structural inspection.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct FileInfo {
    pub origin: String,
    pub format: SourceFormat,
    pub file_size_bytes: u64,
    /// One entry per sheet, in workbook order.
    pub sheets: Vec<SheetDimensions>,
    /// Sheet the sizing advice applies to.
    pub target_sheet: String,
    /// Sum of `cell_count` over all sheets (informational only).
    pub total_cell_count: u64,
    pub size_class: SizeClass,
    pub recommended_batch_size: u32,
}

impl FileInfo {
    #[must_use]
    pub fn sheet(&self, name: &str) -> Option<&SheetDimensions> {
        self.sheets.iter().find(|s| s.sheet_name == name)
    }

    #[must_use]
    pub fn sheet_names(&self) -> Vec<&str> {
        self.sheets.iter().map(|s| s.sheet_name.as_str()).collect()
    }
}
