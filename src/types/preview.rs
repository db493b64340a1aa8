use serde::{Deserialize, Serialize};

use super::Row;

/// Top-left sample of a sheet. Not part of the pagination sequence.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct PreviewResult {
    pub sheet_name: String,
    /// Column letters of the sampled columns ("A", "B", ...).
    pub columns: Vec<String>,
    pub rows: Vec<Row>,
    pub preview_rows: u32,
    pub preview_cols: u32,
    /// True sheet bounds, for context.
    pub row_count: u32,
    pub col_count: u32,
    /// Whether the sheet extends beyond the sampled rectangle.
    pub truncated: bool,
}
