use serde::{Deserialize, Serialize};

use super::Row;
use crate::cell_ref::parse_cell_range;

/// A requested row range, optionally narrowed to a column range. Rows and
/// columns are 1-based and `end_row`/`end_col` are inclusive.
///
/// When both `end_row` and `batch_size` are present, `end_row` bounds this
/// call and `batch_size` is the page size carried into the next cursor.
/// When neither is present the reader uses the advised batch size for the
/// sheet. Without a column range every row spans the full sheet width.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub struct RowWindow {
    pub start_row: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_row: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub batch_size: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_col: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_col: Option<u32>,
}

impl RowWindow {
    /// `batch_size` rows starting at `start_row`.
    #[must_use]
    pub fn batch(start_row: u32, batch_size: u32) -> Self {
        Self {
            batch_size: Some(batch_size),
            ..Self::from_row(start_row)
        }
    }

    /// Explicit inclusive range `start_row..=end_row`.
    #[must_use]
    pub fn range(start_row: u32, end_row: u32) -> Self {
        Self {
            end_row: Some(end_row),
            ..Self::from_row(start_row)
        }
    }

    /// Start at `start_row` with the advised batch size.
    #[must_use]
    pub fn from_row(start_row: u32) -> Self {
        Self {
            start_row,
            end_row: None,
            batch_size: None,
            start_col: None,
            end_col: None,
        }
    }

    /// Rectangle given in A1 notation, e.g. `"B2:D40"` or a single `"C7"`.
    /// `None` when the range does not parse or is inverted.
    #[must_use]
    pub fn cell_range(range: &str) -> Option<Self> {
        let ((start_col, start_row), (end_col, end_row)) = parse_cell_range(range)?;
        if end_row < start_row || end_col < start_col {
            return None;
        }
        Some(Self::range(start_row, end_row).with_columns(start_col, end_col))
    }

    #[must_use]
    pub fn with_end_row(mut self, end_row: u32) -> Self {
        self.end_row = Some(end_row);
        self
    }

    #[must_use]
    pub fn with_batch_size(mut self, batch_size: u32) -> Self {
        self.batch_size = Some(batch_size);
        self
    }

    /// Keep only columns `start_col..=end_col`.
    #[must_use]
    pub fn with_columns(mut self, start_col: u32, end_col: u32) -> Self {
        self.start_col = Some(start_col);
        self.end_col = Some(end_col);
        self
    }
}

/// Cursor returned with every non-final batch. The column range of the
/// request is carried along unchanged.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub struct NextBatchInfo {
    pub start_row: u32,
    pub batch_size: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_col: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_col: Option<u32>,
}

impl NextBatchInfo {
    /// Cursor over full-width rows.
    #[must_use]
    pub fn rows(start_row: u32, batch_size: u32) -> Self {
        Self {
            start_row,
            batch_size,
            start_col: None,
            end_col: None,
        }
    }
}

impl From<NextBatchInfo> for RowWindow {
    fn from(next: NextBatchInfo) -> Self {
        Self {
            start_col: next.start_col,
            end_col: next.end_col,
            ..Self::batch(next.start_row, next.batch_size)
        }
    }
}

/// One page of rows plus the cursor to continue from.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct BatchResult {
    pub sheet_name: String,
    pub start_row: u32,
    /// Last row returned; `None` when the batch is empty.
    pub end_row: Option<u32>,
    /// First column of each returned row.
    pub start_col: u32,
    /// Last column of each returned row; `None` when rows are empty.
    pub end_col: Option<u32>,
    pub rows: Vec<Row>,
    pub rows_returned: u32,
    pub total_rows: u32,
    pub total_cols: u32,
    /// `None` once the sheet is exhausted.
    pub next_batch_info: Option<NextBatchInfo>,
}

impl BatchResult {
    #[must_use]
    pub fn is_last(&self) -> bool {
        self.next_batch_info.is_none()
    }
}
