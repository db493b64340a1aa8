//! Cursor-based batch reading.
//!
//! The cursor lives entirely with the caller: every [`BatchResult`] carries
//! the window that continues it, and the engine keeps no per-sheet reading
//! state between calls.

use std::ops::RangeInclusive;

use tracing::debug;

use crate::advisor::recommend_batch_size;
use crate::error::ReadError;
use crate::types::{BatchResult, NextBatchInfo, RowWindow};
use crate::workbook::Workbook;

/// What one call will read, once bounds are known.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Plan {
    /// `start_row` is past the last row.
    Exhausted,
    Rows {
        start: u32,
        end: u32,
        next: Option<NextBatchInfo>,
    },
}

fn validate(window: &RowWindow) -> Result<(), ReadError> {
    if window.start_row < 1 {
        return Err(ReadError::InvalidStartRow(window.start_row));
    }
    if let Some(size @ 0) = window.batch_size {
        return Err(ReadError::InvalidBatchSize(size));
    }
    if let Some(end_row) = window.end_row {
        if end_row < window.start_row {
            return Err(ReadError::InvalidEndRow {
                start_row: window.start_row,
                end_row,
            });
        }
    }
    if let Some(col @ 0) = window.start_col {
        return Err(ReadError::InvalidStartCol(col));
    }
    if let Some(end_col) = window.end_col {
        let start_col = window.start_col.unwrap_or(1);
        if end_col < start_col {
            return Err(ReadError::InvalidEndCol { start_col, end_col });
        }
    }
    Ok(())
}

/// Columns each returned row covers: the requested range clipped to the
/// sheet width. Empty when the range starts past the last column.
fn column_span(window: &RowWindow, col_count: u32) -> RangeInclusive<u32> {
    let start = window.start_col.unwrap_or(1);
    let end = window.end_col.map_or(col_count, |end| end.min(col_count));
    start..=end
}

/// Resolve a validated window against the sheet's last row.
///
/// The page size is `batch_size`, else the width of the explicit range,
/// else `advised`. An explicit `end_row` bounds the current call.
fn plan(window: &RowWindow, row_count: u32, advised: u32) -> Plan {
    let start = window.start_row;
    let page_size = window
        .batch_size
        .or_else(|| window.end_row.map(|end| end - start + 1))
        .unwrap_or(advised)
        .max(1);

    if start > row_count {
        return Plan::Exhausted;
    }

    let requested_end = window
        .end_row
        .unwrap_or_else(|| start.saturating_add(page_size - 1));
    let end = requested_end.min(row_count);
    let next = (end < row_count).then(|| NextBatchInfo {
        start_row: end + 1,
        batch_size: page_size,
        start_col: window.start_col,
        end_col: window.end_col,
    });

    Plan::Rows { start, end, next }
}

/// Read one page of `sheet_name` described by `window`.
///
/// Windows running past the last row are clamped to it; a window starting
/// past it yields an empty batch with no cursor.
pub fn read_batch(
    workbook: &Workbook,
    sheet_name: &str,
    window: &RowWindow,
) -> Result<BatchResult, ReadError> {
    let entry = workbook
        .sheet(sheet_name)
        .ok_or_else(|| ReadError::SheetNotFound(sheet_name.to_string()))?;
    validate(window)?;

    let dims = workbook.dimensions(entry)?;
    let advised = recommend_batch_size(dims.cell_count);
    let cols = column_span(window, dims.col_count);
    let end_col = (!cols.is_empty()).then(|| *cols.end());

    match plan(window, dims.row_count, advised) {
        Plan::Exhausted => {
            debug!(
                sheet = sheet_name,
                start_row = window.start_row,
                total_rows = dims.row_count,
                "batch past end of sheet"
            );
            Ok(BatchResult {
                sheet_name: sheet_name.to_string(),
                start_row: window.start_row,
                end_row: None,
                start_col: *cols.start(),
                end_col,
                rows: Vec::new(),
                rows_returned: 0,
                total_rows: dims.row_count,
                total_cols: dims.col_count,
                next_batch_info: None,
            })
        }
        Plan::Rows { start, end, next } => {
            let start_col = *cols.start();
            let rows = workbook.rows(entry, start, end, cols)?;
            let rows_returned = u32::try_from(rows.len()).unwrap_or(u32::MAX);
            debug!(
                sheet = sheet_name,
                start_row = start,
                end_row = end,
                start_col,
                end_col,
                rows_returned,
                has_next = next.is_some(),
                "read batch"
            );
            Ok(BatchResult {
                sheet_name: sheet_name.to_string(),
                start_row: start,
                end_row: Some(end),
                start_col,
                end_col,
                rows,
                rows_returned,
                total_rows: dims.row_count,
                total_cols: dims.col_count,
                next_batch_info: next,
            })
        }
    }
}

/// Iterator that follows the cursor from a starting window until the sheet
/// is exhausted or a read fails.
///
/// Empty batches are not yielded, so an empty sheet produces no items.
#[derive(Debug)]
pub struct Batches<'a> {
    workbook: &'a Workbook,
    sheet_name: &'a str,
    next: Option<RowWindow>,
}

impl<'a> Batches<'a> {
    #[must_use]
    pub fn new(workbook: &'a Workbook, sheet_name: &'a str, start: RowWindow) -> Self {
        Self {
            workbook,
            sheet_name,
            next: Some(start),
        }
    }
}

impl Iterator for Batches<'_> {
    type Item = Result<BatchResult, ReadError>;

    fn next(&mut self) -> Option<Self::Item> {
        let window = self.next.take()?;
        match read_batch(self.workbook, self.sheet_name, &window) {
            Ok(batch) if batch.rows.is_empty() => None,
            Ok(batch) => {
                self.next = batch.next_batch_info.map(RowWindow::from);
                Some(Ok(batch))
            }
            Err(e) => Some(Err(e)),
        }
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::panic
)]
mod tests {
    use super::*;
    use test_case::test_case;

    fn next(start_row: u32, batch_size: u32) -> Option<NextBatchInfo> {
        Some(NextBatchInfo::rows(start_row, batch_size))
    }

    #[test_case(RowWindow::batch(1, 50), 120 => Plan::Rows { start: 1, end: 50, next: next(51, 50) }; "first page")]
    #[test_case(RowWindow::batch(101, 50), 120 => Plan::Rows { start: 101, end: 120, next: None }; "last page clamped")]
    #[test_case(RowWindow::batch(121, 50), 120 => Plan::Exhausted; "past end")]
    #[test_case(RowWindow::batch(500, 50), 120 => Plan::Exhausted; "far past end")]
    #[test_case(RowWindow::range(1, 1_120), 120 => Plan::Rows { start: 1, end: 120, next: None }; "range clamped")]
    #[test_case(RowWindow::range(10, 19), 120 => Plan::Rows { start: 10, end: 19, next: next(20, 10) }; "range width is page size")]
    #[test_case(RowWindow::from_row(1), 120 => Plan::Rows { start: 1, end: 120, next: None }; "advised size covers sheet")]
    #[test_case(RowWindow::from_row(1), 500 => Plan::Rows { start: 1, end: 200, next: next(201, 200) }; "advised size pages")]
    #[test_case(RowWindow::range(5, 6).with_batch_size(30), 120 => Plan::Rows { start: 5, end: 6, next: next(7, 30) }; "end_row wins, batch_size carried")]
    #[test_case(RowWindow::batch(120, 1), 120 => Plan::Rows { start: 120, end: 120, next: None }; "single last row")]
    #[test_case(RowWindow::batch(1, 10), 0 => Plan::Exhausted; "empty sheet")]
    fn test_plan(window: RowWindow, row_count: u32) -> Plan {
        plan(&window, row_count, 200)
    }

    #[test]
    fn test_plan_saturates_near_u32_max() {
        let p = plan(&RowWindow::batch(u32::MAX - 1, 50), u32::MAX, 20);
        assert_eq!(
            p,
            Plan::Rows {
                start: u32::MAX - 1,
                end: u32::MAX,
                next: None
            }
        );
    }

    #[test]
    fn test_plan_at_grid_end_has_no_cursor() {
        let p = plan(&RowWindow::from_row(u32::MAX), u32::MAX, 20);
        assert_eq!(
            p,
            Plan::Rows {
                start: u32::MAX,
                end: u32::MAX,
                next: None
            }
        );
    }

    #[test]
    fn test_cursor_keeps_column_range() {
        let window = RowWindow::batch(1, 10).with_columns(3, 5);
        let Plan::Rows { next: Some(n), .. } = plan(&window, 40, 200) else {
            panic!("expected a continuing page");
        };
        assert_eq!((n.start_row, n.start_col, n.end_col), (11, Some(3), Some(5)));
    }

    #[test_case(RowWindow::from_row(1), 6 => 1..=6; "full width")]
    #[test_case(RowWindow::from_row(1).with_columns(2, 4), 6 => 2..=4; "inner range")]
    #[test_case(RowWindow::from_row(1).with_columns(5, 99), 6 => 5..=6; "clipped to width")]
    #[test_case(RowWindow::from_row(1).with_columns(8, 9), 6 => 8..=6; "past last column")]
    #[test_case(RowWindow { start_col: Some(3), ..RowWindow::from_row(1) }, 6 => 3..=6; "open ended")]
    fn test_column_span(window: RowWindow, col_count: u32) -> RangeInclusive<u32> {
        column_span(&window, col_count)
    }

    #[test]
    fn test_column_validation() {
        assert!(matches!(
            validate(&RowWindow::from_row(1).with_columns(0, 3)),
            Err(ReadError::InvalidStartCol(0))
        ));
        assert!(matches!(
            validate(&RowWindow::from_row(1).with_columns(4, 2)),
            Err(ReadError::InvalidEndCol {
                start_col: 4,
                end_col: 2
            })
        ));
        let only_end = RowWindow {
            end_col: Some(1),
            ..RowWindow::from_row(1)
        };
        assert!(validate(&only_end).is_ok());
    }

    #[test]
    fn test_validation_order() {
        assert!(matches!(
            validate(&RowWindow::batch(0, 0)),
            Err(ReadError::InvalidStartRow(0))
        ));
        assert!(matches!(
            validate(&RowWindow::batch(1, 0)),
            Err(ReadError::InvalidBatchSize(0))
        ));
        assert!(matches!(
            validate(&RowWindow::range(10, 9)),
            Err(ReadError::InvalidEndRow {
                start_row: 10,
                end_row: 9
            })
        ));
        assert!(validate(&RowWindow::range(10, 10)).is_ok());
    }

    #[test]
    fn test_pages_tile_the_sheet() {
        for size in [1, 7, 50, 119, 120, 121] {
            let mut window = RowWindow::batch(1, size);
            let mut covered = 0;
            loop {
                match plan(&window, 120, 200) {
                    Plan::Exhausted => break,
                    Plan::Rows { start, end, next } => {
                        assert_eq!(start, covered + 1);
                        covered = end;
                        match next {
                            Some(n) => window = n.into(),
                            None => break,
                        }
                    }
                }
            }
            assert_eq!(covered, 120, "batch size {size}");
        }
    }
}
