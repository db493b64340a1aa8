//! Tests for bounded previews.
#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::panic
)]

mod common;
mod fixtures;

use common::*;
use xlchunk::{
    preview, preview_default, CellValue, PreviewError, DEFAULT_PREVIEW_COLS,
    DEFAULT_PREVIEW_ROWS, MAX_PREVIEW_COLS, MAX_PREVIEW_ROWS,
};

#[test]
fn test_preview_is_top_left_corner() {
    let (_file, wb) = open_xlsx(&grid_xlsx(40, 8));
    let p = preview(&wb, "Data", 3, 2).unwrap();

    assert_eq!(p.columns, vec!["A", "B"]);
    assert_eq!((p.preview_rows, p.preview_cols), (3, 2));
    assert_eq!((p.row_count, p.col_count), (40, 8));
    assert!(p.truncated);
    assert_eq!(
        p.rows[2],
        vec![
            CellValue::Number(grid_value(3, 1)),
            CellValue::Number(grid_value(3, 2))
        ]
    );
}

#[test]
fn test_small_sheet_is_not_truncated() {
    let (_file, wb) = open_xlsx(&grid_xlsx(4, 3));
    let p = preview(&wb, "Data", 20, 10).unwrap();
    assert_eq!((p.preview_rows, p.preview_cols), (4, 3));
    assert_eq!(p.rows.len(), 4);
    assert!(!p.truncated);
}

#[test]
fn test_million_row_sheet_preview_is_bounded() {
    // The dimension claims 1,000,000 rows; only the first 12 exist and
    // everything after them is malformed, so reading past row 10 fails.
    let sheet = SheetBuilder::grid("Huge", 12, 7)
        .dimension("A1:G1000000")
        .tail(r#"<row r="13"><c r="A13"><v>0</v></c></wrong></row>"#);
    let (_file, wb) = open_xlsx(&XlsxBuilder::new().sheet(sheet).build());

    let p = preview(&wb, "Huge", 10, 5).unwrap();
    assert_eq!(p.rows.len(), 10);
    assert!(p.rows.iter().all(|r| r.len() == 5));
    assert_eq!(p.row_count, 1_000_000);
    assert!(p.truncated);
}

#[test]
fn test_requests_are_clamped_to_ceilings() {
    let (_file, wb) = open_xlsx(&grid_xlsx(150, 60));
    let p = preview(&wb, "Data", 10_000, 10_000).unwrap();
    assert_eq!(p.preview_rows, MAX_PREVIEW_ROWS);
    assert_eq!(p.preview_cols, MAX_PREVIEW_COLS);
    assert_eq!(p.columns.last().map(String::as_str), Some("AX"));
}

#[test]
fn test_defaults_use_first_sheet() {
    let xlsx = XlsxBuilder::new()
        .sheet(SheetBuilder::grid("First", 30, 12))
        .sheet(SheetBuilder::grid("Second", 2, 2))
        .build();
    let (_file, wb) = open_xlsx(&xlsx);

    let p = preview_default(&wb, None, None, None).unwrap();
    assert_eq!(p.sheet_name, "First");
    assert_eq!(p.preview_rows, DEFAULT_PREVIEW_ROWS);
    assert_eq!(p.preview_cols, DEFAULT_PREVIEW_COLS);

    let second = preview_default(&wb, Some("Second"), Some(1), None).unwrap();
    assert_eq!((second.preview_rows, second.preview_cols), (1, 2));
}

#[test]
fn test_zero_limits_give_empty_sample() {
    let (_file, wb) = open_xlsx(&grid_xlsx(5, 5));
    let p = preview(&wb, "Data", 0, 3).unwrap();
    assert!(p.rows.is_empty());
    assert_eq!(p.columns.len(), 3);
    assert!(p.truncated);
}

#[test]
fn test_preview_errors() {
    let (_file, wb) = open_xlsx(&grid_xlsx(5, 5));
    assert!(matches!(
        preview(&wb, "Other", 5, 5),
        Err(PreviewError::SheetNotFound(_))
    ));

    let (_file, empty) = open_xlsx(&XlsxBuilder::new().build());
    assert!(matches!(
        preview_default(&empty, None, None, None),
        Err(PreviewError::NoSheets)
    ));
}

#[test]
fn test_preview_does_not_disturb_pagination() {
    let (_file, wb) = open_xlsx(&grid_xlsx(60, 2));
    let before = xlchunk::read_batch(&wb, "Data", &xlchunk::RowWindow::batch(1, 25)).unwrap();
    let _ = preview(&wb, "Data", 10, 2).unwrap();
    let after = xlchunk::read_batch(&wb, "Data", &xlchunk::RowWindow::batch(1, 25)).unwrap();
    assert_eq!(before, after);
}

#[test]
fn test_preview_without_dimension_still_reports_bounds() {
    // No <dimension>: the bounds come from one scan of cell references.
    let sheet = SheetBuilder::grid("Data", 300, 12).no_dimension();
    let (_file, wb) = open_xlsx(&XlsxBuilder::new().sheet(sheet).build());

    let p = preview(&wb, "Data", 5, 2).unwrap();
    assert_eq!((p.row_count, p.col_count), (300, 12));
    assert_eq!(p.rows.len(), 5);
    assert!(p.truncated);

    // The scan is cached; a second preview agrees.
    assert_eq!(preview(&wb, "Data", 5, 2).unwrap(), p);
}
