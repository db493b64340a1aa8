//! Bounded top-left sampling of a sheet.

use tracing::debug;

use crate::cell_ref::column_letters;
use crate::error::PreviewError;
use crate::types::PreviewResult;
use crate::workbook::Workbook;

pub const DEFAULT_PREVIEW_ROWS: u32 = 20;
pub const DEFAULT_PREVIEW_COLS: u32 = 10;
/// Hard ceilings; larger requests are clamped, never rejected.
pub const MAX_PREVIEW_ROWS: u32 = 100;
pub const MAX_PREVIEW_COLS: u32 = 50;

/// Sample at most `max_rows` x `max_cols` cells from the top-left corner of
/// `sheet_name`.
///
/// Reading stops after the last sampled row. The sheet's bounds are also
/// needed, though: they come from the `<dimension>` element when it is
/// usable, but a sheet without one (and every CSV/TSV source) is scanned
/// once end to end. The scan is cached on the handle and skips cell values.
pub fn preview(
    workbook: &Workbook,
    sheet_name: &str,
    max_rows: u32,
    max_cols: u32,
) -> Result<PreviewResult, PreviewError> {
    let entry = workbook
        .sheet(sheet_name)
        .ok_or_else(|| PreviewError::SheetNotFound(sheet_name.to_string()))?;
    let dims = workbook.dimensions(entry)?;

    let preview_rows = max_rows.min(MAX_PREVIEW_ROWS).min(dims.row_count);
    let preview_cols = max_cols.min(MAX_PREVIEW_COLS).min(dims.col_count);

    let rows = if preview_rows == 0 {
        Vec::new()
    } else {
        workbook.rows(entry, 1, preview_rows, 1..=preview_cols)?
    };
    let columns = (1..=preview_cols).map(column_letters).collect();

    debug!(
        sheet = sheet_name,
        preview_rows,
        preview_cols,
        row_count = dims.row_count,
        col_count = dims.col_count,
        "sampled preview"
    );

    Ok(PreviewResult {
        sheet_name: sheet_name.to_string(),
        columns,
        rows,
        preview_rows,
        preview_cols,
        row_count: dims.row_count,
        col_count: dims.col_count,
        truncated: preview_rows < dims.row_count || preview_cols < dims.col_count,
    })
}

/// Like [`preview`], but defaults the sheet to the first one and the
/// limits to [`DEFAULT_PREVIEW_ROWS`] / [`DEFAULT_PREVIEW_COLS`].
pub fn preview_default(
    workbook: &Workbook,
    sheet_name: Option<&str>,
    max_rows: Option<u32>,
    max_cols: Option<u32>,
) -> Result<PreviewResult, PreviewError> {
    let sheet = match sheet_name {
        Some(name) => name,
        None => workbook.first_sheet().ok_or(PreviewError::NoSheets)?,
    };
    preview(
        workbook,
        sheet,
        max_rows.unwrap_or(DEFAULT_PREVIEW_ROWS),
        max_cols.unwrap_or(DEFAULT_PREVIEW_COLS),
    )
}
