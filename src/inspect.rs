//! Structural inspection: per-sheet bounds and sizing advice, without
//! reading any cell values.

use tracing::debug;

use crate::advisor::advise;
use crate::error::InspectError;
use crate::types::FileInfo;
use crate::workbook::Workbook;

/// Describe every sheet of `workbook` and advise a batch size for
/// `target_sheet` (the first sheet when `None`).
///
/// All-or-nothing: any unreadable sheet fails the whole inspection.
pub fn inspect(workbook: &Workbook, target_sheet: Option<&str>) -> Result<FileInfo, InspectError> {
    let first = workbook.first_sheet().ok_or(InspectError::NoSheets)?;
    let target = match target_sheet {
        Some(name) if workbook.has_sheet(name) => name,
        Some(name) => return Err(InspectError::SheetNotFound(name.to_string())),
        None => first,
    };

    let mut sheets = Vec::with_capacity(workbook.sheets().len());
    for entry in workbook.sheets() {
        sheets.push(workbook.dimensions(entry)?.clone());
    }

    let target_cells = sheets
        .iter()
        .find(|s| s.sheet_name == target)
        .map_or(0, |s| s.cell_count);
    let total_cell_count = sheets
        .iter()
        .fold(0u64, |acc, s| acc.saturating_add(s.cell_count));
    let advice = advise(target_cells);

    debug!(
        origin = workbook.origin(),
        target,
        target_cells,
        size_class = advice.size_class.as_str(),
        "inspected workbook"
    );

    Ok(FileInfo {
        origin: workbook.origin().to_string(),
        format: workbook.format(),
        file_size_bytes: workbook.file_size(),
        sheets,
        target_sheet: target.to_string(),
        total_cell_count,
        size_class: advice.size_class,
        recommended_batch_size: advice.recommended_batch_size,
    })
}
