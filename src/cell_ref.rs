//! Utilities for parsing Excel-style cell references and ranges.
//!
//! Rows and columns are 1-based throughout: `A1` is `(1, 1)`.

use std::ops::RangeInclusive;

/// Last column of the spreadsheet grid (`XFD`).
pub const MAX_COLS: u32 = 16_384;
/// Last row of the spreadsheet grid.
pub const MAX_ROWS: u32 = 1_048_576;

/// Parse a cell reference like "B3" into (col, row), both 1-based.
///
/// `$` anchors are ignored. Returns `None` when the column or row part is
/// missing, the reference contains other characters, or it lies outside
/// the `XFD1048576` grid.
pub fn parse_cell_ref(cell_ref: &str) -> Option<(u32, u32)> {
    parse_cell_ref_bytes(cell_ref.trim().as_bytes())
}

/// Bytes equivalent of [`parse_cell_ref`] for raw XML attribute values.
pub fn parse_cell_ref_bytes(ref_bytes: &[u8]) -> Option<(u32, u32)> {
    let mut col: u32 = 0;
    let mut row: u32 = 0;
    let mut saw_col = false;
    let mut saw_row = false;

    for &b in ref_bytes {
        if b == b'$' {
            continue;
        }
        if b.is_ascii_alphabetic() {
            if saw_row {
                return None;
            }
            let upper = b.to_ascii_uppercase();
            col = col
                .saturating_mul(26)
                .saturating_add(u32::from(upper - b'A') + 1);
            saw_col = true;
        } else if b.is_ascii_digit() {
            row = row.saturating_mul(10).saturating_add(u32::from(b - b'0'));
            saw_row = true;
        } else {
            return None;
        }
    }

    if !saw_col || !saw_row || row == 0 || col > MAX_COLS || row > MAX_ROWS {
        return None;
    }

    Some((col, row))
}

/// Parse a range like "A1:C120" (or a single cell "A1") into
/// `((start_col, start_row), (end_col, end_row))`.
pub fn parse_cell_range(range: &str) -> Option<((u32, u32), (u32, u32))> {
    if let Some((start, end)) = range.split_once(':') {
        Some((parse_cell_ref(start)?, parse_cell_ref(end)?))
    } else {
        let cell = parse_cell_ref(range)?;
        Some((cell, cell))
    }
}

/// Parse a column given as letters ("C", "aa") or as a 1-based number
/// ("3"). `None` outside `1..=MAX_COLS`.
pub fn parse_column(column: &str) -> Option<u32> {
    let column = column.trim();
    let col = if column.bytes().all(|b| b.is_ascii_digit()) {
        column.parse().ok()?
    } else if column.bytes().all(|b| b.is_ascii_alphabetic()) {
        parse_cell_ref(&format!("{column}1"))?.0
    } else {
        return None;
    };
    (1..=MAX_COLS).contains(&col).then_some(col)
}

/// Number of columns in an inclusive span; zero when it is empty.
pub(crate) fn span_width(span: &RangeInclusive<u32>) -> usize {
    if span.is_empty() {
        0
    } else {
        (span.end() - span.start()) as usize + 1
    }
}

/// Column number (1-based) to its letter name: 1 → "A", 27 → "AA".
pub fn column_letters(col: u32) -> String {
    let mut n = col;
    let mut letters = Vec::new();
    while n > 0 {
        let rem = (n - 1) % 26;
        // rem < 26, always a valid ASCII offset
        letters.push(char::from(b'A' + u8::try_from(rem).unwrap_or(0)));
        n = (n - 1) / 26;
    }
    letters.iter().rev().collect()
}
