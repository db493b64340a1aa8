//! Delimited text sources (CSV/TSV), exposed as a workbook with one sheet.
//!
//! Fields are never coerced: every non-empty field is a string cell and
//! empty fields are [`CellValue::Empty`]. Blank lines are not records.

use std::ops::RangeInclusive;
use std::path::Path;

use csv::{ByteRecord, Reader, ReaderBuilder};
use std::fs::File;

use crate::cell_ref::span_width;
use crate::error::SourceError;
use crate::types::{CellValue, Row};

/// Field separator of a delimited source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Delimiter {
    Comma,
    Tab,
}

impl Delimiter {
    fn byte(self) -> u8 {
        match self {
            Self::Comma => b',',
            Self::Tab => b'\t',
        }
    }

    /// Name of the single sheet a delimited source exposes.
    pub(crate) fn sheet_name(self) -> &'static str {
        match self {
            Self::Comma => "CSV",
            Self::Tab => "TSV",
        }
    }
}

fn open_reader(path: &Path, delim: Delimiter) -> Result<Reader<File>, SourceError> {
    Ok(ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .delimiter(delim.byte())
        .from_path(path)?)
}

/// Record count and widest record, in one streaming pass.
pub(crate) fn read_bounds(path: &Path, delim: Delimiter) -> Result<(u32, u32), SourceError> {
    let mut reader = open_reader(path, delim)?;
    let mut record = ByteRecord::new();
    let mut rows: u32 = 0;
    let mut cols: u32 = 0;

    while reader.read_byte_record(&mut record)? {
        rows = rows.saturating_add(1);
        cols = cols.max(u32::try_from(record.len()).unwrap_or(u32::MAX));
    }

    Ok((rows, cols))
}

/// Records `first..=last` (1-based), keeping the fields in `cols` and
/// padding short records.
pub(crate) fn read_rows(
    path: &Path,
    delim: Delimiter,
    first: u32,
    last: u32,
    cols: RangeInclusive<u32>,
) -> Result<Vec<Row>, SourceError> {
    if first == 0 || last < first {
        return Ok(Vec::new());
    }

    let mut reader = open_reader(path, delim)?;
    let mut record = ByteRecord::new();
    let mut rows = Vec::with_capacity((last - first) as usize + 1);
    let mut row_num: u32 = 0;

    while reader.read_byte_record(&mut record)? {
        row_num = row_num.saturating_add(1);
        if row_num < first {
            continue;
        }
        if row_num > last {
            break;
        }

        let width = span_width(&cols);
        let mut row: Row = record
            .iter()
            .skip(cols.start().saturating_sub(1) as usize)
            .take(width)
            .map(|field| {
                if field.is_empty() {
                    CellValue::Empty
                } else {
                    CellValue::String(String::from_utf8_lossy(field).into_owned())
                }
            })
            .collect();
        row.resize(width, CellValue::Empty);
        rows.push(row);
    }

    Ok(rows)
}
