//! Worksheet streaming: structural bounds and row windows.
//!
//! Neither pass materializes the whole sheet. Bounds come from the
//! `<dimension>` element when it is meaningful, otherwise from a scan of
//! cell references that never decodes values. Row windows skip rows before
//! the window without descending into them and stop at the first row past
//! it.

use quick_xml::events::Event;
use quick_xml::Reader;
use std::io::{BufRead, BufReader, Read, Seek};
use std::ops::RangeInclusive;
use tracing::warn;
use zip::ZipArchive;

use crate::cell_ref::{parse_cell_range, parse_cell_ref_bytes, span_width, MAX_COLS, MAX_ROWS};
use crate::error::SourceError;
use crate::types::{CellValue, Row};
use crate::xml_helpers::attr_u32;

/// Cell type tag from the `t` attribute of a `<c>` element.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum CellTypeTag {
    Shared,
    Inline,
    Str,
    Bool,
    Error,
    Date,
    Default,
}

fn parse_cell_type_tag(value: &[u8]) -> CellTypeTag {
    match value {
        b"s" => CellTypeTag::Shared,
        b"b" => CellTypeTag::Bool,
        b"e" => CellTypeTag::Error,
        b"str" => CellTypeTag::Str,
        b"inlineStr" => CellTypeTag::Inline,
        b"d" => CellTypeTag::Date,
        _ => CellTypeTag::Default,
    }
}

/// Last used row and column of a worksheet, both 1-based and never beyond
/// the grid. `(0, 0)` for an empty sheet.
pub(crate) fn read_bounds<R: Read + Seek>(
    archive: &mut ZipArchive<R>,
    path: &str,
) -> Result<(u32, u32), SourceError> {
    let file = archive.by_name(path)?;
    let mut xml = Reader::from_reader(BufReader::new(file));
    xml.trim_text(true);

    let mut buf = Vec::new();
    let mut row_num: u32 = 0;
    let mut next_col: u32 = 1;
    let mut max_row: u32 = 0;
    let mut max_col: u32 = 0;

    loop {
        match xml.read_event_into(&mut buf)? {
            Event::Start(ref e) | Event::Empty(ref e) => match e.local_name().as_ref() {
                b"dimension" => {
                    let raw = e.try_get_attribute("ref").ok().flatten();
                    let range = raw
                        .as_ref()
                        .and_then(|a| std::str::from_utf8(&a.value).ok().and_then(parse_cell_range));
                    match range {
                        // Excel writes "A1" for sheets it considers empty,
                        // and some writers emit it unconditionally.
                        Some((_, (1, 1))) => {}
                        Some((_, (end_col, end_row))) => return Ok((end_row, end_col)),
                        None => {
                            if let Some(a) = raw {
                                warn!(
                                    part = path,
                                    dimension = %String::from_utf8_lossy(&a.value),
                                    "unusable dimension, scanning cell references"
                                );
                            }
                        }
                    }
                }
                b"row" => {
                    row_num = attr_u32(e, b"r").unwrap_or_else(|| row_num.saturating_add(1));
                    next_col = 1;
                }
                b"c" => {
                    let (col, row) = cell_position(e, row_num, next_col);
                    next_col = col.saturating_add(1);
                    max_row = max_row.max(row);
                    max_col = max_col.max(col);
                }
                _ => {}
            },
            Event::End(ref e) if e.local_name().as_ref() == b"sheetData" => break,
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    Ok((max_row.min(MAX_ROWS), max_col.min(MAX_COLS)))
}

/// Read rows `first..=last` (1-based, inclusive), keeping the columns in
/// `cols`. Rows missing from the part come back as all-[`CellValue::Empty`].
pub(crate) fn read_rows<R: Read + Seek>(
    archive: &mut ZipArchive<R>,
    path: &str,
    shared_strings: &[String],
    first: u32,
    last: u32,
    cols: RangeInclusive<u32>,
) -> Result<Vec<Row>, SourceError> {
    let last = last.min(MAX_ROWS);
    let cols = *cols.start()..=(*cols.end()).min(MAX_COLS);
    if first == 0 || last < first {
        return Ok(Vec::new());
    }
    let height = (last - first) as usize + 1;
    let mut grid: Vec<Row> = vec![vec![CellValue::Empty; span_width(&cols)]; height];
    let first_col = *cols.start();

    let file = archive.by_name(path)?;
    let mut xml = Reader::from_reader(BufReader::new(file));
    xml.trim_text(false);

    let mut buf = Vec::new();
    let mut cell_buf = Vec::new();
    let mut row_num: u32 = 0;
    let mut next_col: u32 = 1;

    loop {
        match xml.read_event_into(&mut buf)? {
            ref event @ (Event::Start(_) | Event::Empty(_)) => {
                let (Event::Start(ref e) | Event::Empty(ref e)) = event else {
                    continue;
                };
                let is_start_event = matches!(event, Event::Start(_));

                match e.local_name().as_ref() {
                    b"row" => {
                        row_num = attr_u32(e, b"r").unwrap_or_else(|| row_num.saturating_add(1));
                        next_col = 1;
                        if row_num > last {
                            break;
                        }
                        if row_num < first && is_start_event {
                            cell_buf.clear();
                            xml.read_to_end_into(e.name(), &mut cell_buf)?;
                        }
                    }
                    b"c" => {
                        let (col, row) = cell_position(e, row_num, next_col);
                        next_col = col.saturating_add(1);

                        let cell_type = e
                            .try_get_attribute("t")
                            .ok()
                            .flatten()
                            .map_or(CellTypeTag::Default, |a| parse_cell_type_tag(&a.value));

                        let raw = if is_start_event {
                            read_cell_body(&mut xml, &mut cell_buf)?
                        } else {
                            None
                        };

                        let in_window = (first..=last).contains(&row) && cols.contains(&col);
                        if in_window {
                            let value = resolve_value(raw, cell_type, shared_strings, row, col);
                            if let Some(slot) = grid
                                .get_mut((row - first) as usize)
                                .and_then(|r| r.get_mut((col - first_col) as usize))
                            {
                                *slot = value;
                            }
                        }
                    }
                    _ => {}
                }
            }
            Event::End(ref e) if e.local_name().as_ref() == b"sheetData" => break,
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    Ok(grid)
}

/// Position of a `<c>` element: its `r` reference when present and valid,
/// otherwise the next column of the current row.
fn cell_position(e: &quick_xml::events::BytesStart, row_num: u32, next_col: u32) -> (u32, u32) {
    e.try_get_attribute("r")
        .ok()
        .flatten()
        .and_then(|a| parse_cell_ref_bytes(&a.value))
        .unwrap_or((next_col, row_num))
}

/// Read the children of a `<c>` start tag up to its end tag.
///
/// Returns the text of `<v>`, or the concatenated runs of `<is>`. Formula
/// text is skipped.
fn read_cell_body<B: BufRead>(
    xml: &mut Reader<B>,
    buf: &mut Vec<u8>,
) -> Result<Option<String>, SourceError> {
    let mut value: Option<String> = None;
    let mut in_value = false;
    let mut in_inline = false;
    let mut in_phonetic = false;
    let mut in_text = false;

    loop {
        buf.clear();
        match xml.read_event_into(buf)? {
            Event::Start(ref inner) => match inner.local_name().as_ref() {
                b"v" => {
                    in_value = true;
                    value.get_or_insert_with(String::new);
                }
                b"is" => {
                    in_inline = true;
                    value.get_or_insert_with(String::new);
                }
                b"rPh" if in_inline => in_phonetic = true,
                b"t" if in_inline && !in_phonetic => in_text = true,
                b"f" => {
                    let mut skip = Vec::new();
                    xml.read_to_end_into(inner.name(), &mut skip)?;
                }
                _ => {}
            },
            Event::Text(ref text) if in_value || in_text => {
                if let Some(v) = value.as_mut() {
                    v.push_str(&text.unescape()?);
                }
            }
            Event::CData(ref text) if in_value || in_text => {
                if let Some(v) = value.as_mut() {
                    v.push_str(&String::from_utf8_lossy(text.as_ref()));
                }
            }
            Event::End(ref inner) => match inner.local_name().as_ref() {
                b"c" => break,
                b"v" => in_value = false,
                b"is" => in_inline = false,
                b"rPh" => in_phonetic = false,
                b"t" => in_text = false,
                _ => {}
            },
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(value)
}

/// Map raw cell text to its native value without any display coercion.
fn resolve_value(
    raw: Option<String>,
    cell_type: CellTypeTag,
    shared_strings: &[String],
    row: u32,
    col: u32,
) -> CellValue {
    let Some(raw) = raw else {
        return CellValue::Empty;
    };

    match cell_type {
        CellTypeTag::Shared => {
            let entry = raw
                .trim()
                .parse::<usize>()
                .ok()
                .and_then(|idx| shared_strings.get(idx));
            if let Some(s) = entry {
                CellValue::String(s.clone())
            } else {
                warn!(row, col, index = %raw, "shared string index out of range");
                CellValue::Empty
            }
        }
        CellTypeTag::Inline | CellTypeTag::Str | CellTypeTag::Date => CellValue::String(raw),
        CellTypeTag::Bool => CellValue::Bool(matches!(raw.trim(), "1" | "true" | "TRUE")),
        CellTypeTag::Error => CellValue::Error { error: raw },
        CellTypeTag::Default => {
            if raw.trim().is_empty() {
                return CellValue::Empty;
            }
            match raw.trim().parse::<f64>() {
                Ok(n) => CellValue::Number(n),
                Err(_) => CellValue::String(raw),
            }
        }
    }
}
