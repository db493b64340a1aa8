//! Test fixtures for generating valid XLSX files in memory.
//!
//! # Example
//!
//! ```rust,ignore
//! use fixtures::{SheetBuilder, XlsxBuilder};
//!
//! let xlsx = XlsxBuilder::new()
//!     .sheet(SheetBuilder::new("Data").cell("A1", "Hello").cell("B1", 42.0))
//!     .build();
//! ```
#![allow(
    dead_code,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic,
    clippy::cast_possible_truncation,
    clippy::cast_lossless
)]

use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::io::{Cursor, Write};
use zip::write::FileOptions;
use zip::ZipWriter;

use xlchunk::cell_ref::{column_letters, parse_cell_ref};

// ============================================================================
// Cell Value
// ============================================================================

/// How a fixture cell is encoded in the sheet XML.
#[derive(Debug, Clone, PartialEq)]
pub enum RawCell {
    /// Shared-string cell (`t="s"`).
    Shared(String),
    /// Plain numeric cell.
    Number(f64),
    /// Boolean cell (`t="b"`).
    Boolean(bool),
    /// Error cell (`t="e"`), e.g. "#DIV/0!".
    Error(String),
    /// Inline string (`t="inlineStr"`).
    Inline(String),
    /// Formula with a cached string result (`t="str"`).
    Formula { formula: String, cached: String },
    /// Cell element without a value (style only).
    Blank,
}

impl From<&str> for RawCell {
    fn from(s: &str) -> Self {
        RawCell::Shared(s.to_string())
    }
}

impl From<String> for RawCell {
    fn from(s: String) -> Self {
        RawCell::Shared(s)
    }
}

impl From<f64> for RawCell {
    fn from(n: f64) -> Self {
        RawCell::Number(n)
    }
}

impl From<i32> for RawCell {
    fn from(n: i32) -> Self {
        RawCell::Number(f64::from(n))
    }
}

impl From<bool> for RawCell {
    fn from(b: bool) -> Self {
        RawCell::Boolean(b)
    }
}

// ============================================================================
// Sheet Builder
// ============================================================================

/// What to write in the `<dimension>` element.
#[derive(Debug, Clone, PartialEq)]
pub enum Dimension {
    /// Computed from the cells ("A1:C120"); "A1" for an empty sheet.
    Auto,
    /// Written verbatim.
    Fixed(String),
    /// No `<dimension>` element at all.
    Omitted,
}

/// Builder for a single worksheet.
#[derive(Debug, Clone)]
pub struct SheetBuilder {
    pub name: String,
    /// (col, row) -> value, both 1-based.
    pub cells: BTreeMap<(u32, u32), RawCell>,
    pub dimension: Dimension,
    /// Raw XML appended inside `<sheetData>` after the generated rows.
    pub tail: String,
    /// Omit `r` attributes on rows and cells.
    pub implicit_refs: bool,
}

impl SheetBuilder {
    #[must_use]
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            cells: BTreeMap::new(),
            dimension: Dimension::Auto,
            tail: String::new(),
            implicit_refs: false,
        }
    }

    /// A sheet of `rows` x `cols` numbers where cell (r, c) holds
    /// `r * 1000 + c`.
    #[must_use]
    pub fn grid(name: &str, rows: u32, cols: u32) -> Self {
        let mut sheet = Self::new(name);
        for r in 1..=rows {
            for c in 1..=cols {
                sheet.cells.insert((c, r), RawCell::Number(grid_value(r, c)));
            }
        }
        sheet
    }

    /// Add a cell by reference ("B3").
    #[must_use]
    pub fn cell<V: Into<RawCell>>(mut self, cell_ref: &str, value: V) -> Self {
        let pos = parse_cell_ref(cell_ref).expect("valid cell reference");
        self.cells.insert(pos, value.into());
        self
    }

    #[must_use]
    pub fn inline(self, cell_ref: &str, text: &str) -> Self {
        self.cell(cell_ref, RawCell::Inline(text.to_string()))
    }

    #[must_use]
    pub fn error(self, cell_ref: &str, code: &str) -> Self {
        self.cell(cell_ref, RawCell::Error(code.to_string()))
    }

    #[must_use]
    pub fn formula(self, cell_ref: &str, formula: &str, cached: &str) -> Self {
        self.cell(
            cell_ref,
            RawCell::Formula {
                formula: formula.to_string(),
                cached: cached.to_string(),
            },
        )
    }

    #[must_use]
    pub fn dimension(mut self, range: &str) -> Self {
        self.dimension = Dimension::Fixed(range.to_string());
        self
    }

    #[must_use]
    pub fn no_dimension(mut self) -> Self {
        self.dimension = Dimension::Omitted;
        self
    }

    #[must_use]
    pub fn tail(mut self, xml: &str) -> Self {
        self.tail.push_str(xml);
        self
    }

    #[must_use]
    pub fn implicit_refs(mut self) -> Self {
        self.implicit_refs = true;
        self
    }

    fn computed_dimension(&self) -> String {
        let max_row = self.cells.keys().map(|&(_, r)| r).max();
        let max_col = self.cells.keys().map(|&(c, _)| c).max();
        match (max_row, max_col) {
            (Some(r), Some(c)) => format!("A1:{}{}", column_letters(c), r),
            _ => "A1".to_string(),
        }
    }

    fn to_xml(&self, shared: &[String]) -> String {
        let mut xml = String::from(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships">"#,
        );
        match &self.dimension {
            Dimension::Auto => {
                let _ = write!(xml, r#"<dimension ref="{}"/>"#, self.computed_dimension());
            }
            Dimension::Fixed(range) => {
                let _ = write!(xml, r#"<dimension ref="{range}"/>"#);
            }
            Dimension::Omitted => {}
        }
        xml.push_str("<sheetData>");

        let mut by_row: BTreeMap<u32, Vec<(u32, &RawCell)>> = BTreeMap::new();
        for (&(col, row), value) in &self.cells {
            by_row.entry(row).or_default().push((col, value));
        }
        for (row, mut cells) in by_row {
            cells.sort_by_key(|(col, _)| *col);
            if self.implicit_refs {
                xml.push_str("<row>");
            } else {
                let _ = write!(xml, r#"<row r="{row}">"#);
            }
            for (col, value) in cells {
                let r_attr = if self.implicit_refs {
                    String::new()
                } else {
                    format!(r#" r="{}{}""#, column_letters(col), row)
                };
                xml.push_str(&cell_xml(&r_attr, value, shared));
            }
            xml.push_str("</row>");
        }

        xml.push_str(&self.tail);
        xml.push_str("</sheetData></worksheet>");
        xml
    }
}

/// Value stored at (row, col) by [`SheetBuilder::grid`].
#[must_use]
pub fn grid_value(row: u32, col: u32) -> f64 {
    f64::from(row) * 1000.0 + f64::from(col)
}

fn cell_xml(r_attr: &str, value: &RawCell, shared: &[String]) -> String {
    match value {
        RawCell::Shared(s) => {
            let idx = shared.iter().position(|x| x == s).unwrap();
            format!(r#"<c{r_attr} t="s"><v>{idx}</v></c>"#)
        }
        RawCell::Number(n) => format!("<c{r_attr}><v>{n}</v></c>"),
        RawCell::Boolean(b) => {
            format!(r#"<c{r_attr} t="b"><v>{}</v></c>"#, u8::from(*b))
        }
        RawCell::Error(e) => format!(r#"<c{r_attr} t="e"><v>{}</v></c>"#, escape(e)),
        RawCell::Inline(s) => {
            format!(r#"<c{r_attr} t="inlineStr"><is><t>{}</t></is></c>"#, escape(s))
        }
        RawCell::Formula { formula, cached } => format!(
            r#"<c{r_attr} t="str"><f>{}</f><v>{}</v></c>"#,
            escape(formula),
            escape(cached)
        ),
        RawCell::Blank => format!(r#"<c{r_attr} s="0"/>"#),
    }
}

fn escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

// ============================================================================
// XLSX Builder
// ============================================================================

#[derive(Debug, Default)]
pub struct XlsxBuilder {
    sheets: Vec<SheetBuilder>,
}

impl XlsxBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn sheet(mut self, sheet: SheetBuilder) -> Self {
        self.sheets.push(sheet);
        self
    }

    /// Build the XLSX file as bytes.
    #[must_use]
    pub fn build(self) -> Vec<u8> {
        let cursor = Cursor::new(Vec::new());
        let mut zip = ZipWriter::new(cursor);
        let options = FileOptions::default().compression_method(zip::CompressionMethod::Deflated);

        let mut shared_strings: Vec<String> = Vec::new();
        for sheet in &self.sheets {
            for value in sheet.cells.values() {
                if let RawCell::Shared(s) = value {
                    if !shared_strings.contains(s) {
                        shared_strings.push(s.clone());
                    }
                }
            }
        }

        zip.start_file("[Content_Types].xml", options).unwrap();
        zip.write_all(generate_content_types(self.sheets.len()).as_bytes())
            .unwrap();

        zip.start_file("_rels/.rels", options).unwrap();
        zip.write_all(generate_rels().as_bytes()).unwrap();

        zip.start_file("xl/_rels/workbook.xml.rels", options).unwrap();
        zip.write_all(generate_workbook_rels(self.sheets.len()).as_bytes())
            .unwrap();

        zip.start_file("xl/workbook.xml", options).unwrap();
        zip.write_all(generate_workbook(&self.sheets).as_bytes())
            .unwrap();

        if !shared_strings.is_empty() {
            zip.start_file("xl/sharedStrings.xml", options).unwrap();
            zip.write_all(generate_shared_strings(&shared_strings).as_bytes())
                .unwrap();
        }

        for (i, sheet) in self.sheets.iter().enumerate() {
            zip.start_file(format!("xl/worksheets/sheet{}.xml", i + 1), options)
                .unwrap();
            zip.write_all(sheet.to_xml(&shared_strings).as_bytes())
                .unwrap();
        }

        zip.finish().expect("Failed to finish ZIP").into_inner()
    }
}

fn generate_content_types(sheet_count: usize) -> String {
    let mut xml = String::from(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">
<Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>
<Default Extension="xml" ContentType="application/xml"/>
<Override PartName="/xl/workbook.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml"/>
<Override PartName="/xl/sharedStrings.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sharedStrings+xml"/>"#,
    );
    for i in 1..=sheet_count {
        let _ = write!(
            xml,
            r#"
<Override PartName="/xl/worksheets/sheet{i}.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml"/>"#
        );
    }
    xml.push_str("\n</Types>");
    xml
}

fn generate_rels() -> String {
    r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
<Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="xl/workbook.xml"/>
</Relationships>"#
        .to_string()
}

fn generate_workbook_rels(sheet_count: usize) -> String {
    let mut xml = String::from(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">"#,
    );
    for i in 1..=sheet_count {
        let _ = write!(
            xml,
            r#"
<Relationship Id="rId{i}" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet{i}.xml"/>"#
        );
    }
    let _ = write!(
        xml,
        r#"
<Relationship Id="rId{}" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/sharedStrings" Target="sharedStrings.xml"/>
</Relationships>"#,
        sheet_count + 1
    );
    xml
}

fn generate_workbook(sheets: &[SheetBuilder]) -> String {
    let mut xml = String::from(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<workbook xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships">
<sheets>"#,
    );
    for (i, sheet) in sheets.iter().enumerate() {
        let _ = write!(
            xml,
            r#"
<sheet name="{}" sheetId="{}" r:id="rId{}"/>"#,
            escape(&sheet.name),
            i + 1,
            i + 1
        );
    }
    xml.push_str("\n</sheets>\n</workbook>");
    xml
}

fn generate_shared_strings(strings: &[String]) -> String {
    let mut xml = format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<sst xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" count="{0}" uniqueCount="{0}">"#,
        strings.len()
    );
    for s in strings {
        let _ = write!(xml, "<si><t>{}</t></si>", escape(s));
    }
    xml.push_str("</sst>");
    xml
}

// ============================================================================
// Convenience Functions
// ============================================================================

/// A workbook with one `rows` x `cols` numeric sheet named "Data".
#[must_use]
pub fn grid_xlsx(rows: u32, cols: u32) -> Vec<u8> {
    XlsxBuilder::new()
        .sheet(SheetBuilder::grid("Data", rows, cols))
        .build()
}
