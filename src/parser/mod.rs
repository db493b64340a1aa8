//! XLSX package reader
//!
//! Locates the parts of an Office Open XML spreadsheet inside its ZIP
//! archive and streams worksheet data out of them on demand.

mod relationships;
mod worksheet;

use std::io::{Read, Seek};
use zip::ZipArchive;

use crate::error::SourceError;

pub(crate) use relationships::SheetInfo;
pub(crate) use worksheet::{read_bounds, read_rows};

use relationships::{get_sheet_info, parse_shared_strings, parse_workbook_relationships};

/// Where the interesting parts of a package live.
#[derive(Debug, Clone, Default)]
pub(crate) struct PackageLayout {
    /// Worksheets in tab order.
    pub sheets: Vec<SheetInfo>,
    /// Shared-string part named by the workbook relationships, if any.
    pub shared_strings: Option<String>,
}

/// Read the sheet list and part locations without touching sheet data.
pub(crate) fn read_layout<R: Read + Seek>(
    archive: &mut ZipArchive<R>,
) -> Result<PackageLayout, SourceError> {
    let rels = parse_workbook_relationships(archive)?;
    let sheets = get_sheet_info(archive, &rels.worksheets)?;
    Ok(PackageLayout {
        sheets,
        shared_strings: rels.shared_strings,
    })
}

/// Load the whole shared-string table from `part` (or the conventional
/// location when the relationships name none).
pub(crate) fn read_shared_strings<R: Read + Seek>(
    archive: &mut ZipArchive<R>,
    part: Option<&str>,
) -> Result<Vec<String>, SourceError> {
    parse_shared_strings(archive, part)
}

/// True when the archive looks like a spreadsheet package.
pub(crate) fn is_spreadsheet_package<R: Read + Seek>(archive: &mut ZipArchive<R>) -> bool {
    archive.by_name("xl/workbook.xml").is_ok()
}
