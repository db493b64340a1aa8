//! An open workbook: the backing file, its sheet list and lazily computed
//! per-sheet state.
//!
//! A [`Workbook`] never holds an open file descriptor between calls. Every
//! read opens the backing file afresh, so `&Workbook` can be shared across
//! threads and concurrent reads never contend for a cursor.

use std::fs::{self, File};
use std::io::{BufReader, Read};
use std::ops::RangeInclusive;
use std::path::{Path, PathBuf};

use once_cell::sync::OnceCell;
use tempfile::NamedTempFile;
use tracing::{debug, info, warn};
use zip::ZipArchive;

use crate::config::EngineConfig;
use crate::delimited::{self, Delimiter};
use crate::error::{OpenError, SourceError};
use crate::fetch::fetch_to_temp;
use crate::origin::Origin;
use crate::parser;
use crate::types::{Row, SheetDimensions, SourceFormat};

const ZIP_MAGIC: &[u8] = b"PK\x03\x04";
const OLE_MAGIC: &[u8] = &[0xD0, 0xCF, 0x11, 0xE0];

/// File that backs an open handle.
#[derive(Debug)]
enum Backing {
    Local(PathBuf),
    /// Downloaded copy of a remote origin, deleted on drop.
    Temp(NamedTempFile),
}

impl Backing {
    fn path(&self) -> &Path {
        match self {
            Self::Local(path) => path,
            Self::Temp(temp) => temp.path(),
        }
    }
}

#[derive(Debug)]
enum Layout {
    Package { shared_strings: Option<String> },
    Delimited(Delimiter),
}

/// One sheet of an open workbook.
#[derive(Debug)]
pub(crate) struct SheetEntry {
    pub name: String,
    /// Worksheet part inside the package; empty for delimited sources.
    part: String,
    bounds: OnceCell<SheetDimensions>,
}

/// Handle to an opened workbook.
#[derive(Debug)]
pub struct Workbook {
    origin: String,
    format: SourceFormat,
    file_size: u64,
    layout: Layout,
    sheets: Vec<SheetEntry>,
    backing: Option<Backing>,
    shared_strings: OnceCell<Vec<String>>,
}

impl Workbook {
    /// Open `origin`, fetching it first when it is remote.
    ///
    /// Reads only the package directory and the sheet list; sheet data and
    /// shared strings are loaded on first use.
    pub fn open(origin: &Origin, config: &EngineConfig) -> Result<Self, OpenError> {
        let backing = match origin {
            Origin::Local(path) => {
                match fs::metadata(path) {
                    Ok(meta) if meta.is_dir() => {
                        return Err(OpenError::UnsupportedFormat(format!(
                            "{} is a directory",
                            path.display()
                        )));
                    }
                    Ok(_) => {}
                    Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                        return Err(OpenError::NotFound(path.clone()));
                    }
                    Err(e) => return Err(e.into()),
                }
                Backing::Local(path.clone())
            }
            Origin::Remote(url) => {
                let extension = origin.extension();
                Backing::Temp(fetch_to_temp(url, extension.as_deref(), config)?)
            }
        };

        let path = backing.path();
        let file_size = fs::metadata(path)?.len();
        let format = detect_format(path, origin.extension().as_deref())?;

        let (layout, sheets) = match format {
            SourceFormat::Xlsx => {
                let mut archive = open_archive(path)?;
                if !parser::is_spreadsheet_package(&mut archive) {
                    return Err(OpenError::UnsupportedFormat(
                        "ZIP archive without xl/workbook.xml".to_string(),
                    ));
                }
                let package = parser::read_layout(&mut archive)?;
                let sheets = package
                    .sheets
                    .into_iter()
                    .map(|info| SheetEntry {
                        name: info.name,
                        part: info.path,
                        bounds: OnceCell::new(),
                    })
                    .collect();
                (
                    Layout::Package {
                        shared_strings: package.shared_strings,
                    },
                    sheets,
                )
            }
            SourceFormat::Csv | SourceFormat::Tsv => {
                let delim = if format == SourceFormat::Csv {
                    Delimiter::Comma
                } else {
                    Delimiter::Tab
                };
                let sheet = SheetEntry {
                    name: delim.sheet_name().to_string(),
                    part: String::new(),
                    bounds: OnceCell::new(),
                };
                (Layout::Delimited(delim), vec![sheet])
            }
        };

        info!(
            %origin,
            format = format.as_str(),
            bytes = file_size,
            sheets = sheets.len(),
            "opened workbook"
        );

        Ok(Self {
            origin: origin.to_string(),
            format,
            file_size,
            layout,
            sheets,
            backing: Some(backing),
            shared_strings: OnceCell::new(),
        })
    }

    /// The origin string this handle was opened from.
    #[must_use]
    pub fn origin(&self) -> &str {
        &self.origin
    }

    #[must_use]
    pub fn format(&self) -> SourceFormat {
        self.format
    }

    /// Size of the backing file in bytes (the downloaded size for remote
    /// origins).
    #[must_use]
    pub fn file_size(&self) -> u64 {
        self.file_size
    }

    /// Sheet names in workbook order.
    #[must_use]
    pub fn sheet_names(&self) -> Vec<&str> {
        self.sheets.iter().map(|s| s.name.as_str()).collect()
    }

    #[must_use]
    pub fn first_sheet(&self) -> Option<&str> {
        self.sheets.first().map(|s| s.name.as_str())
    }

    #[must_use]
    pub fn has_sheet(&self, name: &str) -> bool {
        self.sheet(name).is_some()
    }

    /// Release the backing file. A downloaded temp file is deleted.
    ///
    /// Closing twice is a no-op. Any later operation fails with
    /// [`SourceError::Closed`].
    pub fn close(&mut self) {
        match self.backing.take() {
            Some(Backing::Temp(temp)) => {
                let path = temp.path().to_path_buf();
                if let Err(e) = temp.close() {
                    warn!(path = %path.display(), error = %e, "failed to remove temp file");
                }
                debug!(origin = %self.origin, "closed workbook, temp file removed");
            }
            Some(Backing::Local(_)) => debug!(origin = %self.origin, "closed workbook"),
            None => {}
        }
    }

    /// Local file backing the handle: the source itself, or the downloaded
    /// copy of a remote origin. `None` once closed.
    #[must_use]
    pub fn local_path(&self) -> Option<&Path> {
        self.backing.as_ref().map(Backing::path)
    }

    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.backing.is_none()
    }

    pub(crate) fn sheet(&self, name: &str) -> Option<&SheetEntry> {
        self.sheets.iter().find(|s| s.name == name)
    }

    pub(crate) fn sheets(&self) -> &[SheetEntry] {
        &self.sheets
    }

    fn backing_path(&self) -> Result<&Path, SourceError> {
        self.local_path().ok_or(SourceError::Closed)
    }

    /// Structural bounds of `entry`, computed once per handle.
    pub(crate) fn dimensions<'a>(
        &'a self,
        entry: &'a SheetEntry,
    ) -> Result<&'a SheetDimensions, SourceError> {
        let path = self.backing_path()?;
        entry.bounds.get_or_try_init(|| {
            let (rows, cols) = match &self.layout {
                Layout::Package { .. } => {
                    let mut archive = open_archive(path)?;
                    parser::read_bounds(&mut archive, &entry.part)?
                }
                Layout::Delimited(delim) => delimited::read_bounds(path, *delim)?,
            };
            debug!(sheet = %entry.name, rows, cols, "sheet bounds");
            Ok::<_, SourceError>(SheetDimensions::new(entry.name.clone(), rows, cols))
        })
    }

    /// Rows `first..=last` of `entry`, restricted to the columns in `cols`.
    pub(crate) fn rows(
        &self,
        entry: &SheetEntry,
        first: u32,
        last: u32,
        cols: RangeInclusive<u32>,
    ) -> Result<Vec<Row>, SourceError> {
        let path = self.backing_path()?;
        match &self.layout {
            Layout::Package { shared_strings } => {
                let mut archive = open_archive(path)?;
                let strings = self.shared_strings.get_or_try_init(|| {
                    let strings = parser::read_shared_strings(&mut archive, shared_strings.as_deref())?;
                    debug!(count = strings.len(), "loaded shared strings");
                    Ok::<_, SourceError>(strings)
                })?;
                parser::read_rows(&mut archive, &entry.part, strings, first, last, cols)
            }
            Layout::Delimited(delim) => delimited::read_rows(path, *delim, first, last, cols),
        }
    }
}

fn open_archive(path: &Path) -> Result<ZipArchive<BufReader<File>>, SourceError> {
    Ok(ZipArchive::new(BufReader::new(File::open(path)?))?)
}

/// Decide the container format from the leading bytes, then the extension.
fn detect_format(path: &Path, extension: Option<&str>) -> Result<SourceFormat, OpenError> {
    let mut magic = Vec::with_capacity(4);
    File::open(path)?.take(4).read_to_end(&mut magic)?;

    if magic == ZIP_MAGIC {
        return Ok(SourceFormat::Xlsx);
    }
    if magic == OLE_MAGIC {
        return Err(OpenError::UnsupportedFormat(
            "legacy binary .xls workbooks are not supported".to_string(),
        ));
    }

    match extension {
        Some("csv") => Ok(SourceFormat::Csv),
        Some("tsv" | "tab") => Ok(SourceFormat::Tsv),
        Some(other) => Err(OpenError::UnsupportedFormat(format!(
            "unrecognized content with extension .{other}"
        ))),
        None => Err(OpenError::UnsupportedFormat(
            "unrecognized content without a file extension".to_string(),
        )),
    }
}
