//! Structured error types for xlchunk.
//!
//! Each engine operation has its own error kind so callers can tell an
//! unreachable source apart from a bad row window. [`XlchunkError`] unifies
//! them for the [`crate::Engine`] facade.

use std::path::PathBuf;

/// The underlying workbook data could not be read.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    /// XML parsing error from quick-xml.
    #[error("XML parsing: {0}")]
    Xml(#[from] quick_xml::Error),

    /// ZIP archive error.
    #[error("ZIP archive: {0}")]
    Zip(#[from] zip::result::ZipError),

    /// Delimited text error.
    #[error("CSV parsing: {0}")]
    Csv(#[from] csv::Error),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The handle was closed before the operation ran.
    #[error("Workbook handle is closed")]
    Closed,
}

/// Failure to open a source.
#[derive(Debug, thiserror::Error)]
pub enum OpenError {
    /// Local path does not exist.
    #[error("Source not found: {}", .0.display())]
    NotFound(PathBuf),

    /// Origin scheme is neither a path nor http(s).
    #[error("Unsupported origin: {0}")]
    UnsupportedOrigin(String),

    /// Content is not a workbook this engine can read.
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    /// Transport failure while fetching a remote origin.
    #[error("HTTP fetch failed: {0}")]
    Fetch(#[from] reqwest::Error),

    /// Connection dropped or timed out while streaming the body.
    #[error("HTTP download interrupted: {0}")]
    Download(#[source] std::io::Error),

    /// Remote server answered with a non-success status.
    #[error("HTTP {status} fetching {url}")]
    HttpStatus { url: String, status: u16 },

    /// Remote payload exceeded the configured download ceiling.
    #[error("Remote payload exceeds {limit} bytes")]
    TooLarge { limit: u64 },

    /// Source exists but could not be read.
    #[error("Unreadable source: {0}")]
    Source(#[from] SourceError),
}

impl From<std::io::Error> for OpenError {
    fn from(e: std::io::Error) -> Self {
        Self::Source(SourceError::Io(e))
    }
}

impl From<zip::result::ZipError> for OpenError {
    fn from(e: zip::result::ZipError) -> Self {
        Self::Source(SourceError::Zip(e))
    }
}

impl From<quick_xml::Error> for OpenError {
    fn from(e: quick_xml::Error) -> Self {
        Self::Source(SourceError::Xml(e))
    }
}

/// Failure to inspect workbook structure.
#[derive(Debug, thiserror::Error)]
pub enum InspectError {
    #[error("Workbook has no sheets")]
    NoSheets,

    #[error("Sheet not found: {0}")]
    SheetNotFound(String),

    #[error("Unreadable workbook: {0}")]
    Source(#[from] SourceError),
}

/// Failure to read a batch of rows.
#[derive(Debug, thiserror::Error)]
pub enum ReadError {
    #[error("Sheet not found: {0}")]
    SheetNotFound(String),

    #[error("start_row must be >= 1 (got {0})")]
    InvalidStartRow(u32),

    #[error("batch_size must be >= 1 (got {0})")]
    InvalidBatchSize(u32),

    #[error("end_row {end_row} is before start_row {start_row}")]
    InvalidEndRow { start_row: u32, end_row: u32 },

    #[error("start_col must be >= 1 (got {0})")]
    InvalidStartCol(u32),

    #[error("end_col {end_col} is before start_col {start_col}")]
    InvalidEndCol { start_col: u32, end_col: u32 },

    #[error("Unreadable sheet data: {0}")]
    Source(#[from] SourceError),
}

/// Failure to sample a preview.
#[derive(Debug, thiserror::Error)]
pub enum PreviewError {
    #[error("Workbook has no sheets")]
    NoSheets,

    #[error("Sheet not found: {0}")]
    SheetNotFound(String),

    #[error("Unreadable sheet data: {0}")]
    Source(#[from] SourceError),
}

/// All errors surfaced by the [`crate::Engine`] facade.
#[derive(Debug, thiserror::Error)]
pub enum XlchunkError {
    #[error(transparent)]
    Open(#[from] OpenError),

    #[error(transparent)]
    Inspect(#[from] InspectError),

    #[error(transparent)]
    Read(#[from] ReadError),

    #[error(transparent)]
    Preview(#[from] PreviewError),
}

impl XlchunkError {
    /// Short machine-readable name of the error kind.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Open(_) => "open",
            Self::Inspect(_) => "inspect",
            Self::Read(_) => "read",
            Self::Preview(_) => "preview",
        }
    }
}

/// Convenience alias used by the facade.
pub type Result<T> = std::result::Result<T, XlchunkError>;
