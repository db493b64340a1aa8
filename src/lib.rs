//! xlchunk - chunked access to large spreadsheets
//!
//! Opens XLSX workbooks (and CSV/TSV files) from a local path or an
//! http(s) URL and serves them in bounded pieces:
//! - Structure inspection: per-sheet dimensions without reading cell values
//! - Size classification and a recommended batch size
//! - Row batches with a caller-held cursor
//! - Bounded top-left previews
//!
//! # Usage
//!
//! ```no_run
//! use xlchunk::{Engine, RowWindow};
//!
//! let engine = Engine::from_env();
//! let info = engine.get_file_info("report.xlsx", None)?;
//! let mut window = Some(RowWindow::batch(1, info.recommended_batch_size));
//! while let Some(w) = window {
//!     let batch = engine.read_batch("report.xlsx", &info.target_sheet, &w)?;
//!     window = batch.next_batch_info.map(RowWindow::from);
//! }
//! # Ok::<(), xlchunk::XlchunkError>(())
//! ```

pub mod advisor;
pub mod batch;
pub mod cell_ref;
pub mod config;
mod delimited;
pub mod engine;
pub mod error;
mod fetch;
pub mod inspect;
pub mod origin;
mod parser;
pub mod preview;
pub mod types;
pub mod workbook;
mod xml_helpers;

pub use advisor::{advise, recommend_batch_size, ChunkAdvice, SizeClass};
pub use batch::{read_batch, Batches};
pub use config::EngineConfig;
pub use engine::Engine;
pub use error::{
    InspectError, OpenError, PreviewError, ReadError, Result, SourceError, XlchunkError,
};
pub use inspect::inspect;
pub use origin::Origin;
pub use preview::{
    preview, preview_default, DEFAULT_PREVIEW_COLS, DEFAULT_PREVIEW_ROWS, MAX_PREVIEW_COLS,
    MAX_PREVIEW_ROWS,
};
pub use types::*;
pub use workbook::Workbook;

/// Get the library version
#[must_use]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
