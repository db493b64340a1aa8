//! Origin-string facade over the components.
//!
//! Each call opens a scoped handle, runs one operation and closes the
//! handle again, so a fetched temp file never outlives the call.

use tracing::debug;

use crate::batch;
use crate::config::EngineConfig;
use crate::error::{OpenError, Result};
use crate::inspect;
use crate::origin::Origin;
use crate::preview;
use crate::types::{BatchResult, FileInfo, PreviewResult, RowWindow};
use crate::workbook::Workbook;

/// Stateless entry point holding only configuration.
#[derive(Debug, Clone, Default)]
pub struct Engine {
    config: EngineConfig,
}

impl Engine {
    #[must_use]
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    /// Engine configured from the environment.
    #[must_use]
    pub fn from_env() -> Self {
        Self::new(EngineConfig::from_env())
    }

    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Resolve `origin` against the files root and open it. The caller owns
    /// the handle and decides when to close it.
    pub fn open(&self, origin: &str) -> std::result::Result<Workbook, OpenError> {
        let origin = Origin::resolve(origin, self.config.files_root.as_deref())?;
        Workbook::open(&origin, &self.config)
    }

    /// Sheet dimensions and sizing advice.
    pub fn get_file_info(&self, origin: &str, sheet_name: Option<&str>) -> Result<FileInfo> {
        self.with_workbook(origin, |wb| Ok(inspect::inspect(wb, sheet_name)?))
    }

    /// One page of rows; follow `next_batch_info` for the next page.
    pub fn read_batch(
        &self,
        origin: &str,
        sheet_name: &str,
        window: &RowWindow,
    ) -> Result<BatchResult> {
        self.with_workbook(origin, |wb| Ok(batch::read_batch(wb, sheet_name, window)?))
    }

    /// Top-left sample, defaulting to the first sheet and 20 x 10 cells.
    pub fn preview(
        &self,
        origin: &str,
        sheet_name: Option<&str>,
        max_preview_rows: Option<u32>,
        max_preview_cols: Option<u32>,
    ) -> Result<PreviewResult> {
        self.with_workbook(origin, |wb| {
            Ok(preview::preview_default(
                wb,
                sheet_name,
                max_preview_rows,
                max_preview_cols,
            )?)
        })
    }

    fn with_workbook<T>(&self, origin: &str, f: impl FnOnce(&Workbook) -> Result<T>) -> Result<T> {
        let mut workbook = self.open(origin)?;
        let result = f(&workbook);
        workbook.close();
        debug!(origin, ok = result.is_ok(), "released workbook");
        result
    }
}
