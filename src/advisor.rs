//! Chunk-size advisory policy.
//!
//! Maps a sheet's cell count to a size class and a recommended number of
//! rows per batch. Purely advisory: the reader accepts any batch size.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Cell-count thresholds (inclusive lower bounds) for each class above Small.
const MEDIUM_MIN_CELLS: u64 = 1_000;
const LARGE_MIN_CELLS: u64 = 5_000;
const EXTRA_LARGE_MIN_CELLS: u64 = 10_000;

/// Size classification of a sheet, ordered from smallest to largest.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum SizeClass {
    Small,
    Medium,
    Large,
    ExtraLarge,
}

impl SizeClass {
    /// Classify a cell count.
    #[must_use]
    pub fn from_cell_count(cell_count: u64) -> Self {
        if cell_count >= EXTRA_LARGE_MIN_CELLS {
            Self::ExtraLarge
        } else if cell_count >= LARGE_MIN_CELLS {
            Self::Large
        } else if cell_count >= MEDIUM_MIN_CELLS {
            Self::Medium
        } else {
            Self::Small
        }
    }

    /// Rows per batch recommended for sheets of this class.
    #[must_use]
    pub fn recommended_batch_size(self) -> u32 {
        match self {
            Self::Small => 200,
            Self::Medium => 100,
            Self::Large => 50,
            Self::ExtraLarge => 20,
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Small => "small",
            Self::Medium => "medium",
            Self::Large => "large",
            Self::ExtraLarge => "extra_large",
        }
    }

    /// Human-readable label including the cell range of the class.
    #[must_use]
    pub fn description(self) -> &'static str {
        match self {
            Self::Small => "small (< 1,000 cells)",
            Self::Medium => "medium (1,000 - 4,999 cells)",
            Self::Large => "large (5,000 - 9,999 cells)",
            Self::ExtraLarge => "extra large (>= 10,000 cells)",
        }
    }
}

impl fmt::Display for SizeClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.description())
    }
}

/// Sizing advice for one cell count.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub struct ChunkAdvice {
    pub size_class: SizeClass,
    pub recommended_batch_size: u32,
}

/// Advise a batch size for a sheet with `cell_count` cells.
#[must_use]
pub fn advise(cell_count: u64) -> ChunkAdvice {
    let size_class = SizeClass::from_cell_count(cell_count);
    ChunkAdvice {
        size_class,
        recommended_batch_size: size_class.recommended_batch_size(),
    }
}

/// Shorthand for `advise(cell_count).recommended_batch_size`.
#[must_use]
pub fn recommend_batch_size(cell_count: u64) -> u32 {
    advise(cell_count).recommended_batch_size
}
