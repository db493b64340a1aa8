//! Value types returned by the engine.

mod batch;
mod cell;
mod preview;
mod workbook;

pub use batch::*;
pub use cell::*;
pub use preview::*;
pub use workbook::*;
