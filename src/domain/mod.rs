//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - helpers over the polars frames the cleaning and assembly steps operate on
//! - schema constants for the calendar, sales, and price tables
//! - request/config types (`SeriesConfig`, `PlotOptions`, `DataPaths`)

pub mod frame;
pub mod types;

pub use types::*;
