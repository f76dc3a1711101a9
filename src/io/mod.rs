//! Input/output helpers.
//!
//! - CSV ingest with column type inference (`ingest`)
//! - item table export to CSV (`export`)
//! - figure JSON read/write (`figure`)

pub mod export;
pub mod figure;
pub mod ingest;

pub use export::*;
pub use figure::*;
pub use ingest::*;
