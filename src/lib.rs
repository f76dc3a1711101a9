//! `sales-ts` library crate.
//!
//! The binary (`sts`) is a thin wrapper around this library so that:
//!
//! - core logic is testable without spawning processes
//! - the cleaning and plotting steps are reusable from other front-ends
//! - code stays easy to navigate as the project grows

pub mod app;
pub mod cli;
pub mod data;
pub mod domain;
pub mod error;
pub mod io;
pub mod math;
pub mod plot;
pub mod report;
pub mod stats;
pub mod transform;
pub mod tui;
