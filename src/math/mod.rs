//! Mathematical utilities: dense linear solves for Yule-Walker systems.

pub mod linear;

pub use linear::*;
