//! Synthetic input data.

pub mod sample;

pub use sample::{generate_dataset, SampleConfig};
