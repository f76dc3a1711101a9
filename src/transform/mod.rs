//! Table transforms and the timing wrapper that logs each of them.
//!
//! Every public transform runs through [`timed`], which measures wall-clock time
//! and emits one log line per call:
//!
//! ```text
//! clean_calendar took 1.204ms, shape = (1969, 17)
//! ```
//!
//! Errors from the wrapped function are returned unchanged and nothing is logged
//! for them.

use std::time::Instant;

use polars::prelude::DataFrame;
use tracing::info;

pub mod clean;
pub mod series;

pub use clean::*;
pub use series::*;

/// Anything with a `(rows, columns)` shape.
pub trait Shaped {
    fn shape(&self) -> (usize, usize);
}

impl Shaped for DataFrame {
    fn shape(&self) -> (usize, usize) {
        DataFrame::shape(self)
    }
}

/// Run `f`, then log its name, elapsed time, and the shape of its result.
pub fn timed<T, E, F>(name: &str, f: F) -> Result<T, E>
where
    T: Shaped,
    F: FnOnce() -> Result<T, E>,
{
    let tic = Instant::now();
    let result = f()?;
    let elapsed = tic.elapsed();

    let (rows, cols) = result.shape();
    info!(
        target: "sales_ts::transform",
        transform = name,
        elapsed_us = elapsed.as_micros() as u64,
        rows,
        cols,
        "{name} took {elapsed:?}, shape = ({rows}, {cols})"
    );
    Ok(result)
}

/// Wrap a single-frame transform so every call goes through [`timed`].
pub fn log_frame<F, E>(name: &'static str, f: F) -> impl Fn(DataFrame) -> Result<DataFrame, E>
where
    F: Fn(DataFrame) -> Result<DataFrame, E>,
{
    move |frame| timed(name, || f(frame))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TableError;
    use polars::prelude::*;

    fn small_frame() -> DataFrame {
        DataFrame::new(vec![Column::new("x".into(), [1i64, 2])]).unwrap()
    }

    #[test]
    fn timed_returns_the_wrapped_result_unchanged() {
        let frame = small_frame();
        let out: Result<DataFrame, TableError> = timed("identity", || Ok(frame.clone()));
        assert_eq!(out.unwrap(), frame);
    }

    #[test]
    fn timed_propagates_errors() {
        let out: Result<DataFrame, TableError> =
            timed("fails", || Err(TableError::MissingColumn("x".to_string())));
        assert!(matches!(out, Err(TableError::MissingColumn(_))));
    }

    #[test]
    fn log_frame_keeps_signature_and_behavior() {
        let drop_x = log_frame("drop_x", |frame: DataFrame| -> Result<DataFrame, TableError> {
            crate::domain::frame::column(&frame, "x")?;
            Ok(frame.drop("x")?)
        });
        let out = drop_x(small_frame()).unwrap();
        assert_eq!(out.width(), 0);
        assert!(matches!(drop_x(out), Err(TableError::MissingColumn(_))));
    }
}
