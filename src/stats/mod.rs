//! Series statistics behind the diagnostic figure.

pub mod correlation;
pub mod histogram;

pub use correlation::*;
pub use histogram::*;

use polars::prelude::{diff, NamedFrom, Series};
use polars::series::ops::NullBehavior;

use crate::domain::MAX_DIFF_ORDER;
use crate::error::PlotError;

/// Shortest series (after differencing) that still gives meaningful correlograms.
pub const MIN_OBSERVATIONS: usize = 4;

/// Lag-`order` difference `y[t] - y[t - order]`, dropping the first `order` values.
///
/// Order 0 returns the series unchanged. Orders above [`MAX_DIFF_ORDER`] are
/// rejected.
pub fn difference(values: &[f64], order: usize) -> Result<Vec<f64>, PlotError> {
    if order > MAX_DIFF_ORDER {
        return Err(PlotError::InvalidDifferenceOrder {
            order,
            max: MAX_DIFF_ORDER,
        });
    }
    if order == 0 {
        return Ok(values.to_vec());
    }
    if order >= values.len() {
        return Ok(Vec::new());
    }
    let series = Series::new("y".into(), values);
    let lagged = diff(&series, order as i64, NullBehavior::Drop)?;
    Ok(lagged.f64()?.into_no_null_iter().collect())
}

/// Default number of correlogram lags for a series of length `n`:
/// `min(ceil(10 * log10(n)), n / 2 - 1)`.
pub fn default_lags(n: usize) -> usize {
    if n < 2 {
        return 0;
    }
    let by_log = (10.0 * (n as f64).log10()).ceil() as usize;
    by_log.min((n / 2).saturating_sub(1))
}

/// Resolve the lag count for a series of length `n`.
///
/// Explicit lags must stay below `n / 2` so the partial autocorrelation is
/// estimable.
pub fn resolve_lags(n: usize, requested: Option<usize>) -> Result<usize, PlotError> {
    if n < MIN_OBSERVATIONS {
        return Err(PlotError::TooFewObservations {
            needed: MIN_OBSERVATIONS,
            got: n,
        });
    }
    match requested {
        None => Ok(default_lags(n)),
        Some(lags) if lags < n / 2 => Ok(lags),
        Some(lags) => Err(PlotError::TooFewObservations {
            needed: 2 * lags + 2,
            got: n,
        }),
    }
}

/// Arithmetic mean; 0 for an empty slice.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn difference_order_zero_is_identity() {
        let y = [1.0, 4.0, 9.0];
        assert_eq!(difference(&y, 0).unwrap(), y);
    }

    #[test]
    fn difference_drops_first_order_values() {
        let y = [1.0, 2.0, 4.0, 7.0, 11.0];
        assert_eq!(difference(&y, 1).unwrap(), [1.0, 2.0, 3.0, 4.0]);
        assert_eq!(difference(&y, 2).unwrap(), [3.0, 5.0, 7.0]);
    }

    #[test]
    fn difference_longer_than_series_is_empty() {
        assert!(difference(&[1.0, 2.0], 3).unwrap().is_empty());
    }

    #[test]
    fn difference_rejects_order_above_limit() {
        let err = difference(&[0.0; 20], 6).unwrap_err();
        assert!(matches!(
            err,
            PlotError::InvalidDifferenceOrder { order: 6, max: 5 }
        ));
    }

    #[test]
    fn default_lags_follow_log_rule_and_half_length_cap() {
        assert_eq!(default_lags(100), 20);
        assert_eq!(default_lags(1913), 33);
        assert_eq!(default_lags(10), 4);
    }

    #[test]
    fn explicit_lags_must_fit_series() {
        assert_eq!(resolve_lags(100, Some(30)).unwrap(), 30);
        assert!(matches!(
            resolve_lags(20, Some(10)),
            Err(PlotError::TooFewObservations { got: 20, .. })
        ));
        assert!(matches!(
            resolve_lags(21, Some(10)),
            Err(PlotError::TooFewObservations { needed: 22, got: 21 })
        ));
        assert_eq!(resolve_lags(22, Some(10)).unwrap(), 10);
        assert!(matches!(
            resolve_lags(3, None),
            Err(PlotError::TooFewObservations { needed: 4, got: 3 })
        ));
    }
}
