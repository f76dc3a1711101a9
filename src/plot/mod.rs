//! The four-panel time-series diagnostic figure.
//!
//! [`tsplot`] computes everything a renderer needs and returns it as a
//! [`Figure`] whose four [`Axes`] can be adjusted before rendering:
//!
//! ```text
//! +-------------------------+-----------+
//! | (a) series over time    | (b) hist  |
//! +-------------------------+-----------+
//! | (c) acf                 | (d) pacf  |
//! +-------------------------+-----------+
//! ```
//!
//! Renderers live in [`svg`] (files/strings via plotters) and [`ascii`]
//! (terminal text); the TUI draws the same figure with ratatui widgets.

pub mod ascii;
pub mod svg;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::domain::{PlotOptions, TimeSeries, HISTOGRAM_BINS};
use crate::error::PlotError;
use crate::stats::{self, Histogram};

/// Lower x bound of the correlogram panels, so the lag-0 stem is fully visible.
pub const CORRELOGRAM_X_MIN: f64 = -0.5;

/// What an [`Axes`] draws.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Panel {
    /// Values plotted against their dates (x = position).
    Line {
        dates: Vec<NaiveDate>,
        values: Vec<f64>,
    },
    /// Value distribution.
    Histogram(Histogram),
    /// Stems at lags `0..values.len()` with a symmetric confidence band.
    Correlogram { values: Vec<f64>, band: Vec<f64> },
}

/// One panel: its content plus title and view limits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Axes {
    pub title: String,
    pub xlim: (f64, f64),
    pub ylim: (f64, f64),
    pub panel: Panel,
}

impl Axes {
    fn new(title: impl Into<String>, panel: Panel) -> Self {
        let (xlim, ylim) = default_limits(&panel);
        Self {
            title: title.into(),
            xlim,
            ylim,
            panel,
        }
    }

    pub fn set_title(&mut self, title: impl Into<String>) -> &mut Self {
        self.title = title.into();
        self
    }

    pub fn set_xlim(&mut self, lo: f64, hi: f64) -> &mut Self {
        self.xlim = (lo, hi);
        self
    }

    pub fn set_ylim(&mut self, lo: f64, hi: f64) -> &mut Self {
        self.ylim = (lo, hi);
        self
    }

    /// Number of plotted points (line), bins (histogram) or lags incl. 0 (correlogram).
    pub fn trace_len(&self) -> usize {
        match &self.panel {
            Panel::Line { values, .. } => values.len(),
            Panel::Histogram(h) => h.bins(),
            Panel::Correlogram { values, .. } => values.len(),
        }
    }
}

/// A rendered-to-be diagnostic figure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Figure {
    /// Pixel size for raster/vector renderers.
    pub size: (u32, u32),
    pub ts: Axes,
    pub hist: Axes,
    pub acf: Axes,
    pub pacf: Axes,
}

impl Figure {
    /// Panels in reading order: series, histogram, acf, pacf.
    pub fn axes(&self) -> [&Axes; 4] {
        [&self.ts, &self.hist, &self.acf, &self.pacf]
    }

    /// Number of correlogram lags (excluding lag 0).
    pub fn lags(&self) -> usize {
        self.acf.trace_len().saturating_sub(1)
    }
}

/// Build the diagnostic figure for `series`.
///
/// With `opts.diff > 0` the series is replaced by its lag-`diff` difference
/// (the first `diff` points are dropped). Invalid requests fail before any
/// panel is computed.
pub fn tsplot(series: &TimeSeries, title: &str, opts: &PlotOptions) -> Result<Figure, PlotError> {
    let values = stats::difference(&series.values, opts.diff)?;
    let lags = stats::resolve_lags(values.len(), opts.lags)?;
    let dates = series
        .dates
        .get(opts.diff..)
        .map(<[NaiveDate]>::to_vec)
        .unwrap_or_default();

    let n = values.len();
    let acf = stats::acf(&values, lags);
    let acf_band = stats::acf_band(&acf, n);
    let pacf = stats::pacf(&values, lags);
    let pacf_band = stats::pacf_band(n, lags);
    let hist = stats::histogram(&values, HISTOGRAM_BINS);

    debug!(series = %series.name, n, lags, diff = opts.diff, "built diagnostic figure");

    Ok(Figure {
        size: opts.size,
        ts: Axes::new(title, Panel::Line { dates, values }),
        hist: Axes::new(title, Panel::Histogram(hist)),
        acf: Axes::new(
            "Autocorrelation",
            Panel::Correlogram {
                values: acf,
                band: acf_band,
            },
        ),
        pacf: Axes::new(
            "Partial Autocorrelation",
            Panel::Correlogram {
                values: pacf,
                band: pacf_band,
            },
        ),
    })
}

fn default_limits(panel: &Panel) -> ((f64, f64), (f64, f64)) {
    match panel {
        Panel::Line { values, .. } => {
            let x_hi = values.len().saturating_sub(1).max(1) as f64;
            ((0.0, x_hi), padded_range(values.iter().copied()))
        }
        Panel::Histogram(h) => {
            let lo = h.edges.first().copied().unwrap_or(0.0);
            let hi = h.edges.last().copied().unwrap_or(1.0);
            ((lo, hi), (0.0, (h.max_count().max(1) as f64) * 1.05))
        }
        Panel::Correlogram { values, band } => {
            let x_hi = values.len().saturating_sub(1) as f64 + 0.5;
            let (lo, hi) = values
                .iter()
                .copied()
                .chain(band.iter().flat_map(|&b| [b, -b]))
                .filter(|v| v.is_finite())
                .fold((-1.0f64, 1.0f64), |(lo, hi), v| (lo.min(v), hi.max(v)));
            ((CORRELOGRAM_X_MIN, x_hi), (lo * 1.05, hi * 1.05))
        }
    }
}

/// `[min, max]` of finite values padded by 5%; a degenerate range is widened by 1.
pub(crate) fn padded_range(values: impl Iterator<Item = f64>) -> (f64, f64) {
    let (lo, hi) = values
        .filter(|v| v.is_finite())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
            (lo.min(v), hi.max(v))
        });
    if !lo.is_finite() {
        return (0.0, 1.0);
    }
    if hi <= lo {
        return (lo - 1.0, hi + 1.0);
    }
    let pad = (hi - lo) * 0.05;
    (lo - pad, hi + pad)
}
