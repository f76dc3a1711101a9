//! Shared pipeline logic used by both CLI and TUI front-ends.
//!
//! Keeping this in one place avoids duplicating the core workflow:
//! read CSVs -> copy -> clean -> assemble item -> series -> figure
//!
//! The CLI and the TUI can then focus on presentation (printing vs widgets).

use polars::prelude::DataFrame;
use tracing::{info, warn};

use crate::domain::frame::to_time_series;
use crate::domain::{DataPaths, Dataset, PlotOptions, TimeSeries};
use crate::error::AppError;
use crate::io::read_tables;
use crate::plot::{tsplot, Figure};
use crate::report::{summarize_item, SeriesSummary};
use crate::transform::{
    clean_calendar, clean_sales, clean_sell_price, filter_item, item_sales, start_pipeline,
};

/// All computed outputs for one item.
#[derive(Debug, Clone)]
pub struct SeriesRun {
    pub item: String,
    /// Per-date frame: item sales plus every calendar column.
    pub frame: DataFrame,
    pub series: TimeSeries,
    pub summary: SeriesSummary,
}

/// Read the input files and clean every table.
pub fn load_clean(paths: &DataPaths) -> Result<Dataset, AppError> {
    info!(calendar = %paths.calendar.display(), sales = %paths.sales.display(), "loading tables");
    let raw = read_tables(paths)?;
    clean_dataset(&raw)
}

/// Clean copies of the raw tables; `raw` itself is left untouched.
pub fn clean_dataset(raw: &Dataset) -> Result<Dataset, AppError> {
    let calendar = clean_calendar(start_pipeline(&raw.calendar)?)?;
    let sales = clean_sales(start_pipeline(&raw.sales)?)?;
    let prices = raw
        .prices
        .as_ref()
        .map(|prices| clean_sell_price(start_pipeline(prices)?))
        .transpose()?;
    Ok(Dataset {
        calendar,
        sales,
        prices,
    })
}

/// Assemble the per-date table, series, and summary for `item`.
pub fn run_series(data: &Dataset, item: &str) -> Result<SeriesRun, AppError> {
    let frame = filter_item(item, &data.sales, &data.calendar)?;
    let series = to_time_series(&frame, item)?;
    let summary = summarize_item(&frame, item)?;
    Ok(SeriesRun {
        item: item.to_string(),
        frame,
        series,
        summary,
    })
}

/// The univariate sales series alone, as used by interactive views.
pub fn item_series(data: &Dataset, item: &str) -> Result<TimeSeries, AppError> {
    let frame = item_sales(item, &data.sales, &data.calendar)?;
    Ok(to_time_series(&frame, item)?)
}

/// Build the diagnostic figure, logging rejected requests.
pub fn run_plot(series: &TimeSeries, title: &str, opts: &PlotOptions) -> Result<Figure, AppError> {
    tsplot(series, title, opts).map_err(|err| {
        warn!(series = %series.name, diff = opts.diff, lags = ?opts.lags, "plot rejected: {err}");
        err.into()
    })
}
