//! Reporting utilities: item summaries and table overviews.

pub mod format;

pub use format::*;

use chrono::NaiveDate;
use polars::prelude::DataFrame;

use crate::domain::frame::{text_values, to_time_series};
use crate::domain::{schema, TimeSeries, WEEKDAY_NAMES};
use crate::error::TableResult;

/// Descriptive statistics of one item's daily sales.
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesSummary {
    pub item: String,
    pub observations: usize,
    pub first: Option<NaiveDate>,
    pub last: Option<NaiveDate>,
    pub total: f64,
    pub mean: f64,
    /// Fraction of days with zero units sold.
    pub zero_share: f64,
    /// Days carrying at least one calendar event.
    pub event_days: usize,
    /// Mean units by weekday name, Monday first; weekdays absent from the data are skipped.
    pub weekday_means: Vec<(String, f64)>,
}

/// Summarize an assembled item frame (the output of `filter_item`).
///
/// Event days and weekday means are only reported when the calendar columns
/// they need are present.
pub fn summarize_item(frame: &DataFrame, item: &str) -> TableResult<SeriesSummary> {
    let series = to_time_series(frame, item)?;
    let mut summary = summarize_series(&series);

    let mut has_event = vec![false; frame.height()];
    for name in schema::EVENT_COLUMNS {
        let Ok(events) = frame.column(name) else {
            continue;
        };
        let present = events.is_not_null();
        for (flag, day) in has_event.iter_mut().zip(&present) {
            *flag |= day.unwrap_or(false);
        }
    }
    summary.event_days = has_event.into_iter().filter(|&flag| flag).count();

    if frame.column(schema::WEEKDAY).is_ok() {
        let weekdays = text_values(frame, schema::WEEKDAY)?;
        summary.weekday_means = WEEKDAY_NAMES
            .iter()
            .filter_map(|&name| {
                let values: Vec<f64> = weekdays
                    .iter()
                    .zip(&series.values)
                    .filter(|(day, _)| day.as_deref() == Some(name))
                    .map(|(_, &units)| units)
                    .collect();
                (!values.is_empty()).then(|| (name.to_string(), crate::stats::mean(&values)))
            })
            .collect();
    }

    Ok(summary)
}

/// Summary statistics computable from the series alone.
pub fn summarize_series(series: &TimeSeries) -> SeriesSummary {
    let n = series.len();
    let total: f64 = series.values.iter().sum();
    let zeros = series.values.iter().filter(|&&v| v == 0.0).count();

    SeriesSummary {
        item: series.name.clone(),
        observations: n,
        first: series.dates.first().copied(),
        last: series.dates.last().copied(),
        total,
        mean: crate::stats::mean(&series.values),
        zero_share: if n == 0 { 0.0 } else { zeros as f64 / n as f64 },
        event_days: 0,
        weekday_means: Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::sample::{generate_dataset, SampleConfig};
    use crate::transform::{clean_calendar, clean_sales, filter_item};

    #[test]
    fn summarize_series_basic() {
        let start = NaiveDate::from_ymd_opt(2011, 1, 29).unwrap();
        let series = TimeSeries {
            name: "A".to_string(),
            dates: (0..4).map(|i| start + chrono::Duration::days(i)).collect(),
            values: vec![0.0, 2.0, 0.0, 6.0],
        };
        let s = summarize_series(&series);
        assert_eq!(s.observations, 4);
        assert_eq!(s.total, 8.0);
        assert_eq!(s.mean, 2.0);
        assert_eq!(s.zero_share, 0.5);
        assert_eq!(s.first, Some(start));
        assert_eq!(s.last, NaiveDate::from_ymd_opt(2011, 2, 1));
    }

    #[test]
    fn summarize_item_counts_events_and_weekdays() {
        // 2011-01-29 .. 2011-02-27 covers Valentine's Day.
        let data = generate_dataset(&SampleConfig {
            days: 30,
            items: 2,
            ..SampleConfig::default()
        })
        .unwrap();
        let sales = clean_sales(data.sales).unwrap();
        let calendar = clean_calendar(data.calendar).unwrap();
        let item = "FOODS_1_001_CA_1_validation";

        let frame = filter_item(item, &sales, &calendar).unwrap();
        let s = summarize_item(&frame, item).unwrap();

        assert_eq!(s.observations, 30);
        assert_eq!(s.event_days, 1);
        assert_eq!(s.weekday_means.len(), 7);
        assert_eq!(s.weekday_means[0].0, "Monday");
    }
}
