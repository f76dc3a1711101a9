//! Shared domain types.
//!
//! These types are intentionally kept lightweight so they can be:
//!
//! - built from CLI flags and environment variables
//! - passed between the pipeline, the plot, and the front-ends
//! - exported to CSV/JSON for later inspection

use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use polars::prelude::DataFrame;
use serde::{Deserialize, Serialize};

/// Column names of the input tables.
pub mod schema {
    /// Item identifier in the sales table (exact-match key).
    pub const ITEM_ID: &str = "id";
    pub const STORE_ID: &str = "store_id";
    pub const DEPT_ID: &str = "dept_id";

    pub const DATE: &str = "date";
    /// Day-index label column of the calendar (`d_1`, `d_2`, ...).
    pub const DAY: &str = "d";
    pub const WEEKDAY: &str = "weekday";
    pub const WDAY: &str = "wday";
    pub const MONTH: &str = "month";
    pub const YEAR: &str = "year";
    pub const EVENT_COLUMNS: [&str; 4] =
        ["event_name_1", "event_type_1", "event_name_2", "event_type_2"];

    /// Substring that marks a sales-table column as a day-index column.
    pub const DAY_MARKER: &str = "d_";
}

/// Highest difference order accepted by the diagnostic plot.
pub const MAX_DIFF_ORDER: usize = 5;

/// Number of histogram bins in the diagnostic plot.
pub const HISTOGRAM_BINS: usize = 25;

/// English day names, Monday first (index = `wday`).
pub const WEEKDAY_NAMES: [&str; 7] = [
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
    "Sunday",
];

/// Default figure size in pixels (16x8 inches at 100 dpi).
pub const DEFAULT_FIGURE_SIZE: (u32, u32) = (1600, 800);

/// A date-indexed univariate series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeSeries {
    pub name: String,
    pub dates: Vec<NaiveDate>,
    pub values: Vec<f64>,
}

impl TimeSeries {
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Options for the diagnostic plot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlotOptions {
    /// Number of lags for ACF/PACF. `None` lets the plot choose.
    pub lags: Option<usize>,
    /// Difference order (0 disables differencing).
    pub diff: usize,
    /// Figure size in pixels.
    pub size: (u32, u32),
}

impl Default for PlotOptions {
    fn default() -> Self {
        Self {
            lags: None,
            diff: 0,
            size: DEFAULT_FIGURE_SIZE,
        }
    }
}

/// Locations of the input CSV files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataPaths {
    pub calendar: PathBuf,
    pub sales: PathBuf,
    /// The price table is only needed by `sts clean`.
    pub prices: Option<PathBuf>,
}

/// The three raw input tables, as loaded (or generated) before cleaning.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    pub calendar: DataFrame,
    pub sales: DataFrame,
    pub prices: Option<DataFrame>,
}

/// Environment variable naming the data directory (also read from `.env`).
pub const DATA_DIR_ENV: &str = "STS_DATA_DIR";

pub const DEFAULT_DATA_DIR: &str = "data";
pub const CALENDAR_FILE: &str = "calendar.csv";
pub const SALES_FILE: &str = "sales_train_validation.csv";
pub const PRICES_FILE: &str = "sell_prices.csv";

impl DataPaths {
    /// Standard file names under `dir`.
    pub fn in_dir(dir: &Path) -> Self {
        Self {
            calendar: dir.join(CALENDAR_FILE),
            sales: dir.join(SALES_FILE),
            prices: Some(dir.join(PRICES_FILE)),
        }
    }

    /// Resolve the data directory: explicit flag, else `STS_DATA_DIR`, else `./data`.
    pub fn resolve_dir(flag: Option<&Path>) -> PathBuf {
        if let Some(dir) = flag {
            return dir.to_path_buf();
        }
        dotenvy::dotenv().ok();
        std::env::var_os(DATA_DIR_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR))
    }
}

/// A full series/plot request as understood by the pipeline.
///
/// This is derived from CLI flags (plus defaults).
#[derive(Debug, Clone)]
pub struct SeriesConfig {
    pub paths: DataPaths,
    pub item: String,
    pub plot: PlotOptions,
    pub title: Option<String>,
}

impl SeriesConfig {
    /// Plot title: explicit title, else the item identifier.
    pub fn title(&self) -> &str {
        self.title.as_deref().unwrap_or(&self.item)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_data_dir_wins() {
        let dir = DataPaths::resolve_dir(Some(Path::new("/tmp/m5")));
        assert_eq!(dir, PathBuf::from("/tmp/m5"));
        let paths = DataPaths::in_dir(&dir);
        assert_eq!(paths.calendar, PathBuf::from("/tmp/m5/calendar.csv"));
        assert_eq!(paths.prices, Some(PathBuf::from("/tmp/m5/sell_prices.csv")));
    }

    #[test]
    fn title_defaults_to_item() {
        let config = SeriesConfig {
            paths: DataPaths::in_dir(Path::new("data")),
            item: "HOBBIES_1_001_CA_1_validation".to_string(),
            plot: PlotOptions::default(),
            title: None,
        };
        assert_eq!(config.title(), "HOBBIES_1_001_CA_1_validation");
    }
}
