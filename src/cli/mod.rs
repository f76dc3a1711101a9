//! Command-line parsing for the `sts` sales time-series tool.
//!
//! The goal of this module is to keep **argument parsing** and **command dispatch**
//! separate from the table/statistics code.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::domain::{
    DataPaths, PlotOptions, CALENDAR_FILE, DEFAULT_FIGURE_SIZE, PRICES_FILE, SALES_FILE,
};

pub mod picker;

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "sts", version, about = "Retail sales time-series cleaning and diagnostics")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Load and clean the input tables, then print an overview of each.
    Clean(DataArgs),
    /// Assemble one item's daily sales, print a summary, and optionally export it.
    Series(SeriesArgs),
    /// Build the four-panel diagnostic figure for one item.
    Plot(PlotArgs),
    /// Launch the interactive TUI.
    ///
    /// This uses the same underlying pipeline as `sts plot`, but renders the
    /// panels in a terminal UI using Ratatui.
    Tui(TuiArgs),
    /// Write a synthetic dataset with the same layout as the real input files.
    Sample(SampleArgs),
}

/// Where the input CSV files live.
#[derive(Debug, Args, Clone, Default)]
pub struct DataArgs {
    /// Directory holding the input files (else `STS_DATA_DIR`, else `./data`).
    #[arg(short = 'd', long, value_name = "DIR")]
    pub data_dir: Option<PathBuf>,

    /// Calendar CSV (default: `<data-dir>/calendar.csv`).
    #[arg(long, value_name = "CSV")]
    pub calendar: Option<PathBuf>,

    /// Wide sales CSV (default: `<data-dir>/sales_train_validation.csv`).
    #[arg(long, value_name = "CSV")]
    pub sales: Option<PathBuf>,

    /// Sell-price CSV (default: `<data-dir>/sell_prices.csv`, only read by `clean`).
    #[arg(long, value_name = "CSV")]
    pub prices: Option<PathBuf>,
}

impl DataArgs {
    /// Resolve file locations. `with_prices` controls whether the price table is loaded.
    pub fn paths(&self, with_prices: bool) -> DataPaths {
        let dir = DataPaths::resolve_dir(self.data_dir.as_deref());
        let pick =
            |flag: &Option<PathBuf>, file: &str| flag.clone().unwrap_or_else(|| dir.join(file));
        DataPaths {
            calendar: pick(&self.calendar, CALENDAR_FILE),
            sales: pick(&self.sales, SALES_FILE),
            prices: with_prices.then(|| pick(&self.prices, PRICES_FILE)),
        }
    }
}

/// Options for assembling one item's series.
#[derive(Debug, Args, Clone)]
pub struct SeriesArgs {
    #[command(flatten)]
    pub data: DataArgs,

    /// Item identifier (the sales `id` column). Prompts when omitted.
    #[arg(short = 'i', long)]
    pub item: Option<String>,

    /// Export the assembled per-date table (sales + calendar columns) to CSV.
    #[arg(long, value_name = "CSV")]
    pub export: Option<PathBuf>,
}

/// Options for the diagnostic figure.
#[derive(Debug, Args, Clone)]
pub struct PlotArgs {
    #[command(flatten)]
    pub data: DataArgs,

    /// Item identifier (the sales `id` column). Prompts when omitted.
    #[arg(short = 'i', long)]
    pub item: Option<String>,

    /// Figure title (defaults to the item identifier).
    #[arg(short = 't', long)]
    pub title: Option<String>,

    /// Number of ACF/PACF lags (default: min(10·log10(n), n/2 - 1)).
    #[arg(short = 'l', long)]
    pub lags: Option<usize>,

    /// Difference order applied before plotting (0-5).
    #[arg(long, default_value_t = 0)]
    pub diff: usize,

    /// Figure width in pixels (SVG output).
    #[arg(long, default_value_t = DEFAULT_FIGURE_SIZE.0)]
    pub fig_width: u32,

    /// Figure height in pixels (SVG output).
    #[arg(long, default_value_t = DEFAULT_FIGURE_SIZE.1)]
    pub fig_height: u32,

    /// Write the figure as SVG.
    #[arg(long, value_name = "SVG")]
    pub svg: Option<PathBuf>,

    /// Save the figure (all panel data) as JSON for later re-rendering.
    #[arg(long = "save-figure", value_name = "JSON")]
    pub save_figure: Option<PathBuf>,

    /// Re-render a figure saved with `--save-figure` instead of loading data.
    #[arg(long, value_name = "JSON", conflicts_with_all = ["item", "save_figure"])]
    pub figure: Option<PathBuf>,

    /// Print the ACF/PACF values as a lag table.
    #[arg(long)]
    pub correlogram: bool,

    /// Disable the terminal plot.
    #[arg(long)]
    pub no_plot: bool,

    /// Terminal plot width (columns).
    #[arg(long, default_value_t = 100)]
    pub width: usize,

    /// Terminal plot height per panel (rows).
    #[arg(long, default_value_t = 12)]
    pub height: usize,
}

impl PlotArgs {
    pub fn plot_options(&self) -> PlotOptions {
        PlotOptions {
            lags: self.lags,
            diff: self.diff,
            size: (self.fig_width, self.fig_height),
        }
    }
}

/// Options for the interactive explorer.
#[derive(Debug, Args, Clone, Default)]
pub struct TuiArgs {
    #[command(flatten)]
    pub data: DataArgs,

    /// Item to show first (defaults to the first sales row).
    #[arg(short = 'i', long)]
    pub item: Option<String>,

    /// Initial number of ACF/PACF lags.
    #[arg(short = 'l', long)]
    pub lags: Option<usize>,

    /// Initial difference order (0-5).
    #[arg(long, default_value_t = 0)]
    pub diff: usize,
}

/// Options for synthetic data generation.
#[derive(Debug, Args, Clone)]
pub struct SampleArgs {
    /// Output directory (created if missing).
    #[arg(short = 'o', long, default_value = "data")]
    pub out: PathBuf,

    /// Number of days (`d_` columns).
    #[arg(long, default_value_t = 730)]
    pub days: usize,

    /// Number of items (sales rows).
    #[arg(short = 'n', long, default_value_t = 30)]
    pub items: usize,

    /// Store identifier, e.g. `CA_1`.
    #[arg(long, default_value = "CA_1")]
    pub store: String,

    /// Random seed.
    #[arg(long, default_value_t = 42)]
    pub seed: u64,
}
