//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments
//! - loads and cleans the input tables
//! - assembles item series and diagnostic figures
//! - prints reports/plots
//! - writes optional exports

use clap::Parser;
use tracing::info;

use crate::cli::picker::{item_ids, prompt_for_item};
use crate::cli::{Command, DataArgs, PlotArgs, SampleArgs, SeriesArgs};
use crate::data::sample::{generate_dataset, SampleConfig};
use crate::domain::Dataset;
use crate::error::AppError;

pub mod pipeline;

/// Entry point for the `sts` binary.
pub fn run() -> Result<(), AppError> {
    // We want `sts` and `sts -i ITEM` to behave like `sts tui ...`.
    //
    // Clap requires a subcommand name, so we do a small, explicit rewrite of the
    // argv list before parsing. This preserves a clean clap structure while
    // retaining the requested UX.
    let argv = rewrite_args(std::env::args().collect());
    let cli = crate::cli::Cli::parse_from(argv);

    match cli.command {
        Command::Clean(args) => handle_clean(args),
        Command::Series(args) => handle_series(args),
        Command::Plot(args) => handle_plot(args),
        Command::Tui(args) => crate::tui::run(args),
        Command::Sample(args) => handle_sample(args),
    }
}

fn handle_clean(args: DataArgs) -> Result<(), AppError> {
    let data = pipeline::load_clean(&args.paths(true))?;

    println!("{}", crate::report::format_table_overview("calendar", &data.calendar));
    println!("{}", crate::report::format_table_overview("sales", &data.sales));
    if let Some(prices) = &data.prices {
        println!("{}", crate::report::format_table_overview("prices", prices));
    }
    Ok(())
}

fn handle_series(args: SeriesArgs) -> Result<(), AppError> {
    let data = pipeline::load_clean(&args.data.paths(false))?;
    let item = resolve_item(args.item, &data)?;
    let run = pipeline::run_series(&data, &item)?;

    println!("{}", crate::report::format_series_summary(&run.summary));

    if let Some(path) = &args.export {
        crate::io::write_table_csv(path, &run.frame)?;
        info!(path = %path.display(), rows = run.frame.height(), "exported item table");
    }
    Ok(())
}

fn handle_plot(args: PlotArgs) -> Result<(), AppError> {
    let figure = match &args.figure {
        Some(path) => crate::io::read_figure_json(path)?,
        None => {
            let data = pipeline::load_clean(&args.data.paths(false))?;
            let item = resolve_item(args.item.clone(), &data)?;
            let series = pipeline::item_series(&data, &item)?;
            let title = args.title.as_deref().unwrap_or(&item);
            pipeline::run_plot(&series, title, &args.plot_options())?
        }
    };

    if !args.no_plot {
        println!(
            "{}",
            crate::plot::ascii::render_ascii_figure(&figure, args.width, args.height)
        );
    }
    if args.correlogram {
        println!("{}", crate::report::format_correlogram(&figure));
    }

    // Optional exports.
    if let Some(path) = &args.svg {
        crate::plot::svg::render_svg_file(&figure, path)?;
        info!(path = %path.display(), "wrote SVG figure");
    }
    if let Some(path) = &args.save_figure {
        crate::io::write_figure_json(path, &figure)?;
        info!(path = %path.display(), "saved figure JSON");
    }
    Ok(())
}

fn handle_sample(args: SampleArgs) -> Result<(), AppError> {
    let config = SampleConfig {
        days: args.days,
        items: args.items,
        store_id: args.store,
        seed: args.seed,
        ..SampleConfig::default()
    };
    let dataset = generate_dataset(&config)?;
    let paths = crate::io::write_dataset(&dataset, &args.out)?;

    println!(
        "Wrote {} items x {} days to {}",
        config.items,
        config.days,
        args.out.display()
    );
    println!("  calendar: {}", paths.calendar.display());
    println!("  sales:    {}", paths.sales.display());
    if let Some(prices) = &paths.prices {
        println!("  prices:   {}", prices.display());
    }
    Ok(())
}

/// Use the `--item` flag when given, else ask interactively.
fn resolve_item(flag: Option<String>, data: &Dataset) -> Result<String, AppError> {
    match flag {
        Some(item) => Ok(item),
        None => prompt_for_item(&item_ids(&data.sales)?),
    }
}

/// Rewrite argv so `sts` defaults to `sts tui`.
///
/// Rules:
/// - `sts`                      -> `sts tui`
/// - `sts -i ITEM ...`          -> `sts tui -i ITEM ...`
/// - `sts --help/--version/-h`  -> unchanged (show top-level help/version)
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let Some(arg1) = argv.get(1).cloned() else {
        argv.push("tui".to_string());
        return argv;
    };

    let is_top_level_help_or_version = matches!(
        arg1.as_str(),
        "-h" | "--help" | "-V" | "--version" | "help"
    );
    if is_top_level_help_or_version {
        return argv;
    }

    let is_subcommand = matches!(arg1.as_str(), "clean" | "series" | "plot" | "tui" | "sample");
    if is_subcommand {
        return argv;
    }

    // If the first token is a flag, treat it as "tui flags".
    if arg1.starts_with('-') {
        argv.insert(1, "tui".to_string());
        return argv;
    }

    // Otherwise, leave as-is.
    argv
}
