//! SVG rendering of a [`Figure`] with Plotters.
//!
//! Drawing is generic over the Plotters backend; this module wires it to the
//! SVG backend (string or file). Only the `line_series` and `svg_backend`
//! features are enabled, so text uses Plotters' built-in font estimation and
//! needs no system font libraries.

use std::path::Path;

use plotters::coord::Shift;
use plotters::prelude::*;

use crate::error::PlotError;
use crate::plot::{Axes, Figure, Panel};

const SERIES_COLOR: RGBColor = RGBColor(31, 119, 180);
const BAND_COLOR: RGBColor = RGBColor(173, 204, 230);

/// Render `figure` into an SVG document held in memory.
pub fn render_svg_string(figure: &Figure) -> Result<String, PlotError> {
    let mut out = String::new();
    {
        let root = SVGBackend::with_string(&mut out, figure.size).into_drawing_area();
        draw_figure(figure, &root).map_err(|e| PlotError::Render(e.to_string()))?;
        root.present().map_err(|e| PlotError::Render(e.to_string()))?;
    }
    Ok(out)
}

/// Render `figure` to an SVG file at `path`.
pub fn render_svg_file(figure: &Figure, path: &Path) -> Result<(), PlotError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|source| PlotError::Io {
            path: parent.display().to_string(),
            source,
        })?;
    }
    let root = SVGBackend::new(path, figure.size).into_drawing_area();
    draw_figure(figure, &root).map_err(|e| PlotError::Render(e.to_string()))?;
    root.present().map_err(|e| PlotError::Render(e.to_string()))?;
    Ok(())
}

/// Draw the four panels of `figure` in a 2x2 grid on `root`.
pub fn draw_figure<DB: DrawingBackend>(
    figure: &Figure,
    root: &DrawingArea<DB, Shift>,
) -> Result<(), DrawingAreaErrorKind<DB::ErrorType>> {
    root.fill(&WHITE)?;
    let cells = root.split_evenly((2, 2));
    for (axes, area) in figure.axes().into_iter().zip(cells.iter()) {
        draw_axes(axes, area)?;
    }
    Ok(())
}

fn draw_axes<DB: DrawingBackend>(
    axes: &Axes,
    area: &DrawingArea<DB, Shift>,
) -> Result<(), DrawingAreaErrorKind<DB::ErrorType>> {
    let (x0, x1) = ordered(axes.xlim);
    let (y0, y1) = ordered(axes.ylim);

    let mut chart = ChartBuilder::on(area)
        .margin(12)
        .caption(&axes.title, ("sans-serif", 18))
        .x_label_area_size(30)
        .y_label_area_size(45)
        .build_cartesian_2d(x0..x1, y0..y1)?;

    match &axes.panel {
        Panel::Line { dates, values } => {
            let label_for = |x: &f64| {
                let pos = x.round();
                if pos < 0.0 {
                    return String::new();
                }
                dates
                    .get(pos as usize)
                    .map(|d| d.format("%Y-%m").to_string())
                    .unwrap_or_default()
            };
            chart
                .configure_mesh()
                .disable_x_mesh()
                .x_labels(6)
                .x_label_formatter(&label_for)
                .draw()?;
            chart.draw_series(LineSeries::new(
                values
                    .iter()
                    .enumerate()
                    .filter(|(_, v)| v.is_finite())
                    .map(|(i, &v)| (i as f64, v)),
                &SERIES_COLOR,
            ))?;
        }
        Panel::Histogram(hist) => {
            chart.configure_mesh().disable_x_mesh().draw()?;
            chart.draw_series(hist.iter_bins().map(|(left, right, count)| {
                Rectangle::new([(left, 0.0), (right, count as f64)], SERIES_COLOR.filled())
            }))?;
            chart.draw_series(hist.iter_bins().map(|(left, right, count)| {
                Rectangle::new([(left, 0.0), (right, count as f64)], WHITE.stroke_width(1))
            }))?;
        }
        Panel::Correlogram { values, band } => {
            chart
                .configure_mesh()
                .disable_x_mesh()
                .disable_y_mesh()
                .draw()?;

            // Band is drawn from lag 1; lag 0 is exactly 1 by construction.
            let upper: Vec<(f64, f64)> = band
                .iter()
                .enumerate()
                .skip(1)
                .map(|(k, &b)| (k as f64, b))
                .collect();
            if upper.len() >= 2 {
                let lower = upper.iter().rev().map(|&(k, b)| (k, -b));
                let outline: Vec<(f64, f64)> = upper.iter().copied().chain(lower).collect();
                chart.draw_series(std::iter::once(Polygon::new(
                    outline,
                    BAND_COLOR.mix(0.5).filled(),
                )))?;
            }

            chart.draw_series(LineSeries::new([(x0, 0.0), (x1, 0.0)], &BLACK))?;
            chart.draw_series(values.iter().enumerate().map(|(k, &v)| {
                PathElement::new(vec![(k as f64, 0.0), (k as f64, v)], SERIES_COLOR)
            }))?;
            chart.draw_series(
                values
                    .iter()
                    .enumerate()
                    .map(|(k, &v)| Circle::new((k as f64, v), 3, SERIES_COLOR.filled())),
            )?;
        }
    }

    Ok(())
}

/// Plotters rejects empty ranges; widen degenerate limits.
fn ordered((lo, hi): (f64, f64)) -> (f64, f64) {
    let (lo, hi) = if lo <= hi { (lo, hi) } else { (hi, lo) };
    if !(lo.is_finite() && hi.is_finite()) {
        return (0.0, 1.0);
    }
    if hi - lo < 1e-12 {
        return (lo - 0.5, hi + 0.5);
    }
    (lo, hi)
}
