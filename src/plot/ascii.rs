//! ASCII/Unicode plotting for terminal output.
//!
//! This is intentionally "dumb" (fixed-size grid per panel), optimized for:
//! - quick visual sanity checks in a terminal
//! - deterministic output (helpful for golden tests)
//!
//! Panel elements:
//! - series: `-` line
//! - histogram: `#` bars
//! - correlograms: `|` stems with `o` tips, `.` confidence band, `-` zero line

use crate::plot::{Axes, Figure, Panel};

/// Gap between the two panels of a row.
const GUTTER: &str = " | ";

/// Render the whole figure as a 2x2 grid of text panels.
///
/// `width` is the total line width; each panel gets half of it. `height` is the
/// plot height of a single panel (its header line comes on top).
pub fn render_ascii_figure(figure: &Figure, width: usize, height: usize) -> String {
    let panel_width = (width.saturating_sub(GUTTER.len()) / 2).max(10);
    let rows = [[&figure.ts, &figure.hist], [&figure.acf, &figure.pacf]];

    let mut out = String::new();
    for (i, [left, right]) in rows.into_iter().enumerate() {
        if i > 0 {
            out.push('\n');
        }
        let left = render_panel(left, panel_width, height);
        let right = render_panel(right, panel_width, height);
        for (l, r) in left.iter().zip(&right) {
            out.push_str(l);
            out.push_str(GUTTER);
            out.push_str(r.trim_end());
            out.push('\n');
        }
    }
    out
}

/// Render one panel: a header line followed by `height` grid rows, each exactly
/// `width` characters.
pub fn render_panel(axes: &Axes, width: usize, height: usize) -> Vec<String> {
    let width = width.max(10);
    let height = height.max(3);
    let (x_min, x_max) = axes.xlim;
    let (y_min, y_max) = axes.ylim;

    let mut grid = vec![vec![' '; width]; height];
    let view = View {
        x_min,
        x_max,
        y_min,
        y_max,
        width,
        height,
    };

    match &axes.panel {
        Panel::Line { values, .. } => {
            let points: Vec<(f64, f64)> = values
                .iter()
                .enumerate()
                .filter(|(_, v)| v.is_finite())
                .map(|(i, &v)| (i as f64, v))
                .collect();
            draw_curve(&mut grid, &points, &view);
        }
        Panel::Histogram(hist) => {
            let bins = hist.bins();
            for (i, (left, right, count)) in hist.iter_bins().enumerate() {
                if count == 0 {
                    continue;
                }
                let c0 = view.x(left);
                let c1 = if i + 1 == bins { view.x(right) + 1 } else { view.x(right) };
                let top = view.y(count as f64);
                for row in grid.iter_mut().skip(top) {
                    for cell in row.iter_mut().take(c1.min(width)).skip(c0) {
                        *cell = '#';
                    }
                }
            }
        }
        Panel::Correlogram { values, band } => {
            let zero = view.y(0.0);
            for (k, &v) in values.iter().enumerate() {
                let x = view.x(k as f64);
                let tip = view.y(v);
                draw_line(&mut grid, x, zero, x, tip, '|');
                grid[tip][x] = 'o';
            }
            for (k, &b) in band.iter().enumerate().skip(1) {
                let x = view.x(k as f64);
                for y in [view.y(b), view.y(-b)] {
                    if grid[y][x] == ' ' {
                        grid[y][x] = '.';
                    }
                }
            }
            for cell in grid[zero].iter_mut() {
                if *cell == ' ' {
                    *cell = '-';
                }
            }
        }
    }

    let mut header = format!(
        "{} | x=[{x_min:.2}, {x_max:.2}] y=[{y_min:.2}, {y_max:.2}]",
        axes.title
    );
    header = fit_width(&header, width);

    let mut lines = Vec::with_capacity(height + 1);
    lines.push(header);
    lines.extend(grid.into_iter().map(|row| row.into_iter().collect::<String>()));
    lines
}

/// Grid mapping for one panel.
struct View {
    x_min: f64,
    x_max: f64,
    y_min: f64,
    y_max: f64,
    width: usize,
    height: usize,
}

impl View {
    fn x(&self, x: f64) -> usize {
        map_x(x, self.x_min, self.x_max, self.width)
    }

    fn y(&self, y: f64) -> usize {
        map_y(y, self.y_min, self.y_max, self.height)
    }
}

/// Pad or truncate to exactly `width` characters.
fn fit_width(s: &str, width: usize) -> String {
    let mut out: String = s.chars().take(width).collect();
    let len = out.chars().count();
    out.extend(std::iter::repeat_n(' ', width - len));
    out
}

fn map_x(x: f64, x_min: f64, x_max: f64, width: usize) -> usize {
    let width = width.max(2);
    let span = x_max - x_min;
    if !(span > 0.0) {
        return 0;
    }
    let u = ((x - x_min) / span).clamp(0.0, 1.0);
    (u * (width as f64 - 1.0)).round() as usize
}

fn map_y(y: f64, y_min: f64, y_max: f64, height: usize) -> usize {
    let height = height.max(2);
    let span = y_max - y_min;
    if !(span > 0.0) {
        return height - 1;
    }
    let u = ((y - y_min) / span).clamp(0.0, 1.0);
    // y=top is max -> row 0
    (height as f64 - 1.0 - (u * (height as f64 - 1.0))).round() as usize
}

fn draw_curve(grid: &mut [Vec<char>], curve: &[(f64, f64)], view: &View) {
    let mut prev = None;
    for &(x, y) in curve {
        let cx = view.x(x);
        let cy = view.y(y);
        if let Some((x0, y0)) = prev {
            draw_line(grid, x0, y0, cx, cy, '-');
        } else {
            grid[cy][cx] = '-';
        }
        prev = Some((cx, cy));
    }
}

/// Integer line drawing (Bresenham-ish).
fn draw_line(grid: &mut [Vec<char>], x0: usize, y0: usize, x1: usize, y1: usize, ch: char) {
    let mut x0 = x0 as isize;
    let mut y0 = y0 as isize;
    let x1 = x1 as isize;
    let y1 = y1 as isize;

    let dx = (x1 - x0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let dy = -(y1 - y0).abs();
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;

    loop {
        if y0 >= 0
            && (y0 as usize) < grid.len()
            && x0 >= 0
            && (x0 as usize) < grid[0].len()
            && grid[y0 as usize][x0 as usize] == ' '
        {
            grid[y0 as usize][x0 as usize] = ch;
        }

        if x0 == x1 && y0 == y1 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x0 += sx;
        }
        if e2 <= dx {
            err += dx;
            y0 += sy;
        }
    }
}
