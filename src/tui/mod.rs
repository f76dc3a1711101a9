//! Ratatui-based terminal UI.
//!
//! The TUI is an item explorer: it loads and cleans the tables once, then
//! shows the four diagnostic panels for one item at a time. Items, difference
//! order, and lag count are changed from the keyboard; rejected settings are
//! reported in the status line instead of aborting.

use std::io;
use std::time::Duration;

use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    symbols::Marker,
    text::{Line, Span, Text},
    widgets::{Axis, BarChart, Block, Borders, Chart, Dataset as ChartData, GraphType, Paragraph},
    Terminal,
};

use crate::app::pipeline;
use crate::cli::picker::item_ids;
use crate::cli::TuiArgs;
use crate::domain::{Dataset, PlotOptions, SeriesConfig, TimeSeries, MAX_DIFF_ORDER};
use crate::error::AppError;
use crate::plot::{Axes, Figure, Panel};

/// Start the TUI.
pub fn run(args: TuiArgs) -> Result<(), AppError> {
    let paths = args.data.paths(false);
    let data = pipeline::load_clean(&paths)?;
    let plot = PlotOptions {
        lags: args.lags,
        diff: args.diff,
        ..PlotOptions::default()
    };
    let config = SeriesConfig {
        paths,
        item: String::new(),
        plot,
        title: None,
    };
    let mut app = App::new(data, config, args.item.as_deref())?;

    let _guard = TerminalGuard::new()?;
    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal = Terminal::new(backend)
        .map_err(|e| AppError::new(4, format!("Failed to initialize terminal: {e}")))?;

    app.event_loop(&mut terminal)
}

/// Ensures the terminal is restored (raw mode, alternate screen) on exit.
struct TerminalGuard;

impl TerminalGuard {
    fn new() -> Result<Self, AppError> {
        enable_raw_mode().map_err(|e| AppError::new(4, format!("Failed to enable raw mode: {e}")))?;
        if let Err(e) = execute!(io::stdout(), EnterAlternateScreen) {
            let _ = disable_raw_mode();
            return Err(AppError::new(4, format!("Failed to enter alternate screen: {e}")));
        }
        Ok(Self)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
    }
}

struct App {
    data: Dataset,
    items: Vec<String>,
    selected: usize,
    config: SeriesConfig,
    status: String,
    series: Option<TimeSeries>,
    figure: Option<Figure>,
}

impl App {
    /// `start` picks the first item shown; defaults to the first sales row.
    fn new(data: Dataset, config: SeriesConfig, start: Option<&str>) -> Result<Self, AppError> {
        let items = item_ids(&data.sales)?;
        if items.is_empty() {
            return Err(AppError::new(3, "The sales table has no items."));
        }
        let selected = match start {
            Some(item) => items
                .iter()
                .position(|id| id == item)
                .ok_or_else(|| AppError::new(3, format!("Unknown item: '{item}'")))?,
            None => 0,
        };

        let mut app = Self {
            data,
            items,
            selected,
            config,
            status: String::new(),
            series: None,
            figure: None,
        };
        app.select(selected);
        Ok(app)
    }

    fn event_loop<B: ratatui::backend::Backend>(
        &mut self,
        terminal: &mut Terminal<B>,
    ) -> Result<(), AppError> {
        let mut needs_redraw = true;
        loop {
            if needs_redraw {
                terminal
                    .draw(|f| self.draw(f))
                    .map_err(|e| AppError::new(4, format!("Terminal draw error: {e}")))?;
                needs_redraw = false;
            }

            if !event::poll(Duration::from_millis(100))
                .map_err(|e| AppError::new(4, format!("Event poll error: {e}")))? {
                continue;
            }

            match event::read().map_err(|e| AppError::new(4, format!("Event read error: {e}")))? {
                Event::Key(key) => {
                    if key.kind != KeyEventKind::Press {
                        continue;
                    }
                    if self.handle_key(key.code) {
                        break;
                    }
                    needs_redraw = true;
                }
                Event::Resize(_, _) => {
                    needs_redraw = true;
                }
                _ => {}
            }
        }
        Ok(())
    }

    /// Returns `true` when the explorer should quit.
    fn handle_key(&mut self, code: KeyCode) -> bool {
        match code {
            KeyCode::Char('q') | KeyCode::Esc => return true,
            KeyCode::Right | KeyCode::Char('n') => {
                self.select((self.selected + 1) % self.items.len());
            }
            KeyCode::Left | KeyCode::Char('p') => {
                self.select((self.selected + self.items.len() - 1) % self.items.len());
            }
            KeyCode::Char('+') | KeyCode::Char('=') => {
                if self.config.plot.diff >= MAX_DIFF_ORDER {
                    self.status = format!("diff is already at the maximum ({MAX_DIFF_ORDER})");
                } else {
                    self.config.plot.diff += 1;
                    self.refresh_figure();
                }
            }
            KeyCode::Char('-') => {
                if self.config.plot.diff > 0 {
                    self.config.plot.diff -= 1;
                    self.refresh_figure();
                }
            }
            KeyCode::Char(']') => {
                self.config.plot.lags = Some(self.current_lags() + 1);
                self.refresh_figure();
            }
            KeyCode::Char('[') => {
                self.config.plot.lags = Some(self.current_lags().saturating_sub(1).max(1));
                self.refresh_figure();
            }
            KeyCode::Char('a') => {
                self.config.plot.lags = None;
                self.refresh_figure();
            }
            _ => {}
        }
        false
    }

    fn select(&mut self, idx: usize) {
        self.selected = idx;
        self.config.item = self.items[idx].clone();
        match pipeline::item_series(&self.data, &self.config.item) {
            Ok(series) => {
                self.series = Some(series);
                self.refresh_figure();
            }
            Err(err) => {
                self.series = None;
                self.figure = None;
                self.status = err.to_string();
            }
        }
    }

    fn refresh_figure(&mut self) {
        let Some(series) = &self.series else {
            return;
        };
        match pipeline::run_plot(series, self.config.title(), &self.config.plot) {
            Ok(figure) => {
                self.status = format!(
                    "{} | n={} | diff={} | lags={}",
                    self.config.item,
                    figure.ts.trace_len(),
                    self.config.plot.diff,
                    figure.lags()
                );
                self.figure = Some(figure);
            }
            Err(err) => {
                self.figure = None;
                self.status = err.to_string();
            }
        }
    }

    /// Lag count the `[`/`]` keys step from.
    fn current_lags(&self) -> usize {
        self.config
            .plot
            .lags
            .or_else(|| self.figure.as_ref().map(Figure::lags))
            .unwrap_or(0)
    }

    fn draw(&self, frame: &mut ratatui::Frame<'_>) {
        let size = frame.area();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(4), Constraint::Min(0), Constraint::Length(3)])
            .split(size);

        self.draw_header(frame, chunks[0]);
        self.draw_body(frame, chunks[1]);
        self.draw_footer(frame, chunks[2]);
    }

    fn draw_header(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let lines = vec![
            Line::from(vec![
                Span::styled("sts", Style::default().fg(Color::Cyan)),
                Span::raw(format!(" | item {}/{}: ", self.selected + 1, self.items.len())),
                Span::styled(self.config.item.as_str(), Style::default().fg(Color::White)),
            ]),
            Line::from(Span::styled(
                format!(
                    "diff: {} | lags: {} | sales: {}",
                    self.config.plot.diff,
                    self.config
                        .plot
                        .lags
                        .map(|l| l.to_string())
                        .unwrap_or_else(|| "auto".to_string()),
                    self.config.paths.sales.display()
                ),
                Style::default().fg(Color::Gray),
            )),
        ];
        let p = Paragraph::new(Text::from(lines)).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }

    fn draw_body(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let Some(figure) = &self.figure else {
            let block = Block::default().title("Diagnostics").borders(Borders::ALL);
            let msg = Paragraph::new("No figure for the current settings (see status line).")
                .style(Style::default().fg(Color::Yellow))
                .block(block);
            frame.render_widget(msg, area);
            return;
        };

        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(area);
        let top = halves(rows[0]);
        let bottom = halves(rows[1]);

        for (axes, rect) in figure.axes().into_iter().zip([top[0], top[1], bottom[0], bottom[1]]) {
            draw_panel(frame, rect, axes);
        }
    }

    fn draw_footer(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let help = "←/→ item  +/- diff  [/] lags  a auto lags  q quit";
        let line = Line::from(vec![
            Span::styled(help, Style::default().fg(Color::Gray)),
            Span::raw(" | "),
            Span::styled(self.status.as_str(), Style::default().fg(Color::Yellow)),
        ]);
        let p = Paragraph::new(line).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }
}

fn halves(area: Rect) -> std::rc::Rc<[Rect]> {
    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area)
}

fn draw_panel(frame: &mut ratatui::Frame<'_>, area: Rect, axes: &Axes) {
    let block = Block::default().title(axes.title.as_str()).borders(Borders::ALL);
    match &axes.panel {
        Panel::Line { dates, values } => {
            let points: Vec<(f64, f64)> =
                values.iter().enumerate().map(|(i, &v)| (i as f64, v)).collect();
            let x_labels = match (dates.first(), dates.last()) {
                (Some(first), Some(last)) => vec![first.to_string(), last.to_string()],
                _ => Vec::new(),
            };
            let data = vec![ChartData::default()
                .marker(Marker::Braille)
                .graph_type(GraphType::Line)
                .style(Style::default().fg(Color::Cyan))
                .data(&points)];
            let chart = Chart::new(data)
                .block(block)
                .x_axis(Axis::default().bounds([axes.xlim.0, axes.xlim.1]).labels(x_labels))
                .y_axis(y_axis(axes));
            frame.render_widget(chart, area);
        }
        Panel::Histogram(hist) => {
            let inner = block.inner(area);
            let bins = hist.bins().max(1) as u16;
            let bar_width = (inner.width.saturating_sub(bins) / bins).max(1);
            let bars: Vec<(&str, u64)> = hist.counts.iter().map(|&c| ("", c)).collect();
            let chart = BarChart::default()
                .block(block)
                .data(&bars)
                .bar_width(bar_width)
                .bar_gap(1)
                .bar_style(Style::default().fg(Color::Cyan))
                .value_style(Style::default().fg(Color::Black).bg(Color::Cyan));
            frame.render_widget(chart, area);
        }
        Panel::Correlogram { values, band } => {
            let by_lag = |ys: &[f64], sign: f64| -> Vec<(f64, f64)> {
                ys.iter().enumerate().map(|(k, &y)| (k as f64, sign * y)).collect()
            };
            let stems = by_lag(values.as_slice(), 1.0);
            let upper = by_lag(band.as_slice(), 1.0);
            let lower = by_lag(band.as_slice(), -1.0);
            let band_style = Style::default().fg(Color::DarkGray);
            let data = vec![
                ChartData::default().graph_type(GraphType::Line).style(band_style).data(&upper),
                ChartData::default().graph_type(GraphType::Line).style(band_style).data(&lower),
                ChartData::default()
                    .marker(Marker::Braille)
                    .graph_type(GraphType::Bar)
                    .style(Style::default().fg(Color::Cyan))
                    .data(&stems),
                ChartData::default()
                    .marker(Marker::Dot)
                    .style(Style::default().fg(Color::Yellow))
                    .data(&stems),
            ];
            let chart = Chart::new(data)
                .block(block)
                .x_axis(
                    Axis::default()
                        .bounds([axes.xlim.0, axes.xlim.1])
                        .labels(["0".to_string(), format!("{}", values.len().saturating_sub(1))]),
                )
                .y_axis(y_axis(axes));
            frame.render_widget(chart, area);
        }
    }
}

fn y_axis(axes: &Axes) -> Axis<'static> {
    let (lo, hi) = axes.ylim;
    Axis::default()
        .bounds([lo, hi])
        .labels([fmt_axis_y(lo), fmt_axis_y(hi)])
        .style(Style::default().fg(Color::Gray))
}

fn fmt_axis_y(v: f64) -> String {
    if v.abs() >= 100.0 {
        format!("{v:.0}")
    } else {
        format!("{v:.2}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::sample::{generate_dataset, SampleConfig};
    use crate::domain::DataPaths;
    use ratatui::backend::TestBackend;
    use std::path::Path;

    fn app(plot: PlotOptions, start: Option<&str>) -> Result<App, AppError> {
        let raw = generate_dataset(&SampleConfig {
            days: 90,
            items: 4,
            ..SampleConfig::default()
        })?;
        let data = pipeline::clean_dataset(&raw)?;
        let config = SeriesConfig {
            paths: DataPaths::in_dir(Path::new("data")),
            item: String::new(),
            plot,
            title: None,
        };
        App::new(data, config, start)
    }

    #[test]
    fn starts_on_requested_item_with_default_lags() {
        let app = app(PlotOptions::default(), Some("FOODS_1_001_CA_1_validation")).unwrap();
        assert_eq!(app.selected, 1);
        let fig = app.figure.as_ref().unwrap();
        assert_eq!(fig.lags(), 20);
        assert_eq!(fig.ts.title, "FOODS_1_001_CA_1_validation");
    }

    #[test]
    fn unknown_start_item_is_rejected() {
        let err = app(PlotOptions::default(), Some("nope")).err().unwrap();
        assert_eq!(err.exit_code(), 3);
    }

    #[test]
    fn item_keys_wrap_around() {
        let mut app = app(PlotOptions::default(), None).unwrap();
        app.handle_key(KeyCode::Left);
        assert_eq!(app.selected, 3);
        app.handle_key(KeyCode::Right);
        assert_eq!(app.selected, 0);
        assert_eq!(app.config.item, "HOBBIES_1_001_CA_1_validation");
    }

    #[test]
    fn diff_keys_stay_within_accepted_orders() {
        let mut app = app(PlotOptions::default(), None).unwrap();
        app.handle_key(KeyCode::Char('+'));
        assert_eq!(app.figure.as_ref().unwrap().ts.trace_len(), 89);
        for _ in 0..10 {
            app.handle_key(KeyCode::Char('+'));
        }
        assert_eq!(app.config.plot.diff, MAX_DIFF_ORDER);
        assert!(app.status.contains("maximum"));
        assert_eq!(app.figure.as_ref().unwrap().ts.trace_len(), 90 - MAX_DIFF_ORDER);

        app.handle_key(KeyCode::Char('-'));
        assert_eq!(app.config.plot.diff, MAX_DIFF_ORDER - 1);
    }

    #[test]
    fn lag_keys_step_from_the_current_figure() {
        let mut app = app(PlotOptions::default(), None).unwrap();
        app.handle_key(KeyCode::Char(']'));
        assert_eq!(app.config.plot.lags, Some(21));
        assert_eq!(app.figure.as_ref().unwrap().lags(), 21);
        app.handle_key(KeyCode::Char('a'));
        assert_eq!(app.config.plot.lags, None);
        assert_eq!(app.figure.as_ref().unwrap().lags(), 20);
    }

    #[test]
    fn rejected_lags_are_reported_not_fatal() {
        let plot = PlotOptions {
            lags: Some(50),
            ..PlotOptions::default()
        };
        let mut app = app(plot, None).unwrap();
        assert!(app.figure.is_none());
        assert!(app.status.contains("observations"));

        for _ in 0..6 {
            app.handle_key(KeyCode::Char('['));
        }
        assert_eq!(app.config.plot.lags, Some(44));
        assert!(app.figure.is_some());
        assert!(app.handle_key(KeyCode::Char('q')));
    }

    #[test]
    fn draws_all_panels() {
        let app = app(PlotOptions::default(), None).unwrap();
        let mut terminal = Terminal::new(TestBackend::new(140, 40)).unwrap();
        terminal.draw(|f| app.draw(f)).unwrap();
        let screen: String = terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect();
        assert!(screen.contains("HOBBIES_1_001_CA_1_validation"));
                assert!(screen.contains("Partial Autocorrelation"));
    }
}
