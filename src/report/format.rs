//! Formatted terminal output.
//!
//! We keep formatting code in one place so:
//! - the cleaning/plot code stays clean and testable
//! - output changes are localized (important for snapshot tests)

use std::collections::BTreeSet;

use polars::prelude::{DataFrame, DataType};

use crate::plot::{Figure, Panel};
use crate::report::SeriesSummary;

/// Format an item summary block.
pub fn format_series_summary(summary: &SeriesSummary) -> String {
    let mut out = String::new();

    out.push_str(&format!("=== sts - {} ===\n", summary.item));
    let span = match (summary.first, summary.last) {
        (Some(first), Some(last)) => format!("{first} .. {last}"),
        _ => "-".to_string(),
    };
    out.push_str(&format!("Days: n={} | {span}\n", summary.observations));
    out.push_str(&format!(
        "Units: total={:.0} | mean={:.3}/day | zero days={:.1}%\n",
        summary.total,
        summary.mean,
        summary.zero_share * 100.0
    ));
    out.push_str(&format!("Event days: {}\n", summary.event_days));

    if !summary.weekday_means.is_empty() {
        out.push_str("\nMean units by weekday:\n");
        for (day, mean) in &summary.weekday_means {
            out.push_str(&format!("  {day:<10} {mean:>8.3}\n"));
        }
    }

    out
}

/// Format a one-line-per-column overview of a frame: name, dtype, missing count,
/// and for categorical columns the size of the domain.
pub fn format_table_overview(name: &str, frame: &DataFrame) -> String {
    let (rows, cols) = frame.shape();
    let mut out = String::new();
    out.push_str(&format!("{name}: {rows} rows x {cols} columns\n"));

    let header = format!("{:<24} {:<9} {:>8} {:>10}", "column", "type", "missing", "categories");
    out.push_str(header.trim_end());
    out.push('\n');
    out.push_str(format!("{:-<24} {:-<9} {:-<8} {:-<10}", "", "", "", "").trim_end());
    out.push('\n');

    for column in frame.get_columns() {
        let categories = if column.dtype().is_categorical() {
            column
                .cast(&DataType::String)
                .ok()
                .and_then(|values| {
                    let values = values.str().ok()?;
                    Some(values.into_iter().flatten().collect::<BTreeSet<_>>().len())
                })
                .map(|n| n.to_string())
                .unwrap_or_default()
        } else {
            String::new()
        };
        out.push_str(
            format!(
                "{:<24} {:<9} {:>8} {:>10}",
                truncate(column.name(), 24),
                column.dtype().to_string(),
                column.null_count(),
                categories
            )
            .trim_end(),
        );
        out.push('\n');
    }

    out
}

/// Format the correlogram values of a figure as a lag table.
pub fn format_correlogram(figure: &Figure) -> String {
    let (
        Panel::Correlogram {
            values: acf,
            band: acf_band,
        },
        Panel::Correlogram {
            values: pacf,
            band: pacf_band,
        },
    ) = (&figure.acf.panel, &figure.pacf.panel)
    else {
        return String::new();
    };

    let mut out = String::new();
    let header = format!("{:>4} {:>8} {:>8} {:>8} {:>8}", "lag", "acf", "±band", "pacf", "±band");
    out.push_str(header.trim_end());
    out.push('\n');
    for k in 0..acf.len().min(pacf.len()) {
        let flag = |v: f64, b: f64| if k > 0 && v.abs() > b { "*" } else { " " };
        out.push_str(
            format!(
                "{k:>4} {:>8.3} {:>8.3}{} {:>7.3} {:>8.3}{}\n",
                acf[k],
                acf_band[k],
                flag(acf[k], acf_band[k]),
                pacf[k],
                pacf_band[k],
                flag(pacf[k], pacf_band[k]),
            )
            .trim_end(),
        );
        out.push('\n');
    }
    out
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut out = String::new();
    for (i, ch) in s.chars().enumerate() {
        if i + 1 >= max {
            break;
        }
        out.push(ch);
    }
    out.push('.');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::frame::categorize;
    use crate::domain::PlotOptions;
    use polars::prelude::Column;
    use crate::plot::tsplot;
    use chrono::NaiveDate;

    #[test]
    fn summary_block_lists_span_and_units() {
        let summary = SeriesSummary {
            item: "FOODS_1_001_CA_1_validation".to_string(),
            observations: 3,
            first: NaiveDate::from_ymd_opt(2011, 1, 29),
            last: NaiveDate::from_ymd_opt(2011, 1, 31),
            total: 6.0,
            mean: 2.0,
            zero_share: 1.0 / 3.0,
            event_days: 0,
            weekday_means: vec![("Saturday".to_string(), 1.5)],
        };
        let txt = format_series_summary(&summary);
        assert!(txt.starts_with("=== sts - FOODS_1_001_CA_1_validation ===\n"));
        assert!(txt.contains("Days: n=3 | 2011-01-29 .. 2011-01-31\n"));
        assert!(txt.contains("zero days=33.3%"));
        assert!(txt.contains("  Saturday      1.500\n"));
    }

    #[test]
    fn overview_reports_types_and_categories() {
        let mut frame = DataFrame::new(vec![
            Column::new("store_id".into(), [Some("CA_1"), Some("TX_1"), None]),
            Column::new("sell_price".into(), [Some(1.0), None, Some(2.0)]),
        ])
        .unwrap();
        categorize(&mut frame, "store_id").unwrap();

        let txt = format_table_overview("prices", &frame);
        let lines: Vec<&str> = txt.lines().collect();
        assert_eq!(lines[0], "prices: 3 rows x 2 columns");
        assert!(lines[3].starts_with("store_id"));
        assert!(lines[3].contains("cat"));
        assert!(lines[3].ends_with(" 2"));
        assert!(lines[4].starts_with("sell_price"));
        assert!(lines[4].contains("f64"));
    }

    #[test]
    fn correlogram_table_has_one_row_per_lag() {
        let start = NaiveDate::from_ymd_opt(2011, 1, 29).unwrap();
        let series = crate::domain::TimeSeries {
            name: "x".to_string(),
            dates: (0..40).map(|i| start + chrono::Duration::days(i)).collect(),
            values: (0..40).map(|i| (i % 7) as f64).collect(),
        };
        let fig = tsplot(
            &series,
            "x",
            &PlotOptions {
                lags: Some(8),
                ..PlotOptions::default()
            },
        )
        .unwrap();
        let txt = format_correlogram(&fig);
        assert_eq!(txt.lines().count(), 1 + 9);
        assert!(txt.lines().nth(1).unwrap().starts_with("   0    1.000"));
    }
}
