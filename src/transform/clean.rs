//! Column typing for the three raw input tables.
//!
//! Each cleaner takes ownership of a frame, fixes up column types, and hands the
//! same frame back. Call [`start_pipeline`] first when the caller needs to keep
//! its original.

use polars::prelude::*;

use crate::domain::frame::{categorize, column, has_column};
use crate::domain::schema;
use crate::error::{TableError, TableResult};
use crate::transform::{log_frame, timed};

/// Date formats accepted in the calendar's `date` column, tried in order.
const DATE_FORMATS: [&str; 4] = ["%Y-%m-%d", "%Y/%m/%d", "%d/%m/%Y", "%d-%m-%Y"];

/// Head of a transform chain: an independent copy of `frame`.
pub fn start_pipeline(frame: &DataFrame) -> TableResult<DataFrame> {
    timed("start_pipeline", || Ok(frame.clone()))
}

/// Constrain `store_id` to a categorical domain.
pub fn clean_sell_price(frame: DataFrame) -> TableResult<DataFrame> {
    log_frame("clean_sell_price", |mut frame: DataFrame| -> TableResult<DataFrame> {
        categorize(&mut frame, schema::STORE_ID)?;
        Ok(frame)
    })(frame)
}

/// Constrain `dept_id` to a categorical domain.
pub fn clean_sales(frame: DataFrame) -> TableResult<DataFrame> {
    log_frame("clean_sales", |mut frame: DataFrame| -> TableResult<DataFrame> {
        categorize(&mut frame, schema::DEPT_ID)?;
        Ok(frame)
    })(frame)
}

/// Parse dates, derive calendar parts, and categorise events.
///
/// Derived columns:
/// - `weekday`: English day name
/// - `wday`: days since Monday (Monday = 0, Sunday = 6)
/// - `month`, `year`
///
/// The `date` column becomes a `Date` column and rows end up sorted by it
/// (stable, so same-day rows keep their order). Running this on an already
/// cleaned calendar reproduces it unchanged.
pub fn clean_calendar(frame: DataFrame) -> TableResult<DataFrame> {
    log_frame("clean_calendar", |mut frame: DataFrame| -> TableResult<DataFrame> {
        parse_dates(&mut frame)?;
        for name in schema::EVENT_COLUMNS {
            if has_column(&frame, name) {
                categorize(&mut frame, name)?;
            }
        }

        let date = || col(schema::DATE).dt();
        let frame = frame
            .lazy()
            .with_columns([
                date().strftime("%A").alias(schema::WEEKDAY),
                (date().weekday() - lit(1))
                    .cast(DataType::Int32)
                    .alias(schema::WDAY),
                date().month().cast(DataType::Int32).alias(schema::MONTH),
                date().year().cast(DataType::Int32).alias(schema::YEAR),
            ])
            .sort(
                [schema::DATE],
                SortMultipleOptions::default().with_maintain_order(true),
            )
            .collect()?;
        Ok(frame)
    })(frame)
}

/// Replace the text `date` column with parsed dates. A column that is already
/// typed as dates is kept.
fn parse_dates(frame: &mut DataFrame) -> TableResult<()> {
    let raw = column(frame, schema::DATE)?;
    if raw.dtype().is_date() {
        return Ok(());
    }
    let raw = raw.cast(&DataType::String)?;

    let attempts: Vec<Expr> = DATE_FORMATS
        .iter()
        .map(|format| {
            col(schema::DATE).str().to_date(StrptimeOptions {
                format: Some((*format).into()),
                strict: false,
                exact: true,
                cache: true,
            })
        })
        .collect();
    let parsed = DataFrame::new(vec![raw.clone()])?
        .lazy()
        .select([coalesce(&attempts).alias(schema::DATE)])
        .collect()?;
    let parsed = column(&parsed, schema::DATE)?;

    if let Some(row) = parsed.date()?.as_date_iter().position(|d| d.is_none()) {
        return Err(TableError::ParseError {
            column: schema::DATE.to_string(),
            row,
            value: raw.str()?.get(row).unwrap_or_default().to_string(),
        });
    }
    frame.with_column(parsed.clone())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::frame::text_values;

    fn calendar(dates: &[&str]) -> DataFrame {
        let n = dates.len();
        let days: Vec<String> = (1..=n).map(|i| format!("d_{i}")).collect();
        let mut columns = vec![
            Column::new("date".into(), dates),
            Column::new("d".into(), days),
        ];
        for name in schema::EVENT_COLUMNS {
            columns.push(Column::new(name.into(), vec![None::<&str>; n]));
        }
        DataFrame::new(columns).unwrap()
    }

    fn prices() -> DataFrame {
        DataFrame::new(vec![
            Column::new("store_id".into(), ["CA_1", "TX_2", "CA_1"]),
            Column::new("item_id".into(), ["A", "B", "C"]),
            Column::new("sell_price".into(), [1.0, 2.5, 0.5]),
        ])
        .unwrap()
    }

    fn ints(frame: &DataFrame, name: &str) -> Vec<Option<i64>> {
        let values = frame.column(name).unwrap().cast(&DataType::Int64).unwrap();
        values.i64().unwrap().into_iter().collect()
    }

    #[test]
    fn start_pipeline_copies_without_changes() {
        let original = prices();
        let copy = start_pipeline(&original).unwrap();
        assert_eq!(copy, original);

        let cleaned = clean_sell_price(copy).unwrap();
        assert!(cleaned.column("store_id").unwrap().dtype().is_categorical());
        assert_eq!(original.column("store_id").unwrap().dtype(), &DataType::String);
    }

    #[test]
    fn clean_sell_price_only_touches_store_id() {
        let original = prices();
        let cleaned = clean_sell_price(original.clone()).unwrap();

        assert_eq!(cleaned.shape(), original.shape());
        assert_eq!(cleaned.get_column_names(), original.get_column_names());
        assert_eq!(cleaned.column("item_id").unwrap().dtype(), &DataType::String);
        assert_eq!(cleaned.column("sell_price").unwrap().dtype(), &DataType::Float64);
        assert!(cleaned.column("store_id").unwrap().dtype().is_categorical());
        assert_eq!(
            text_values(&cleaned, "store_id").unwrap(),
            text_values(&original, "store_id").unwrap()
        );
    }

    #[test]
    fn clean_sell_price_requires_store_id() {
        let frame = prices().drop("store_id").unwrap();
        assert!(matches!(
            clean_sell_price(frame),
            Err(TableError::MissingColumn(name)) if name == "store_id"
        ));
    }

    #[test]
    fn clean_sales_categorises_dept_and_is_idempotent() {
        let frame = DataFrame::new(vec![
            Column::new("id".into(), ["A_validation", "B_validation"]),
            Column::new("dept_id".into(), ["FOODS_1", "HOBBIES_1"]),
            Column::new("d_1".into(), [0i64, 3]),
        ])
        .unwrap();
        let once = clean_sales(frame).unwrap();
        assert!(once.column("dept_id").unwrap().dtype().is_categorical());
        assert_eq!(once.column("d_1").unwrap().dtype(), &DataType::Int64);
        let twice = clean_sales(once.clone()).unwrap();
        assert_eq!(twice, once);
        assert!(twice.column("dept_id").unwrap().dtype().is_categorical());
    }

    #[test]
    fn clean_calendar_derives_parts_from_date() {
        let cleaned = clean_calendar(calendar(&["2016-01-02", "2016-01-04"])).unwrap();

        assert_eq!(cleaned.column("date").unwrap().dtype(), &DataType::Date);
        assert_eq!(
            text_values(&cleaned, "weekday").unwrap(),
            [Some("Saturday".to_string()), Some("Monday".to_string())]
        );
        assert_eq!(ints(&cleaned, "wday"), [Some(5), Some(0)]);
        assert_eq!(ints(&cleaned, "month"), [Some(1), Some(1)]);
        assert_eq!(ints(&cleaned, "year"), [Some(2016), Some(2016)]);
    }

    #[test]
    fn clean_calendar_accepts_alternate_formats() {
        let cleaned = clean_calendar(calendar(&["2011/01/29", "30/01/2011"])).unwrap();
        assert_eq!(
            text_values(&cleaned, "date").unwrap(),
            [Some("2011-01-29".to_string()), Some("2011-01-30".to_string())]
        );
    }

    #[test]
    fn clean_calendar_treats_missing_events_as_missing_categories() {
        let cleaned = clean_calendar(calendar(&["2011-01-29"])).unwrap();
        let events = cleaned.column("event_name_1").unwrap();
        assert!(events.dtype().is_categorical());
        assert_eq!(events.null_count(), 1);
        assert_eq!(
            text_values(&cleaned, "weekday").unwrap(),
            [Some("Saturday".to_string())]
        );
    }

    #[test]
    fn clean_calendar_sorts_rows_chronologically() {
        let raw = calendar(&["2011-02-01", "2011-01-30", "2011-01-31"]);
        let cleaned = clean_calendar(raw).unwrap();
        assert_eq!(
            text_values(&cleaned, "date").unwrap(),
            [
                Some("2011-01-30".to_string()),
                Some("2011-01-31".to_string()),
                Some("2011-02-01".to_string()),
            ]
        );
        assert_eq!(text_values(&cleaned, "d").unwrap()[0].as_deref(), Some("d_2"));
    }

    #[test]
    fn clean_calendar_twice_is_identical() {
        let once = clean_calendar(calendar(&["2011-01-29", "2011-01-30"])).unwrap();
        let twice = clean_calendar(once.clone()).unwrap();
        assert_eq!(twice.get_column_names(), once.get_column_names());
        assert_eq!(twice, once);
    }

    #[test]
    fn clean_calendar_rejects_bad_dates() {
        let err = clean_calendar(calendar(&["2011-01-29", "not a date"])).unwrap_err();
        match err {
            TableError::ParseError { row, value, .. } => {
                assert_eq!(row, 1);
                assert_eq!(value, "not a date");
            }
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn clean_calendar_without_date_fails() {
        let frame = calendar(&["2011-01-29"]).drop("date").unwrap();
        assert!(matches!(
            clean_calendar(frame),
            Err(TableError::MissingColumn(name)) if name == "date"
        ));
    }
}
