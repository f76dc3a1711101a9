//! Small helpers over polars frames shared by the transforms and front-ends.

use polars::prelude::*;

use super::types::{schema, TimeSeries};
use crate::error::{TableError, TableResult};

/// Look up a column, reporting a missing one by name.
pub fn column<'a>(frame: &'a DataFrame, name: &str) -> TableResult<&'a Column> {
    frame
        .column(name)
        .map_err(|_| TableError::MissingColumn(name.to_string()))
}

pub fn has_column(frame: &DataFrame, name: &str) -> bool {
    frame.get_column_index(name).is_some()
}

/// Categorical dtype backed by the global category registry.
pub fn categorical() -> DataType {
    DataType::from_categories(Categories::global())
}

/// Cast `name` to a categorical column in place; already categorical columns are left alone.
pub fn categorize(frame: &mut DataFrame, name: &str) -> TableResult<()> {
    let source = column(frame, name)?;
    if source.dtype().is_categorical() {
        return Ok(());
    }
    let cast = source.cast(&categorical())?;
    frame.with_column(cast)?;
    Ok(())
}

/// Cell values of `name` rendered as text, `None` for nulls.
pub fn text_values(frame: &DataFrame, name: &str) -> TableResult<Vec<Option<String>>> {
    let values = column(frame, name)?.cast(&DataType::String)?;
    Ok(values
        .str()?
        .into_iter()
        .map(|v| v.map(str::to_string))
        .collect())
}

/// The `date` column and the numeric column `name` as a [`TimeSeries`].
///
/// Nulls in either column are reported as missing values.
pub fn to_time_series(frame: &DataFrame, name: &str) -> TableResult<TimeSeries> {
    let dates = column(frame, schema::DATE)?;
    let dates = dates.date().map_err(|_| TableError::ColumnType {
        column: schema::DATE.to_string(),
        expected: "date",
        found: dates.dtype().to_string(),
    })?;
    let dates = dates
        .as_date_iter()
        .enumerate()
        .map(|(row, date)| date.ok_or_else(|| missing(schema::DATE, row)))
        .collect::<TableResult<Vec<_>>>()?;

    let values = column(frame, name)?;
    if !values.dtype().is_primitive_numeric() {
        return Err(TableError::ColumnType {
            column: name.to_string(),
            expected: "numeric",
            found: values.dtype().to_string(),
        });
    }
    let values = values.cast(&DataType::Float64)?;
    let values = values
        .f64()?
        .into_iter()
        .enumerate()
        .map(|(row, value)| value.ok_or_else(|| missing(name, row)))
        .collect::<TableResult<Vec<_>>>()?;

    Ok(TimeSeries {
        name: name.to_string(),
        dates,
        values,
    })
}

fn missing(column: &str, row: usize) -> TableError {
    TableError::MissingValue {
        column: column.to_string(),
        row,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn frame() -> DataFrame {
        let dates = vec![
            NaiveDate::from_ymd_opt(2011, 1, 29).unwrap(),
            NaiveDate::from_ymd_opt(2011, 1, 30).unwrap(),
        ];
        DataFrame::new(vec![
            Column::new("date".into(), dates),
            Column::new("units".into(), [Some(3i64), None]),
            Column::new("store_id".into(), ["CA_1", "TX_1"]),
        ])
        .unwrap()
    }

    #[test]
    fn missing_column_is_named() {
        let err = column(&frame(), "dept_id").unwrap_err();
        assert!(matches!(err, TableError::MissingColumn(name) if name == "dept_id"));
        assert!(has_column(&frame(), "units"));
    }

    #[test]
    fn null_values_are_missing_in_series() {
        let err = to_time_series(&frame(), "units").unwrap_err();
        assert!(matches!(err, TableError::MissingValue { row: 1, .. }));

        let frame = frame().slice(0, 1);
        let series = to_time_series(&frame, "units").unwrap();
        assert_eq!(series.values, [3.0]);
        assert_eq!(series.dates[0], NaiveDate::from_ymd_opt(2011, 1, 29).unwrap());
    }

    #[test]
    fn text_column_is_not_a_series() {
        let err = to_time_series(&frame(), "store_id").unwrap_err();
        assert!(matches!(err, TableError::ColumnType { expected: "numeric", .. }));
    }

    #[test]
    fn categorize_keeps_values_readable() {
        let mut frame = frame();
        categorize(&mut frame, "store_id").unwrap();
        assert!(frame.column("store_id").unwrap().dtype().is_categorical());
        assert_eq!(
            text_values(&frame, "store_id").unwrap(),
            [Some("CA_1".to_string()), Some("TX_1".to_string())]
        );
    }
}
