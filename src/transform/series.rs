//! Per-item series assembly.
//!
//! The sales table is wide (one column per day-index label `d_1..d_n`). For a
//! single item we turn its row into a column, join it against the calendar on
//! the `d` label, and drop the label column afterwards:
//!
//! ```text
//! sales row  (id, d_1..d_n)  --transpose-->  d_k -> units
//!                            --join on d-->  date -> (units, weekday, wday, ..., events)
//! ```

use polars::prelude::*;

use crate::domain::frame::column;
use crate::domain::schema;
use crate::error::{TableError, TableResult};
use crate::transform::timed;

/// Names of the sales columns that hold day-index values.
pub fn day_columns(sales: &DataFrame) -> Vec<&str> {
    sales
        .get_column_names_str()
        .into_iter()
        .filter(|name| name.contains(schema::DAY_MARKER))
        .collect()
}

/// Assemble the long per-date frame for one item.
///
/// The first column is named after the item and holds its unit sales; the rest
/// are the calendar's columns (without `d`). Rows follow the sales table's day
/// order, restricted to labels the calendar knows about.
pub fn filter_item(item: &str, sales: &DataFrame, calendar: &DataFrame) -> TableResult<DataFrame> {
    timed("filter_item", || assemble(item, sales, calendar))
}

/// Like [`filter_item`] but keeps only the `date` and sales-count columns.
pub fn item_sales(item: &str, sales: &DataFrame, calendar: &DataFrame) -> TableResult<DataFrame> {
    timed("item_sales", || {
        let full = filter_item(item, sales, calendar)?;
        column(&full, schema::DATE)?;
        Ok(full.select([schema::DATE, item])?)
    })
}

fn assemble(item: &str, sales: &DataFrame, calendar: &DataFrame) -> TableResult<DataFrame> {
    column(sales, schema::ITEM_ID)?;
    column(calendar, schema::DAY)?;

    let days = day_columns(sales);
    if days.is_empty() {
        return Err(TableError::MissingColumn(format!("{}*", schema::DAY_MARKER)));
    }
    for day in &days {
        let dtype = column(sales, day)?.dtype();
        if !dtype.is_primitive_numeric() {
            return Err(TableError::ColumnType {
                column: day.to_string(),
                expected: "numeric",
                found: dtype.to_string(),
            });
        }
    }

    let mut row = sales
        .clone()
        .lazy()
        .filter(col(schema::ITEM_ID).cast(DataType::String).eq(lit(item)))
        .select(days.iter().map(|day| col(*day)).collect::<Vec<_>>())
        .collect()?;
    match row.height() {
        0 => {
            return Err(TableError::EmptyResult {
                item: item.to_string(),
            });
        }
        1 => {}
        count => {
            return Err(TableError::DuplicateItem {
                item: item.to_string(),
                count,
            });
        }
    }

    // One row becomes one column, keyed by the day label it came from.
    let mut units = row.transpose(Some(schema::DAY), None)?;
    units.rename("column_0", item.into())?;

    let mut selection = vec![col(item)];
    selection.extend(
        calendar
            .get_column_names_str()
            .into_iter()
            .filter(|name| *name != schema::DAY)
            .map(col),
    );

    let key = || [col(schema::DAY).cast(DataType::String)];
    let joined = units
        .lazy()
        .join_builder()
        .with(calendar.clone().lazy())
        .left_on(key())
        .right_on(key())
        .how(JoinType::Inner)
        .maintain_order(MaintainOrderJoin::LeftRight)
        .finish()
        .select(selection)
        .collect()?;
    Ok(joined)
}
