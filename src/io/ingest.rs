//! CSV ingest into polars frames.
//!
//! Every input file is a headered CSV. Column types are inferred from the whole
//! file, so a day column is `i64` unless some cell needs a float. Empty cells
//! are nulls. Dates stay text here; `clean_calendar` parses them. Header names
//! are trimmed (the UTF-8 BOM some tools emit is skipped by the reader).

use std::fs::File;
use std::path::Path;

use polars::io::mmap::MmapBytesReader;
use polars::prelude::*;
use tracing::debug;

use crate::domain::{DataPaths, Dataset};
use crate::error::{TableError, TableResult};

/// Read a headered CSV file into a [`DataFrame`].
pub fn read_table(path: &Path) -> TableResult<DataFrame> {
    let file = File::open(path).map_err(|source| TableError::Io {
        path: path.display().to_string(),
        source,
    })?;
    let frame = read_table_from_reader(file, &path.display().to_string())?;
    debug!(path = %path.display(), rows = frame.height(), cols = frame.width(), "read table");
    Ok(frame)
}

/// Read headered CSV from any seekable reader; `source` names it in errors.
pub fn read_table_from_reader<R>(reader: R, source: &str) -> TableResult<DataFrame>
where
    R: MmapBytesReader,
{
    let csv_error = |e: PolarsError| TableError::Csv {
        path: source.to_string(),
        source: e,
    };

    let mut frame = CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(None)
        .into_reader_with_file_handle(reader)
        .finish()
        .map_err(csv_error)?;

    let names: Vec<String> = frame
        .get_column_names_str()
        .into_iter()
        .map(normalize_header_name)
        .collect();
    frame.set_column_names(names).map_err(csv_error)?;
    Ok(frame)
}

/// Load the calendar and sales tables (and prices, when configured).
pub fn read_tables(paths: &DataPaths) -> TableResult<Dataset> {
    let calendar = read_table(&paths.calendar)?;
    let sales = read_table(&paths.sales)?;
    let prices = paths.prices.as_deref().map(read_table).transpose()?;
    Ok(Dataset {
        calendar,
        sales,
        prices,
    })
}

fn normalize_header_name(name: &str) -> String {
    name.trim().trim_start_matches('\u{feff}').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::frame::text_values;
    use std::io::Cursor;

    fn parse(csv: &str) -> DataFrame {
        read_table_from_reader(Cursor::new(csv.as_bytes()), "inline").unwrap()
    }

    #[test]
    fn infers_int_float_and_text_columns() {
        let frame = parse(
            "id,dept_id,d_1,sell_price\n\
             A_validation,FOODS_1,3,1.25\n\
             B_validation,FOODS_2,0,\n",
        );
        assert_eq!(frame.shape(), (2, 4));
        assert_eq!(frame.column("id").unwrap().dtype(), &DataType::String);
        assert_eq!(frame.column("d_1").unwrap().dtype(), &DataType::Int64);
        let price = frame.column("sell_price").unwrap();
        assert_eq!(price.dtype(), &DataType::Float64);
        assert_eq!(price.f64().unwrap().get(0), Some(1.25));
        assert_eq!(price.f64().unwrap().get(1), None);
    }

    #[test]
    fn headers_are_trimmed_and_bom_stripped() {
        let frame = parse("\u{feff}date , d\n2011-01-29,d_1\n");
        assert_eq!(frame.get_column_names_str(), ["date", "d"]);
        assert_eq!(
            text_values(&frame, "date").unwrap(),
            [Some("2011-01-29".to_string())]
        );
    }

    #[test]
    fn empty_cells_are_nulls() {
        let frame = parse("event_name_1,d\n,d_1\nSuperBowl,d_2\n");
        assert_eq!(
            text_values(&frame, "event_name_1").unwrap(),
            [None, Some("SuperBowl".to_string())]
        );
    }

    #[test]
    fn all_empty_column_is_text() {
        let frame = parse("event_name_2,d\n,d_1\n,d_2\n");
        let events = frame.column("event_name_2").unwrap();
        assert_eq!(events.dtype(), &DataType::String);
        assert_eq!(events.null_count(), 2);
    }

    #[test]
    fn rows_with_extra_fields_fail() {
        let err = read_table_from_reader(Cursor::new("a,b\n1,2\n3,4,5\n".as_bytes()), "inline")
            .unwrap_err();
        assert!(matches!(err, TableError::Csv { path, .. } if path == "inline"));
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = read_table(Path::new("/definitely/not/here.csv")).unwrap_err();
        assert!(matches!(err, TableError::Io { .. }));
    }
}
